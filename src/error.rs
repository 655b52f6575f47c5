use thiserror::Error;

use crate::lyrics::{Attempt, TriedQueries};

/// 单个歌词源的失败原因，只记录在尝试轨迹里，不会中断级联
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// 网络层失败（连接、超时、TLS 等）
    #[error("transport error: {0}")]
    Transport(String),

    /// 非 2xx 且非 404 的 HTTP 状态
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// 响应体无法解析
    #[error("malformed response: {0}")]
    Malformed(String),

    /// 服务在响应体里报告的错误
    #[error("api error: {0}")]
    Api(String),

    /// 整体时间预算耗尽，请求被取消
    #[error("resolution budget exhausted")]
    BudgetExhausted,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ProviderError::Status(status.as_u16()),
            None => ProviderError::Transport(err.to_string()),
        }
    }
}

/// 歌词解析的最终错误
#[derive(Error, Debug)]
pub enum ResolveError {
    /// 缺少必填参数，不会发起任何请求
    #[error("{field} is required")]
    Validation { field: &'static str },

    /// 所有歌词源与候选组合都没有可用歌词
    #[error("lyrics not found after {} attempts", .attempts.len())]
    NotFound {
        tried: TriedQueries,
        attempts: Vec<Attempt>,
    },
}
