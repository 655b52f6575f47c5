mod candidates;
mod manager;
pub mod providers;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::Config;
use crate::error::ProviderError;

pub use candidates::{generate_candidates, Candidate, CandidateSet, Variant};
pub use manager::LyricsResolver;

/// 调用方给出的歌名与艺术家，可能带有噪声
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TrackQuery {
    pub track: String,
    pub artist: String,
}

impl TrackQuery {
    pub fn new(track: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            track: track.into(),
            artist: artist.into(),
        }
    }
}

/// 歌词源命中的歌词
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundLyrics {
    pub lyrics: String,
    pub copyright: String,
    pub matched_track: String,
    pub matched_artist: String,
}

/// 单次歌词源查询的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Found(FoundLyrics),
    NotFound,
    Failed(ProviderError),
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found(_))
    }
}

/// 歌词源在级联中的调用方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// 依次尝试每个候选
    EveryCandidate,
    /// 最后兜底：只用最精简的候选查询一次
    BestCandidateOnly,
}

/// 歌词提供者接口
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// 获取提供者名称
    fn name(&self) -> &str;

    fn strategy(&self) -> LookupStrategy {
        LookupStrategy::EveryCandidate
    }

    /// 用一个候选查询歌词，只发起一次请求，所有失败都以结果值返回
    async fn lookup(&self, candidate: &Candidate) -> LookupResult;
}

/// 级联中的一次尝试
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub provider: String,
    pub candidate: Candidate,
    pub result: LookupResult,
}

/// 解析成功时返回给调用方的歌词
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub lyrics: String,
    pub copyright: String,
    pub track_name: String,
    pub artist_name: String,
    pub provider: String,
}

impl Resolution {
    fn from_found(found: FoundLyrics, provider: &str) -> Self {
        Self {
            lyrics: found.lyrics,
            copyright: found.copyright,
            track_name: found.matched_track,
            artist_name: found.matched_artist,
            provider: provider.to_string(),
        }
    }
}

/// 级联的结果，两种情况都带有完整的尝试轨迹
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Success {
        resolution: Resolution,
        attempts: Vec<Attempt>,
    },
    Failure {
        attempts: Vec<Attempt>,
    },
}

/// 未找到歌词时附带的查询变体，便于调用方提示用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriedQueries {
    pub original: TrackQuery,
    pub cleaned: TrackQuery,
    pub main_track: TrackQuery,
}

/// 根据配置创建歌词解析器
pub fn setup_lyrics_resolver(config: Arc<Config>) -> LyricsResolver {
    let providers = providers::get_enabled_providers(&config);
    LyricsResolver::new(providers).with_budget(config.resolver.total_budget())
}
