use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ResolveError};
use crate::lyrics::{
    generate_candidates, Attempt, Candidate, CandidateSet, LookupResult, LookupStrategy,
    LyricsProvider, Resolution, ResolutionOutcome,
};

/// 歌词解析器
///
/// 按声明顺序依次询问每个歌词源，每个歌词源内按候选优先级依次尝试，
/// 第一次命中即返回。不持有可变状态，可以在多个请求间共享。
#[derive(Clone)]
pub struct LyricsResolver {
    providers: Arc<Vec<Arc<dyn LyricsProvider>>>,
    budget: Option<Duration>,
}

impl LyricsResolver {
    /// 创建新的歌词解析器
    pub fn new(providers: Vec<Arc<dyn LyricsProvider>>) -> Self {
        Self {
            providers: Arc::new(providers),
            budget: None,
        }
    }

    /// 设置整个级联的时间预算，`None` 表示不限制
    pub fn with_budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// 解析歌词
    pub async fn resolve(&self, track: &str, artist: &str) -> Result<Resolution, ResolveError> {
        if track.trim().is_empty() {
            return Err(ResolveError::Validation { field: "track" });
        }
        if artist.trim().is_empty() {
            return Err(ResolveError::Validation { field: "artist" });
        }

        let candidates = generate_candidates(track, artist);
        debug!(
            "为 \"{}\" - \"{}\" 生成了 {} 个候选",
            artist,
            track,
            candidates.len()
        );

        match self.run_cascade(&candidates).await {
            ResolutionOutcome::Success { resolution, .. } => Ok(resolution),
            ResolutionOutcome::Failure { attempts } => {
                info!(
                    "所有尝试均失败: \"{}\" - \"{}\", 共 {} 次",
                    artist,
                    track,
                    attempts.len()
                );
                Err(ResolveError::NotFound {
                    tried: candidates.tried().clone(),
                    attempts,
                })
            }
        }
    }

    /// 在候选列表上运行级联
    pub async fn run_cascade(&self, candidates: &CandidateSet) -> ResolutionOutcome {
        let deadline = self.budget.map(|budget| Instant::now() + budget);
        let mut attempts = Vec::new();

        for provider in self.providers.iter() {
            let queue: Vec<&Candidate> = match provider.strategy() {
                LookupStrategy::EveryCandidate => candidates.iter().collect(),
                LookupStrategy::BestCandidateOnly => vec![candidates.best()],
            };

            for candidate in queue {
                debug!("尝试 {}: {}", provider.name(), candidate);

                let result = match deadline {
                    Some(deadline) if Instant::now() >= deadline => {
                        warn!("时间预算已耗尽，停止尝试剩余歌词源");
                        return ResolutionOutcome::Failure { attempts };
                    }
                    Some(deadline) => timeout_at(deadline, provider.lookup(candidate))
                        .await
                        .unwrap_or(LookupResult::Failed(ProviderError::BudgetExhausted)),
                    None => provider.lookup(candidate).await,
                };

                let resolution = match &result {
                    LookupResult::Found(found) => {
                        info!("通过 {} 找到歌词: {}", provider.name(), candidate);
                        Some(Resolution::from_found(found.clone(), provider.name()))
                    }
                    LookupResult::NotFound => {
                        debug!("{} 未找到歌词: {}", provider.name(), candidate);
                        None
                    }
                    LookupResult::Failed(e) => {
                        warn!(
                            "{} 获取歌词失败: {}, 错误: {}",
                            provider.name(),
                            candidate,
                            e
                        );
                        None
                    }
                };
                let exhausted =
                    matches!(result, LookupResult::Failed(ProviderError::BudgetExhausted));

                attempts.push(Attempt {
                    provider: provider.name().to_string(),
                    candidate: candidate.clone(),
                    result,
                });

                if let Some(resolution) = resolution {
                    debug!("共尝试 {} 次", attempts.len());
                    return ResolutionOutcome::Success {
                        resolution,
                        attempts,
                    };
                }
                if exhausted {
                    warn!("时间预算已耗尽，停止尝试剩余歌词源");
                    return ResolutionOutcome::Failure { attempts };
                }
            }
        }

        debug!("所有歌词源均未找到歌词");
        ResolutionOutcome::Failure { attempts }
    }
}
