use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ResolveError;
use crate::lyrics::{
    self, Attempt, CandidateSet, LookupResult, LyricsResolver, Resolution, TrackQuery,
    TriedQueries,
};
use crate::utils::parse_video_title;

const NOT_FOUND_MESSAGE: &str = "Lyrics not found for this track. \
    The song might not be in any of the databases, or the track/artist names might not match. \
    Try searching with just the main song name and artist.";

/// 一次尝试的可序列化摘要
#[derive(Debug, Serialize)]
pub struct AttemptSummary {
    pub provider: String,
    pub track: String,
    pub artist: String,
    pub outcome: String,
}

impl From<&Attempt> for AttemptSummary {
    fn from(attempt: &Attempt) -> Self {
        let outcome = match &attempt.result {
            LookupResult::Found(_) => "found".to_string(),
            LookupResult::NotFound => "not found".to_string(),
            LookupResult::Failed(e) => e.to_string(),
        };
        Self {
            provider: attempt.provider.clone(),
            track: attempt.candidate.track.clone(),
            artist: attempt.candidate.artist.clone(),
            outcome,
        }
    }
}

/// 解析结果报告，直接输出为 JSON
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Found(Resolution),
    NotFound {
        error: String,
        tried: TriedQueries,
        attempts: Vec<AttemptSummary>,
    },
    Invalid {
        error: String,
    },
}

impl Report {
    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            Report::Found(_) => 0,
            Report::NotFound { .. } => 1,
            Report::Invalid { .. } => 2,
        }
    }
}

impl From<Result<Resolution, ResolveError>> for Report {
    fn from(result: Result<Resolution, ResolveError>) -> Self {
        match result {
            Ok(resolution) => Report::Found(resolution),
            Err(ResolveError::NotFound { tried, attempts }) => Report::NotFound {
                error: NOT_FOUND_MESSAGE.to_string(),
                tried,
                attempts: attempts.iter().map(AttemptSummary::from).collect(),
            },
            Err(e @ ResolveError::Validation { .. }) => Report::Invalid {
                error: e.to_string(),
            },
        }
    }
}

pub struct App {
    resolver: LyricsResolver,
}

impl App {
    /// 创建新应用实例
    pub fn new(config: Arc<Config>) -> Self {
        let resolver = lyrics::setup_lyrics_resolver(config);
        debug!("歌词源顺序: {:?}", resolver.provider_names());
        Self { resolver }
    }

    pub fn with_resolver(resolver: LyricsResolver) -> Self {
        Self { resolver }
    }

    /// 按歌名与艺术家解析歌词
    pub async fn resolve(&self, track: &str, artist: &str) -> Report {
        info!("获取歌词: \"{}\" - \"{}\"", artist, track);
        self.resolver.resolve(track, artist).await.into()
    }

    /// 先从视频标题推断歌名与艺术家，再解析歌词
    pub async fn resolve_video(&self, title: &str, channel: &str) -> Report {
        let TrackQuery { track, artist } = parse_video_title(title, channel);
        debug!("视频标题解析结果: \"{}\" - \"{}\"", artist, track);
        self.resolve(&track, &artist).await
    }
}

/// 列出候选查询，不发起任何请求
pub fn describe_candidates(candidates: &CandidateSet) -> Vec<serde_json::Value> {
    candidates
        .iter()
        .map(|c| {
            serde_json::json!({
                "rank": c.variant.rank(),
                "track": c.track,
                "artist": c.artist,
            })
        })
        .collect()
}
