use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{accept_lyrics, fetch_json, settle};
use crate::lyrics::{Candidate, LookupResult, LyricsProvider};

#[derive(Debug, Deserialize)]
struct LeWagonResponse {
    lyrics: Option<String>,
    error: Option<String>,
}

/// Le Wagon 歌词搜索，按 "艺术家 歌名" 关键词查询
pub struct LeWagonProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LeWagonProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_url(&self, candidate: &Candidate) -> String {
        let keyword = format!("{} {}", candidate.artist, candidate.track);
        format!("{}/search?q={}", self.base_url, urlencoding::encode(&keyword))
    }
}

fn interpret(body: LeWagonResponse, candidate: &Candidate) -> LookupResult {
    if let Some(error) = &body.error {
        debug!("Le Wagon 返回错误: {}", error);
    }
    accept_lyrics(body.lyrics, None, candidate, &[])
}

#[async_trait]
impl LyricsProvider for LeWagonProvider {
    fn name(&self) -> &str {
        "lewagon"
    }

    async fn lookup(&self, candidate: &Candidate) -> LookupResult {
        let url = self.request_url(candidate);
        debug!("Le Wagon 请求: {}", url);

        let fetched = fetch_json::<LeWagonResponse>(self.client.get(&url)).await;
        settle(fetched, |body| interpret(body, candidate))
    }
}
