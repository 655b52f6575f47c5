use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{accept_lyrics, fetch_json, settle};
use crate::lyrics::{Candidate, LookupResult, LyricsProvider};

#[derive(Debug, Deserialize)]
struct LyricsApiResponse {
    lyrics: Option<String>,
}

/// The Lyrics API 歌词提供者
///
/// 支持英文以外的多种语言，没有请求频率限制，因此排在最前。
pub struct TheLyricsApiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl TheLyricsApiProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_url(&self, candidate: &Candidate) -> String {
        format!(
            "{}/api/lyrics/{}/{}",
            self.base_url,
            urlencoding::encode(&candidate.artist),
            urlencoding::encode(&candidate.track)
        )
    }
}

fn interpret(body: LyricsApiResponse, candidate: &Candidate) -> LookupResult {
    accept_lyrics(body.lyrics, None, candidate, &[])
}

#[async_trait]
impl LyricsProvider for TheLyricsApiProvider {
    fn name(&self) -> &str {
        "lyrics_api"
    }

    async fn lookup(&self, candidate: &Candidate) -> LookupResult {
        let url = self.request_url(candidate);
        debug!("The Lyrics API 请求: {}", url);

        let fetched = fetch_json::<LyricsApiResponse>(self.client.get(&url)).await;
        settle(fetched, |body| interpret(body, candidate))
    }
}
