use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{accept_lyrics, fetch_json, settle};
use crate::lyrics::{Candidate, LookupResult, LyricsProvider};

/// Lyrics.ovh 在没有歌词时仍会返回 200，并在歌词字段里放这句话
const NOT_AVAILABLE: &[&str] = &["Unfortunately, we don't have the lyrics"];

#[derive(Debug, Deserialize)]
struct LyricsOvhResponse {
    lyrics: Option<String>,
    copyright: Option<String>,
    error: Option<String>,
}

/// Lyrics.ovh 歌词提供者，以英文歌词为主
pub struct LyricsOvhProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LyricsOvhProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_url(&self, candidate: &Candidate) -> String {
        format!(
            "{}/v1/{}/{}",
            self.base_url,
            urlencoding::encode(&candidate.artist),
            urlencoding::encode(&candidate.track)
        )
    }
}

fn interpret(body: LyricsOvhResponse, candidate: &Candidate) -> LookupResult {
    if let Some(error) = &body.error {
        debug!("Lyrics.ovh 返回错误: {}", error);
    }
    accept_lyrics(body.lyrics, body.copyright, candidate, NOT_AVAILABLE)
}

#[async_trait]
impl LyricsProvider for LyricsOvhProvider {
    fn name(&self) -> &str {
        "lyrics_ovh"
    }

    async fn lookup(&self, candidate: &Candidate) -> LookupResult {
        let url = self.request_url(candidate);
        debug!("Lyrics.ovh 请求: {}", url);

        let fetched = fetch_json::<LyricsOvhResponse>(self.client.get(&url)).await;
        settle(fetched, |body| interpret(body, candidate))
    }
}
