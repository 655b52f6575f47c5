use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{accept_lyrics, fetch_json, settle};
use crate::lyrics::{Candidate, LookupResult, LookupStrategy, LyricsProvider};

#[derive(Debug, Deserialize)]
struct LyristResponse {
    lyrics: Option<String>,
}

/// Lyrist 歌词提供者
///
/// 匹配最宽松、精度最低，作为最后兜底只查询一次。
pub struct LyristProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LyristProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_url(&self, candidate: &Candidate) -> String {
        format!(
            "{}/api/{}?q={}",
            self.base_url,
            urlencoding::encode(&candidate.track),
            urlencoding::encode(&candidate.artist)
        )
    }
}

#[async_trait]
impl LyricsProvider for LyristProvider {
    fn name(&self) -> &str {
        "lyrist"
    }

    fn strategy(&self) -> LookupStrategy {
        LookupStrategy::BestCandidateOnly
    }

    async fn lookup(&self, candidate: &Candidate) -> LookupResult {
        let url = self.request_url(candidate);
        debug!("Lyrist 兜底请求: {}", url);

        let fetched = fetch_json::<LyristResponse>(self.client.get(&url)).await;
        settle(fetched, |body| accept_lyrics(body.lyrics, None, candidate, &[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::providers::test_support::candidate;

    #[test]
    fn test_request_url() {
        let provider = LyristProvider::new(reqwest::Client::new(), "https://lyrist.vercel.app");
        let url = provider.request_url(&candidate("Tum Hi Ho", "Arijit Singh"));
        assert_eq!(url, "https://lyrist.vercel.app/api/Tum%20Hi%20Ho?q=Arijit%20Singh");
    }

    #[test]
    fn test_is_last_resort() {
        let provider = LyristProvider::new(reqwest::Client::new(), "https://lyrist.vercel.app");
        assert_eq!(provider.strategy(), LookupStrategy::BestCandidateOnly);
    }
}
