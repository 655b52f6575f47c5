use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{fetch_json, settle};
use crate::error::ProviderError;
use crate::lyrics::{Candidate, FoundLyrics, LookupResult, LyricsProvider};

/// 搜索命中的曲目
#[derive(Debug, Clone, PartialEq, Eq)]
struct TrackHit {
    track_id: u64,
    track_name: String,
    artist_name: String,
}

/// Musixmatch 歌词提供者
///
/// 先用 track.search 找到曲目，再用 track.lyrics.get 获取歌词，需要 API key。
/// 返回的歌名与艺术家来自 Musixmatch 自己的曲库。
pub struct MusixmatchProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MusixmatchProvider {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        }
    }

    fn search_params<'a>(&'a self, candidate: &'a Candidate) -> Vec<(&'static str, &'a str)> {
        vec![
            ("apikey", self.api_key.as_str()),
            ("q_track", candidate.track.as_str()),
            ("q_artist", candidate.artist.as_str()),
            ("page_size", "1"),
            ("page", "1"),
            ("s_track_rating", "desc"),
            ("f_has_lyrics", "1"),
        ]
    }

    async fn search(&self, candidate: &Candidate) -> Result<Option<TrackHit>, ProviderError> {
        let url = format!("{}/track.search", self.base_url);
        debug!("Musixmatch 搜索: {}", candidate);

        let request = self.client.get(&url).query(&self.search_params(candidate));
        match fetch_json::<Value>(request).await? {
            Some(data) => parse_search(&data),
            None => Ok(None),
        }
    }

    async fn get_lyrics(&self, track_id: u64) -> Result<Option<(String, String)>, ProviderError> {
        let url = format!("{}/track.lyrics.get", self.base_url);
        let track_id = track_id.to_string();
        debug!("获取 Musixmatch 歌词, ID: {}", track_id);

        let request = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str()), ("track_id", track_id.as_str())]);
        match fetch_json::<Value>(request).await? {
            Some(data) => parse_lyrics(&data),
            None => Ok(None),
        }
    }
}

/// 检查 message.header.status_code；404 视为未找到
fn check_header(data: &Value) -> Result<bool, ProviderError> {
    let code = data
        .pointer("/message/header/status_code")
        .and_then(Value::as_u64)
        .ok_or_else(|| ProviderError::Malformed("missing message.header.status_code".into()))?;

    match code {
        200 => Ok(true),
        404 => Ok(false),
        _ => {
            let hint = data
                .pointer("/message/header/hint")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            Err(ProviderError::Api(format!("status {}: {}", code, hint)))
        }
    }
}

fn parse_search(data: &Value) -> Result<Option<TrackHit>, ProviderError> {
    if !check_header(data)? {
        return Ok(None);
    }

    let track = match data
        .pointer("/message/body/track_list/0/track")
        .filter(|t| t.is_object())
    {
        Some(track) => track,
        None => {
            debug!("Musixmatch 未找到匹配曲目");
            return Ok(None);
        }
    };

    let track_id = track["track_id"]
        .as_u64()
        .ok_or_else(|| ProviderError::Malformed("track_id is not a number".into()))?;

    Ok(Some(TrackHit {
        track_id,
        track_name: track["track_name"].as_str().unwrap_or_default().to_string(),
        artist_name: track["artist_name"].as_str().unwrap_or_default().to_string(),
    }))
}

fn parse_lyrics(data: &Value) -> Result<Option<(String, String)>, ProviderError> {
    if !check_header(data)? {
        return Ok(None);
    }

    let body = data
        .pointer("/message/body/lyrics/lyrics_body")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if body.trim().is_empty() {
        return Ok(None);
    }

    let copyright = data
        .pointer("/message/body/lyrics/lyrics_copyright")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Some((body.to_string(), copyright)))
}

fn found(hit: TrackHit, lyrics: String, copyright: String, candidate: &Candidate) -> FoundLyrics {
    FoundLyrics {
        lyrics,
        copyright,
        matched_track: if hit.track_name.is_empty() {
            candidate.track.clone()
        } else {
            hit.track_name
        },
        matched_artist: if hit.artist_name.is_empty() {
            candidate.artist.clone()
        } else {
            hit.artist_name
        },
    }
}

#[async_trait]
impl LyricsProvider for MusixmatchProvider {
    fn name(&self) -> &str {
        "musixmatch"
    }

    async fn lookup(&self, candidate: &Candidate) -> LookupResult {
        let hit = match self.search(candidate).await {
            Ok(Some(hit)) => hit,
            Ok(None) => return LookupResult::NotFound,
            Err(e) => return LookupResult::Failed(e),
        };

        let fetched = self.get_lyrics(hit.track_id).await;
        settle(fetched, |(lyrics, copyright)| {
            LookupResult::Found(found(hit, lyrics, copyright, candidate))
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::lyrics::providers::test_support::candidate;

    #[test]
    fn test_search_params() {
        let provider =
            MusixmatchProvider::new(reqwest::Client::new(), "http://localhost/", " key ");
        let c = candidate("Song", "Artist");
        let params = provider.search_params(&c);
        assert!(params.contains(&("apikey", "key")));
        assert!(params.contains(&("q_track", "Song")));
        assert!(params.contains(&("q_artist", "Artist")));
        assert!(params.contains(&("f_has_lyrics", "1")));
        assert_eq!(provider.base_url, "http://localhost");
    }

    #[test]
    fn test_parse_search() {
        let data = json!({
            "message": {
                "header": { "status_code": 200 },
                "body": { "track_list": [
                    { "track": {
                        "track_id": 42,
                        "track_name": "Song",
                        "artist_name": "The Artist"
                    } }
                ] }
            }
        });
        assert_eq!(
            parse_search(&data).unwrap(),
            Some(TrackHit {
                track_id: 42,
                track_name: "Song".to_string(),
                artist_name: "The Artist".to_string(),
            })
        );

        let empty = json!({
            "message": { "header": { "status_code": 200 }, "body": { "track_list": [] } }
        });
        assert_eq!(parse_search(&empty).unwrap(), None);
    }

    #[test]
    fn test_header_errors() {
        let unauthorized = json!({
            "message": { "header": { "status_code": 401, "hint": "renew" }, "body": "" }
        });
        assert_eq!(
            parse_search(&unauthorized),
            Err(ProviderError::Api("status 401: renew".to_string()))
        );

        let missing = json!({ "message": { "header": { "status_code": 404 } } });
        assert_eq!(parse_lyrics(&missing).unwrap(), None);

        assert!(matches!(
            parse_search(&json!({ "unexpected": true })),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_lyrics_keeps_body_verbatim() {
        let raw = concat!(
            "line one\nline two\n...\n\n",
            "******* This Lyrics is NOT for Commercial use *******\n",
            "(1409624198519)"
        );
        let data = json!({
            "message": {
                "header": { "status_code": 200 },
                "body": { "lyrics": {
                    "lyrics_body": raw,
                    "lyrics_copyright": "Lyrics powered by www.musixmatch.com."
                } }
            }
        });
        let (body, copyright) = parse_lyrics(&data).unwrap().unwrap();
        assert_eq!(body, raw);
        assert_eq!(copyright, "Lyrics powered by www.musixmatch.com.");

        let blank = json!({
            "message": {
                "header": { "status_code": 200 },
                "body": { "lyrics": { "lyrics_body": "" } }
            }
        });
        assert_eq!(parse_lyrics(&blank).unwrap(), None);
    }

    #[test]
    fn test_found_prefers_catalog_names() {
        let c = candidate("song", "artist");
        let hit = TrackHit {
            track_id: 1,
            track_name: "Song".to_string(),
            artist_name: String::new(),
        };
        let lyrics = found(hit, "la".to_string(), String::new(), &c);
        assert_eq!(lyrics.matched_track, "Song");
        assert_eq!(lyrics.matched_artist, "artist");
    }
}
