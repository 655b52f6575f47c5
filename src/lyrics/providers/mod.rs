mod lewagon;
mod lyrics_api;
mod lyrics_ovh;
mod lyrist;
mod musixmatch;

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::{Config, ResolverSettings};
use crate::error::ProviderError;
use crate::lyrics::{Candidate, FoundLyrics, LookupResult, LyricsProvider};

pub use lewagon::LeWagonProvider;
pub use lyrics_api::TheLyricsApiProvider;
pub use lyrics_ovh::LyricsOvhProvider;
pub use lyrist::LyristProvider;
pub use musixmatch::MusixmatchProvider;

/// 获取所有启用的歌词提供者，顺序即优先级
pub fn get_enabled_providers(config: &Arc<Config>) -> Vec<Arc<dyn LyricsProvider>> {
    let mut providers: Vec<Arc<dyn LyricsProvider>> = Vec::new();
    let client = build_client(&config.resolver);

    debug!("加载启用的歌词提供者，配置的源: {:?}", config.lyrics_sources);

    for source in &config.lyrics_sources {
        match source.as_str() {
            "lyrics_api" => match &config.sources.lyrics_api {
                Some(endpoint) => providers.push(Arc::new(TheLyricsApiProvider::new(
                    client.clone(),
                    &endpoint.base_url,
                ))),
                None => warn!("已启用 The Lyrics API 歌词源，但未找到相关配置"),
            },
            "lyrics_ovh" | "ovh" => match &config.sources.lyrics_ovh {
                Some(endpoint) => providers.push(Arc::new(LyricsOvhProvider::new(
                    client.clone(),
                    &endpoint.base_url,
                ))),
                None => warn!("已启用 Lyrics.ovh 歌词源，但未找到相关配置"),
            },
            "lewagon" => match &config.sources.lewagon {
                Some(endpoint) => providers.push(Arc::new(LeWagonProvider::new(
                    client.clone(),
                    &endpoint.base_url,
                ))),
                None => warn!("已启用 Le Wagon 歌词源，但未找到相关配置"),
            },
            "lyrist" => match &config.sources.lyrist {
                Some(endpoint) => providers.push(Arc::new(LyristProvider::new(
                    client.clone(),
                    &endpoint.base_url,
                ))),
                None => warn!("已启用 Lyrist 歌词源，但未找到相关配置"),
            },
            "musixmatch" => match &config.sources.musixmatch {
                Some(mxm) if !mxm.api_key.trim().is_empty() => providers.push(Arc::new(
                    MusixmatchProvider::new(client.clone(), &mxm.base_url, &mxm.api_key),
                )),
                Some(_) => warn!("已启用 Musixmatch 歌词源，但未配置 API key"),
                None => warn!("已启用 Musixmatch 歌词源，但未找到相关配置"),
            },
            _ => {
                warn!("未知的歌词源: {}", source);
            }
        }
    }

    info!("成功加载 {} 个歌词提供者", providers.len());
    for (i, provider) in providers.iter().enumerate() {
        info!("歌词提供者 #{}: {}", i + 1, provider.name());
    }

    providers
}

/// 所有歌词源共用的 HTTP 客户端
fn build_client(settings: &ResolverSettings) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .user_agent(settings.user_agent.as_str())
        .build()
        .unwrap_or_default()
}

/// 发送请求并解析 JSON 响应，404 视为未找到
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<Option<T>, ProviderError> {
    let resp = request.send().await?;

    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }

    let body = resp.text().await?;
    parse_json(&body).map(Some)
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))
}

/// 校验歌词内容：去除空白后非空，且不包含歌词源的"无歌词"提示
pub(crate) fn accept_lyrics(
    lyrics: Option<String>,
    copyright: Option<String>,
    candidate: &Candidate,
    sentinels: &[&str],
) -> LookupResult {
    match lyrics {
        Some(lyrics)
            if !lyrics.trim().is_empty() && !sentinels.iter().any(|s| lyrics.contains(s)) =>
        {
            LookupResult::Found(FoundLyrics {
                lyrics,
                copyright: copyright.unwrap_or_default(),
                matched_track: candidate.track.clone(),
                matched_artist: candidate.artist.clone(),
            })
        }
        _ => LookupResult::NotFound,
    }
}

/// 将请求结果折叠为查询结果
pub(crate) fn settle<T>(
    fetched: Result<Option<T>, ProviderError>,
    accept: impl FnOnce(T) -> LookupResult,
) -> LookupResult {
    match fetched {
        Ok(Some(body)) => accept(body),
        Ok(None) => LookupResult::NotFound,
        Err(e) => LookupResult::Failed(e),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::lyrics::{Candidate, Variant};

    pub fn candidate(track: &str, artist: &str) -> Candidate {
        Candidate {
            track: track.to_string(),
            artist: artist.to_string(),
            variant: Variant::MainTitle,
        }
    }

    /// 不经过系统代理的客户端，只连本地测试服务器
    pub fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    /// 组装一个完整的 HTTP/1.1 响应
    pub fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// 在 127.0.0.1 上应答一次固定响应，返回服务器地址
    pub async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    /// 一个没有监听者的本地地址
    pub async fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }
}
