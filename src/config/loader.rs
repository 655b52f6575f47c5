use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 启用的歌词源列表，顺序即优先级
    pub lyrics_sources: Vec<String>,

    /// 解析器设置
    pub resolver: ResolverSettings,

    /// 歌词源特定配置
    pub sources: SourcesConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ResolverSettings {
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,

    /// 整个级联的时间预算（毫秒），0 表示不限制
    pub total_budget_ms: u64,

    /// 请求时使用的 User-Agent
    pub user_agent: String,
}

impl ResolverSettings {
    pub fn total_budget(&self) -> Option<Duration> {
        (self.total_budget_ms > 0).then(|| Duration::from_millis(self.total_budget_ms))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SourcesConfig {
    /// The Lyrics API 配置
    pub lyrics_api: Option<EndpointConfig>,

    /// Lyrics.ovh 配置
    pub lyrics_ovh: Option<EndpointConfig>,

    /// Le Wagon 配置
    pub lewagon: Option<EndpointConfig>,

    /// Lyrist 配置
    pub lyrist: Option<EndpointConfig>,

    /// Musixmatch 配置
    pub musixmatch: Option<MusixmatchConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
}

impl EndpointConfig {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }
}

/// Musixmatch 配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MusixmatchConfig {
    pub base_url: String,

    /// 为空时不启用
    #[serde(default)]
    pub api_key: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        ResolverSettings {
            request_timeout_secs: 10,
            total_budget_ms: 30_000,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lyrics_sources: ["lyrics_api", "lyrics_ovh", "lewagon", "lyrist"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            resolver: ResolverSettings::default(),
            sources: SourcesConfig {
                lyrics_api: Some(EndpointConfig::new(
                    "https://the-lyrics-api.herokuapp.com",
                )),
                lyrics_ovh: Some(EndpointConfig::new("https://api.lyrics.ovh")),
                lewagon: Some(EndpointConfig::new("https://lyrics.lewagon.ai")),
                lyrist: Some(EndpointConfig::new("https://lyrist.vercel.app")),
                musixmatch: Some(MusixmatchConfig {
                    base_url: "https://api.musixmatch.com/ws/1.1".to_string(),
                    api_key: String::new(),
                }),
            },
        }
    }
}

impl Config {
    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        let pkg_name = env!("CARGO_PKG_NAME");
        dirs::config_dir()
            .map(|p| p.join(pkg_name).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(format!("{}-config.toml", pkg_name)))
    }

    /// 加载配置，支持从指定路径或默认路径加载
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(Self::default_path);

        debug!("尝试从 {:?} 加载配置文件", config_path);

        if !config_path.exists() {
            debug!("配置文件 {:?} 不存在，将创建默认配置", config_path);
            let default_config = Config::default();
            let toml = toml::to_string_pretty(&default_config)?;

            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
                debug!("已确保目录 {:?} 存在", parent);
            }

            fs::write(&config_path, toml)?;
            info!("已创建默认配置文件: {:?}", config_path);
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = match toml::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("解析配置文件 {:?} 失败: {}", config_path, e);
                warn!("由于解析错误，将加载默认配置");
                Config::default()
            }
        };

        debug!("已成功加载配置文件");
        Ok(config)
    }

    /// 用命令行或环境变量提供的 Musixmatch API key 覆盖配置
    pub fn with_musixmatch_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            let mut mxm = self.sources.musixmatch.take().unwrap_or_else(|| {
                MusixmatchConfig {
                    base_url: "https://api.musixmatch.com/ws/1.1".to_string(),
                    api_key: String::new(),
                }
            });
            mxm.api_key = key;
            self.sources.musixmatch = Some(mxm);
            if !self.lyrics_sources.iter().any(|s| s == "musixmatch") {
                // 未显式列出时，排在兜底歌词源之前
                let pos = self
                    .lyrics_sources
                    .iter()
                    .position(|s| s == "lyrist")
                    .unwrap_or(self.lyrics_sources.len());
                self.lyrics_sources.insert(pos, "musixmatch".to_string());
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lyrics-resolver").join("config.toml");

        let config = Config::load(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert_eq!(config.lyrics_sources, Config::default().lyrics_sources);

        // 再次加载读取的是刚写入的文件
        let reloaded = Config::load(Some(path)).unwrap();
        assert_eq!(reloaded.resolver.total_budget_ms, 30_000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
lyrics_sources = ["lyrics_ovh"]

[resolver]
total_budget_ms = 0

[sources.lyrics_ovh]
base_url = "http://localhost:8080"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.lyrics_sources, vec!["lyrics_ovh".to_string()]);
        assert_eq!(config.resolver.request_timeout_secs, 10);
        assert_eq!(config.resolver.total_budget(), None);
        assert_eq!(
            config.sources.lyrics_ovh.map(|e| e.base_url),
            Some("http://localhost:8080".to_string())
        );
        assert!(config.sources.lyrist.is_none());
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "lyrics_sources = 42").unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.lyrics_sources.len(), 4);
    }

    #[test]
    fn test_musixmatch_key_override() {
        let config = Config::default().with_musixmatch_key(Some("secret".to_string()));
        assert_eq!(
            config.lyrics_sources,
            vec!["lyrics_api", "lyrics_ovh", "lewagon", "musixmatch", "lyrist"]
        );
        assert_eq!(config.sources.musixmatch.unwrap().api_key, "secret");

        let config = Config::default().with_musixmatch_key(Some("  ".to_string()));
        assert!(!config.lyrics_sources.iter().any(|s| s == "musixmatch"));
    }

    #[test]
    fn test_total_budget() {
        let settings = ResolverSettings::default();
        assert_eq!(settings.total_budget(), Some(Duration::from_secs(30)));
    }
}
