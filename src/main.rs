use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lyrics_resolver::app::{describe_candidates, App, Report};
use lyrics_resolver::config::Config;
use lyrics_resolver::lyrics::generate_candidates;

#[derive(Debug, Parser)]
#[command(
    name = "lyrics-resolver",
    version,
    about = "Find lyrics for a track across several lyrics services"
)]
struct Cli {
    /// 指定配置文件路径
    #[arg(long)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,

    /// Musixmatch API key，设置后启用 Musixmatch 歌词源
    #[arg(long, env = "MUSIXMATCH_API_KEY", hide_env_values = true)]
    musixmatch_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 按歌名与艺术家获取歌词
    Resolve {
        #[arg(long)]
        track: String,
        #[arg(long)]
        artist: String,
    },
    /// 从视频标题与频道名推断歌名与艺术家后获取歌词
    Video {
        #[arg(long)]
        title: String,
        #[arg(long)]
        channel: String,
    },
    /// 只列出候选查询，不发起请求
    Candidates {
        #[arg(long)]
        track: String,
        #[arg(long)]
        artist: String,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "lyrics_resolver=debug"
    } else {
        "lyrics_resolver=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let report: Report = match &cli.command {
        Command::Candidates { track, artist } => {
            let candidates = generate_candidates(track, artist);
            print_json(&describe_candidates(&candidates))?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Resolve { track, artist } => {
            let app = build_app(&cli)?;
            app.resolve(track, artist).await
        }
        Command::Video { title, channel } => {
            let app = build_app(&cli)?;
            app.resolve_video(title, channel).await
        }
    };

    print_json(&report)?;
    debug!("退出码: {}", report.exit_code());
    Ok(ExitCode::from(report.exit_code() as u8))
}

fn build_app(cli: &Cli) -> Result<App> {
    let config = Config::load(cli.config.clone())
        .context("load config")?
        .with_musixmatch_key(cli.musixmatch_key.clone());
    Ok(App::new(Arc::new(config)))
}
