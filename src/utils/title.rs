//! 视频标题解析
//!
//! 把 `(视频标题, 频道名)` 拆成歌名与艺术家，供歌词解析器使用。
//! 频道后缀（"VEVO"、"Official"）只在这里处理，歌词解析器的名称清理
//! 不会移除它们。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lyrics::TrackQuery;
use crate::utils::string::normalize_name;

/// "艺术家 - 歌名"、"艺术家: 歌名"、"艺术家 | 歌名"，按顺序匹配
static SPLIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"^(.+?)\s*-\s*(.+)$", r"^(.+?)\s*:\s*(.+)$", r"^(.+?)\s*\|(.+)$"]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("split pattern is a valid regex"))
        .collect()
});

static CHANNEL_SUFFIXES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:vevo|official)\b").expect("channel pattern is a valid regex")
});

/// 去掉频道名中的 "VEVO" / "Official"，结果为空时返回原频道名
pub fn clean_channel_name(channel: &str) -> String {
    let cleaned = CHANNEL_SUFFIXES.replace_all(channel, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        channel.trim().to_string()
    } else {
        cleaned.to_string()
    }
}

/// 从视频标题和频道名推断歌名与艺术家
pub fn parse_video_title(title: &str, channel: &str) -> TrackQuery {
    let cleaned = normalize_name(title);

    for pattern in SPLIT_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&cleaned) {
            let artist = caps[1].trim();
            let track = caps[2].trim();
            if !artist.is_empty() && !track.is_empty() {
                return TrackQuery::new(track, artist);
            }
        }
    }

    let track = if cleaned.is_empty() {
        title.trim().to_string()
    } else {
        cleaned
    };
    TrackQuery::new(track, clean_channel_name(channel))
}
