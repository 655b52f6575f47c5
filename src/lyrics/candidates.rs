use std::collections::HashSet;
use std::fmt;

use crate::lyrics::{TrackQuery, TriedQueries};
use crate::utils::string::{main_title, normalize_name};

/// 候选的生成规则，按优先级从高到低排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
    /// 主标题 + 清理后的艺术家
    MainTitle,
    /// 清理后的歌名（保留合作艺术家）+ 清理后的艺术家
    Cleaned,
    /// 原始输入
    Original,
    /// 主标题 + 原始艺术家
    MainTitleOriginalArtist,
}

impl Variant {
    /// 优先级，1 最高
    pub fn rank(self) -> u8 {
        match self {
            Variant::MainTitle => 1,
            Variant::Cleaned => 2,
            Variant::Original => 3,
            Variant::MainTitleOriginalArtist => 4,
        }
    }
}

/// 发给歌词源的一个查询变体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub track: String,
    pub artist: String,
    pub variant: Variant,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - \"{}\"", self.artist, self.track)
    }
}

/// 按优先级排序、按 (歌名, 艺术家) 去重的候选列表，至少包含一个元素
#[derive(Debug, Clone)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    tried: TriedQueries,
}

impl CandidateSet {
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// 最精简的查询（主标题 + 清理后的艺术家），兜底歌词源只用它
    pub fn best(&self) -> &Candidate {
        &self.candidates[0]
    }

    pub fn tried(&self) -> &TriedQueries {
        &self.tried
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// 清理结果为空时回退到去除首尾空白的原始输入
fn normalize_or_raw(raw: &str) -> String {
    let cleaned = normalize_name(raw);
    if cleaned.is_empty() {
        raw.trim().to_string()
    } else {
        cleaned
    }
}

/// 由原始歌名与艺术家生成候选查询
pub fn generate_candidates(raw_track: &str, raw_artist: &str) -> CandidateSet {
    let clean_track = normalize_or_raw(raw_track);
    let clean_artist = normalize_or_raw(raw_artist);
    let main_track = main_title(&clean_track);

    let ordered = [
        (main_track.clone(), clean_artist.clone(), Variant::MainTitle),
        (clean_track.clone(), clean_artist.clone(), Variant::Cleaned),
        (raw_track.to_string(), raw_artist.to_string(), Variant::Original),
        (
            main_track.clone(),
            raw_artist.to_string(),
            Variant::MainTitleOriginalArtist,
        ),
    ];

    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(ordered.len());
    for (track, artist, variant) in ordered {
        if seen.insert((track.clone(), artist.clone())) {
            candidates.push(Candidate {
                track,
                artist,
                variant,
            });
        }
    }

    let tried = TriedQueries {
        original: TrackQuery::new(raw_track, raw_artist),
        cleaned: TrackQuery::new(clean_track, clean_artist.clone()),
        main_track: TrackQuery::new(main_track, clean_artist),
    };

    CandidateSet { candidates, tried }
}
