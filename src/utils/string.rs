use once_cell::sync::Lazy;
use regex::Regex;

/// 标题噪声规则，按顺序应用
static NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // 括号注释: "(Official Video)", "(2019)"
        r"\s*\([^)]*\)",
        // 方括号注释: "[HD]", "[Lyrics]"
        r"\s*\[[^\]]*\]",
        r"(?i)\s*\bofficial\s*video\b",
        r"(?i)\s*\bofficial\s*audio\b",
        r"(?i)\s*\bmusic\s*video\b",
        r"(?i)\s*\bhd\b",
        r"(?i)\s*\bmv\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("noise pattern is a valid regex"))
    .collect()
});

/// 合作艺术家标记及其之后的全部内容
static FEATURING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:\b(?:ft|feat)\b\.?|\bfeaturing\b|&).*$")
        .expect("featuring pattern is a valid regex")
});

fn strip_noise_once(input: &str) -> String {
    NOISE_PATTERNS
        .iter()
        .fold(input.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
}

/// 清理歌名/艺术家名中的噪声标记
///
/// 移除括号与方括号内容、"Official Video"、"Official Audio"、"Music Video"、
/// "HD"、"MV" 等标记并去除首尾空白。规则会反复应用直到结果不再变化，
/// 因此 `normalize_name(normalize_name(x)) == normalize_name(x)`。
///
/// 全部内容都被移除时返回空字符串，由候选生成器负责回退到原始输入。
pub fn normalize_name(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let next = strip_noise_once(&current).trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// 截取主标题，去掉 "ft." / "feat." / "featuring" / "&" 及其后的合作艺术家
///
/// 截取后为空时返回截取前的字符串。
pub fn main_title(normalized: &str) -> String {
    let truncated = FEATURING.replace(normalized, "");
    let truncated = truncated.trim();
    if truncated.is_empty() {
        normalized.to_string()
    } else {
        truncated.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(
            normalize_name("Song (Official Video) ft. Other Artist"),
            "Song ft. Other Artist"
        );
        assert_eq!(normalize_name("Song [HD] [Lyrics]"), "Song");
        assert_eq!(normalize_name("Song Official Audio"), "Song");
        assert_eq!(normalize_name("Song - official   video"), "Song -");
        assert_eq!(normalize_name("Song Music Video HD"), "Song");
        assert_eq!(normalize_name("  Song MV  "), "Song");
        assert_eq!(normalize_name("Artist"), "Artist");
    }

    #[test]
    fn test_normalize_keeps_words_containing_markers() {
        // 标记必须是独立单词
        assert_eq!(normalize_name("Shadows"), "Shadows");
        assert_eq!(normalize_name("MVP"), "MVP");
        assert_eq!(normalize_name("Official Videos"), "Official Videos");
    }

    #[test]
    fn test_normalize_may_empty_the_string() {
        assert_eq!(normalize_name("(Official Video)"), "");
        assert_eq!(normalize_name("HD MV"), "");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "Song (Official Video) ft. Other Artist",
            "Official Music Video Video",
            "H(x)D",
            "((a)b)",
            "[x (y] z)",
            "(a[)]b)",
            "Song  -  Official Audio [4K] (Remastered 2011)",
            "HD HD HD",
            "周杰伦 - 稻香 (MV)",
            "   ",
        ];
        for input in inputs {
            let once = normalize_name(input);
            assert_eq!(normalize_name(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_normalize_reaches_fixpoint() {
        // 一次移除 "Music Video" 之后才出现 "Official Video"
        assert_eq!(normalize_name("Song Official Music Video Video"), "Song");
    }

    #[test]
    fn test_main_title() {
        assert_eq!(main_title("Song ft. Other Artist"), "Song");
        assert_eq!(main_title("Song feat. Other"), "Song");
        assert_eq!(main_title("Song Feat Other"), "Song");
        assert_eq!(main_title("Song featuring Other"), "Song");
        assert_eq!(main_title("Tom & Jerry"), "Tom");
        assert_eq!(main_title("Song"), "Song");
    }

    #[test]
    fn test_main_title_keeps_words_containing_markers() {
        assert_eq!(main_title("Left Behind"), "Left Behind");
        assert_eq!(main_title("Swift Feature"), "Swift Feature");
    }

    #[test]
    fn test_main_title_falls_back_when_empty() {
        assert_eq!(main_title("feat. Someone"), "feat. Someone");
        assert_eq!(main_title("& Friends"), "& Friends");
    }
}
