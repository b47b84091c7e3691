use std::sync::LazyLock;

use regex::Regex;

use crate::TexCountReport;

static WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Words in text: ([0-9]+)").expect("word count pattern"));
static FLOATS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Number of floats/tables/figures: ([0-9]+)").expect("float count pattern")
});

/// Scrapes the first word count and float count out of texcount's stdout.
///
/// Returns `None` when no word count is present.
pub fn parse_texcount_output(stdout: &str) -> Option<TexCountReport> {
    let words = WORDS.captures(stdout)?.get(1)?.as_str().to_string();
    let floats = FLOATS
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok());
    Some(TexCountReport { words, floats })
}
