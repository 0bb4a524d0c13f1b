use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s\p{Zs}]+").expect("WHITESPACE_RUN regex is valid")
});

/// Normalizes Persian text for indexing and querying
///
/// The same function must run over crawled documents and over raw search
/// queries, otherwise index tokens and query tokens stop matching.
///
/// - Arabic yeh (`ي`) and kaf (`ك`) become Persian yeh (`ی`) and keheh (`ک`)
/// - ZWNJ, RLM, LRE, RLE and the not sign (`¬`) become a space
/// - every run of whitespace becomes a single space
/// - leading and trailing spaces are removed
///
/// The output is a fixed point: `normalize(&normalize(s)) == normalize(s)`.
///
/// # Examples
///
/// ```
/// use kavosh::normalize;
///
/// assert_eq!(normalize("  كتاب\u{200C}هاي   ما \n"), "کتاب های ما");
/// ```
pub fn normalize(text: &str) -> String {
    let mapped: String = text.chars().map(map_char).collect();
    WHITESPACE_RUN
        .replace_all(&mapped, " ")
        .trim_matches(' ')
        .to_string()
}

fn map_char(c: char) -> char {
    match c {
        '\u{064A}' => '\u{06CC}',
        '\u{0643}' => '\u{06A9}',
        '\u{200C}' | '\u{200F}' | '\u{202A}' | '\u{202B}' | '\u{00AC}' => ' ',
        other => other,
    }
}
