use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const DEFAULT_SUFFIXES: &[&str] = &[
    "abogados",
    "abogado",
    "despacho",
    "bufete",
    "& asociados",
    "y asociados",
    "asociados",
    "& associates",
    "and associates",
    "associates",
    "lawyers",
    "law firm",
    "law",
    "legal",
    "firm",
    "s.l.p.",
    "s.l.",
    "s.c.",
    "s.a.",
    "slp",
    "sl",
    "llp",
    "llc",
    "ltd",
    "inc",
];

/// Corporate and legal-form suffixes stripped from the end of entity names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRules {
    suffixes: Vec<String>,
}

impl Default for NameRules {
    fn default() -> Self {
        Self::with_extra_suffixes(std::iter::empty::<&str>())
    }
}

impl NameRules {
    pub fn with_extra_suffixes<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut suffixes: Vec<String> = DEFAULT_SUFFIXES.iter().map(|s| fold(s)).collect();
        for suffix in extra {
            let folded = fold(suffix.as_ref());
            if !folded.is_empty() && !suffixes.contains(&folded) {
                suffixes.push(folded);
            }
        }
        // Longest first so "s.l.p." wins over "s.l.".
        suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { suffixes }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}

/// Canonical comparison form of an entity name.
///
/// Lower-cases, folds accents, strips trailing legal/corporate suffixes until
/// none remain, drops punctuation and collapses whitespace. A suffix is only
/// removed when it is a separate word, so a name is never reduced by a suffix
/// that is part of a longer word.
pub fn normalize_name(value: &str, rules: &NameRules) -> String {
    let mut name = fold(value);
    loop {
        let before = name.len();
        for suffix in &rules.suffixes {
            name = strip_suffix_word(&name, suffix);
        }
        if name.len() == before {
            break;
        }
    }

    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if !ch.is_alphanumeric() {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

fn fold(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect()
}

fn strip_suffix_word(name: &str, suffix: &str) -> String {
    let trimmed = name.trim_end_matches(|c: char| c.is_whitespace() || c == ',');
    let head = trimmed
        .strip_suffix(suffix)
        .or_else(|| {
            trimmed
                .strip_suffix('.')
                .and_then(|rest| rest.strip_suffix(suffix))
        });
    match head {
        Some(head) if head.ends_with(|c: char| c.is_whitespace() || c == ',' || c == '-') => head
            .trim_end_matches(|c: char| c.is_whitespace() || c == ',' || c == '-')
            .to_string(),
        _ => trimmed.to_string(),
    }
}
