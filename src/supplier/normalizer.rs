use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// Legal and generic suffix words carrying no supplier identity. Stripped
// only from the end of a name so "Co Building Supply" keeps its first word.
const NOISE_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "llc",
    "ltd",
    "limited",
    "co",
    "corp",
    "corporation",
    "company",
    "solutions",
    "technologies",
    "group",
    "international",
    "global",
    "systems",
    "industries",
    "products",
];

lazy_static! {
    static ref SUFFIX_RE: Regex = Regex::new(&format!(
        r"(?:\s+(?:{}))+$",
        NOISE_SUFFIXES.join("|")
    ))
    .expect("suffix pattern is valid");
}

/// Reduce a supplier name to its canonical matching key: Unicode
/// normalization, lowercasing, punctuation and whitespace collapse, then
/// trailing noise-word removal. Idempotent, so a stored key can be fed
/// back through without changing.
pub fn normalize_name(name: &str) -> String {
    let cleaned = name
        .nfkd()
        .filter(|c| !is_combining_mark(*c)) // Drop accents exposed by NFKD
        .collect::<String>()
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    SUFFIX_RE.replace(&cleaned, "").into_owned()
}
