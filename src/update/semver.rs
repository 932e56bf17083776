//! Version comparison for release tags
//!
//! Release tags are conventionally prefixed with "v" ("v1.3.0") while installed
//! plugins report bare versions that are often not strict semver ("1.2",
//! "1.2.3.4", "1.09.0"). Strict semver pairs compare by semver precedence;
//! anything else falls back to comparing dot-separated numbers, padding the
//! shorter side with zeros.

use std::cmp::Ordering;

use semver::Version;

/// Result of comparing a remote version against the installed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    /// Remote is strictly greater than installed
    Newer,
    /// Both versions are equal
    Same,
    /// Remote is older than installed
    Older,
    /// Either side could not be parsed
    Invalid,
}

/// Strips surrounding whitespace and any leading "v"
pub fn normalize_tag(tag: &str) -> &str {
    tag.trim().trim_start_matches(['v', 'V'])
}

fn numeric_parts(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

fn cmp_numeric(remote: &[u64], installed: &[u64]) -> Ordering {
    let len = remote.len().max(installed.len());
    let part = |parts: &[u64], i: usize| parts.get(i).copied().unwrap_or(0);

    (0..len)
        .map(|i| part(remote, i).cmp(&part(installed, i)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

pub fn compare(remote: &str, installed: &str) -> CompareResult {
    let (remote, installed) = (normalize_tag(remote), normalize_tag(installed));

    let ordering = match (Version::parse(remote), Version::parse(installed)) {
        (Ok(remote), Ok(installed)) => remote.cmp_precedence(&installed),
        _ => match (numeric_parts(remote), numeric_parts(installed)) {
            (Some(remote), Some(installed)) => cmp_numeric(&remote, &installed),
            _ => return CompareResult::Invalid,
        },
    };

    match ordering {
        Ordering::Greater => CompareResult::Newer,
        Ordering::Equal => CompareResult::Same,
        Ordering::Less => CompareResult::Older,
    }
}
