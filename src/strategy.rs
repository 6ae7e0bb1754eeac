//! Best-effort extraction of club names from free-text strategy notes.
//!
//! This is a heuristic: it picks up capitalised phrases near "club",
//! "Launch", "Expand" and "Scale". It will happily return phrases that are
//! not club names. When nothing matches but the note talks about launching,
//! expanding or scaling, the placeholder [`PLACEHOLDER_CLUB`] is returned.

use regex::Regex;
use std::sync::OnceLock;

pub const PLACEHOLDER_CLUB: &str = "Primary Club";

/// Label shown when no club names could be extracted at all
pub const EXISTING_CLUBS: &str = "Existing clubs";

const STOP_WORDS: &[&str] = &["Launch", "Expand", "Scale", "Club", "Area", "Month"];

const PATTERNS: &[&str] = &[
    r"([A-Z][a-zA-Z\s]+?)\s+(?:club|Club)",
    r"Launch\s+([A-Z][a-zA-Z\s]+?)\s+",
    r"Expand\s+([A-Z][a-zA-Z\s]+?)\s+",
    r"Scale\s+([A-Z][a-zA-Z\s]+?)\s+",
    r"([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)",
];

fn patterns() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("club-name pattern is valid"))
            .collect()
    })
}

/// Candidate club names in first-seen order, without duplicates
pub fn extract_club_names(strategy: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for pattern in patterns() {
        for caps in pattern.captures_iter(strategy) {
            let Some(m) = caps.get(1) else { continue };
            let name = m.as_str().trim();
            if name.chars().count() > 2
                && !STOP_WORDS.contains(&name)
                && !names.iter().any(|n| n == name)
            {
                names.push(name.to_string());
            }
        }
    }

    if names.is_empty() {
        let lower = strategy.to_lowercase();
        if ["launch", "expand", "scale"]
            .iter()
            .any(|kw| lower.contains(kw))
        {
            names.push(PLACEHOLDER_CLUB.to_string());
        }
    }

    names
}

/// Comma-joined club names, or [`EXISTING_CLUBS`] when none were found
pub fn club_names_label(strategy: &str) -> String {
    let names = extract_club_names(strategy);
    if names.is_empty() {
        EXISTING_CLUBS.to_string()
    } else {
        names.join(", ")
    }
}
