// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The forbidden-phrase guard (spec §4.2, §8 property 6).
//!
//! Patterns are regexes, not literal substrings — ported from the original
//! `FORBIDDEN_PHRASES` list, which matches "I think it's done", "I think it
//! is working", etc., not just exact phrases.

use regex::RegexSet;
use std::sync::LazyLock;

/// The closed set of epistemically weak assertions (spec §4.2, §10.5).
/// Matched case-insensitively with internal whitespace flexibility.
const FORBIDDEN_PATTERNS: &[&str] = &[
    r"should\s+work\s+now",
    r"probably\s+passes?",
    r"seems?\s+correct",
    r"looks?\s+good",
    r"i\s+think\s+it('?s|\s+is)?\s+(done|working|correct)",
    r"this\s+should\s+be\s+(fine|ok|correct)",
];

#[allow(clippy::expect_used)]
static FORBIDDEN_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    let patterns: Vec<String> =
        FORBIDDEN_PATTERNS.iter().map(|p| format!("(?i){p}")).collect();
    RegexSet::new(patterns).expect("forbidden phrase patterns are valid regexes")
});

/// Scan `narration` for a forbidden phrase. Returns the index into
/// [`FORBIDDEN_PATTERNS`] of the first pattern that matched, or `None` if
/// the narration is clean.
///
/// A match downgrades an otherwise-valid completion claim to failure even
/// if the TDD certificate's bits are all true — "verification, not vibes"
/// (spec §4.2).
pub fn first_match(narration: &str) -> Option<&'static str> {
    FORBIDDEN_SET.matches(narration).iter().next().map(|i| FORBIDDEN_PATTERNS[i])
}

pub fn contains_forbidden_phrase(narration: &str) -> bool {
    FORBIDDEN_SET.is_match(narration)
}

#[cfg(test)]
#[path = "forbidden_phrase_tests.rs"]
mod tests;
