/// Order-independent, case-insensitive identity for a pair of drug names
///
/// Comparison uppercases each character and compares code points, so it is
/// ordinal and does not depend on locale. No whitespace or punctuation
/// normalization is applied.
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Case-insensitive ordinal comparison
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
}

/// Put two names in canonical order, keeping their casing
///
/// `(a, b)` is kept when `a` sorts before or equal to `b` ignoring case.
pub fn canonicalize<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if compare_ignore_case(a, b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    }
}

/// Uppercased canonical pair, used as cache and note-store key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DrugPairKey {
    first: String,
    second: String,
}

impl DrugPairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = canonicalize(a, b);
        Self {
            first: first.to_uppercase(),
            second: second.to_uppercase(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for DrugPairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.first, self.second)
    }
}
