//! Ordered option token accumulation.

use std::fmt;

/// Option tokens collected from one or more `-o` values.
///
/// Tokens keep their command-line order and are never deduplicated or
/// validated here. Splitting an empty value yields one empty token, which is
/// kept as given and later forwarded as (empty) filesystem data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountOptionSet {
    tokens: Vec<String>,
}

impl MountOptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from repeated `-o` values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for value in values {
            set.push_csv(value.as_ref());
        }
        set
    }

    /// Append every comma-separated token of `value`.
    pub fn push_csv(&mut self, value: &str) {
        self.tokens.extend(value.split(',').map(str::to_string));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for MountOptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(","))
    }
}
