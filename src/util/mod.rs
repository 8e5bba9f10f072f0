// Copyright (C) 2024, The Regula Authors
//
// This file is part of Regula.
//
// Regula is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3 of the License.
//
// Regula is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Regula. If not, see <http://www.gnu.org/licenses/>.

pub mod date;

pub fn is_default<T: Default + PartialEq>(t: &T) -> bool {
    t == &T::default()
}

/// Normalize a defined term: lowercased, trimmed, internal whitespace runs
/// collapsed to single spaces.
pub fn normalize_term(term: &str) -> String {
    term.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Case-insensitive substring search for ASCII needles, returning the byte
/// offset of the first occurrence. The needle must be pure ASCII so that the
/// returned offset is always a char boundary in the haystack.
pub fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    debug_assert!(needle.is_ascii());
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("Personal Data"), "personal data");
        assert_eq!(normalize_term("  Surgeon   General "), "surgeon general");
        // Normalizing an already normalized term is the identity
        assert_eq!(normalize_term("surgeon general"), "surgeon general");
    }

    #[test]
    fn test_find_ascii_ci() {
        assert_eq!(find_ascii_ci("The term MEANS things", "means"), Some(9));
        assert_eq!(find_ascii_ci("nothing here", "means"), None);
        assert_eq!(find_ascii_ci("short", "much longer needle"), None);
    }
}
