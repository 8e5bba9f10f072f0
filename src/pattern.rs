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

use lazy_regex::{regex, Lazy, Regex};

/// Frozen catalogue of the structural patterns, compiled once per process
/// and shared by every pass. Quoted-term positions accept ASCII and curly
/// quotes interchangeably.
///
/// Header patterns are matched against single lines; the quoted-term
/// pattern is run over accumulated bodies.
pub struct PatternRegistry {
    /// `CHAPTER III` / `Chapter III`, optional inline title after a dash,
    /// period or colon. EU chapters are Roman-numbered.
    pub chapter_eu: &'static Regex,
    /// `CHAPTER 6` / `CHAPTER 6A`, US style, Arabic with an optional letter
    /// suffix.
    pub chapter_us: &'static Regex,
    /// `RULE IV`, the chapter-level unit of a chamber rules manual.
    pub rule_header: &'static Regex,
    /// `Section 2` alone on its line (EU structural section, title on the
    /// following line).
    pub section_eu: &'static Regex,
    /// `Article 17` alone on its line (EU, title on the following line).
    pub article_eu: &'static Regex,
    /// `Section 1798.100 Title...`, the dotted US state form. Has priority
    /// over the USC alphanumeric form.
    pub section_us_dotted: &'static Regex,
    /// `Section 300aa-25 Title...`, the USC alphanumeric form. The full
    /// capture is the section identifier; its leading digit run is the
    /// article number.
    pub section_usc_bare: &'static Regex,
    /// `1.<spaces>text`, a numbered paragraph start. At least two spaces or
    /// one non-breaking space after the dot.
    pub paragraph_start: &'static Regex,
    /// `(a) text`, a lettered point start.
    pub point_start: &'static Regex,
    /// `(iv) text`, a Roman sub-point start, `i` through `x` forms only.
    pub subpoint_start: &'static Regex,
    /// `(1) 'term' means ...`, the EU definition start.
    pub definition_eu_start: &'static Regex,
    /// `(a) "term" means ...`, the US state definition start.
    pub definition_us_start: &'static Regex,
    /// `  a The term "term" means/includes ...`, the USC definition start.
    pub definition_usc_start: &'static Regex,
    /// Titles that mark an article as definition-bearing.
    pub definition_heading: &'static Regex,
    /// Any quoted term, used when harvesting term-to-term references.
    pub quoted_term: &'static Regex,
}

static GLOBAL: Lazy<PatternRegistry> = Lazy::new(PatternRegistry::build);

impl PatternRegistry {
    /// The shared process-wide registry. Patterns are compiled on first
    /// use; a malformed pattern panics here and nowhere else.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    fn build() -> Self {
        Self {
            chapter_eu: regex!(r"^(?:CHAPTER|Chapter)\s+([IVXLCDM]+)(?:\s*[—–:.\-]\s*(.+?))?\s*$"),
            chapter_us: regex!(r"^CHAPTER\s+(\d+[A-Z]?)(?:\s*[—–:.\-]\s*(.+?))?\s*$"),
            rule_header: regex!(r"^(?:RULE|Rule)\s+([IVXLCDM]+)(?:\s*[—–:.\-]\s*(.+?))?\s*$"),
            section_eu: regex!(r"^Section\s+(\d+)\s*$"),
            article_eu: regex!(r"^Article\s+(\d+)\s*$"),
            section_us_dotted: regex!(r"^Section\s+(\d+)\.(\d+)\.?\s*(.*)$"),
            section_usc_bare: regex!(r"^Section\s+(\d+[a-z]*(?:-\d+[a-z]*)?)\.?\s*(.*)$"),
            paragraph_start: regex!(r"^(\d+)\.(?:[ ]{2,}|\x{A0})\s*(.*)$"),
            point_start: regex!(r"^\(([a-z])\)\s+(.*)$"),
            subpoint_start: regex!(r"^\((i|ii|iii|iv|v|vi|vii|viii|ix|x)\)\s+(.*)$"),
            definition_eu_start: regex!(
                r#"^\((\d+)\)\s+['"‘’“”]([^'"‘’“”]+)['"‘’“”](?:\s+of\s+[^m]*)?\s*means(?::|\s|$)"#
            ),
            definition_us_start: regex!(
                r#"^\(([a-z])\)\s+['"‘’“”]([^'"‘’“”]+)['"‘’“”]\s+means(?::|\s|$)"#
            ),
            definition_usc_start: regex!(
                r#"^\s*\(?([a-z])\)?\s+[Tt]he\s+term\s+['"‘’“”]([^'"‘’“”]+)['"‘’“”]\s+(means|includes)(?::|,|\s|$)"#
            ),
            definition_heading: regex!(r"(?i)definitions?|interpretation|terms"),
            quoted_term: regex!(r#"['"‘’“”]([^'"‘’“”]{1,100})['"‘’“”]"#),
        }
    }
}

/// Dialect preference for the hierarchical parser. `Auto` detects the
/// dialect from the text; the other values reorder header recognition in
/// favour of the named dialect.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    Auto,
    Eu,
    UsState,
    Usc,
    HouseRules,
}

impl Default for FormatHint {
    fn default() -> Self {
        Self::Auto
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_patterns() {
        let registry = PatternRegistry::global();
        assert!(registry.chapter_eu.is_match("CHAPTER III"));
        assert!(registry.chapter_eu.is_match("Chapter IV — Transfers"));
        assert!(!registry.chapter_eu.is_match("CHAPTER 2"));
        assert!(registry.chapter_us.is_match("CHAPTER 6A"));
        assert!(registry.section_eu.is_match("Section 2"));
        assert!(!registry.section_eu.is_match("Section 1798.100"));
        assert!(registry.article_eu.is_match("Article 17"));
        assert!(!registry.article_eu.is_match("Article 17 shall apply"));
        assert!(registry
            .section_us_dotted
            .is_match("Section 1798.100 General duties"));
        assert!(registry
            .section_usc_bare
            .is_match("Section 300aa-25 Recording and reporting"));
    }

    #[test]
    fn test_provision_patterns() {
        let registry = PatternRegistry::global();
        assert!(registry.paragraph_start.is_match("1.  The controller shall"));
        assert!(registry.paragraph_start.is_match("2.\u{a0}Processing"));
        assert!(!registry.paragraph_start.is_match("1. single space"));
        assert!(registry.point_start.is_match("(a) the data subject"));
        assert!(registry.subpoint_start.is_match("(iii) storage"));
        assert!(!registry.subpoint_start.is_match("(xi) out of range"));
    }

    #[test]
    fn test_definition_patterns_accept_curly_quotes() {
        let registry = PatternRegistry::global();
        assert!(registry
            .definition_eu_start
            .is_match("(1) ‘personal data’ means any information"));
        assert!(registry
            .definition_eu_start
            .is_match(r#"(4) "profiling" means any form"#));
        assert!(registry
            .definition_us_start
            .is_match(r#"(b) "Business" means a sole proprietorship"#));
        assert!(registry
            .definition_usc_start
            .is_match(r#"  a The term "Service" means the Public Health Service;"#));
        assert!(registry
            .definition_usc_start
            .is_match(r#"(c) The term “State” includes the District of Columbia"#));
    }
}
