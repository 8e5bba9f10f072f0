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

pub mod resolver;
pub mod uri;

use serde::{Deserialize, Serialize};

use crate::util::is_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Internal,
    External,
    /// A qualifier naming the point in time at which the referenced (or
    /// enclosing) instrument is to be read.
    Temporal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceTarget {
    Article,
    Paragraph,
    Point,
    Chapter,
    Section,
    Subsection,
    Subchapter,
    Directive,
    Regulation,
    Treaty,
    Decision,
    Precedent,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubRef {
    Range,
    Subdivision,
    Paragraph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalKind {
    AsAmended,
    InForceOn,
    Original,
    Consolidated,
    Repealed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalQualifier {
    pub kind: TemporalKind,
    #[serde(default, skip_serializing_if = "is_default")]
    pub description: String,
    /// ISO `YYYY-MM-DD`, or empty when the date text did not parse.
    #[serde(default, skip_serializing_if = "is_default")]
    pub date: String,
}

/// One detected cross-reference. Offsets are byte offsets into the source
/// article's body text, so `body[text_offset..text_offset + text_length]`
/// is exactly `raw_text`; spans of the references of one article never
/// overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub ref_type: ReferenceType,
    pub target: ReferenceTarget,
    pub raw_text: String,
    /// Canonical identifier, e.g. "Article 6(1)(a)" or "42 U.S.C. § 1395".
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_ref: Option<SubRef>,
    /// Number of the article the reference was found in.
    pub source_article: u32,
    pub text_offset: usize,
    pub text_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_num: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_num: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_letter: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_num: Option<String>,
    /// For dotted US sections, the encoded form `prefix * 1000 + suffix`
    /// (so `1798.100` becomes 1798100); for other dialects the plain
    /// section number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_num: Option<u64>,
    /// The full section string when it is not purely numeric, e.g.
    /// "300aa-25" or "1798.100", or a subchapter numeral.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_str: Option<String>,
    /// External document tag ("usc", "cfr", a treaty id, an act name…).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// End of a numeric range (`Articles 13 to 18`, `Sections 1798.100 to
    /// 1798.110`), present only with `sub_ref == Some(Range)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_end_num: Option<u64>,
    /// End of a point range (`points (a) to (f)`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_end_letter: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalQualifier>,
}

impl Reference {
    /// A skeleton with everything optional unset; the extractor fills in
    /// the parsed components it actually found.
    pub fn new(
        ref_type: ReferenceType,
        target: ReferenceTarget,
        source_article: u32,
        raw_text: &str,
        text_offset: usize,
    ) -> Self {
        Self {
            ref_type,
            target,
            raw_text: raw_text.to_string(),
            identifier: raw_text.to_string(),
            sub_ref: None,
            source_article,
            text_offset,
            text_length: raw_text.len(),
            article_num: None,
            paragraph_num: None,
            point_letter: None,
            chapter_num: None,
            section_num: None,
            section_str: None,
            external_doc: None,
            year: None,
            number: None,
            range_end_num: None,
            range_end_letter: None,
            temporal: None,
        }
    }

    pub fn span(&self) -> (usize, usize) {
        (self.text_offset, self.text_offset + self.text_length)
    }
}

/// Document order: by source article, then by byte offset.
pub fn sort_references(references: &mut [Reference]) {
    references.sort_by_key(|r| (r.source_article, r.text_offset));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sort_order() {
        let mut refs = vec![
            Reference::new(ReferenceType::Internal, ReferenceTarget::Article, 7, "b", 5),
            Reference::new(ReferenceType::Internal, ReferenceTarget::Article, 3, "c", 9),
            Reference::new(ReferenceType::Internal, ReferenceTarget::Article, 7, "a", 1),
        ];
        sort_references(&mut refs);
        let order: Vec<(u32, usize)> = refs.iter().map(|r| (r.source_article, r.text_offset)).collect();
        assert_eq!(order, vec![(3, 9), (7, 1), (7, 5)]);
    }

    #[test]
    fn test_serialized_tag_forms() {
        let mut reference = Reference::new(
            ReferenceType::Internal,
            ReferenceTarget::Article,
            10,
            "Article 6(1)(a)",
            0,
        );
        reference.article_num = Some(6);
        reference.paragraph_num = Some(1);
        reference.point_letter = Some('a');
        let value = serde_json::to_value(&reference).unwrap();
        assert_eq!(value["type"], "internal");
        assert_eq!(value["target"], "article");
        assert_eq!(value["point_letter"], "a");
        // Unset components are omitted entirely
        assert!(value.get("section_num").is_none());
        assert!(value.get("temporal").is_none());
    }
}
