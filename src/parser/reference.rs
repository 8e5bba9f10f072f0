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

//! Cross-reference detection. Pattern families run in a fixed order per
//! article, and a match is discarded when its byte span overlaps any
//! already-accepted reference. That single overlap rule carries most of
//! the disambiguation weight: `Article 6` never fires inside
//! `Article 6(1)(a)`, `point (a)` never fires inside `points (a) to (f)`,
//! and the long form of a citation always shadows its own fragments.

use lazy_regex::regex;
use regex::Captures;

use crate::reference::{
    sort_references, Reference, ReferenceTarget, ReferenceType, SubRef, TemporalKind,
    TemporalQualifier,
};
use crate::structure::{Article, Document};
use crate::util::date::iso_date_string;

/// Extract the references of every article, sorted by (source article,
/// byte offset).
pub fn extract_document_references(document: &Document) -> Vec<Reference> {
    let mut references = Vec::new();
    for article in document.all_articles() {
        references.extend(extract_article_references(article));
    }
    sort_references(&mut references);
    references
}

pub fn extract_article_references(article: &Article) -> Vec<Reference> {
    let mut collector = Collector::new(article.number, &article.text);
    collector.eu_internal();
    collector.us_state_internal();
    collector.usc_internal();
    collector.eu_external();
    collector.house_rules_internal();
    collector.us_external();
    collector.parliamentary_authorities();
    collector.temporal();
    collector.finish()
}

struct Collector<'a> {
    article: u32,
    text: &'a str,
    spans: Vec<(usize, usize)>,
    references: Vec<Reference>,
}

impl<'a> Collector<'a> {
    fn new(article: u32, text: &'a str) -> Self {
        Self {
            article,
            text,
            spans: Vec::new(),
            references: Vec::new(),
        }
    }

    /// `[start, end)` overlaps an accepted span `[o, o+l)` iff
    /// `start < o+l && end > o`.
    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.spans
            .iter()
            .any(|&(accepted_start, accepted_end)| start < accepted_end && end > accepted_start)
    }

    fn push(&mut self, reference: Reference) {
        let (start, end) = reference.span();
        debug_assert!(!self.overlaps(start, end));
        self.spans.push((start, end));
        self.references.push(reference);
    }

    fn base(
        &self,
        ref_type: ReferenceType,
        target: ReferenceTarget,
        captures: &Captures,
    ) -> Reference {
        let matched = captures.get(0).unwrap();
        Reference::new(
            ref_type,
            target,
            self.article,
            matched.as_str(),
            matched.start(),
        )
    }

    fn finish(mut self) -> Vec<Reference> {
        self.references.sort_by_key(|r| r.text_offset);
        self.references
    }

    // ----- family 1: EU internal -----

    fn eu_internal(&mut self) {
        for captures in regex!(r"\bArticle\s+(\d+)\((\d+)\)(?:\(([a-z])\))?")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Article, &captures);
            reference.article_num = captures[1].parse().ok();
            reference.paragraph_num = captures[2].parse().ok();
            reference.point_letter = captures.get(3).map(|m| m.as_str().chars().next().unwrap());
            self.push(reference);
        }

        for captures in regex!(r"\bArticle\s+(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Article, &captures);
            reference.article_num = captures[1].parse().ok();
            self.push(reference);
        }

        for captures in regex!(r"\bArticles\s+(\d+)\s+to\s+(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Article, &captures);
            reference.sub_ref = Some(SubRef::Range);
            reference.article_num = captures[1].parse().ok();
            reference.range_end_num = captures[2].parse().ok();
            self.push(reference);
        }

        // The paragraph/point patterns deliberately stop before any
        // `of paragraph N` / `of Article N` tail: those tails are claimed
        // by their own patterns, and the resolver supplies the missing
        // context (source article, default paragraph).
        for captures in regex!(r"\bparagraphs?\s+(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::Internal,
                ReferenceTarget::Paragraph,
                &captures,
            );
            reference.paragraph_num = captures[1].parse().ok();
            self.push(reference);
        }

        for captures in regex!(r"\bpoints\s+\(([a-z])\)\s+to\s+\(([a-z])\)")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Point, &captures);
            reference.sub_ref = Some(SubRef::Range);
            reference.point_letter = captures[1].chars().next();
            reference.range_end_letter = captures[2].chars().next();
            self.push(reference);
        }

        for captures in regex!(r"\bpoint\s+\(([a-z])\)")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Point, &captures);
            reference.point_letter = captures[1].chars().next();
            self.push(reference);
        }

        for captures in regex!(r"\bChapter\s+([IVXLCDM]+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Chapter, &captures);
            reference.chapter_num = Some(captures[1].to_string());
            self.push(reference);
        }

        for captures in regex!(r"\bSection\s+(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let rest = &self.text[matched.end()..];
            // `Section 1798.100` is a US-style dotted section, and
            // `Section 11 of Title 1` a state-code external citation; both
            // belong to later families.
            if rest.starts_with('.') || rest.starts_with(" of Title") || rest.starts_with(" of title")
            {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Section, &captures);
            reference.section_num = captures[1].parse().ok();
            self.push(reference);
        }
    }

    // ----- family 2: US state internal -----

    fn us_state_internal(&mut self) {
        for captures in regex!(
            r"\bparagraph\s+\((\d+)\)\s+of\s+subdivision\s+\(([a-z])\)\s+of\s+Section\s+(\d+)\.(\d+)\b"
        )
        .captures_iter(self.text)
        .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Section, &captures);
            reference.sub_ref = Some(SubRef::Paragraph);
            reference.paragraph_num = captures[1].parse().ok();
            reference.point_letter = captures[2].chars().next();
            self.fill_dotted_section(&mut reference, &captures[3], &captures[4]);
            self.push(reference);
        }

        for captures in regex!(r"\bsubdivision\s+\(([a-z])\)\s+of\s+Section\s+(\d+)\.(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Section, &captures);
            reference.sub_ref = Some(SubRef::Subdivision);
            reference.point_letter = captures[1].chars().next();
            self.fill_dotted_section(&mut reference, &captures[2], &captures[3]);
            self.push(reference);
        }

        for captures in regex!(r"\bSection\s+(\d+)\.(\d+)\(([a-z])\)(?:\((\d+)\))?")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Section, &captures);
            reference.sub_ref = Some(SubRef::Subdivision);
            reference.point_letter = captures[3].chars().next();
            reference.paragraph_num = captures.get(4).and_then(|m| m.as_str().parse().ok());
            self.fill_dotted_section(&mut reference, &captures[1], &captures[2]);
            self.push(reference);
        }

        for captures in regex!(r"\bSections\s+(\d+)\.(\d+)\s+(?:to|through)\s+(\d+)\.(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Section, &captures);
            reference.sub_ref = Some(SubRef::Range);
            self.fill_dotted_section(&mut reference, &captures[1], &captures[2]);
            if let (Ok(prefix), Ok(suffix)) =
                (captures[3].parse::<u64>(), captures[4].parse::<u64>())
            {
                reference.range_end_num = Some(prefix * 1000 + suffix);
            }
            self.push(reference);
        }

        for captures in regex!(r"\bSection\s+(\d+)\.(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Section, &captures);
            self.fill_dotted_section(&mut reference, &captures[1], &captures[2]);
            self.push(reference);
        }
    }

    /// Shared component fill for `Section <prefix>.<suffix>` forms: the
    /// suffix is the canonical article number, the encoded section number
    /// is `prefix * 1000 + suffix`.
    fn fill_dotted_section(&self, reference: &mut Reference, prefix: &str, suffix: &str) {
        reference.section_str = Some(format!("{}.{}", prefix, suffix));
        reference.article_num = suffix.parse().ok();
        if let (Ok(prefix), Ok(suffix)) = (prefix.parse::<u64>(), suffix.parse::<u64>()) {
            reference.section_num = Some(prefix * 1000 + suffix);
        }
    }

    // ----- family 3: USC internal -----

    fn usc_internal(&mut self) {
        // (a) cross-title: external despite the internal-looking shape
        for captures in regex!(r"\b[Ss]ection\s+(\d+[a-z]*(?:-\d+[a-z]*)?)\s+of\s+title\s+(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::External, ReferenceTarget::Section, &captures);
            reference.external_doc = Some("usc".to_string());
            reference.section_str = Some(captures[1].to_string());
            reference.number = captures[2].parse().ok();
            self.push(reference);
        }

        // (b) same-title
        for captures in
            regex!(r"\b[Ss]ection\s+(\d+[a-z]*(?:-\d+[a-z]*)?)\s+of\s+this\s+title\b")
                .captures_iter(self.text)
                .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Article, &captures);
            reference.section_str = Some(captures[1].to_string());
            reference.article_num = leading_integer(&captures[1]);
            self.push(reference);
        }

        // (c) named act
        for captures in regex!(
            r"\b[Ss]ection\s+(\d+[a-z]*(?:-\d+[a-z]*)?)\s+of\s+the\s+([A-Z][A-Za-z' .\-]*?)\s+Act\b"
        )
        .captures_iter(self.text)
        .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::External, ReferenceTarget::Section, &captures);
            reference.external_doc = Some(format!("{} Act", &captures[2]));
            reference.section_str = Some(captures[1].to_string());
            self.push(reference);
        }

        // (d) paragraph (N) of subsection (L), relative to the source article
        for captures in regex!(r"\bparagraph\s+\((\d+)\)\s+of\s+subsection\s+\(([a-z])\)")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::Internal,
                ReferenceTarget::Paragraph,
                &captures,
            );
            reference.sub_ref = Some(SubRef::Paragraph);
            reference.paragraph_num = captures[1].parse().ok();
            reference.point_letter = captures[2].chars().next();
            self.push(reference);
        }

        // (e) section X(L)(N?) without an "of" continuation
        for captures in
            regex!(r"\b[Ss]ection\s+(\d+[a-z]*(?:-\d+[a-z]*)?)\(([a-z])\)(?:\((\d+)\))?")
                .captures_iter(self.text)
                .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            if self.text[matched.end()..].starts_with(" of ") {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Article, &captures);
            reference.section_str = Some(captures[1].to_string());
            reference.article_num = leading_integer(&captures[1]);
            reference.point_letter = captures[2].chars().next();
            reference.paragraph_num = captures.get(3).and_then(|m| m.as_str().parse().ok());
            self.push(reference);
        }

        // (f) subsection (L)(N?)
        for captures in regex!(r"\bsubsection\s+\(([a-z])\)(?:\((\d+)\))?")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::Internal,
                ReferenceTarget::Subsection,
                &captures,
            );
            reference.point_letter = captures[1].chars().next();
            reference.paragraph_num = captures.get(2).and_then(|m| m.as_str().parse().ok());
            self.push(reference);
        }

        // (g) subchapter III of chapter 7
        for captures in regex!(r"\b[Ss]ubchapter\s+([IVXLCDM]+)\s+of\s+chapter\s+(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::Internal,
                ReferenceTarget::Subchapter,
                &captures,
            );
            reference.section_str = Some(captures[1].to_string());
            reference.chapter_num = Some(captures[2].to_string());
            self.push(reference);
        }

        // (h) chapter 7
        for captures in regex!(r"\b[Cc]hapter\s+(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Chapter, &captures);
            reference.chapter_num = Some(captures[1].to_string());
            self.push(reference);
        }

        // (i) bare alphanumeric section: the letter suffix is required,
        // so an EU-style `Section 1` never lands here
        for captures in regex!(r"\b[Ss]ection\s+(\d+[a-z]+(?:-\d+[a-z]*)?|\d+-\d+[a-z]*)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Article, &captures);
            reference.section_str = Some(captures[1].to_string());
            reference.article_num = leading_integer(&captures[1]);
            self.push(reference);
        }
    }

    // ----- family 4: EU external -----

    fn eu_external(&mut self) {
        for captures in
            regex!(r"\bDirective\s+(?:\((?:EU|EC)\)\s+)?(\d{2,4})/(\d+)(?:/(?:EC|EEC|EU))?\b")
                .captures_iter(self.text)
                .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::External,
                ReferenceTarget::Directive,
                &captures,
            );
            reference.year = captures[1].parse().ok().map(expand_two_digit_year);
            reference.number = captures[2].parse().ok();
            self.push(reference);
        }

        for captures in regex!(r"\bRegulation\s+\((?:EC|EU|EEC)\)\s+No\.?\s*(\d+)/(\d{4})\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::External,
                ReferenceTarget::Regulation,
                &captures,
            );
            reference.number = captures[1].parse().ok();
            reference.year = captures[2].parse().ok();
            self.push(reference);
        }

        for captures in regex!(r"\bRegulation\s+\((?:EC|EU|EEC)\)\s+(\d{4})/(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::External,
                ReferenceTarget::Regulation,
                &captures,
            );
            reference.year = captures[1].parse().ok();
            reference.number = captures[2].parse().ok();
            self.push(reference);
        }

        for (pattern, tag) in [
            (
                regex!(r"\bTreaty\s+on\s+the\s+Functioning\s+of\s+the\s+European\s+Union\b"),
                "tfeu",
            ),
            (regex!(r"\bTreaty\s+on\s+European\s+Union\b"), "teu"),
            (regex!(r"\bTFEU\b"), "tfeu"),
            (regex!(r"\bTEU\b"), "teu"),
        ] {
            for captures in pattern.captures_iter(self.text).collect::<Vec<_>>() {
                let matched = captures.get(0).unwrap();
                if self.overlaps(matched.start(), matched.end()) {
                    continue;
                }
                let mut reference =
                    self.base(ReferenceType::External, ReferenceTarget::Treaty, &captures);
                reference.external_doc = Some(tag.to_string());
                self.push(reference);
            }
        }

        for captures in regex!(r"\bDecision\s+(?:No\.?\s*)?(\d+)/(\d{4})(?:/(?:EC|EU))?\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::External,
                ReferenceTarget::Decision,
                &captures,
            );
            reference.number = captures[1].parse().ok();
            reference.year = captures[2].parse().ok();
            self.push(reference);
        }
    }

    // ----- family 5: House rules internal -----

    fn house_rules_internal(&mut self) {
        for captures in regex!(r"\bclause\s+(\d+)\s+of\s+[Rr]ule\s+([IVXLCDM]+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Section, &captures);
            reference.section_num = captures[1].parse().ok();
            reference.chapter_num = Some(captures[2].to_string());
            self.push(reference);
        }

        for captures in regex!(r"\b[Rr]ule\s+([IVXLCDM]+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Internal, ReferenceTarget::Chapter, &captures);
            reference.chapter_num = Some(captures[1].to_string());
            self.push(reference);
        }
    }

    // ----- family 6: US external -----

    fn us_external(&mut self) {
        for captures in regex!(r"\b(\d+)\s+U\.S\.C\.\s+§{1,2}\s*(\d+[a-z]*(?:-\d+[a-z]*)?)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::External, ReferenceTarget::Section, &captures);
            reference.external_doc = Some("usc".to_string());
            reference.number = captures[1].parse().ok();
            reference.section_str = Some(captures[2].to_string());
            self.push(reference);
        }

        for captures in regex!(r"\b(\d+)\s+C\.F\.R\.\s+(?:[Pp]art\s+)?(\d+(?:\.\d+)?)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::External,
                ReferenceTarget::Regulation,
                &captures,
            );
            reference.external_doc = Some("cfr".to_string());
            reference.number = captures[1].parse().ok();
            reference.section_str = Some(captures[2].to_string());
            self.push(reference);
        }

        for captures in regex!(r"\bSection\s+(\d+)\s+of\s+Title\s+(\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::External, ReferenceTarget::Section, &captures);
            reference.external_doc = Some("ca".to_string());
            reference.section_num = captures[1].parse().ok();
            reference.number = captures[2].parse().ok();
            self.push(reference);
        }

        for captures in regex!(r"\bPublic\s+Law\s+(\d+)[–-](\d+)\b")
            .captures_iter(self.text)
            .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference = self.base(
                ReferenceType::External,
                ReferenceTarget::Regulation,
                &captures,
            );
            reference.external_doc = Some("public-law".to_string());
            reference.year = captures[1].parse().ok();
            reference.number = captures[2].parse().ok();
            self.push(reference);
        }
    }

    // ----- family 7: parliamentary authorities -----

    fn parliamentary_authorities(&mut self) {
        for captures in
            regex!(r"Jefferson['’]s\s+Manual(?:\s*,?\s*(?:§|[Ss]ec(?:tion)?\.?)\s*(\d+))?")
                .captures_iter(self.text)
                .collect::<Vec<_>>()
        {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::External, ReferenceTarget::Manual, &captures);
            reference.external_doc = Some("jeffersons-manual".to_string());
            reference.section_num = captures.get(1).and_then(|m| m.as_str().parse().ok());
            self.push(reference);
        }

        for (pattern, tag) in [
            (
                regex!(
                    r"(?:(\d+)\s+)?Cannon['’]s\s+Precedents(?:\s+of\s+the\s+House(?:\s+of\s+Representatives)?)?(?:\s*,?\s*§\s*(\d+))?"
                ),
                "cannons-precedents",
            ),
            (
                regex!(r"(\d+)\s+Cannon\s+§\s*(\d+)"),
                "cannons-precedents",
            ),
            (
                regex!(r"(?:(\d+)\s+)?Deschler['’]s\s+Precedents(?:\s*,?\s*§\s*(\d+))?"),
                "deschlers-precedents",
            ),
            (
                regex!(r"(?:(\d+)\s+)?Deschler[–-]Brown(?:\s+Precedents)?(?:\s*,?\s*§\s*(\d+))?"),
                "deschler-brown-precedents",
            ),
            (
                regex!(r"(?:(\d+)\s+)?Hinds['’]?\s+Precedents(?:\s*,?\s*§\s*(\d+))?"),
                "hinds-precedents",
            ),
            (
                regex!(r"Precedents\s+of\s+the\s+House\b"),
                "house-precedents",
            ),
        ] {
            for captures in pattern.captures_iter(self.text).collect::<Vec<_>>() {
                let matched = captures.get(0).unwrap();
                if self.overlaps(matched.start(), matched.end()) {
                    continue;
                }
                let mut reference = self.base(
                    ReferenceType::External,
                    ReferenceTarget::Precedent,
                    &captures,
                );
                reference.external_doc = Some(tag.to_string());
                reference.number = captures.get(1).and_then(|m| m.as_str().parse().ok());
                reference.section_num = captures.get(2).and_then(|m| m.as_str().parse().ok());
                self.push(reference);
            }
        }
    }

    // ----- family 8: temporal qualifiers -----

    fn temporal(&mut self) {
        self.temporal_family(
            regex!(
                r"\brepealed\s+with\s+effect\s+from\s+(\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4})"
            ),
            TemporalKind::Repealed,
            TemporalCapture::Date,
        );
        self.temporal_family(
            regex!(r"\brepealed\s+by\s+([A-Z][^.,;\n]{0,80})"),
            TemporalKind::Repealed,
            TemporalCapture::Description,
        );
        self.temporal_family(
            regex!(r"\b[Aa]s\s+amended\s+by\s+([A-Z][^.,;\n]{0,80})"),
            TemporalKind::AsAmended,
            TemporalCapture::Description,
        );
        self.temporal_family(
            regex!(r"\b[Aa]s\s+amended\b"),
            TemporalKind::AsAmended,
            TemporalCapture::None,
        );
        self.temporal_family(
            regex!(
                r"\b[Aa]s\s+in\s+force\s+on\s+(\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4})"
            ),
            TemporalKind::InForceOn,
            TemporalCapture::Date,
        );
        self.temporal_family(
            regex!(
                r"\bin\s+force\s+(?:on|from)\s+(\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4})"
            ),
            TemporalKind::InForceOn,
            TemporalCapture::Date,
        );
        self.temporal_family(
            regex!(
                r"\benter(?:s|ed)?\s+into\s+force(?:\s+on\s+(\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}))?"
            ),
            TemporalKind::InForceOn,
            TemporalCapture::Date,
        );
        self.temporal_family(
            regex!(r"\b[Aa]s\s+originally\s+enacted\b"),
            TemporalKind::Original,
            TemporalCapture::None,
        );
        self.temporal_family(
            regex!(
                r"\b[Aa]s\s+it\s+stood\s+on\s+(\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4})"
            ),
            TemporalKind::InForceOn,
            TemporalCapture::Date,
        );
        self.temporal_family(
            regex!(r"\b[Cc]onsolidated\s+version\b"),
            TemporalKind::Consolidated,
            TemporalCapture::None,
        );
    }

    fn temporal_family(
        &mut self,
        pattern: &regex::Regex,
        kind: TemporalKind,
        capture: TemporalCapture,
    ) {
        for captures in pattern.captures_iter(self.text).collect::<Vec<_>>() {
            let matched = captures.get(0).unwrap();
            if self.overlaps(matched.start(), matched.end()) {
                continue;
            }
            let mut reference =
                self.base(ReferenceType::Temporal, ReferenceTarget::Article, &captures);
            reference.article_num = Some(self.article);
            let (description, date) = match capture {
                TemporalCapture::None => (String::new(), String::new()),
                TemporalCapture::Date => {
                    let raw = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                    (String::new(), iso_date_string(raw))
                }
                TemporalCapture::Description => (
                    captures
                        .get(1)
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default(),
                    String::new(),
                ),
            };
            reference.temporal = Some(TemporalQualifier {
                kind,
                description,
                date,
            });
            self.push(reference);
        }
    }
}

#[derive(Clone, Copy)]
enum TemporalCapture {
    None,
    Date,
    Description,
}

fn expand_two_digit_year(year: u32) -> u32 {
    if year < 100 {
        1900 + year
    } else {
        year
    }
}

fn leading_integer(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article(text: &str) -> Article {
        Article {
            number: 1,
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_body_has_no_references() {
        assert!(extract_article_references(&article("")).is_empty());
    }

    // Offsets index bytes, not code points; quoted terms ahead of a match
    // must not shift its span.
    #[test]
    fn test_offsets_are_byte_offsets() {
        let text = "‘personal data’ is defined elsewhere; see Article 6(1).";
        let refs = extract_article_references(&article(text));
        assert_eq!(refs.len(), 1);
        let (start, end) = refs[0].span();
        assert_eq!(&text[start..end], "Article 6(1)");
        assert_eq!(refs[0].raw_text, "Article 6(1)");
    }

    #[test]
    fn test_long_form_shadows_fragments() {
        let refs = extract_article_references(&article("per Article 6(1)(a) only"));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].identifier, "Article 6(1)(a)");

        let refs = extract_article_references(&article("per Article 6 only"));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].identifier, "Article 6");
    }
}
