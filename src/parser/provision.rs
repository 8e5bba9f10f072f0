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

use crate::pattern::PatternRegistry;
use crate::structure::{Article, Document, Paragraph, Point, SubPoint};

/// Parenthetical openers that are citation fragments, not new points:
/// "(b) of Article 12", "(ii) of the first subparagraph".
const CITATION_PREFIXES: [&str; 4] = ["of Article", "of paragraph", "of the first", "of the second"];

/// Decompose every article body in the document into numbered paragraphs,
/// lettered points and Roman sub-points. Replaces any previously extracted
/// provisions, so running it twice is a no-op.
pub fn extract_document_provisions(document: &mut Document, registry: &PatternRegistry) {
    for article in document.all_articles_mut() {
        article.paragraphs = extract_provisions(&article.text, registry);
    }
}

/// Provision structure of a single article body. An empty or
/// whitespace-only body yields no paragraphs at all; a body with text but
/// no numbered marker yields exactly one implicit paragraph numbered 0.
pub fn extract_provisions(text: &str, registry: &PatternRegistry) -> Vec<Paragraph> {
    let mut extractor = ProvisionExtractor::new(registry);
    for line in text.split('\n') {
        extractor.feed_line(line.trim_end());
    }
    extractor.finish(text)
}

struct ProvisionExtractor<'a> {
    registry: &'a PatternRegistry,
    paragraphs: Vec<Paragraph>,
    current_paragraph: Option<Paragraph>,
    current_point: Option<Point>,
    current_subpoint: Option<SubPoint>,
    saw_numbered_paragraph: bool,
}

impl<'a> ProvisionExtractor<'a> {
    fn new(registry: &'a PatternRegistry) -> Self {
        Self {
            registry,
            paragraphs: Vec::new(),
            current_paragraph: None,
            current_point: None,
            current_subpoint: None,
            saw_numbered_paragraph: false,
        }
    }

    fn feed_line(&mut self, line: &str) {
        if let Some(captures) = self.registry.paragraph_start.captures(line) {
            if let Ok(number) = captures[1].parse() {
                self.flush_paragraph();
                self.saw_numbered_paragraph = true;
                self.current_paragraph = Some(Paragraph {
                    number,
                    text: captures[2].to_string(),
                    points: Vec::new(),
                });
                return;
            }
        }

        if let Some(captures) = self.registry.point_start.captures(line) {
            let letter = captures[1].chars().next().unwrap();
            let rest = &captures[2];
            if !starts_with_citation_prefix(rest) && self.letter_fits_sequence(letter) {
                self.flush_point();
                self.current_point = Some(Point {
                    letter,
                    text: rest.to_string(),
                    sub_points: Vec::new(),
                });
                return;
            }
        }

        if let Some(captures) = self.registry.subpoint_start.captures(line) {
            if self.current_point.is_some() {
                let numeral = captures[1].to_string();
                let rest = captures[2].to_string();
                self.flush_subpoint();
                self.current_subpoint = Some(SubPoint {
                    numeral,
                    text: rest,
                });
                return;
            }
        }

        if line.trim().is_empty() {
            return;
        }
        self.append_text(line.trim());
    }

    /// Points run a, b, c, … and restart with every paragraph. A marker
    /// that does not continue the sequence is left to the sub-point rule,
    /// which resolves the (i)/(v)/(x) ambiguity between point letters and
    /// Roman numerals.
    fn letter_fits_sequence(&self, letter: char) -> bool {
        match &self.current_point {
            None => letter == 'a',
            Some(point) => {
                let expected = (point.letter as u8 + 1) as char;
                letter == expected
            }
        }
    }

    fn append_text(&mut self, fragment: &str) {
        let buffer = if let Some(subpoint) = &mut self.current_subpoint {
            &mut subpoint.text
        } else if let Some(point) = &mut self.current_point {
            &mut point.text
        } else {
            &mut self
                .current_paragraph
                .get_or_insert_with(Paragraph::default)
                .text
        };
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(fragment);
    }

    fn flush_subpoint(&mut self) {
        if let Some(subpoint) = self.current_subpoint.take() {
            if let Some(point) = &mut self.current_point {
                point.sub_points.push(subpoint);
            }
        }
    }

    fn flush_point(&mut self) {
        self.flush_subpoint();
        if let Some(point) = self.current_point.take() {
            self.current_paragraph
                .get_or_insert_with(Paragraph::default)
                .points
                .push(point);
        }
    }

    fn flush_paragraph(&mut self) {
        self.flush_point();
        if let Some(paragraph) = self.current_paragraph.take() {
            self.paragraphs.push(paragraph);
        }
    }

    fn finish(mut self, full_text: &str) -> Vec<Paragraph> {
        self.flush_paragraph();
        if !self.saw_numbered_paragraph && self.paragraphs.iter().all(|p| p.points.is_empty()) {
            // No structure at all: a single implicit paragraph carries the
            // whole body, or nothing when the body is blank.
            if full_text.trim().is_empty() {
                return Vec::new();
            }
            return vec![Paragraph {
                number: 0,
                text: joined_lines(full_text),
                points: Vec::new(),
            }];
        }
        self.paragraphs
    }
}

fn starts_with_citation_prefix(rest: &str) -> bool {
    CITATION_PREFIXES
        .iter()
        .any(|prefix| rest.starts_with(prefix))
}

fn joined_lines(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}
