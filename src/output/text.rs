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

use std::fmt::Write as _;

use crate::structure::{Article, Document};

/// Render extracted provisions back to marker lines. Re-extracting the
/// result reproduces the same paragraph/point/sub-point structure, which
/// is what the round-trip tests pin down.
pub fn serialize_article(article: &Article) -> String {
    let mut out = String::new();
    for paragraph in &article.paragraphs {
        if paragraph.number != 0 {
            // Two spaces after the dot: the paragraph-start marker form.
            let _ = writeln!(out, "{}.  {}", paragraph.number, paragraph.text);
        } else if !paragraph.text.is_empty() {
            let _ = writeln!(out, "{}", paragraph.text);
        }
        for point in &paragraph.points {
            let _ = writeln!(out, "({}) {}", point.letter, point.text);
            for sub_point in &point.sub_points {
                let _ = writeln!(out, "({}) {}", sub_point.numeral, sub_point.text);
            }
        }
    }
    out
}

/// Plain-text rendering of the whole document, wrapped to the given width.
pub fn render_document(document: &Document, width: usize) -> String {
    let mut out = String::new();
    if !document.title.is_empty() {
        let _ = writeln!(out, "{}", document.title);
        let _ = writeln!(out);
    }
    for recital in &document.recitals {
        for line in textwrap::wrap(recital, width) {
            let _ = writeln!(out, "{}", line);
        }
        let _ = writeln!(out);
    }
    for chapter in &document.chapters {
        if !chapter.number.is_empty() {
            let _ = writeln!(out, "CHAPTER {} — {}", chapter.number, chapter.title);
        }
        for section in &chapter.sections {
            let _ = writeln!(out, "Section {} — {}", section.number, section.title);
            for article in &section.articles {
                render_article(&mut out, article, width);
            }
        }
        for article in &chapter.articles {
            render_article(&mut out, article, width);
        }
    }
    if !document.definitions.is_empty() {
        let _ = writeln!(out, "Defined terms:");
        for definition in &document.definitions {
            let _ = writeln!(
                out,
                "  ({}) {} [{}]",
                definition.number, definition.term, definition.scope
            );
        }
    }
    out
}

fn render_article(out: &mut String, article: &Article, width: usize) {
    let heading = if article.section_id.is_empty() {
        format!("Article {}", article.number)
    } else {
        format!("Section {}", article.section_id)
    };
    let _ = writeln!(out, "{} — {}", heading, article.title);
    let body = if article.paragraphs.is_empty() {
        article.text.clone()
    } else {
        serialize_article(article)
    };
    for source_line in body.split('\n') {
        for line in textwrap::wrap(source_line, width.saturating_sub(4).max(20)) {
            let _ = writeln!(out, "    {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::provision::extract_provisions;
    use crate::pattern::PatternRegistry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_round_trip() {
        let text = "1.  Lead text\n\
                    (a) first point\n\
                    (b) second point:\n\
                    (i) with a sub-point\n\
                    (ii) and another\n\
                    2.  Closing paragraph";
        let registry = PatternRegistry::global();
        let first = extract_provisions(text, registry);
        let article = Article {
            number: 1,
            paragraphs: first.clone(),
            ..Default::default()
        };
        let serialized = serialize_article(&article);
        let second = extract_provisions(&serialized, registry);
        assert_eq!(first, second);
    }
}
