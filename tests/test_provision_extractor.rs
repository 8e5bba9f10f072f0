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

use pretty_assertions::assert_eq;
use regula::output::text::serialize_article;
use regula::parser::provision::extract_document_provisions;
use regula::{parse_document, ParseOptions, PatternRegistry};

#[test]
fn test_provisions_through_the_pipeline() {
    let text = "Article 1\n\
                Lawfulness\n\
                1.  Processing shall be lawful only if:\n\
                (a) the data subject has given consent;\n\
                (b) processing is necessary:\n\
                (i) for a contract;\n\
                (ii) for a legal obligation;\n\
                2.  Member States may maintain more specific provisions.\n\
                Article 2\n\
                Scope\n\
                This article has an unnumbered body.\n";
    let options = ParseOptions::default();
    let mut doc = parse_document(text, &options);
    extract_document_provisions(&mut doc, options.registry);

    let article_1 = doc.article_by_number(1).unwrap();
    assert_eq!(article_1.paragraphs.len(), 2);
    assert_eq!(article_1.paragraphs[0].points.len(), 2);
    assert_eq!(article_1.paragraphs[0].points[1].sub_points.len(), 2);

    // An article without numbered markers gets exactly one implicit
    // paragraph numbered 0
    let article_2 = doc.article_by_number(2).unwrap();
    assert_eq!(article_2.paragraphs.len(), 1);
    assert_eq!(article_2.paragraphs[0].number, 0);
    assert_eq!(
        article_2.paragraphs[0].text,
        "This article has an unnumbered body."
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let text = "Article 1\n\
                Scope\n\
                1.  Lead text\n\
                (a) a point\n";
    let options = ParseOptions::default();
    let mut doc = parse_document(text, &options);
    extract_document_provisions(&mut doc, options.registry);
    let first = doc.clone();
    extract_document_provisions(&mut doc, options.registry);
    assert_eq!(doc, first);
}

#[test]
fn test_serialize_then_reextract_round_trip() {
    let text = "1.  Processing shall be lawful only if:\n\
                (a) the data subject has given consent;\n\
                (b) processing is necessary:\n\
                (i) for a contract;\n\
                2.  Member States may act.";
    let registry = PatternRegistry::global();
    let paragraphs = regula::parser::provision::extract_provisions(text, registry);
    let article = regula::structure::Article {
        number: 1,
        paragraphs: paragraphs.clone(),
        ..Default::default()
    };
    let reparsed = regula::parser::provision::extract_provisions(&serialize_article(&article), registry);
    assert_eq!(paragraphs, reparsed);
}

#[test]
fn test_whitespace_only_body_has_no_paragraphs() {
    let registry = PatternRegistry::global();
    assert!(regula::parser::provision::extract_provisions("", registry).is_empty());
    assert!(regula::parser::provision::extract_provisions(" \n\t\n", registry).is_empty());
}
