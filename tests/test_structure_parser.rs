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
use regula::structure::DocumentType;
use regula::{parse_document, FormatHint, ParseOptions};

fn parse(text: &str) -> regula::structure::Document {
    parse_document(text, &ParseOptions::default())
}

#[test]
fn test_eu_regulation_structure() {
    let text = "REGULATION (EU) 2016/679 OF THE EUROPEAN PARLIAMENT AND OF THE COUNCIL\n\
                \n\
                Whereas natural persons should have control of their own personal data;\n\
                \n\
                CHAPTER I\n\
                General provisions\n\
                Article 1\n\
                Subject-matter\n\
                1.  This Regulation lays down rules.\n\
                Article 2\n\
                Material scope\n\
                This Regulation applies to the processing of personal data.\n\
                CHAPTER II\n\
                Principles\n\
                Section 1\n\
                Lawfulness\n\
                Article 3\n\
                Lawfulness of processing\n\
                1.  Processing shall be lawful only if consented.\n";
    let doc = parse(text);

    assert_eq!(doc.doc_type, DocumentType::EuRegulation);
    assert_eq!(
        doc.title,
        "REGULATION (EU) 2016/679 OF THE EUROPEAN PARLIAMENT AND OF THE COUNCIL"
    );
    assert_eq!(doc.recitals.len(), 1);
    assert!(doc.recitals[0].starts_with("Whereas"));

    assert_eq!(doc.chapters.len(), 2);
    assert_eq!(doc.chapters[0].number, "I");
    assert_eq!(doc.chapters[0].title, "General provisions");
    assert_eq!(doc.chapters[0].articles.len(), 2);
    assert_eq!(doc.chapters[0].articles[0].number, 1);
    assert_eq!(doc.chapters[0].articles[0].title, "Subject-matter");
    assert_eq!(
        doc.chapters[0].articles[0].text,
        "1.  This Regulation lays down rules."
    );

    assert_eq!(doc.chapters[1].sections.len(), 1);
    let section = &doc.chapters[1].sections[0];
    assert_eq!(section.number, 1);
    assert_eq!(section.title, "Lawfulness");
    assert_eq!(section.articles.len(), 1);
    assert_eq!(section.articles[0].number, 3);

    assert_eq!(doc.statistics.chapters, 2);
    assert_eq!(doc.statistics.sections, 1);
    assert_eq!(doc.statistics.articles, 3);
    assert_eq!(doc.statistics.recitals, 1);
}

// USC alphanumeric identifiers sharing a numeric prefix stay distinct
// articles with distinct section ids.
#[test]
fn test_usc_alphanumeric_sections() {
    let text = "CHAPTER 6A—PUBLIC HEALTH SERVICE\n\
                Section 300 Project grants\n\
                Grant text.\n\
                Section 300a Formula grants\n\
                Formula text.\n\
                Section 300aa-25 Recording and reporting\n\
                Recording text.\n\
                Section 300aa-26 Vaccine information\n\
                Vaccine text.\n";
    let doc = parse(text);

    assert_eq!(doc.doc_type, DocumentType::UscTitle);
    assert_eq!(doc.chapters.len(), 1);
    assert_eq!(doc.chapters[0].number, "6A");
    let ids: Vec<&str> = doc
        .all_articles()
        .map(|a| a.section_id.as_str())
        .collect();
    assert_eq!(ids, vec!["300", "300a", "300aa-25", "300aa-26"]);
    let with_number_300 = doc.all_articles().filter(|a| a.number == 300).count();
    assert!(with_number_300 >= 3);
    assert_eq!(
        doc.all_articles().find(|a| a.section_id == "300aa-25").unwrap().title,
        "Recording and reporting"
    );
}

#[test]
fn test_us_state_dotted_sections() {
    let text = "CALIFORNIA CONSUMER PRIVACY ACT\n\
                CHAPTER 1. General Provisions\n\
                Section 1798.100 General duties\n\
                (a) A business shall inform consumers.\n\
                Section 1798.105 Right to delete\n\
                (a) A consumer shall have the right to request deletion.\n";
    let doc = parse(text);

    assert_eq!(doc.doc_type, DocumentType::UsStateCode);
    assert_eq!(doc.chapters[0].number, "1");
    assert_eq!(doc.chapters[0].title, "General Provisions");
    let numbers: Vec<u32> = doc.all_articles().map(|a| a.number).collect();
    assert_eq!(numbers, vec![100, 105]);
    // Dotted sections are not USC identifiers
    assert!(doc.all_articles().all(|a| a.section_id.is_empty()));
    assert_eq!(doc.all_articles().next().unwrap().title, "General duties");
}

#[test]
fn test_article_before_any_chapter_gets_implicit_chapter() {
    let text = "Article 1\n\
                Scope\n\
                Body text.\n";
    let doc = parse(text);
    assert_eq!(doc.chapters.len(), 1);
    assert_eq!(doc.chapters[0].number, "");
    assert_eq!(doc.chapters[0].articles.len(), 1);
}

#[test]
fn test_empty_document() {
    let doc = parse("");
    assert_eq!(doc.chapters.len(), 0);
    assert_eq!(doc.recitals.len(), 0);
    assert_eq!(doc.statistics.articles, 0);
}

#[test]
fn test_malformed_headers_are_body_text() {
    let text = "Article 1\n\
                Scope\n\
                Article next shall not open an article.\n\
                CHAPTER without a number is body text too.\n";
    let doc = parse(text);
    assert_eq!(doc.chapters.len(), 1);
    let article = doc.all_articles().next().unwrap();
    assert!(article.text.contains("Article next"));
    assert!(article.text.contains("CHAPTER without a number"));
}

#[test]
fn test_usc_hint_claims_bare_numeric_section_lines() {
    let text = "Section 300\nSection 301\n";
    let doc = parse_document(
        text,
        &ParseOptions {
            format_hint: FormatHint::Usc,
            ..Default::default()
        },
    );
    let ids: Vec<&str> = doc.all_articles().map(|a| a.section_id.as_str()).collect();
    assert_eq!(ids, vec!["300", "301"]);

    // Without the hint the same lines read as EU structural sections
    let doc = parse(text);
    assert_eq!(doc.all_articles().count(), 0);
    assert_eq!(doc.statistics.sections, 2);
}
