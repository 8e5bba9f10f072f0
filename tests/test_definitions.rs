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
use regula::parser::definition::{extract_definitions, DefinitionLookup};
use regula::structure::{Article, Chapter, Document, DocumentType};
use regula::util::normalize_term;
use regula::PatternRegistry;

fn document_with_article(number: u32, title: &str, text: &str) -> Document {
    let mut doc = Document::new(DocumentType::Generic);
    doc.chapters.push(Chapter {
        number: "1".to_string(),
        title: String::new(),
        sections: Vec::new(),
        articles: vec![Article {
            number,
            section_id: String::new(),
            title: title.to_string(),
            text: text.to_string(),
            paragraphs: Vec::new(),
        }],
    });
    doc
}

// Two USC-style definitions attached to Article 201 titled "Definitions".
#[test]
fn test_usc_definitions() {
    let mut doc = document_with_article(
        201,
        "Definitions",
        "When used in this chapter—\n  \
         a The term \"Service\" means the Public Health Service;\n  \
         b The term \"Surgeon General\" means the Surgeon General of the Public Health Service;\n",
    );
    extract_definitions(&mut doc, PatternRegistry::global());

    assert_eq!(doc.definitions.len(), 2);
    assert_eq!(doc.definitions[0].term, "Service");
    assert_eq!(doc.definitions[0].number, 1);
    assert_eq!(
        doc.definitions[0].definition,
        "the Public Health Service;"
    );
    assert_eq!(doc.definitions[1].term, "Surgeon General");
    assert_eq!(doc.definitions[1].normalized_term, "surgeon general");
    for definition in &doc.definitions {
        assert_eq!(definition.scope, "Section Definitions");
        assert_eq!(definition.article_ref, 201);
    }
    assert_eq!(doc.statistics.definitions, 2);
}

#[test]
fn test_eu_definitions_with_sub_points() {
    let mut doc = document_with_article(
        4,
        "Definitions",
        "For the purposes of this Regulation:\n\
         (1) ‘personal data’ means any information relating to an identified\n\
         or identifiable natural person;\n\
         (2) ‘processing’ means any operation performed on ‘personal data’, such as:\n\
         (a) collection and recording;\n\
         (b) storage and ‘structuring’;\n",
    );
    extract_definitions(&mut doc, PatternRegistry::global());

    assert_eq!(doc.definitions.len(), 2);
    let first = &doc.definitions[0];
    assert_eq!(first.number, 1);
    assert_eq!(first.scope, "Article 4");
    assert_eq!(
        first.definition,
        "any information relating to an identified or identifiable natural person;"
    );
    let second = &doc.definitions[1];
    assert_eq!(second.sub_points.len(), 2);
    assert_eq!(second.sub_points[0].letter, 'a');
    assert!(second.references.contains("personal data"));
    assert!(second.references.contains("structuring"));
}

#[test]
fn test_us_state_definitions() {
    let mut doc = document_with_article(
        140,
        "Definitions",
        "(a) \"Business\" means a sole proprietorship or corporation.\n\
         (b) \"Consumer\" means a natural person who is a resident.\n",
    );
    extract_definitions(&mut doc, PatternRegistry::global());

    assert_eq!(doc.definitions.len(), 2);
    assert_eq!(doc.definitions[0].term, "Business");
    assert_eq!(doc.definitions[0].number, 1);
    assert_eq!(doc.definitions[1].term, "Consumer");
    assert_eq!(doc.definitions[1].number, 2);
    assert_eq!(doc.definitions[0].scope, "Section Definitions");
}

// With no definition-style title anywhere, an article qualifies only when
// it holds at least three definition-start lines.
#[test]
fn test_density_fallback() {
    let mut doc = document_with_article(
        9,
        "Miscellaneous",
        "(1) ‘alpha’ means the first;\n\
         (2) ‘beta’ means the second;\n\
         (3) ‘gamma’ means the third;\n",
    );
    extract_definitions(&mut doc, PatternRegistry::global());
    assert_eq!(doc.definitions.len(), 3);

    let mut sparse = document_with_article(
        9,
        "Miscellaneous",
        "(1) ‘alpha’ means the first;\n\
         (2) ‘beta’ means the second;\n",
    );
    extract_definitions(&mut sparse, PatternRegistry::global());
    assert_eq!(sparse.definitions.len(), 0);
}

#[test]
fn test_lookup_invariants() {
    let mut doc = document_with_article(
        4,
        "Definitions",
        "(1) ‘Personal  Data’ means any information;\n",
    );
    extract_definitions(&mut doc, PatternRegistry::global());
    let lookup = DefinitionLookup::new(&doc);

    let stored = lookup.get_by_ordinal(1).unwrap();
    assert_eq!(stored.term, "Personal  Data");
    assert_eq!(stored.normalized_term, "personal data");
    assert_eq!(
        lookup.get_by_normalized_term(&normalize_term(&stored.term)).unwrap(),
        stored
    );
    assert_eq!(lookup.get_by_term("Personal  Data").unwrap(), stored);
    assert!(lookup.get_by_normalized_term("unknown term").is_none());
}
