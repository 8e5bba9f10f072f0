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

use std::collections::HashMap;

use log::debug;

use crate::pattern::PatternRegistry;
use crate::structure::{Article, DefinedTerm, DefinitionSubPoint, Document};
use crate::util::{find_ascii_ci, normalize_term};

/// Marker variants separating the defined term from the definition text,
/// most specific first so that a bare `means` never wins over `means:`.
const DEFINITION_MARKERS: [&str; 5] = ["means:", "includes:", "includes ,", "means", "includes"];

/// Lines matching at least this many definition starts mark an article as
/// definition-bearing when no article has a definition-style title. The
/// threshold is frozen together with the golden corpus.
const DENSITY_THRESHOLD: usize = 3;

/// Extract defined terms from every definition-bearing article and store
/// them on the document.
pub fn extract_definitions(document: &mut Document, registry: &PatternRegistry) {
    let mut definitions = Vec::new();
    for article in bearing_articles(document, registry) {
        let found = extract_article_definitions(article, registry);
        debug!(
            "Article {} produced {} definitions",
            article.number,
            found.len()
        );
        definitions.extend(found);
    }
    document.definitions = definitions;
    document.update_statistics();
}

/// Definition-bearing articles: title match first, density fallback only
/// when no title matches anywhere.
fn bearing_articles<'a>(
    document: &'a Document,
    registry: &PatternRegistry,
) -> Vec<&'a Article> {
    let by_title: Vec<&Article> = document
        .all_articles()
        .filter(|article| registry.definition_heading.is_match(&article.title))
        .collect();
    if !by_title.is_empty() {
        return by_title;
    }
    document
        .all_articles()
        .filter(|article| {
            let count = article
                .text
                .split('\n')
                .filter(|line| {
                    registry.definition_eu_start.is_match(line)
                        || registry.definition_usc_start.is_match(line)
                })
                .count();
            count >= DENSITY_THRESHOLD
        })
        .collect()
}

/// The three definitional dialects are tried in a fixed order, stopping at
/// the first that yields anything. They disagree on what counts as a
/// definition start, so merging them into one pattern is deliberately off
/// the table.
fn extract_article_definitions(article: &Article, registry: &PatternRegistry) -> Vec<DefinedTerm> {
    let eu = extract_eu_dialect(article, registry);
    if !eu.is_empty() {
        return eu;
    }
    let us = extract_us_state_dialect(article, registry);
    if !us.is_empty() {
        return us;
    }
    extract_usc_dialect(article, registry)
}

fn extract_eu_dialect(article: &Article, registry: &PatternRegistry) -> Vec<DefinedTerm> {
    let mut definitions: Vec<DefinedTerm> = Vec::new();
    let mut current: Option<DefinedTerm> = None;
    let mut current_sub: Option<DefinitionSubPoint> = None;

    for line in article.text.split('\n').map(str::trim) {
        if let Some(captures) = registry.definition_eu_start.captures(line) {
            flush_sub(&mut current, &mut current_sub);
            flush(&mut definitions, &mut current, registry);
            let number = match captures[1].parse() {
                Ok(n) => n,
                Err(_) => continue,
            };
            current = Some(DefinedTerm {
                number,
                term: captures[2].trim().to_string(),
                normalized_term: normalize_term(&captures[2]),
                definition: text_after_marker(line).to_string(),
                scope: format!("Article {}", article.number),
                article_ref: article.number,
                sub_points: Vec::new(),
                references: Default::default(),
            });
            continue;
        }
        if current.is_some() {
            if let Some(captures) = registry.point_start.captures(line) {
                flush_sub(&mut current, &mut current_sub);
                current_sub = Some(DefinitionSubPoint {
                    letter: captures[1].chars().next().unwrap(),
                    text: captures[2].to_string(),
                });
                continue;
            }
            if !line.is_empty() {
                append_fragment(&mut current, &mut current_sub, line);
            }
        }
    }
    flush_sub(&mut current, &mut current_sub);
    flush(&mut definitions, &mut current, registry);
    definitions
}

fn extract_us_state_dialect(article: &Article, registry: &PatternRegistry) -> Vec<DefinedTerm> {
    let mut definitions: Vec<DefinedTerm> = Vec::new();
    let mut current: Option<DefinedTerm> = None;
    let mut ordinal = 0;

    for line in article.text.split('\n').map(str::trim) {
        if let Some(captures) = registry.definition_us_start.captures(line) {
            flush(&mut definitions, &mut current, registry);
            ordinal += 1;
            current = Some(DefinedTerm {
                number: ordinal,
                term: captures[2].trim().to_string(),
                normalized_term: normalize_term(&captures[2]),
                definition: text_after_marker(line).to_string(),
                scope: format!("Section {}", article.title),
                article_ref: article.number,
                sub_points: Vec::new(),
                references: Default::default(),
            });
            continue;
        }
        if current.is_some() && !line.is_empty() {
            // A bare lowercase letter marker would end the definition in
            // some codes, but the golden corpus treats it as continuation.
            let mut sub: Option<DefinitionSubPoint> = None;
            append_fragment(&mut current, &mut sub, line);
        }
    }
    flush(&mut definitions, &mut current, registry);
    definitions
}

fn extract_usc_dialect(article: &Article, registry: &PatternRegistry) -> Vec<DefinedTerm> {
    let mut definitions: Vec<DefinedTerm> = Vec::new();
    let mut current: Option<DefinedTerm> = None;
    let mut ordinal = 0;

    for line in article.text.split('\n') {
        if let Some(captures) = registry.definition_usc_start.captures(line) {
            flush(&mut definitions, &mut current, registry);
            ordinal += 1;
            current = Some(DefinedTerm {
                number: ordinal,
                term: captures[2].trim().to_string(),
                normalized_term: normalize_term(&captures[2]),
                definition: text_after_marker(line).to_string(),
                scope: format!("Section {}", article.title),
                article_ref: article.number,
                sub_points: Vec::new(),
                references: Default::default(),
            });
            continue;
        }
        let trimmed = line.trim();
        if current.is_some() && !trimmed.is_empty() {
            let mut sub: Option<DefinitionSubPoint> = None;
            append_fragment(&mut current, &mut sub, trimmed);
        }
    }
    flush(&mut definitions, &mut current, registry);
    definitions
}

/// The definition text is whatever follows the first marker variant on the
/// start line, searched case-insensitively in fixed priority order.
fn text_after_marker(line: &str) -> &str {
    for marker in DEFINITION_MARKERS {
        if let Some(position) = find_ascii_ci(line, marker) {
            return line[position + marker.len()..].trim_start();
        }
    }
    ""
}

fn append_fragment(
    current: &mut Option<DefinedTerm>,
    current_sub: &mut Option<DefinitionSubPoint>,
    fragment: &str,
) {
    if let Some(sub) = current_sub {
        if !sub.text.is_empty() {
            sub.text.push(' ');
        }
        sub.text.push_str(fragment);
    } else if let Some(definition) = current {
        if !definition.definition.is_empty() {
            definition.definition.push(' ');
        }
        definition.definition.push_str(fragment);
    }
}

fn flush_sub(current: &mut Option<DefinedTerm>, current_sub: &mut Option<DefinitionSubPoint>) {
    if let Some(sub) = current_sub.take() {
        if let Some(definition) = current {
            definition.sub_points.push(sub);
        }
    }
}

fn flush(
    definitions: &mut Vec<DefinedTerm>,
    current: &mut Option<DefinedTerm>,
    registry: &PatternRegistry,
) {
    if let Some(mut definition) = current.take() {
        harvest_references(&mut definition, registry);
        definitions.push(definition);
    }
}

/// Quoted substrings in a definition body are taken to invoke other
/// defined terms; they are stored normalised so lookups are stable.
fn harvest_references(definition: &mut DefinedTerm, registry: &PatternRegistry) {
    let mut bodies = vec![definition.definition.clone()];
    bodies.extend(definition.sub_points.iter().map(|sub| sub.text.clone()));
    for body in bodies {
        for captures in registry.quoted_term.captures_iter(&body) {
            let normalized = normalize_term(&captures[1]);
            if !normalized.is_empty() {
                definition.references.insert(normalized);
            }
        }
    }
}

/// Three-way index over the extracted definitions: by ordinal, by exact
/// term, and by normalised term.
#[derive(Debug, Default)]
pub struct DefinitionLookup {
    terms: Vec<DefinedTerm>,
    by_ordinal: HashMap<u32, usize>,
    by_term: HashMap<String, usize>,
    by_normalized: HashMap<String, usize>,
}

impl DefinitionLookup {
    pub fn new(document: &Document) -> Self {
        let mut lookup = Self::default();
        for definition in &document.definitions {
            let index = lookup.terms.len();
            lookup.by_ordinal.entry(definition.number).or_insert(index);
            lookup
                .by_term
                .entry(definition.term.clone())
                .or_insert(index);
            lookup
                .by_normalized
                .entry(definition.normalized_term.clone())
                .or_insert(index);
            lookup.terms.push(definition.clone());
        }
        lookup
    }

    pub fn get_by_ordinal(&self, ordinal: u32) -> Option<&DefinedTerm> {
        self.by_ordinal.get(&ordinal).map(|&i| &self.terms[i])
    }

    pub fn get_by_term(&self, term: &str) -> Option<&DefinedTerm> {
        self.by_term.get(term).map(|&i| &self.terms[i])
    }

    pub fn get_by_normalized_term(&self, normalized: &str) -> Option<&DefinedTerm> {
        self.by_normalized.get(normalized).map(|&i| &self.terms[i])
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article(number: u32, title: &str, text: &str) -> Article {
        Article {
            number,
            section_id: String::new(),
            title: title.to_string(),
            text: text.to_string(),
            paragraphs: Vec::new(),
        }
    }

    #[test]
    fn test_eu_dialect_with_sub_points_and_references() {
        let art = article(
            4,
            "Definitions",
            "(1) ‘personal data’ means any information relating to a ‘data subject’;\n\
             (2) ‘processing’ means any operation which is performed on ‘personal data’:\n\
             (a) collection and recording;\n\
             (b) storage and ‘structuring’;",
        );
        let defs = extract_article_definitions(&art, PatternRegistry::global());
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].number, 1);
        assert_eq!(defs[0].term, "personal data");
        assert_eq!(defs[0].normalized_term, "personal data");
        assert_eq!(defs[0].scope, "Article 4");
        assert!(defs[0].references.contains("data subject"));
        assert_eq!(defs[1].sub_points.len(), 2);
        assert_eq!(defs[1].sub_points[1].letter, 'b');
        assert!(defs[1].references.contains("personal data"));
        assert!(defs[1].references.contains("structuring"));
    }

    #[test]
    fn test_marker_priority() {
        assert_eq!(
            text_after_marker("(1) ‘x’ means: the following"),
            "the following"
        );
        assert_eq!(
            text_after_marker("  a The term \"y\" includes any agency"),
            "any agency"
        );
    }

    #[test]
    fn test_lookup_invariants() {
        let mut document = Document::new(crate::structure::DocumentType::EuRegulation);
        document.definitions.push(DefinedTerm {
            number: 1,
            term: "Surgeon  General".to_string(),
            normalized_term: normalize_term("Surgeon  General"),
            definition: "an officer".to_string(),
            scope: "Article 4".to_string(),
            article_ref: 4,
            sub_points: Vec::new(),
            references: Default::default(),
        });
        let lookup = DefinitionLookup::new(&document);
        let stored = lookup.get_by_ordinal(1).unwrap();
        assert_eq!(
            lookup
                .get_by_normalized_term(&normalize_term(&stored.term))
                .unwrap(),
            stored
        );
    }
}
