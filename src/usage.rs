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

//! Maps defined terms back to the provisions that invoke them. One usage
//! record is kept per (term, article) pair; repeated uses within the same
//! article only bump its count.

use derive_visitor::{Drive, Visitor};
use from_variants::FromVariants;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::structure::{Article, DefinedTerm, Document};

/// Most specific provision containing the first match in an article.
/// Untagged, so the JSON shape is just the coordinate fields that exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromVariants, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsageLocation {
    Point(PointLocation),
    Paragraph(ParagraphLocation),
    Article(ArticleLocation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleLocation {
    pub article: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphLocation {
    pub article: u32,
    pub paragraph: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointLocation {
    pub article: u32,
    pub paragraph: u32,
    pub point: char,
}

impl UsageLocation {
    pub fn article(&self) -> u32 {
        match self {
            Self::Article(location) => location.article,
            Self::Paragraph(location) => location.article,
            Self::Point(location) => location.article,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermUsage {
    pub term: String,
    pub normalized_term: String,
    /// Ordinal of the definition within its defining article.
    pub definition_number: u32,
    pub location: UsageLocation,
    /// Surface form of the first match (may carry an `s` or `'s` suffix).
    pub matched_text: String,
    /// Byte offset of the first match in the article body.
    pub offset: usize,
    /// Number of matches within this article.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub uses: usize,
    pub articles: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub usages: Vec<TermUsage>,
    pub total_usages: usize,
    pub unique_terms_used: usize,
    pub articles_with_terms: usize,
    /// Top ten terms by total uses, ties broken by article count.
    pub top_terms: Vec<TermCount>,
    pub unused_terms: Vec<String>,
}

/// Case-insensitive whole-word pattern for a term, tolerating a plural or
/// possessive suffix.
fn term_pattern(term: &str) -> Option<Regex> {
    if term.trim().is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b{}(?:'s|s)?\b", regex::escape(term.trim()))).ok()
}

#[derive(Visitor)]
#[visitor(Article(enter))]
struct UsageScanner {
    terms: Vec<(DefinedTerm, Regex)>,
    usages: Vec<TermUsage>,
}

impl UsageScanner {
    fn enter_article(&mut self, article: &Article) {
        for (definition, pattern) in &self.terms {
            // The defining article never counts as a usage site.
            if definition.article_ref == article.number {
                continue;
            }
            let mut matches = pattern.find_iter(&article.text);
            let first = match matches.next() {
                Some(first) => first,
                None => continue,
            };
            let count = 1 + matches.count();
            self.usages.push(TermUsage {
                term: definition.term.clone(),
                normalized_term: definition.normalized_term.clone(),
                definition_number: definition.number,
                location: locate(article, pattern),
                matched_text: first.as_str().to_string(),
                offset: first.start(),
                count,
            });
        }
    }
}

/// The most specific extracted provision whose text matches: the first
/// matching point, else the first matching paragraph lead, else the
/// article itself.
fn locate(article: &Article, pattern: &Regex) -> UsageLocation {
    for paragraph in &article.paragraphs {
        for point in &paragraph.points {
            if pattern.is_match(&point.text) {
                return PointLocation {
                    article: article.number,
                    paragraph: paragraph.number,
                    point: point.letter,
                }
                .into();
            }
        }
        if pattern.is_match(&paragraph.text) {
            return ParagraphLocation {
                article: article.number,
                paragraph: paragraph.number,
            }
            .into();
        }
    }
    ArticleLocation {
        article: article.number,
    }
    .into()
}

pub fn index_term_usage(document: &Document) -> UsageReport {
    let terms: Vec<(DefinedTerm, Regex)> = document
        .definitions
        .iter()
        .filter_map(|definition| term_pattern(&definition.term).map(|p| (definition.clone(), p)))
        .collect();
    let mut scanner = UsageScanner {
        terms,
        usages: Vec::new(),
    };
    document.drive(&mut scanner);
    build_report(document, scanner.usages)
}

fn build_report(document: &Document, usages: Vec<TermUsage>) -> UsageReport {
    use std::collections::{BTreeMap, BTreeSet};

    let total_usages = usages.iter().map(|u| u.count).sum();
    let mut per_term: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    let mut articles: BTreeSet<u32> = BTreeSet::new();
    for usage in &usages {
        let entry = per_term.entry(&usage.normalized_term).or_default();
        entry.0 += usage.count;
        entry.1 += 1;
        articles.insert(usage.location.article());
    }

    let mut top_terms: Vec<TermCount> = per_term
        .iter()
        .map(|(term, &(uses, articles))| TermCount {
            term: term.to_string(),
            uses,
            articles,
        })
        .collect();
    top_terms.sort_by(|a, b| {
        b.uses
            .cmp(&a.uses)
            .then(b.articles.cmp(&a.articles))
            .then(a.term.cmp(&b.term))
    });
    top_terms.truncate(10);

    let unused_terms: Vec<String> = document
        .definitions
        .iter()
        .filter(|d| !per_term.contains_key(d.normalized_term.as_str()))
        .map(|d| d.normalized_term.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();

    let unique_terms_used = per_term.len();
    drop(per_term);
    UsageReport {
        unique_terms_used,
        articles_with_terms: articles.len(),
        total_usages,
        top_terms,
        unused_terms,
        usages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_term_pattern_suffixes() {
        let pattern = term_pattern("controller").unwrap();
        assert!(pattern.is_match("the Controller shall"));
        assert!(pattern.is_match("all controllers"));
        assert!(pattern.is_match("the controller's duty"));
        assert!(!pattern.is_match("uncontrolled"));
    }

    #[test]
    fn test_location_serialization_is_untagged() {
        let location: UsageLocation = PointLocation {
            article: 6,
            paragraph: 1,
            point: 'a',
        }
        .into();
        let value = serde_json::to_value(location).unwrap();
        assert_eq!(value["article"], 6);
        assert_eq!(value["point"], "a");
    }
}
