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

use std::collections::{BTreeMap, HashMap, HashSet};

use derive_visitor::{Drive, Visitor};
use serde::{Deserialize, Serialize};

use crate::reference::uri::UriBuilder;
use crate::reference::{Reference, ReferenceTarget, ReferenceType, SubRef};
use crate::structure::{Article, Chapter, Document, Section};
use crate::util::is_default;

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub base_uri: String,
    pub reg_id: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            base_uri: "lex://".to_string(),
            reg_id: "doc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Resolved,
    Partial,
    Ambiguous,
    NotFound,
    External,
    SelfRef,
    RangeRef,
}

impl ResolutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Partial => "partial",
            Self::Ambiguous => "ambiguous",
            Self::NotFound => "not_found",
            Self::External => "external",
            Self::SelfRef => "self_ref",
            Self::RangeRef => "range_ref",
        }
    }
}

/// Confidence grades serialize as their numeric value; the names are used
/// for the report's distribution keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn value(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Low => 0.5,
            Self::Medium => 0.75,
            Self::High => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Serialize for Confidence {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(if value >= 1.0 {
            Self::High
        } else if value >= 0.75 {
            Self::Medium
        } else if value >= 0.5 {
            Self::Low
        } else {
            Self::None
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedReference {
    pub original: Reference,
    pub status: ResolutionStatus,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "is_default")]
    pub target_uri: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_uris: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_uris: Vec<String>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub reason: String,
    pub context_article: u32,
    #[serde(default, skip_serializing_if = "is_default")]
    pub context_chapter: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub total: usize,
    pub internal: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub confidence_counts: BTreeMap<String, usize>,
    /// `(resolved + partial + range_ref) / internal`
    pub resolution_rate: f64,
    /// `high confidence / total`
    pub confidence_rate: f64,
}

/// Which provisions exist, by string key. Article keys are the alphanumeric
/// `section_id` when present, the decimal number otherwise; paragraph keys
/// are `<article>:<n>`, point keys `<article>:<n>:<letter>`, section keys
/// `<chapter>:<n>`.
#[derive(Debug, Default)]
pub struct ProvisionIndex {
    articles: HashSet<String>,
    paragraphs: HashSet<String>,
    points: HashSet<String>,
    sections: HashSet<String>,
    chapters: HashSet<String>,
    article_chapter: HashMap<String, String>,
    by_number: HashMap<u32, String>,
}

#[derive(Default, Visitor)]
#[visitor(Chapter(enter), Section(enter), Article(enter))]
struct IndexBuilder {
    index: ProvisionIndex,
    current_chapter: String,
}

impl IndexBuilder {
    fn enter_chapter(&mut self, chapter: &Chapter) {
        self.current_chapter = chapter.number.clone();
        self.index.chapters.insert(chapter.number.clone());
    }

    fn enter_section(&mut self, section: &Section) {
        self.index
            .sections
            .insert(format!("{}:{}", self.current_chapter, section.number));
    }

    fn enter_article(&mut self, article: &Article) {
        let key = article.key();
        for paragraph in &article.paragraphs {
            let paragraph_key = format!("{}:{}", key, paragraph.number);
            for point in &paragraph.points {
                self.index
                    .points
                    .insert(format!("{}:{}", paragraph_key, point.letter));
            }
            self.index.paragraphs.insert(paragraph_key);
        }
        self.index
            .article_chapter
            .insert(key.clone(), self.current_chapter.clone());
        self.index.by_number.entry(article.number).or_insert_with(|| key.clone());
        self.index.articles.insert(key);
    }
}

pub fn build_index(document: &Document) -> ProvisionIndex {
    let mut builder = IndexBuilder::default();
    document.drive(&mut builder);
    builder.index
}

/// Resolve every reference against the document tree and summarise the
/// outcome. Failures are statuses, never errors.
pub fn resolve_references(
    document: &Document,
    references: &[Reference],
    options: &ResolverOptions,
) -> (Vec<ResolvedReference>, ResolutionReport) {
    let resolver = Resolver {
        index: build_index(document),
        uris: UriBuilder::new(&options.base_uri, &options.reg_id),
    };
    let resolved: Vec<ResolvedReference> =
        references.iter().map(|r| resolver.resolve(r)).collect();
    let report = build_report(references, &resolved);
    (resolved, report)
}

struct Resolver {
    index: ProvisionIndex,
    uris: UriBuilder,
}

/// Working result of one resolution, before context fields are attached.
struct Outcome {
    status: ResolutionStatus,
    confidence: Confidence,
    target_uri: String,
    target_uris: Vec<String>,
    alternative_uris: Vec<String>,
    reason: String,
}

impl Outcome {
    fn new(status: ResolutionStatus, confidence: Confidence, target_uri: String, reason: &str) -> Self {
        Self {
            status,
            confidence,
            target_uri,
            target_uris: Vec::new(),
            alternative_uris: Vec::new(),
            reason: reason.to_string(),
        }
    }
}

impl Resolver {
    fn resolve(&self, reference: &Reference) -> ResolvedReference {
        let outcome = match reference.ref_type {
            ReferenceType::External => Outcome::new(
                ResolutionStatus::External,
                Confidence::High,
                self.uris.external(reference),
                "external document",
            ),
            ReferenceType::Temporal => Outcome::new(
                ResolutionStatus::SelfRef,
                Confidence::High,
                self.uris.article(&self.source_key(reference)),
                "temporal qualifier on the enclosing instrument",
            ),
            ReferenceType::Internal => {
                if reference.sub_ref == Some(SubRef::Range) {
                    self.resolve_range(reference)
                } else {
                    match reference.target {
                        ReferenceTarget::Article => self.resolve_article(reference),
                        ReferenceTarget::Paragraph => self.resolve_paragraph(reference),
                        ReferenceTarget::Point | ReferenceTarget::Subsection => {
                            self.resolve_point(reference)
                        }
                        ReferenceTarget::Chapter => self.resolve_chapter(reference),
                        ReferenceTarget::Subchapter => self.resolve_subchapter(reference),
                        ReferenceTarget::Section => self.resolve_section(reference),
                        _ => Outcome::new(
                            ResolutionStatus::NotFound,
                            Confidence::None,
                            String::new(),
                            "internal reference to an external-only target",
                        ),
                    }
                }
            }
        };

        let context_chapter = self
            .index
            .by_number
            .get(&reference.source_article)
            .and_then(|key| self.index.article_chapter.get(key))
            .cloned()
            .unwrap_or_default();
        ResolvedReference {
            original: reference.clone(),
            status: outcome.status,
            confidence: outcome.confidence,
            target_uri: outcome.target_uri,
            target_uris: outcome.target_uris,
            alternative_uris: outcome.alternative_uris,
            reason: outcome.reason,
            context_article: reference.source_article,
            context_chapter,
        }
    }

    /// Key of the article the reference appears in.
    fn source_key(&self, reference: &Reference) -> String {
        self.index
            .by_number
            .get(&reference.source_article)
            .cloned()
            .unwrap_or_else(|| reference.source_article.to_string())
    }

    /// Key of the article a reference points at, if that article exists.
    fn target_article_key(&self, reference: &Reference) -> Option<String> {
        if let Some(section_str) = &reference.section_str {
            if self.index.articles.contains(section_str) {
                return Some(section_str.clone());
            }
        }
        if let Some(number) = reference.article_num {
            let key = number.to_string();
            if self.index.articles.contains(&key) {
                return Some(key);
            }
            if let Some(key) = self.index.by_number.get(&number) {
                return Some(key.clone());
            }
        }
        None
    }

    fn resolve_article(&self, reference: &Reference) -> Outcome {
        if reference.article_num.is_none() && reference.section_str.is_none() {
            return Outcome::new(
                ResolutionStatus::NotFound,
                Confidence::None,
                String::new(),
                "no article component",
            );
        }
        let key = match self.target_article_key(reference) {
            Some(key) => key,
            None => {
                return Outcome::new(
                    ResolutionStatus::NotFound,
                    Confidence::None,
                    String::new(),
                    "article not found",
                )
            }
        };
        match reference.paragraph_num {
            None => {
                if key == self.source_key(reference) {
                    Outcome::new(
                        ResolutionStatus::SelfRef,
                        Confidence::High,
                        self.uris.article(&key),
                        "reference to the enclosing article",
                    )
                } else {
                    Outcome::new(
                        ResolutionStatus::Resolved,
                        Confidence::High,
                        self.uris.article(&key),
                        "",
                    )
                }
            }
            Some(paragraph) => self.resolve_within_article(reference, &key, paragraph),
        }
    }

    /// The article exists; ladder down through the paragraph and point
    /// components, degrading to the coarser URI when a rung is missing.
    fn resolve_within_article(&self, reference: &Reference, key: &str, paragraph: u32) -> Outcome {
        let paragraph_key = format!("{}:{}", key, paragraph);
        if !self.index.paragraphs.contains(&paragraph_key) {
            return Outcome::new(
                ResolutionStatus::Partial,
                Confidence::Medium,
                self.uris.article(key),
                &format!("paragraph {} not found in article {}", paragraph, key),
            );
        }
        match reference.point_letter {
            None => Outcome::new(
                ResolutionStatus::Resolved,
                Confidence::High,
                self.uris.paragraph(key, paragraph),
                "",
            ),
            Some(letter) => {
                let point_key = format!("{}:{}", paragraph_key, letter);
                if self.index.points.contains(&point_key) {
                    Outcome::new(
                        ResolutionStatus::Resolved,
                        Confidence::High,
                        self.uris.point(key, paragraph, letter),
                        "",
                    )
                } else {
                    Outcome::new(
                        ResolutionStatus::Partial,
                        Confidence::Medium,
                        self.uris.paragraph(key, paragraph),
                        &format!("point ({}) not found in paragraph {}", letter, paragraph),
                    )
                }
            }
        }
    }

    fn resolve_paragraph(&self, reference: &Reference) -> Outcome {
        let has_article_component =
            reference.article_num.is_some() || reference.section_str.is_some();
        let key = if has_article_component {
            match self.target_article_key(reference) {
                Some(key) => key,
                None => {
                    return Outcome::new(
                        ResolutionStatus::NotFound,
                        Confidence::None,
                        String::new(),
                        "article not found",
                    )
                }
            }
        } else {
            // No article context: the reference is relative to the article
            // it appears in.
            self.source_key(reference)
        };
        if reference.point_letter.is_some() {
            return self.resolve_point_in_article(reference, &key);
        }
        match reference.paragraph_num {
            Some(paragraph) => self.resolve_within_article(reference, &key, paragraph),
            None => Outcome::new(
                ResolutionStatus::NotFound,
                Confidence::None,
                String::new(),
                "no paragraph component",
            ),
        }
    }

    fn resolve_point(&self, reference: &Reference) -> Outcome {
        let has_article_component =
            reference.article_num.is_some() || reference.section_str.is_some();
        let key = if has_article_component {
            match self.target_article_key(reference) {
                Some(key) => key,
                None => {
                    return Outcome::new(
                        ResolutionStatus::NotFound,
                        Confidence::None,
                        String::new(),
                        "article not found",
                    )
                }
            }
        } else {
            self.source_key(reference)
        };
        self.resolve_point_in_article(reference, &key)
    }

    fn resolve_point_in_article(&self, reference: &Reference, key: &str) -> Outcome {
        let letter = match reference.point_letter {
            Some(letter) => letter,
            None => {
                return Outcome::new(
                    ResolutionStatus::NotFound,
                    Confidence::None,
                    String::new(),
                    "no point component",
                )
            }
        };
        if let Some(paragraph) = reference.paragraph_num {
            return self.resolve_within_article(reference, key, paragraph);
        }
        // No paragraph context: paragraph 1 is the default home of a bare
        // point reference, then paragraphs 1 through 10 are scanned for a
        // matching letter.
        if self
            .index
            .points
            .contains(&format!("{}:1:{}", key, letter))
        {
            return Outcome::new(
                ResolutionStatus::Resolved,
                Confidence::High,
                self.uris.point(key, 1, letter),
                "",
            );
        }
        for paragraph in 1..=10u32 {
            if self
                .index
                .points
                .contains(&format!("{}:{}:{}", key, paragraph, letter))
            {
                return Outcome::new(
                    ResolutionStatus::Resolved,
                    Confidence::Medium,
                    self.uris.point(key, paragraph, letter),
                    &format!("point ({}) located by paragraph scan", letter),
                );
            }
        }
        if self.index.articles.contains(key) {
            Outcome::new(
                ResolutionStatus::Partial,
                Confidence::Low,
                self.uris.article(key),
                &format!("point ({}) not found in any paragraph", letter),
            )
        } else {
            Outcome::new(
                ResolutionStatus::NotFound,
                Confidence::None,
                String::new(),
                "article not found",
            )
        }
    }

    fn resolve_chapter(&self, reference: &Reference) -> Outcome {
        match &reference.chapter_num {
            Some(chapter) if self.index.chapters.contains(chapter) => Outcome::new(
                ResolutionStatus::Resolved,
                Confidence::High,
                self.uris.chapter(chapter),
                "",
            ),
            Some(chapter) => Outcome::new(
                ResolutionStatus::NotFound,
                Confidence::None,
                String::new(),
                &format!("chapter {} not found", chapter),
            ),
            None => Outcome::new(
                ResolutionStatus::NotFound,
                Confidence::None,
                String::new(),
                "no chapter component",
            ),
        }
    }

    fn resolve_subchapter(&self, reference: &Reference) -> Outcome {
        match &reference.chapter_num {
            Some(chapter) if self.index.chapters.contains(chapter) => Outcome::new(
                ResolutionStatus::Partial,
                Confidence::Medium,
                self.uris.chapter(chapter),
                "subchapter level is not indexed",
            ),
            _ => Outcome::new(
                ResolutionStatus::NotFound,
                Confidence::None,
                String::new(),
                "chapter not found",
            ),
        }
    }

    fn resolve_section(&self, reference: &Reference) -> Outcome {
        let us_style = reference.section_num.map_or(false, |n| n >= 1_000_000)
            || matches!(
                reference.sub_ref,
                Some(SubRef::Subdivision) | Some(SubRef::Paragraph)
            );
        if us_style {
            // A dotted US section is an article of this document; its
            // subdivision letter resolves like a point.
            if reference.point_letter.is_some() {
                return self.resolve_point(reference);
            }
            return self.resolve_article(reference);
        }

        let section = match reference.section_num {
            Some(section) => section as u32,
            None => {
                return Outcome::new(
                    ResolutionStatus::NotFound,
                    Confidence::None,
                    String::new(),
                    "no section component",
                )
            }
        };

        // Explicit chapter context (e.g. "clause 2 of rule XI") wins over
        // the chapter the source article sits in.
        let context_chapter = reference.chapter_num.clone().or_else(|| {
            self.index
                .by_number
                .get(&reference.source_article)
                .and_then(|key| self.index.article_chapter.get(key))
                .cloned()
        });
        if let Some(chapter) = &context_chapter {
            if self
                .index
                .sections
                .contains(&format!("{}:{}", chapter, section))
            {
                return Outcome::new(
                    ResolutionStatus::Resolved,
                    Confidence::High,
                    self.uris.section(chapter, section),
                    "",
                );
            }
        }

        let suffix = format!(":{}", section);
        let mut matches: Vec<String> = self
            .index
            .sections
            .iter()
            .filter(|key| key.ends_with(&suffix))
            .map(|key| key[..key.len() - suffix.len()].to_string())
            .collect();
        matches.sort();
        match matches.len() {
            0 => {
                if let Some(chapter) = &context_chapter {
                    if reference.chapter_num.is_some() && self.index.chapters.contains(chapter) {
                        return Outcome::new(
                            ResolutionStatus::Partial,
                            Confidence::Medium,
                            self.uris.chapter(chapter),
                            &format!("section {} not found in chapter {}", section, chapter),
                        );
                    }
                }
                Outcome::new(
                    ResolutionStatus::NotFound,
                    Confidence::None,
                    String::new(),
                    &format!("section {} not found in any chapter", section),
                )
            }
            1 => Outcome::new(
                ResolutionStatus::Resolved,
                Confidence::Medium,
                self.uris.section(&matches[0], section),
                &format!("section {} attributed to chapter {}", section, matches[0]),
            ),
            _ => {
                let alternatives: Vec<String> = matches
                    .iter()
                    .map(|chapter| self.uris.section(chapter, section))
                    .collect();
                let mut outcome = Outcome::new(
                    ResolutionStatus::Ambiguous,
                    Confidence::Low,
                    alternatives[0].clone(),
                    &format!("section {} exists in {} chapters", section, matches.len()),
                );
                outcome.alternative_uris = alternatives;
                outcome
            }
        }
    }

    fn resolve_range(&self, reference: &Reference) -> Outcome {
        let (uris, found, missing) = match reference.target {
            ReferenceTarget::Point => self.enumerate_point_range(reference),
            ReferenceTarget::Section if reference.section_num.is_some() => {
                self.enumerate_dotted_section_range(reference)
            }
            _ => self.enumerate_article_range(reference),
        };
        let confidence = if missing == 0 && found > 0 {
            Confidence::High
        } else if found > 0 {
            Confidence::Medium
        } else {
            Confidence::None
        };
        let mut outcome = Outcome::new(
            ResolutionStatus::RangeRef,
            confidence,
            uris.first().cloned().unwrap_or_default(),
            &format!("{} resolved / {} missing", found, missing),
        );
        outcome.target_uris = uris;
        outcome
    }

    fn enumerate_article_range(&self, reference: &Reference) -> (Vec<String>, usize, usize) {
        let start = match reference.article_num {
            Some(start) => start as u64,
            None => return (Vec::new(), 0, 0),
        };
        let end = reference.range_end_num.unwrap_or(start);
        self.enumerate_numbered_articles(start, end)
    }

    fn enumerate_dotted_section_range(&self, reference: &Reference) -> (Vec<String>, usize, usize) {
        let start = match reference.section_num {
            Some(start) => start % 1000,
            None => return (Vec::new(), 0, 0),
        };
        let end = reference.range_end_num.map_or(start, |n| n % 1000);
        self.enumerate_numbered_articles(start, end)
    }

    fn enumerate_numbered_articles(&self, start: u64, end: u64) -> (Vec<String>, usize, usize) {
        let mut uris = Vec::new();
        let mut missing = 0;
        if end < start {
            return (uris, 0, 0);
        }
        for number in start..=end {
            let key = number.to_string();
            if self.index.articles.contains(&key) {
                uris.push(self.uris.article(&key));
            } else {
                missing += 1;
            }
        }
        let found = uris.len();
        (uris, found, missing)
    }

    fn enumerate_point_range(&self, reference: &Reference) -> (Vec<String>, usize, usize) {
        let (start, end) = match (reference.point_letter, reference.range_end_letter) {
            (Some(start), Some(end)) if start.is_ascii_lowercase() && end.is_ascii_lowercase() => {
                (start, end)
            }
            _ => return (Vec::new(), 0, 0),
        };
        let key = match self.target_article_key(reference) {
            Some(key) => key,
            None => self.source_key(reference),
        };
        let paragraph = reference.paragraph_num.unwrap_or(1);
        let mut uris = Vec::new();
        let mut missing = 0;
        for letter in start..=end {
            if self
                .index
                .points
                .contains(&format!("{}:{}:{}", key, paragraph, letter))
            {
                uris.push(self.uris.point(&key, paragraph, letter));
            } else {
                missing += 1;
            }
        }
        let found = uris.len();
        (uris, found, missing)
    }
}

fn build_report(references: &[Reference], resolved: &[ResolvedReference]) -> ResolutionReport {
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut confidence_counts: BTreeMap<String, usize> = BTreeMap::new();
    for resolution in resolved {
        *status_counts
            .entry(resolution.status.as_str().to_string())
            .or_default() += 1;
        *confidence_counts
            .entry(resolution.confidence.as_str().to_string())
            .or_default() += 1;
    }
    let internal = references
        .iter()
        .filter(|r| r.ref_type == ReferenceType::Internal)
        .count();
    let progressed = resolved
        .iter()
        .filter(|r| {
            matches!(
                r.status,
                ResolutionStatus::Resolved | ResolutionStatus::Partial | ResolutionStatus::RangeRef
            )
        })
        .count();
    let high = resolved
        .iter()
        .filter(|r| r.confidence == Confidence::High)
        .count();
    let total = resolved.len();
    ResolutionReport {
        total,
        internal,
        status_counts,
        confidence_counts,
        resolution_rate: if internal == 0 {
            0.0
        } else {
            progressed as f64 / internal as f64
        },
        confidence_rate: if total == 0 {
            0.0
        } else {
            high as f64 / total as f64
        },
    }
}
