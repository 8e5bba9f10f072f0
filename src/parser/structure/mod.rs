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

mod article;
mod structural;

use log::debug;

use crate::pattern::{FormatHint, PatternRegistry};
use crate::structure::{Document, DocumentType};

use self::article::{ArticleParser, ArticleParserFactory};
use self::structural::{ChapterParser, ChapterParserFactory, SectionParser, SectionParserFactory};

/// Options for the hierarchical parser. The registry defaults to the
/// process-wide one; supplying a different frozen registry is supported so
/// parallel per-document workers can share a single custom catalogue.
#[derive(Clone, Copy)]
pub struct ParseOptions {
    pub format_hint: FormatHint,
    pub registry: &'static PatternRegistry,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            format_hint: FormatHint::default(),
            registry: PatternRegistry::global(),
        }
    }
}

/// Parse raw document text into the structural tree. Never fails on
/// content: anything that is not a recognised header is body text of the
/// nearest enclosing unit, and an empty input yields an empty document.
pub fn parse_document(text: &str, options: &ParseOptions) -> Document {
    let doc_type = detect_document_type(text, options.format_hint);
    let mut parser = DocumentParser::new(doc_type, options);
    for line in text.split('\n') {
        parser.feed_line(line);
    }
    parser.finish()
}

struct DocumentParser {
    options: ParseOptions,
    document: Document,
    preamble: Vec<String>,
    seen_structure: bool,
    current_chapter: Option<ChapterParser>,
    current_section: Option<SectionParser>,
    current_article: Option<ArticleParser>,
}

impl DocumentParser {
    fn new(doc_type: DocumentType, options: &ParseOptions) -> Self {
        Self {
            options: *options,
            document: Document::new(doc_type),
            preamble: Vec::new(),
            seen_structure: false,
            current_chapter: None,
            current_section: None,
            current_article: None,
        }
    }

    fn feed_line(&mut self, line: &str) {
        let registry = self.options.registry;
        let hint = self.options.format_hint;

        if let Some(chapter) = ChapterParserFactory::try_create_from_header(line, hint, registry) {
            self.finish_chapter();
            self.current_chapter = Some(chapter);
            self.seen_structure = true;
            return;
        }

        // With a US-flavoured hint the `Section` article forms take
        // priority over the EU structural section.
        let us_first = matches!(hint, FormatHint::UsState | FormatHint::Usc);
        if us_first {
            if self.try_open_article(line) {
                return;
            }
        }
        if let Some(section) = SectionParserFactory::try_create_from_header(line, registry) {
            self.finish_section();
            self.current_section = Some(section);
            self.seen_structure = true;
            return;
        }
        if !us_first && self.try_open_article(line) {
            return;
        }

        self.feed_continuation(line);
    }

    fn try_open_article(&mut self, line: &str) -> bool {
        let article = ArticleParserFactory::try_create_from_header(
            line,
            self.options.format_hint,
            self.options.registry,
        );
        match article {
            Some(parser) => {
                self.finish_article();
                self.current_article = Some(parser);
                self.seen_structure = true;
                true
            }
            None => false,
        }
    }

    fn feed_continuation(&mut self, line: &str) {
        if let Some(article) = &mut self.current_article {
            article.feed_line(line);
            return;
        }
        if let Some(section) = &mut self.current_section {
            if section.feed_title_line(line) {
                return;
            }
        }
        if let Some(chapter) = &mut self.current_chapter {
            if chapter.feed_title_line(line) {
                return;
            }
        }
        if !self.seen_structure {
            if self.document.title.is_empty() && !line.trim().is_empty() {
                self.document.title = line.trim().to_string();
            } else {
                self.preamble.push(line.to_string());
            }
            return;
        }
        if !line.trim().is_empty() {
            debug!("Dropping stray line outside any article: {:?}", line);
        }
    }

    fn finish_article(&mut self) {
        if let Some(article) = self.current_article.take() {
            let article = article.finish();
            if let Some(section) = &mut self.current_section {
                section.push_article(article);
            } else {
                self.ensure_chapter().push_article(article);
            }
        }
    }

    fn finish_section(&mut self) {
        self.finish_article();
        if let Some(section) = self.current_section.take() {
            self.ensure_chapter().push_section(section.finish());
        }
    }

    fn finish_chapter(&mut self) {
        self.finish_section();
        if let Some(chapter) = self.current_chapter.take() {
            self.document.chapters.push(chapter.finish());
        }
    }

    fn ensure_chapter(&mut self) -> &mut ChapterParser {
        self.current_chapter
            .get_or_insert_with(ChapterParserFactory::create_implicit)
    }

    fn finish(mut self) -> Document {
        self.finish_chapter();
        let recital_block = self
            .preamble
            .iter()
            .map(|l| l.trim_end())
            .skip_while(|l| l.is_empty())
            .collect::<Vec<&str>>()
            .join("\n")
            .trim_end()
            .to_string();
        if !recital_block.is_empty() {
            self.document.recitals.push(recital_block);
        }
        self.document.update_statistics();
        self.document
    }
}

/// Best-effort dialect detection from the text itself. A non-`auto` format
/// hint short-circuits most of it; the EU hint still distinguishes
/// regulations from directives by wording.
fn detect_document_type(text: &str, hint: FormatHint) -> DocumentType {
    match hint {
        FormatHint::UsState => return DocumentType::UsStateCode,
        FormatHint::Usc => return DocumentType::UscTitle,
        FormatHint::HouseRules => return DocumentType::HouseRules,
        FormatHint::Eu => return detect_eu_subtype(text),
        FormatHint::Auto => {}
    }

    let head: String = text.chars().take(4000).collect();
    if lazy_regex::regex_is_match!(r"(?i)\bdirective\b.*\b(?:EC|EEC|EU)\b", &head)
        || head.to_lowercase().contains("directive of the european parliament")
    {
        return DocumentType::EuDirective;
    }
    if lazy_regex::regex_is_match!(r"(?i)\bregulation\b", &head)
        && lazy_regex::regex_is_match!(r"(?i)european", &head)
    {
        return DocumentType::EuRegulation;
    }
    if lazy_regex::regex_is_match!(
        r"(?i)rules of the house of representatives|(?m)^(?:RULE|Rule)\s+[IVXLCDM]+",
        text
    ) {
        return DocumentType::HouseRules;
    }
    if lazy_regex::regex_is_match!(r"(?m)^Section\s+\d+\.\d+", text) {
        return DocumentType::UsStateCode;
    }
    if lazy_regex::regex_is_match!(r"(?m)^Section\s+\d+[a-z]", text)
        || text.contains("U.S.C.")
        || text.contains("of this title")
    {
        return DocumentType::UscTitle;
    }
    if lazy_regex::regex_is_match!(r"(?m)^(?:CHAPTER|Chapter)\s+[IVXLCDM]+\s*$", text)
        || lazy_regex::regex_is_match!(r"(?m)^Article\s+\d+\s*$", text)
    {
        return detect_eu_subtype(text);
    }
    DocumentType::Generic
}

fn detect_eu_subtype(text: &str) -> DocumentType {
    let head: String = text.chars().take(4000).collect();
    if lazy_regex::regex_is_match!(r"(?i)\bdirective\b", &head) {
        DocumentType::EuDirective
    } else {
        DocumentType::EuRegulation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document() {
        let doc = parse_document("", &ParseOptions::default());
        assert_eq!(doc.chapters.len(), 0);
        assert_eq!(doc.recitals.len(), 0);
        assert_eq!(doc.doc_type, DocumentType::Generic);
    }

    #[test]
    fn test_detection() {
        assert_eq!(
            detect_document_type(
                "REGULATION (EU) 2016/679 OF THE EUROPEAN PARLIAMENT AND OF THE COUNCIL",
                FormatHint::Auto
            ),
            DocumentType::EuRegulation
        );
        assert_eq!(
            detect_document_type("Section 1798.100 General duties", FormatHint::Auto),
            DocumentType::UsStateCode
        );
        assert_eq!(
            detect_document_type(
                "Section 300aa-25 Recording and reporting of information",
                FormatHint::Auto
            ),
            DocumentType::UscTitle
        );
        assert_eq!(
            detect_document_type("anything", FormatHint::HouseRules),
            DocumentType::HouseRules
        );
    }
}
