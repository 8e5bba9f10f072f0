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

use crate::pattern::{FormatHint, PatternRegistry};
use crate::structure::{Article, Chapter, Section};

/// Recognised chapter header. `title` is set when the header line carried
/// an inline title; otherwise the title arrives on the next line.
pub struct ChapterParser {
    chapter: Chapter,
    title_pending: bool,
}

impl ChapterParser {
    pub fn feed_title_line(&mut self, line: &str) -> bool {
        if !self.title_pending || line.trim().is_empty() {
            return false;
        }
        self.chapter.title = line.trim().to_string();
        self.title_pending = false;
        true
    }

    pub fn push_section(&mut self, section: Section) {
        self.chapter.sections.push(section);
    }

    pub fn push_article(&mut self, article: Article) {
        self.chapter.articles.push(article);
    }

    pub fn finish(self) -> Chapter {
        self.chapter
    }
}

pub struct ChapterParserFactory;

impl ChapterParserFactory {
    /// Try all chapter-level headers for the active dialect: Roman EU
    /// chapters, Arabic US chapters, and rules-manual RULE headers (which
    /// play the chapter role in that dialect).
    pub fn try_create_from_header(
        line: &str,
        hint: FormatHint,
        registry: &PatternRegistry,
    ) -> Option<ChapterParser> {
        let captures = registry
            .chapter_eu
            .captures(line)
            .filter(|c| roman::from(&c[1]).is_some())
            .or_else(|| registry.chapter_us.captures(line))
            .or_else(|| match hint {
                FormatHint::HouseRules | FormatHint::Auto => registry.rule_header.captures(line),
                _ => None,
            })?;

        let number = captures[1].to_string();
        let title = captures.get(2).map(|m| m.as_str().trim().to_string());
        Some(ChapterParser {
            title_pending: title.is_none(),
            chapter: Chapter {
                number,
                title: title.unwrap_or_default(),
                sections: Vec::new(),
                articles: Vec::new(),
            },
        })
    }

    /// An implicit chapter for documents whose articles appear before any
    /// chapter header.
    pub fn create_implicit() -> ChapterParser {
        ChapterParser {
            title_pending: false,
            chapter: Chapter {
                number: String::new(),
                title: String::new(),
                sections: Vec::new(),
                articles: Vec::new(),
            },
        }
    }
}

pub struct SectionParser {
    section: Section,
    title_pending: bool,
}

impl SectionParser {
    pub fn feed_title_line(&mut self, line: &str) -> bool {
        if !self.title_pending || line.trim().is_empty() {
            return false;
        }
        self.section.title = line.trim().to_string();
        self.title_pending = false;
        true
    }

    pub fn push_article(&mut self, article: Article) {
        self.section.articles.push(article);
    }

    pub fn finish(self) -> Section {
        self.section
    }
}

pub struct SectionParserFactory;

impl SectionParserFactory {
    /// EU structural sections: `Section <arabic>` alone on its line, the
    /// title following. The dotted and alphanumeric `Section` forms are
    /// article headers and never reach this factory.
    pub fn try_create_from_header(line: &str, registry: &PatternRegistry) -> Option<SectionParser> {
        let captures = registry.section_eu.captures(line)?;
        Some(SectionParser {
            title_pending: true,
            section: Section {
                number: captures[1].parse().ok()?,
                title: String::new(),
                articles: Vec::new(),
            },
        })
    }
}
