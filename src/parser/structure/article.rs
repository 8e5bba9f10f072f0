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
use crate::structure::Article;

pub struct ArticleParserFactory;

impl ArticleParserFactory {
    /// Article-level headers, in recognition priority order:
    ///
    /// 1. EU `Article <arabic>` alone on its line (title follows),
    /// 2. US state `Section <prefix>.<suffix> [title…]` (the dotted form
    ///    has priority over the alphanumeric one),
    /// 3. USC `Section <alnum-id> [title…]`.
    ///
    /// A `us-state`/`usc` format hint moves the `Section` forms ahead of
    /// the EU ones, so a bare `Section 300` line in a USC title opens an
    /// article instead of an EU structural section.
    pub fn try_create_from_header(
        line: &str,
        hint: FormatHint,
        registry: &'static PatternRegistry,
    ) -> Option<ArticleParser> {
        if let Some(captures) = registry.article_eu.captures(line) {
            return Some(ArticleParser {
                number: captures[1].parse().ok()?,
                section_id: String::new(),
                title: String::new(),
                title_pending: true,
                lines: Vec::new(),
                registry,
            });
        }
        if let Some(captures) = registry.section_us_dotted.captures(line) {
            // The code prefix identifies the code itself (e.g. 1798 for
            // the CCPA part of the California Civil Code); the suffix is
            // the article identity within the document.
            return Some(ArticleParser {
                number: captures[2].parse().ok()?,
                section_id: String::new(),
                title: captures[3].trim().to_string(),
                title_pending: false,
                lines: Vec::new(),
                registry,
            });
        }
        if let Some(captures) = registry.section_usc_bare.captures(line) {
            let section_id = captures[1].to_string();
            let accept = match hint {
                // In auto mode a purely numeric identifier with no inline
                // title stays available to the EU section interpretation.
                FormatHint::Auto | FormatHint::Eu => {
                    section_id.chars().any(|c| !c.is_ascii_digit())
                        || !captures[2].trim().is_empty()
                }
                _ => true,
            };
            if accept {
                let number = leading_integer(&section_id)?;
                return Some(ArticleParser {
                    number,
                    section_id,
                    title: captures[2].trim().to_string(),
                    title_pending: false,
                    lines: Vec::new(),
                    registry,
                });
            }
        }
        None
    }
}

/// Accumulates the lines of one article between two headers.
pub struct ArticleParser {
    number: u32,
    section_id: String,
    title: String,
    title_pending: bool,
    lines: Vec<String>,
    registry: &'static PatternRegistry,
}

impl ArticleParser {
    pub fn feed_line(&mut self, line: &str) {
        if self.title_pending {
            if line.trim().is_empty() {
                return;
            }
            self.title_pending = false;
            // A line that already opens a paragraph or point is body text,
            // not a missing title.
            if !self.registry.paragraph_start.is_match(line)
                && !self.registry.point_start.is_match(line)
            {
                self.title = line.trim().to_string();
                return;
            }
        }
        self.lines.push(line.to_string());
    }

    pub fn finish(self) -> Article {
        let text = self.lines.join("\n").trim_end().to_string();
        Article {
            number: self.number,
            section_id: self.section_id,
            title: self.title,
            text,
            paragraphs: Vec::new(),
        }
    }
}

fn leading_integer(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}
