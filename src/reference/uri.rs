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

//! Stable string identities for provisions and external documents.
//! Downstream systems rely on the exact forms, so changes here are
//! breaking changes.

use crate::reference::{Reference, ReferenceTarget};

#[derive(Debug, Clone)]
pub struct UriBuilder {
    base_uri: String,
    reg_id: String,
}

impl UriBuilder {
    pub fn new(base_uri: &str, reg_id: &str) -> Self {
        Self {
            base_uri: base_uri.to_string(),
            reg_id: reg_id.to_string(),
        }
    }

    /// `<base><reg>:Art<key>`
    pub fn article(&self, article_key: &str) -> String {
        format!("{}{}:Art{}", self.base_uri, self.reg_id, article_key)
    }

    /// `<base><reg>:Art<key>(<para>)`
    pub fn paragraph(&self, article_key: &str, paragraph: u32) -> String {
        format!("{}({})", self.article(article_key), paragraph)
    }

    /// `<base><reg>:Art<key>(<para>)(<letter>)`
    pub fn point(&self, article_key: &str, paragraph: u32, letter: char) -> String {
        format!("{}({})({})", self.article(article_key), paragraph, letter)
    }

    /// `<base><reg>:Chapter<num>`
    pub fn chapter(&self, chapter: &str) -> String {
        format!("{}{}:Chapter{}", self.base_uri, self.reg_id, chapter)
    }

    /// `<base><reg>:Chapter<num>:Section<num>`
    pub fn section(&self, chapter: &str, section: u32) -> String {
        format!("{}:Section{}", self.chapter(chapter), section)
    }

    /// Stable URN for an external reference, falling back to
    /// `urn:external:<slug>` when no dedicated form applies.
    pub fn external(&self, reference: &Reference) -> String {
        match reference.target {
            ReferenceTarget::Directive => format!(
                "urn:eu:directive:{}/{}",
                reference.year.unwrap_or_default(),
                reference.number.unwrap_or_default()
            ),
            ReferenceTarget::Regulation => match reference.external_doc.as_deref() {
                Some("cfr") => format!(
                    "urn:us:cfr:{}/{}",
                    reference.number.unwrap_or_default(),
                    reference.section_str.as_deref().unwrap_or_default()
                ),
                Some("public-law") => format!(
                    "urn:us:pl:{}-{}",
                    reference.year.unwrap_or_default(),
                    reference.number.unwrap_or_default()
                ),
                _ => format!(
                    "urn:eu:regulation:{}/{}",
                    reference.year.unwrap_or_default(),
                    reference.number.unwrap_or_default()
                ),
            },
            ReferenceTarget::Treaty => format!(
                "urn:eu:treaty:{}",
                reference.external_doc.as_deref().unwrap_or("unknown")
            ),
            ReferenceTarget::Decision => format!(
                "urn:eu:decision:{}/{}",
                reference.year.unwrap_or_default(),
                reference.number.unwrap_or_default()
            ),
            ReferenceTarget::Section => match reference.external_doc.as_deref() {
                Some("usc") => format!(
                    "urn:us:usc:{}/{}",
                    reference.number.unwrap_or_default(),
                    reference.section_str.as_deref().unwrap_or_default()
                ),
                Some("ca") => format!(
                    "urn:us:ca:title{}/sec{}",
                    reference.number.unwrap_or_default(),
                    reference.section_num.unwrap_or_default()
                ),
                Some(act_name) => format!(
                    "urn:us:act:{}/sec{}",
                    slug(act_name),
                    reference.section_str.as_deref().unwrap_or_default()
                ),
                None => format!("urn:external:{}", slug(&reference.identifier)),
            },
            ReferenceTarget::Manual | ReferenceTarget::Precedent => {
                let tag = reference.external_doc.as_deref().unwrap_or("authority");
                match (reference.number, reference.section_num) {
                    (Some(volume), Some(section)) => {
                        format!("urn:external:{}:{}/sec{}", tag, volume, section)
                    }
                    (None, Some(section)) => format!("urn:external:{}/sec{}", tag, section),
                    (Some(volume), None) => format!("urn:external:{}:{}", tag, volume),
                    (None, None) => format!("urn:external:{}", tag),
                }
            }
            _ => format!("urn:external:{}", slug(&reference.identifier)),
        }
    }
}

fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            previous_dash = false;
        } else if !previous_dash && !out.is_empty() {
            out.push('-');
            previous_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceType;
    use pretty_assertions::assert_eq;

    fn builder() -> UriBuilder {
        UriBuilder::new("lex://", "gdpr")
    }

    #[test]
    fn test_provision_uris() {
        assert_eq!(builder().article("6"), "lex://gdpr:Art6");
        assert_eq!(builder().paragraph("6", 1), "lex://gdpr:Art6(1)");
        assert_eq!(builder().point("6", 1, 'a'), "lex://gdpr:Art6(1)(a)");
        assert_eq!(builder().chapter("III"), "lex://gdpr:ChapterIII");
        assert_eq!(builder().section("III", 2), "lex://gdpr:ChapterIII:Section2");
        assert_eq!(builder().article("300aa-25"), "lex://gdpr:Art300aa-25");
    }

    #[test]
    fn test_external_urns() {
        let mut reference = Reference::new(
            ReferenceType::External,
            ReferenceTarget::Regulation,
            1,
            "Regulation (EU) 2016/679",
            0,
        );
        reference.year = Some(2016);
        reference.number = Some(679);
        assert_eq!(builder().external(&reference), "urn:eu:regulation:2016/679");

        let mut usc = Reference::new(
            ReferenceType::External,
            ReferenceTarget::Section,
            1,
            "42 U.S.C. § 1395",
            0,
        );
        usc.external_doc = Some("usc".to_string());
        usc.number = Some(42);
        usc.section_str = Some("1395".to_string());
        assert_eq!(builder().external(&usc), "urn:us:usc:42/1395");

        let mut act = Reference::new(
            ReferenceType::External,
            ReferenceTarget::Section,
            1,
            "section 1128 of the Social Security Act",
            0,
        );
        act.external_doc = Some("Social Security Act".to_string());
        act.section_str = Some("1128".to_string());
        assert_eq!(
            builder().external(&act),
            "urn:us:act:social-security-act/sec1128"
        );
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Social Security Act"), "social-security-act");
        assert_eq!(slug("Jefferson's Manual"), "jefferson-s-manual");
    }
}
