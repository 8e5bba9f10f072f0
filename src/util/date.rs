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

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use lazy_regex::regex_captures;

/// Convert from string to date, using the long date pattern found in legal
/// text ("24 May 2016"). Month names are matched case-insensitively.
pub fn date_from_english_string(s: &str) -> Result<NaiveDate> {
    let (_, day, month, year) = regex_captures!(r"^(\d{1,2}) ([A-Za-z]+),? (\d{4})$", s.trim())
        .ok_or_else(|| anyhow!("Could not parse date string {}", s))?;

    NaiveDate::from_ymd_opt(year.parse()?, text_to_month(month)?.into(), day.parse()?)
        .ok_or_else(|| anyhow!("Invalid date: {}", s))
}

/// The ISO form of a long date, or the empty string when the text does not
/// name a valid date. Temporal references keep their raw text either way.
pub fn iso_date_string(s: &str) -> String {
    match date_from_english_string(s) {
        Ok(date) => format!("{}", date.format("%Y-%m-%d")),
        Err(_) => String::new(),
    }
}

pub fn text_to_month(s: &str) -> Result<u8> {
    match s.to_ascii_lowercase().as_str() {
        "january" => Ok(1),
        "february" => Ok(2),
        "march" => Ok(3),
        "april" => Ok(4),
        "may" => Ok(5),
        "june" => Ok(6),
        "july" => Ok(7),
        "august" => Ok(8),
        "september" => Ok(9),
        "october" => Ok(10),
        "november" => Ok(11),
        "december" => Ok(12),
        _ => Err(anyhow!("Invalid month name {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_date_parsing() {
        assert_eq!(iso_date_string("24 May 2016"), "2016-05-24");
        assert_eq!(iso_date_string("1 January 2020"), "2020-01-01");
        assert_eq!(iso_date_string("5 OCTOBER 1999"), "1999-10-05");
        assert_eq!(iso_date_string("32 May 2016"), "");
        assert_eq!(iso_date_string("24 Floréal 2016"), "");
    }
}
