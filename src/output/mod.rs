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

pub mod text;

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::analysis::Analysis;
use crate::structure::Document;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output
    #[clap(alias("txt"))]
    Plain,
    /// JSON output. Compact; the field names are the stable golden-file
    /// contract
    Json,
    /// YAML output
    #[clap(alias("yml"))]
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Yaml
    }
}

pub trait CliOutput: Sized + Serialize {
    fn cli_output(
        self,
        width: usize,
        output_type: OutputFormat,
        target: &mut impl Write,
    ) -> Result<()> {
        match output_type {
            OutputFormat::Plain => self.cli_output_plain(width, target)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *target, &self)?;
                writeln!(target)?;
            }
            OutputFormat::Yaml => serde_yaml::to_writer(target, &self)?,
        };
        Ok(())
    }
    fn cli_output_plain(self, width: usize, target: &mut impl Write) -> Result<()>;
}

impl CliOutput for Document {
    fn cli_output_plain(self, width: usize, target: &mut impl Write) -> Result<()> {
        write!(target, "{}", text::render_document(&self, width))?;
        Ok(())
    }
}

impl CliOutput for Analysis {
    fn cli_output_plain(self, width: usize, target: &mut impl Write) -> Result<()> {
        write!(target, "{}", text::render_document(&self.document, width))?;
        writeln!(target)?;
        writeln!(target, "References ({}):", self.references.len())?;
        for resolution in &self.resolved {
            writeln!(
                target,
                "  [{:>9}] {} -> {}",
                resolution.status.as_str(),
                resolution.original.raw_text,
                if resolution.target_uri.is_empty() {
                    "-"
                } else {
                    &resolution.target_uri
                },
            )?;
        }
        writeln!(
            target,
            "Resolution rate: {:.2}, confidence rate: {:.2}",
            self.resolution.resolution_rate, self.resolution.confidence_rate
        )?;
        writeln!(
            target,
            "Term usages: {} ({} unique terms)",
            self.usage.total_usages, self.usage.unique_terms_used
        )?;
        Ok(())
    }
}
