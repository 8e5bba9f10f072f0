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

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::analysis::{analyze, AnalyzeOptions};
use crate::output::{CliOutput, OutputFormat};
use crate::parser::structure::{parse_document, ParseOptions};
use crate::pattern::FormatHint;
use crate::reference::resolver::ResolverOptions;

/// Regula statutory text analyzer
///
/// Parses the raw text of legal instruments into a structured tree of
/// chapters, articles, paragraphs and points, extracts defined terms and
/// cross-references, and resolves references to stable URIs.
#[derive(clap::Parser, Debug)]
struct RegulaArgs {
    #[clap(value_parser, required = true, name = "file")]
    /// Input text files, one document each
    files: Vec<PathBuf>,
    /// Output type
    #[clap(value_enum, long, short, default_value_t)]
    output: OutputFormat,
    /// Do parsing only until and including this step
    #[clap(value_enum, long, short, default_value_t)]
    parse_until: ParsingStep,
    /// Dialect preference for header recognition
    #[clap(value_enum, long, short, default_value_t)]
    format_hint: FormatHint,
    /// Base URI prefix for resolved provision URIs
    #[clap(long, default_value = "lex://")]
    base_uri: String,
    /// Document identifier used in provision URIs
    #[clap(long, default_value = "doc")]
    reg_id: String,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ParsingStep {
    /// Only parse the structural tree
    Structure,
    /// Run the full pipeline: provisions, definitions, references,
    /// resolution and term usage
    Full,
}

impl Default for ParsingStep {
    fn default() -> Self {
        Self::Full
    }
}

pub fn cli_main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    )
    .format(|buf, record| writeln!(buf, "{:>5}: {}", record.level(), record.args()))
    .init();

    let args = RegulaArgs::parse();
    let mut output = std::io::stdout();
    for file in &args.files {
        info!("Processing {:?}", file);
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("Could not read input file {:?}", file))?;

        let parse_options = ParseOptions {
            format_hint: args.format_hint,
            ..Default::default()
        };
        if args.parse_until == ParsingStep::Structure {
            let document = parse_document(&text, &parse_options);
            document.cli_output(100, args.output, &mut output)?;
            continue;
        }

        let analysis = analyze(
            &text,
            &AnalyzeOptions {
                parse: parse_options,
                resolver: ResolverOptions {
                    base_uri: args.base_uri.clone(),
                    reg_id: args.reg_id.clone(),
                },
            },
        );
        analysis.cli_output(100, args.output, &mut output)?;
    }
    Ok(())
}
