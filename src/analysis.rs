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

//! The whole-document pipeline, one pass feeding the next:
//! structure → provisions → definitions → references → resolution → usage.

use log::info;
use serde::{Deserialize, Serialize};

use crate::parser::definition::extract_definitions;
use crate::parser::provision::extract_document_provisions;
use crate::parser::reference::extract_document_references;
use crate::parser::structure::{parse_document, ParseOptions};
use crate::reference::resolver::{
    resolve_references, ResolutionReport, ResolvedReference, ResolverOptions,
};
use crate::reference::Reference;
use crate::structure::Document;
use crate::usage::{index_term_usage, UsageReport};

#[derive(Default)]
pub struct AnalyzeOptions {
    pub parse: ParseOptions,
    pub resolver: ResolverOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub document: Document,
    pub references: Vec<Reference>,
    pub resolved: Vec<ResolvedReference>,
    pub resolution: ResolutionReport,
    pub usage: UsageReport,
}

pub fn analyze(text: &str, options: &AnalyzeOptions) -> Analysis {
    let mut document = parse_document(text, &options.parse);
    extract_document_provisions(&mut document, options.parse.registry);
    extract_definitions(&mut document, options.parse.registry);
    let references = extract_document_references(&document);
    let (resolved, resolution) = resolve_references(&document, &references, &options.resolver);
    let usage = index_term_usage(&document);
    info!(
        "Analyzed {:?}: {} articles, {} definitions, {} references",
        document.title,
        document.statistics.articles,
        document.statistics.definitions,
        references.len()
    );
    Analysis {
        document,
        references,
        resolved,
        resolution,
        usage,
    }
}
