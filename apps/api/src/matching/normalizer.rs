//! Text Normalizer: flattens uploaded documents and pasted text into one ordered resume list.
//!
//! Order: documents in upload order, then pasted chunks. That order is the
//! ranking tie-break and the basis of the `Candidate {n}` fallback name.

use serde::Serialize;
use tracing::warn;

use crate::extract::{ExtractorRegistry, RawDocument};

/// Blank-line delimiter between pasted resumes.
const PASTED_DELIMITER: &str = "\n\n";

/// One candidate's resume text, with the name shown next to its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeRecord {
    pub text: String,
    pub display_name: String,
}

impl ResumeRecord {
    /// `position` is 1-based within the normalized sequence.
    pub fn new(text: String, position: usize) -> Self {
        let display_name = display_name_for(&text, position);
        Self { text, display_name }
    }
}

/// Normalizer output: the records plus the per-document warnings raised on the way.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub records: Vec<ResumeRecord>,
    pub warnings: Vec<String>,
}

/// Runs every document through the registry, then splits the pasted text.
/// A document that fails extraction is skipped and recorded as a warning.
pub fn normalize(
    documents: &[RawDocument],
    pasted_text: &str,
    extractors: &ExtractorRegistry,
) -> NormalizedBatch {
    let mut texts = Vec::with_capacity(documents.len());
    let mut warnings = Vec::new();

    for document in documents {
        match extractors.extract(document) {
            Ok(text) if text.trim().is_empty() => {
                warn!("No text extracted from {}; skipping", document.name);
                warnings.push(format!("No text found in {}.", document.name));
            }
            Ok(text) => texts.push(text),
            Err(e) => {
                warn!("Could not read {}: {e}", document.name);
                warnings.push(format!("Could not read {}: {e}", document.name));
            }
        }
    }

    texts.extend(split_pasted(pasted_text));

    let records = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| ResumeRecord::new(text, i + 1))
        .collect();

    NormalizedBatch { records, warnings }
}

/// Splits pasted text on blank lines, trimming each chunk and dropping empty ones.
pub fn split_pasted(pasted_text: &str) -> Vec<String> {
    let unified = pasted_text.replace("\r\n", "\n");
    unified
        .split(PASTED_DELIMITER)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(String::from)
        .collect()
}

/// The resume's literal first line, or `Candidate {position}` when that line is blank.
fn display_name_for(text: &str, position: usize) -> String {
    match text.lines().next().map(str::trim) {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => format!("Candidate {position}"),
    }
}
