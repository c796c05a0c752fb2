//! Result Assembler: pairs ranked candidates with their summaries.

use serde::Serialize;

use crate::matching::ranker::{display_score, ScoredCandidate};

/// One displayed match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub display_name: String,
    pub similarity_score: f64,
    pub summary: String,
    /// `"{display_name} (Score: {similarity_score})"`, the heading of the result entry.
    pub label: String,
}

impl MatchResult {
    pub fn new(display_name: String, similarity_score: f64, summary: String) -> Self {
        let label = format!("{display_name} (Score: {})", display_score(similarity_score));
        Self {
            display_name,
            similarity_score,
            summary,
            label,
        }
    }
}

/// Zips candidates with summaries in ranked order.
pub fn assemble(candidates: Vec<ScoredCandidate>, summaries: Vec<String>) -> Vec<MatchResult> {
    debug_assert_eq!(candidates.len(), summaries.len());
    candidates
        .into_iter()
        .zip(summaries)
        .map(|(candidate, summary)| {
            MatchResult::new(candidate.record.display_name, candidate.score, summary)
        })
        .collect()
}
