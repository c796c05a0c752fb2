//! Match pipeline: one synchronous pass from raw inputs to ranked, summarized results.
//!
//! Flow: normalize → embed (job description, then resumes) → rank → summarize
//!       (sequential, throttled) → assemble.
//!
//! An empty resume set or an embedding failure ends the run with no partial
//! results. Per-document and per-summary failures never do.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extract::{ExtractorRegistry, RawDocument};
use crate::llm_client::CompletionParams;
use crate::matching::assembler::{assemble, MatchResult};
use crate::matching::embedding::{embed_checked, EmbeddingError, EmbeddingProvider};
use crate::matching::normalizer::normalize;
use crate::matching::ranker::{rank, scored_candidates, RankError};
use crate::matching::summary::{summarize_ranked, SummaryGenerator, Throttle};

/// Most candidates returned (and summarized) per run.
pub const DEFAULT_TOP_K: usize = 10;
/// Minimum gap between consecutive summary calls.
pub const DEFAULT_SUMMARY_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub top_k: usize,
    pub summary_interval: Duration,
    pub completion: CompletionParams,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            summary_interval: DEFAULT_SUMMARY_INTERVAL,
            completion: CompletionParams {
                max_tokens: 100,
                temperature: 0.7,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("job description is empty")]
    MissingJobDescription,

    #[error("no resumes found")]
    NoResumes { warnings: Vec<String> },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Ranking(#[from] RankError),

    #[error("match run aborted: {0}")]
    Aborted(String),
}

/// Inputs to one "find matches" run.
#[derive(Debug, Clone, Default)]
pub struct MatchRequest {
    pub job_description: String,
    pub documents: Vec<RawDocument>,
    pub pasted_text: String,
}

/// Output of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<MatchResult>,
    /// Per-document problems met while normalizing.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStage {
    Normalizing,
    Embedding,
    Ranking,
    Summarizing,
    Assembled,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Normalizing => "normalizing",
            RunStage::Embedding => "embedding",
            RunStage::Ranking => "ranking",
            RunStage::Summarizing => "summarizing",
            RunStage::Assembled => "assembled",
        };
        f.write_str(name)
    }
}

/// Owns the collaborators of a match run. Holds no per-run state, so one
/// instance serves concurrent runs.
pub struct MatchPipeline {
    extractors: Arc<ExtractorRegistry>,
    embedder: Arc<dyn EmbeddingProvider>,
    summarizer: Arc<dyn SummaryGenerator>,
    settings: MatchSettings,
}

impl MatchPipeline {
    pub fn new(
        extractors: Arc<ExtractorRegistry>,
        embedder: Arc<dyn EmbeddingProvider>,
        summarizer: Arc<dyn SummaryGenerator>,
        settings: MatchSettings,
    ) -> Self {
        Self {
            extractors,
            embedder,
            summarizer,
            settings,
        }
    }

    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    pub async fn run(&self, request: MatchRequest) -> Result<MatchReport, MatchError> {
        let MatchRequest {
            job_description,
            documents,
            pasted_text,
        } = request;

        if job_description.trim().is_empty() {
            return Err(MatchError::MissingJobDescription);
        }

        let run_id = Uuid::new_v4();

        // Normalizing
        log_stage(run_id, RunStage::Normalizing);
        let extractors = Arc::clone(&self.extractors);
        let batch = tokio::task::spawn_blocking(move || {
            normalize(&documents, &pasted_text, &extractors)
        })
        .await
        .map_err(|e| MatchError::Aborted(format!("normalization task failed: {e}")))?;

        if batch.records.is_empty() {
            warn!("Match run {run_id}: no resumes after normalization");
            return Err(MatchError::NoResumes {
                warnings: batch.warnings,
            });
        }
        info!(
            "Match run {run_id}: {} resumes, {} warnings",
            batch.records.len(),
            batch.warnings.len()
        );

        // Embedding
        log_stage(run_id, RunStage::Embedding);
        let embedder = Arc::clone(&self.embedder);
        let query_text = job_description.clone();
        let resume_texts: Vec<String> = batch.records.iter().map(|r| r.text.clone()).collect();
        let (query, candidates) = tokio::task::spawn_blocking(move || {
            let query = embed_checked(embedder.as_ref(), &[query_text])?
                .pop()
                .ok_or(EmbeddingError::CountMismatch {
                    expected: 1,
                    actual: 0,
                })?;
            let candidates = embed_checked(embedder.as_ref(), &resume_texts)?;
            Ok::<_, EmbeddingError>((query, candidates))
        })
        .await
        .map_err(|e| EmbeddingError::Aborted(e.to_string()))??;

        // Ranking
        log_stage(run_id, RunStage::Ranking);
        let ranked = rank(&query, &candidates, self.settings.top_k)?;
        let top = scored_candidates(&batch.records, &ranked);

        // Summarizing
        log_stage(run_id, RunStage::Summarizing);
        let mut throttle = Throttle::new(self.settings.summary_interval);
        let summaries = summarize_ranked(
            self.summarizer.as_ref(),
            &job_description,
            &top,
            &mut throttle,
        )
        .await;

        let results = assemble(top, summaries);
        log_stage(run_id, RunStage::Assembled);
        info!("Match run {run_id}: returning {} matches", results.len());

        Ok(MatchReport {
            run_id,
            generated_at: Utc::now(),
            results,
            warnings: batch.warnings,
        })
    }
}

fn log_stage(run_id: Uuid, stage: RunStage) {
    info!("Match run {run_id}: {stage}");
}
