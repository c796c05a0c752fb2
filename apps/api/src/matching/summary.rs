//! Rationale Generator: one short, score-aware justification per top candidate.
//!
//! Calls run one at a time with at least `min_interval` between the end of one
//! call and the start of the next (the generation service rate-limits per
//! minute). A failed call never fails the run: it becomes a fallback summary.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};

use crate::llm_client::{CompletionParams, LlmClient, LlmError};
use crate::matching::prompts::{build_summary_prompt, SUMMARY_SYSTEM};
use crate::matching::ranker::ScoredCandidate;

const FALLBACK_PREFIX: &str = "Summary generation failed";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("generator returned an empty summary")]
    Empty,
}

/// Produces the rationale text for one candidate.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn summarize(
        &self,
        resume_text: &str,
        job_description: &str,
        similarity_score: f64,
    ) -> Result<String, SummaryError>;
}

/// Rationale generator backed by the shared `LlmClient`.
pub struct LlmSummaryGenerator {
    llm: LlmClient,
    params: CompletionParams,
}

impl LlmSummaryGenerator {
    pub fn new(llm: LlmClient, params: CompletionParams) -> Self {
        Self { llm, params }
    }
}

#[async_trait]
impl SummaryGenerator for LlmSummaryGenerator {
    async fn summarize(
        &self,
        resume_text: &str,
        job_description: &str,
        similarity_score: f64,
    ) -> Result<String, SummaryError> {
        let prompt = build_summary_prompt(job_description, resume_text, similarity_score);
        Ok(self
            .llm
            .call_text(&prompt, Some(SUMMARY_SYSTEM), self.params)
            .await?)
    }
}

/// Minimum spacing between consecutive generation calls.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_finished: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_finished: None,
        }
    }

    /// Waits until `min_interval` has passed since the previous call finished.
    pub async fn ready(&self) {
        if let Some(last) = self.last_finished {
            sleep_until(last + self.min_interval).await;
        }
    }

    pub fn record(&mut self) {
        self.last_finished = Some(Instant::now());
    }
}

/// The summary shown in place of a rationale when generation fails.
pub fn fallback_summary(reason: impl Display) -> String {
    format!("{FALLBACK_PREFIX}: {reason}")
}

/// Generates a summary for each candidate in ranked order, sequentially and throttled.
/// Always returns exactly one non-empty string per candidate.
pub async fn summarize_ranked(
    generator: &dyn SummaryGenerator,
    job_description: &str,
    candidates: &[ScoredCandidate],
    throttle: &mut Throttle,
) -> Vec<String> {
    let mut summaries = Vec::with_capacity(candidates.len());

    for (rank, candidate) in candidates.iter().enumerate() {
        throttle.ready().await;

        let outcome = generator
            .summarize(&candidate.record.text, job_description, candidate.score)
            .await
            .and_then(|text| {
                let text = text.trim();
                if text.is_empty() {
                    Err(SummaryError::Empty)
                } else {
                    Ok(text.to_string())
                }
            });

        throttle.record();

        let summary = match outcome {
            Ok(text) => {
                info!(
                    "Summary {}/{} generated for {}",
                    rank + 1,
                    candidates.len(),
                    candidate.record.display_name
                );
                text
            }
            Err(e) => {
                warn!(
                    "Summary generation failed for {}: {e}",
                    candidate.record.display_name
                );
                fallback_summary(e)
            }
        };
        summaries.push(summary);
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalizer::ResumeRecord;
    use std::sync::Mutex;

    /// Replays scripted outcomes and records when each call started.
    struct Scripted {
        outcomes: Mutex<Vec<Result<String, SummaryError>>>,
        started_at: Mutex<Vec<Instant>>,
    }

    impl Scripted {
        fn new(mut outcomes: Vec<Result<String, SummaryError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                started_at: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SummaryGenerator for Scripted {
        async fn summarize(
            &self,
            _resume_text: &str,
            _job_description: &str,
            _similarity_score: f64,
        ) -> Result<String, SummaryError> {
            self.started_at.lock().unwrap().push(Instant::now());
            tokio::time::sleep(Duration::from_millis(250)).await;
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("A solid fit.".to_string()))
        }
    }

    fn candidates(n: usize) -> Vec<ScoredCandidate> {
        (0..n)
            .map(|i| ScoredCandidate {
                record: ResumeRecord::new(format!("Person {i}\nRust"), i + 1),
                score: 0.9 - i as f64 * 0.1,
            })
            .collect()
    }

    fn auth_failure() -> SummaryError {
        SummaryError::Llm(LlmError::Api {
            status: 401,
            message: "invalid x-api-key".to_string(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_are_spaced_by_min_interval() {
        let generator = Scripted::new(vec![]);
        let mut throttle = Throttle::new(Duration::from_secs(1));

        let summaries =
            summarize_ranked(&generator, "Rust engineer", &candidates(3), &mut throttle).await;

        assert_eq!(summaries.len(), 3);
        let started = generator.started_at.lock().unwrap();
        assert_eq!(started.len(), 3);
        for pair in started.windows(2) {
            // 250ms call latency + 1s gap after the call completes
            assert!(pair[1] - pair[0] >= Duration::from_millis(1250));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_not_delayed() {
        let generator = Scripted::new(vec![]);
        let mut throttle = Throttle::new(Duration::from_secs(1));
        let before = Instant::now();

        summarize_ranked(&generator, "jd", &candidates(1), &mut throttle).await;

        let started = generator.started_at.lock().unwrap();
        assert_eq!(started[0], before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_becomes_fallback_and_run_continues() {
        let generator = Scripted::new(vec![
            Err(auth_failure()),
            Ok("  Strong backend experience.  ".to_string()),
        ]);
        let mut throttle = Throttle::new(Duration::from_secs(1));

        let summaries =
            summarize_ranked(&generator, "Rust engineer", &candidates(2), &mut throttle).await;

        assert_eq!(
            summaries[0],
            "Summary generation failed: API error (status 401): invalid x-api-key"
        );
        assert_eq!(summaries[1], "Strong backend experience.");
        // the failed call still counts for rate limiting
        let started = generator.started_at.lock().unwrap();
        assert!(started[1] - started[0] >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_generation_is_never_returned() {
        let generator = Scripted::new(vec![Ok("   ".to_string())]);
        let mut throttle = Throttle::new(Duration::ZERO);

        let summaries = summarize_ranked(&generator, "jd", &candidates(1), &mut throttle).await;

        assert_eq!(
            summaries,
            vec!["Summary generation failed: generator returned an empty summary".to_string()]
        );
    }

    #[tokio::test]
    async fn test_no_candidates_no_calls() {
        let generator = Scripted::new(vec![]);
        let mut throttle = Throttle::new(Duration::from_secs(1));
        let summaries = summarize_ranked(&generator, "jd", &[], &mut throttle).await;
        assert!(summaries.is_empty());
        assert!(generator.started_at.lock().unwrap().is_empty());
    }

    #[test]
    fn test_fallback_format() {
        assert_eq!(
            fallback_summary("timed out"),
            "Summary generation failed: timed out"
        );
    }
}
