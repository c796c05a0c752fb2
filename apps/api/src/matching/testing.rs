//! In-process stand-ins for the embedding model and the generation service.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::llm_client::LlmError;
use crate::matching::embedding::{EmbeddingError, EmbeddingProvider};
use crate::matching::summary::{SummaryError, SummaryGenerator};

const VOCABULARY: [&str; 5] = ["rust", "kubernetes", "python", "sql", "react"];

/// Bag-of-keywords vectors: deterministic, and similar texts score alike.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

impl EmbeddingProvider for KeywordEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                VOCABULARY
                    .iter()
                    .map(|term| lower.matches(term).count() as f32)
                    .collect()
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "keywords"
    }
}

pub struct BrokenEmbedder;

impl EmbeddingProvider for BrokenEmbedder {
    fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Model("onnx session closed".to_string()))
    }

    fn model_name(&self) -> &str {
        "broken"
    }
}

/// Fails for resumes whose text starts with `fail_prefix`, echoes the score otherwise.
pub struct EchoSummarizer {
    fail_prefix: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl EchoSummarizer {
    pub fn new() -> Self {
        Self {
            fail_prefix: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(prefix: &'static str) -> Self {
        Self {
            fail_prefix: Some(prefix),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SummaryGenerator for EchoSummarizer {
    async fn summarize(
        &self,
        resume_text: &str,
        _job_description: &str,
        similarity_score: f64,
    ) -> Result<String, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_prefix {
            Some(prefix) if resume_text.starts_with(prefix) => {
                Err(SummaryError::Llm(LlmError::Api {
                    status: 529,
                    message: "Overloaded".to_string(),
                }))
            }
            _ => Ok(format!("Fit at {similarity_score}.")),
        }
    }
}
