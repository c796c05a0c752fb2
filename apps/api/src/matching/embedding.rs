//! Embedding Provider: maps text to fixed-length vectors with a local sentence-embedding model.
//!
//! The production backend is fastembed's `all-MiniLM-L6-v2` (384 dims), loaded
//! once per process and shared read-only between runs. Inference is blocking:
//! callers on the async runtime go through `spawn_blocking`.

use std::path::PathBuf;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;
use tracing::info;

/// Identifier of the sentence-embedding model used for every run.
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";
pub const MODEL_DIMENSIONS: usize = 384;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model failed: {0}")]
    Model(String),

    #[error("expected {expected} embeddings, model returned {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding {index} has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("embedding task aborted: {0}")]
    Aborted(String),
}

/// Anything that can turn a batch of strings into vectors, deterministically and in order.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn model_name(&self) -> &str;
}

/// fastembed-backed provider.
pub struct FastEmbedProvider {
    model: Mutex<TextEmbedding>,
}

impl FastEmbedProvider {
    /// Loads (downloading on first use) the embedding model. Blocking.
    pub fn load(cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::Model(format!("could not load {MODEL_NAME}: {e}")))?;
        info!("Embedding model loaded: {MODEL_NAME} ({MODEL_DIMENSIONS} dims)");

        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| EmbeddingError::Model("model lock poisoned".to_string()))?;
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::Model(e.to_string()))
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}

/// Embeds `texts` and checks the provider kept its contract: one vector per
/// input, all of the same non-zero dimension.
pub fn embed_checked(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let vectors = provider.embed(texts)?;

    if vectors.len() != texts.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }

    if let Some(first) = vectors.first() {
        let expected = first.len();
        if expected == 0 {
            return Err(EmbeddingError::DimensionMismatch {
                index: 0,
                expected: MODEL_DIMENSIONS,
                actual: 0,
            });
        }
        if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != expected) {
            return Err(EmbeddingError::DimensionMismatch {
                index,
                expected,
                actual: v.len(),
            });
        }
    }

    Ok(vectors)
}
