//! Similarity Ranker: cosine similarity of the job description against every resume.

use thiserror::Error;

use crate::matching::normalizer::ResumeRecord;

#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("candidate {index} has {actual} dimensions, query has {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("candidate {index} has a non-finite similarity score")]
    NonFiniteScore { index: usize },
}

/// A candidate's position in the normalized resume list and its rounded score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedIndex {
    pub index: usize,
    pub score: f64,
}

/// A resume paired with its rounded similarity to the job description.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub record: ResumeRecord,
    pub score: f64,
}

/// Resolves ranked indices back to their resume records, keeping ranked order.
pub fn scored_candidates(records: &[ResumeRecord], ranked: &[RankedIndex]) -> Vec<ScoredCandidate> {
    ranked
        .iter()
        .filter_map(|r| {
            records.get(r.index).map(|record| ScoredCandidate {
                record: record.clone(),
                score: r.score,
            })
        })
        .collect()
}

/// Cosine similarity in `[-1, 1]`. A zero vector on either side scores 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}

/// Rounds a score to the three decimals shown to users. Negative zero becomes zero.
pub fn round_score(score: f64) -> f64 {
    let rounded = (score * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Renders a rounded score for labels and prompts: whole numbers keep one
/// decimal (`1.0`), everything else prints its shortest form (`0.812`).
pub fn display_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        score.to_string()
    }
}

/// Scores every candidate against `query` and returns the best `top_k`,
/// highest first. Equal rounded scores keep their original order.
pub fn rank(
    query: &[f32],
    candidates: &[Vec<f32>],
    top_k: usize,
) -> Result<Vec<RankedIndex>, RankError> {
    if let Some((index, c)) = candidates
        .iter()
        .enumerate()
        .find(|(_, c)| c.len() != query.len())
    {
        return Err(RankError::DimensionMismatch {
            index,
            expected: query.len(),
            actual: c.len(),
        });
    }

    let mut ranked = candidates
        .iter()
        .enumerate()
        .map(|(index, c)| {
            let score = cosine_similarity(query, c);
            if !score.is_finite() {
                return Err(RankError::NonFiniteScore { index });
            }
            Ok(RankedIndex {
                index,
                score: round_score(score),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // sort_by is stable: ties stay in insertion order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_k.min(candidates.len()));

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_is_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_is_minus_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_round_score_three_decimals() {
        assert_eq!(round_score(0.81249), 0.812);
        assert_eq!(round_score(0.8125001), 0.813);
        assert_eq!(round_score(-0.0004), 0.0);
        assert!(round_score(-0.0004).is_sign_positive());
    }

    #[test]
    fn test_display_score_keeps_one_decimal_for_whole_numbers() {
        assert_eq!(display_score(1.0), "1.0");
        assert_eq!(display_score(round_score(-0.0001)), "0.0");
        assert_eq!(display_score(0.812), "0.812");
        assert_eq!(display_score(-0.25), "-0.25");
    }

    #[test]
    fn test_rank_rejects_nan_embedding() {
        let query = [1.0, 0.0];
        let candidates = vec![vec![1.0, 0.0], vec![f32::NAN, 0.5], vec![0.5, 0.5]];
        let err = rank(&query, &candidates, 10).unwrap_err();
        assert_eq!(err, RankError::NonFiniteScore { index: 1 });
    }

    #[test]
    fn test_rank_descending() {
        let query = [1.0, 0.0];
        let candidates = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        let ranked = rank(&query, &candidates, 10).unwrap();

        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].score, 0.707);
        assert_eq!(ranked[2].score, 0.0);
    }

    #[test]
    fn test_rank_ties_keep_insertion_order() {
        let query = [1.0, 0.0];
        let candidates = vec![
            vec![0.0, 1.0],
            vec![2.0, 0.0],
            vec![0.0, 3.0],
            vec![5.0, 0.0],
        ];
        let ranked = rank(&query, &candidates, 10).unwrap();

        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_rank_ties_on_rounded_score() {
        // 0.80004 and 0.80001 both display as 0.8; the earlier candidate wins.
        let query = [1.0, 0.0];
        let a = 0.80001_f32;
        let b = 0.80004_f32;
        let candidates = vec![
            vec![a, (1.0 - a * a).sqrt()],
            vec![b, (1.0 - b * b).sqrt()],
        ];
        let ranked = rank(&query, &candidates, 10).unwrap();
        assert_eq!(ranked[0].index, 0);
        assert_eq!(ranked[0].score, ranked[1].score);
    }

    #[test]
    fn test_rank_truncates_to_top_k() {
        let query = [1.0, 0.0];
        let candidates: Vec<Vec<f32>> = (0..15).map(|i| vec![1.0, i as f32]).collect();
        let ranked = rank(&query, &candidates, 10).unwrap();
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].index, 0);
    }

    #[test]
    fn test_rank_fewer_than_top_k() {
        let ranked = rank(&[1.0], &[vec![1.0], vec![-1.0]], 10).unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_rank_empty_candidates() {
        assert!(rank(&[1.0, 0.0], &[], 10).unwrap().is_empty());
    }

    #[test]
    fn test_scored_candidates_follow_ranked_order() {
        let records = vec![
            ResumeRecord::new("Alice".to_string(), 1),
            ResumeRecord::new("Bob".to_string(), 2),
        ];
        let ranked = vec![
            RankedIndex { index: 1, score: 0.9 },
            RankedIndex { index: 0, score: 0.4 },
        ];
        let scored = scored_candidates(&records, &ranked);
        assert_eq!(scored[0].record.display_name, "Bob");
        assert_eq!(scored[0].score, 0.9);
        assert_eq!(scored[1].record.display_name, "Alice");
    }

    #[test]
    fn test_rank_dimension_mismatch() {
        let err = rank(&[1.0, 0.0], &[vec![1.0, 0.0], vec![1.0]], 10).unwrap_err();
        assert_eq!(
            err,
            RankError::DimensionMismatch {
                index: 1,
                expected: 2,
                actual: 1
            }
        );
    }
}
