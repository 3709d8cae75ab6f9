//! Final relevance scoring of fused candidates.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::grading::grader::{GradeScale, Grader, candidate_text};
use crate::pipeline::types::{FusedCandidate, ScoredResult};

/// Grades each surviving candidate on the final scale.
///
/// Every candidate produces exactly one result: an unobtainable or
/// out-of-scale grade becomes 0.00 instead of dropping the verse, so a
/// grading outage at this stage degrades scores rather than results.
pub struct FinalScorer {
    grader: Arc<dyn Grader>,
    scale: GradeScale,
    concurrency: usize,
}

impl FinalScorer {
    /// Create a new scorer. Zero `concurrency` is treated as one.
    pub fn new(grader: Arc<dyn Grader>, scale: GradeScale, concurrency: usize) -> Self {
        FinalScorer {
            grader,
            scale,
            concurrency: concurrency.max(1),
        }
    }

    /// Score all candidates, preserving input order.
    pub async fn score(
        &self,
        candidates: Vec<FusedCandidate>,
        reference_text: &str,
    ) -> Vec<ScoredResult> {
        stream::iter(candidates)
            .map(|candidate| self.score_one(candidate, reference_text))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn score_one(&self, candidate: FusedCandidate, reference_text: &str) -> ScoredResult {
        let text = candidate_text(&candidate.verse);
        let final_score = match self.grader.grade(reference_text, &text, self.scale).await {
            Ok(grade) if self.scale.contains(grade) => round_two(grade as f32),
            Ok(grade) => {
                tracing::debug!(
                    "grade {grade} for {} outside scale {}, scoring 0.00",
                    candidate.verse.key(),
                    self.scale
                );
                0.0
            }
            Err(e) => {
                tracing::debug!("scoring {} failed ({e}), scoring 0.00", candidate.verse.key());
                0.0
            }
        };

        ScoredResult {
            verse: candidate.verse,
            final_score,
        }
    }
}

/// Round to two decimal places.
fn round_two(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::corpus::Verse;
    use crate::error::{Result, SanadError};

    struct ScriptedGrader {
        rules: Vec<(&'static str, u32)>,
    }

    #[async_trait]
    impl Grader for ScriptedGrader {
        async fn grade(
            &self,
            _reference_text: &str,
            candidate_text: &str,
            _scale: GradeScale,
        ) -> Result<u32> {
            for (needle, grade) in &self.rules {
                if candidate_text.contains(needle) {
                    return Ok(*grade);
                }
            }
            Err(SanadError::grading("unscripted candidate"))
        }
    }

    fn candidate(surah: &str, aya: u32, text: &str) -> FusedCandidate {
        FusedCandidate {
            verse: Verse::new(surah, aya, text),
            fused_score: 0.03,
        }
    }

    #[tokio::test]
    async fn test_score_in_scale() {
        let grader = Arc::new(ScriptedGrader {
            rules: vec![("mercy", 4), ("patience", 1)],
        });
        let scorer = FinalScorer::new(grader, GradeScale::new(1, 5), 1);

        let results = scorer
            .score(
                vec![
                    candidate("A", 1, "mercy endures"),
                    candidate("A", 2, "patience rewarded"),
                ],
                "reference",
            )
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].final_score, 4.0);
        assert_eq!(results[1].final_score, 1.0);
    }

    #[tokio::test]
    async fn test_score_failure_becomes_zero() {
        let grader = Arc::new(ScriptedGrader { rules: vec![] });
        let scorer = FinalScorer::new(grader, GradeScale::new(1, 5), 1);

        let results = scorer
            .score(vec![candidate("A", 1, "anything")], "reference")
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].final_score, 0.0);
    }

    #[tokio::test]
    async fn test_score_out_of_scale_becomes_zero() {
        let grader = Arc::new(ScriptedGrader {
            rules: vec![("mercy", 9)],
        });
        let scorer = FinalScorer::new(grader, GradeScale::new(1, 5), 1);

        let results = scorer
            .score(vec![candidate("A", 1, "mercy endures")], "reference")
            .await;

        assert_eq!(results[0].final_score, 0.0);
    }

    #[tokio::test]
    async fn test_score_preserves_order_and_count() {
        let grader = Arc::new(ScriptedGrader {
            rules: vec![("first", 5), ("third", 3)],
        });
        let scorer = FinalScorer::new(grader, GradeScale::new(1, 5), 3);

        let results = scorer
            .score(
                vec![
                    candidate("A", 1, "first verse"),
                    candidate("A", 2, "second verse"),
                    candidate("A", 3, "third verse"),
                ],
                "reference",
            )
            .await;

        let scores: Vec<f32> = results.iter().map(|r| r.final_score).collect();
        assert_eq!(scores, vec![5.0, 0.0, 3.0]);
    }

    #[test]
    fn test_round_two() {
        assert_eq!(round_two(4.0), 4.0);
        assert_eq!(round_two(3.14159), 3.14);
        assert_eq!(round_two(2.675), 2.68);
    }
}
