//! Relevance gate over retrieval hits.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::grading::grader::{GradeScale, Grader, candidate_text};
use crate::pipeline::types::RetrievalHit;

/// Grades every retrieval hit against the reference text and keeps only
/// those at or above the threshold.
///
/// Grading failures drop the candidate rather than failing the query;
/// a flaky grading backend should narrow results, not abort retrieval.
/// The relative order of surviving hits is preserved.
pub struct RelevanceFilter {
    grader: Arc<dyn Grader>,
    scale: GradeScale,
    threshold: u32,
    concurrency: usize,
}

impl RelevanceFilter {
    /// Create a new gate.
    ///
    /// `concurrency` bounds how many grading calls run at once; zero is
    /// treated as one.
    pub fn new(
        grader: Arc<dyn Grader>,
        scale: GradeScale,
        threshold: u32,
        concurrency: usize,
    ) -> Self {
        RelevanceFilter {
            grader,
            scale,
            threshold,
            concurrency: concurrency.max(1),
        }
    }

    /// Filter hits down to those grading at or above the threshold.
    pub async fn filter(
        &self,
        hits: Vec<RetrievalHit>,
        reference_text: &str,
    ) -> Vec<RetrievalHit> {
        let total = hits.len();
        let kept: Vec<RetrievalHit> = stream::iter(hits)
            .map(|hit| self.grade_one(hit, reference_text))
            .buffered(self.concurrency)
            .filter_map(|kept| async move { kept })
            .collect()
            .await;

        tracing::debug!("relevance gate kept {}/{} candidates", kept.len(), total);
        kept
    }

    async fn grade_one(&self, hit: RetrievalHit, reference_text: &str) -> Option<RetrievalHit> {
        let candidate = candidate_text(&hit.verse);
        match self
            .grader
            .grade(reference_text, &candidate, self.scale)
            .await
        {
            Ok(grade) if grade >= self.threshold => Some(hit),
            Ok(grade) => {
                tracing::debug!(
                    "dropping {} (grade {grade} below threshold {})",
                    hit.verse.key(),
                    self.threshold
                );
                None
            }
            Err(e) => {
                tracing::debug!("dropping {} (grading failed: {e})", hit.verse.key());
                None
            }
        }
    }
}
