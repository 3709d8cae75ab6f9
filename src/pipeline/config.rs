//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::dedup::DEFAULT_DEDUP_THRESHOLD;
use crate::error::{Result, SanadError};
use crate::fusion::DEFAULT_RRF_K;
use crate::grading::GradeScale;
use crate::lexical::LexicalParams;

/// Configuration for the retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// How many candidates each retrieval branch fetches.
    pub retrieval_depth: usize,

    /// Scale the relevance gate grades on.
    pub relevance_scale: GradeScale,

    /// Minimum gate grade a candidate needs to survive.
    pub relevance_threshold: u32,

    /// Scale the final scorer grades on.
    pub final_scale: GradeScale,

    /// Dampening constant for reciprocal-rank fusion.
    pub rrf_k: usize,

    /// Cosine similarity above which fused candidates are duplicates.
    pub dedup_threshold: f32,

    /// How many results the pipeline returns.
    pub final_k: usize,

    /// Bound on concurrent grading calls. One reproduces the sequential
    /// baseline; higher values trade API pressure for latency.
    pub grading_concurrency: usize,

    /// BM25 parameters for the lexical index.
    pub lexical: LexicalParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            retrieval_depth: 15,
            relevance_scale: GradeScale::new(1, 10),
            relevance_threshold: 7,
            final_scale: GradeScale::new(1, 5),
            rrf_k: DEFAULT_RRF_K,
            dedup_threshold: DEFAULT_DEDUP_THRESHOLD,
            final_k: 5,
            grading_concurrency: 1,
            lexical: LexicalParams::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration.
    ///
    /// Configuration errors are the one class of failure that should
    /// abort startup instead of degrading at query time.
    pub fn validate(&self) -> Result<()> {
        if self.relevance_scale.min > self.relevance_scale.max {
            return Err(SanadError::invalid_config("relevance scale is inverted"));
        }
        if self.final_scale.min > self.final_scale.max {
            return Err(SanadError::invalid_config("final scale is inverted"));
        }
        if !self.relevance_scale.contains(self.relevance_threshold) {
            return Err(SanadError::invalid_config(format!(
                "relevance threshold {} outside scale {}",
                self.relevance_threshold, self.relevance_scale
            )));
        }
        if !self.dedup_threshold.is_finite()
            || self.dedup_threshold <= 0.0
            || self.dedup_threshold > 1.0
        {
            return Err(SanadError::invalid_config(format!(
                "dedup threshold {} not in (0, 1]",
                self.dedup_threshold
            )));
        }
        if self.retrieval_depth == 0 {
            return Err(SanadError::invalid_config("retrieval depth must be positive"));
        }
        if self.final_k == 0 {
            return Err(SanadError::invalid_config("final k must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.retrieval_depth, 15);
        assert_eq!(config.relevance_scale, GradeScale::new(1, 10));
        assert_eq!(config.relevance_threshold, 7);
        assert_eq!(config.final_scale, GradeScale::new(1, 5));
        assert_eq!(config.rrf_k, 60);
        assert_eq!(config.dedup_threshold, 0.95);
        assert_eq!(config.final_k, 5);
        assert_eq!(config.grading_concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_threshold_outside_scale() {
        let config = PipelineConfig {
            relevance_threshold: 11,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_inverted_scale() {
        let config = PipelineConfig {
            final_scale: GradeScale::new(5, 1),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_dedup_threshold_range() {
        for bad in [0.0, -0.5, 1.5, f32::NAN] {
            let config = PipelineConfig {
                dedup_threshold: bad,
                ..PipelineConfig::default()
            };
            assert!(config.validate().is_err(), "threshold {bad} should fail");
        }
    }

    #[test]
    fn test_validate_zero_depth_and_k() {
        let config = PipelineConfig {
            retrieval_depth: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            final_k: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.retrieval_depth, config.retrieval_depth);
        assert_eq!(back.relevance_scale, config.relevance_scale);
        assert_eq!(back.dedup_threshold, config.dedup_threshold);
    }
}
