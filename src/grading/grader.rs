//! LLM grading trait and grade parsing.

use std::fmt;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::corpus::Verse;
use crate::error::Result;

/// Inclusive numeric scale a grading call is asked to answer on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeScale {
    /// Lowest grade on the scale.
    pub min: u32,
    /// Highest grade on the scale.
    pub max: u32,
}

impl GradeScale {
    pub const fn new(min: u32, max: u32) -> Self {
        GradeScale { min, max }
    }

    /// Check whether a grade falls on this scale.
    pub fn contains(&self, grade: u32) -> bool {
        grade >= self.min && grade <= self.max
    }
}

impl fmt::Display for GradeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Trait for services that grade how closely a candidate verse relates
/// to a reference text.
///
/// A grade is the first integer parsed out of the model response; range
/// enforcement is left to the caller, since the gate and the final
/// scorer treat out-of-scale answers differently.
#[async_trait]
pub trait Grader: Send + Sync {
    /// Grade the candidate against the reference on the given scale.
    async fn grade(&self, reference_text: &str, candidate_text: &str, scale: GradeScale)
    -> Result<u32>;

    /// Get the name/identifier of this grader.
    fn name(&self) -> &str {
        "unknown"
    }
}

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// Extract the first integer from a model response.
///
/// Models are prompted to answer `Score: <number>` but frequently add
/// prose around it; the first integer anywhere in the response is taken
/// as the grade. Returns `None` when the response contains no integer
/// or the integer overflows.
pub fn parse_grade(response: &str) -> Option<u32> {
    FIRST_INTEGER
        .find(response)
        .and_then(|m| m.as_str().parse().ok())
}

/// Render a verse the way grading prompts present candidates.
pub fn candidate_text(verse: &Verse) -> String {
    format!(
        "{} (Surah: {}, Ayah: {})",
        verse.translation_text, verse.surah_name, verse.aya_number
    )
}
