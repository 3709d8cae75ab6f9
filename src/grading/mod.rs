//! LLM relevance grading.
//!
//! This module provides the grading abstraction the pipeline uses twice:
//! - A gate that grades raw retrieval hits on a coarse scale and drops
//!   candidates below a threshold
//! - A final scorer that grades surviving candidates on the output scale
//!
//! Both stages degrade instead of failing: a candidate the grader cannot
//! grade is dropped at the gate and scored 0.00 at the end.

pub mod filter;
pub mod grader;
pub mod openai;
pub mod scorer;

pub use filter::RelevanceFilter;
pub use grader::{GradeScale, Grader, candidate_text, parse_grade};
pub use openai::{OpenAiGrader, OpenAiGraderConfig};
pub use scorer::FinalScorer;
