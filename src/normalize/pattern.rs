//! Pattern-based narrator extraction.

use async_trait::async_trait;
use regex::Regex;

use crate::error::{Result, SanadError};
use crate::normalize::{ContentNormalizer, NormalizedQuery};

/// Introducer phrases a hadith chain commonly starts with. Tried in
/// order; the first match wins, so the more specific phrasings come
/// before the bare "From X that Y" form they would otherwise lose to.
const CHAIN_PATTERNS: [&str; 4] = [
    r"(?i)It was narrated from (.+?) that (.+)",
    r"(?i)(.+?) narrated that (.+)",
    r"(?i)On the authority of (.+?) that (.+)",
    r"(?i)From (.+?) that (.+)",
];

/// Splits narrator chains into individual names against common English
/// hadith phrasings.
///
/// This is the offline normalizer: no network calls, deterministic, and
/// strictly best-effort. Text with no recognizable chain passes through
/// with an empty narrator list.
pub struct PatternNormalizer {
    patterns: Vec<Regex>,
    chain_separator: Regex,
}

impl PatternNormalizer {
    pub fn new() -> Result<Self> {
        let patterns = CHAIN_PATTERNS
            .iter()
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| SanadError::invalid_operation(format!("invalid pattern: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let chain_separator = Regex::new(r",\s*from\s*|,\s*|\s*from\s*")
            .map_err(|e| SanadError::invalid_operation(format!("invalid pattern: {e}")))?;

        Ok(PatternNormalizer {
            patterns,
            chain_separator,
        })
    }

    /// Split a matched chain into cleaned narrator names.
    fn split_chain(&self, chain: &str) -> Vec<String> {
        self.chain_separator
            .split(chain)
            .map(|part| part.trim_matches(|c| c == ' ' || c == '"' || c == ','))
            .filter(|part| part.chars().count() > 1)
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl ContentNormalizer for PatternNormalizer {
    async fn normalize(&self, raw_text: &str) -> Result<NormalizedQuery> {
        for pattern in &self.patterns {
            if let Some(captures) = pattern.captures(raw_text) {
                let chain = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                let content = captures.get(2).map(|m| m.as_str()).unwrap_or("");
                return Ok(NormalizedQuery {
                    content: content.trim().to_string(),
                    narrators: self.split_chain(chain),
                });
            }
        }

        Ok(NormalizedQuery {
            content: raw_text.to_string(),
            narrators: Vec::new(),
        })
    }

    fn name(&self) -> &str {
        "pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> PatternNormalizer {
        PatternNormalizer::new().unwrap()
    }

    #[tokio::test]
    async fn test_narrated_from_pattern() {
        let result = normalizer()
            .normalize("It was narrated from Abu Hurairah that the Prophet urged mercy.")
            .await
            .unwrap();
        assert_eq!(result.narrators, vec!["Abu Hurairah"]);
        assert_eq!(result.content, "the Prophet urged mercy.");
    }

    #[tokio::test]
    async fn test_chain_splitting() {
        let result = normalizer()
            .normalize("It was narrated from Abu Hurairah, from Ibn Abbas that charity purifies wealth.")
            .await
            .unwrap();
        assert_eq!(result.narrators, vec!["Abu Hurairah", "Ibn Abbas"]);
        assert_eq!(result.content, "charity purifies wealth.");
    }

    #[tokio::test]
    async fn test_narrated_that_pattern() {
        let result = normalizer()
            .normalize("Aisha narrated that the Prophet prayed at night.")
            .await
            .unwrap();
        assert_eq!(result.narrators, vec!["Aisha"]);
        assert_eq!(result.content, "the Prophet prayed at night.");
    }

    #[tokio::test]
    async fn test_authority_pattern() {
        let result = normalizer()
            .normalize("On the authority of Umar that deeds are judged by intentions.")
            .await
            .unwrap();
        assert_eq!(result.narrators, vec!["Umar"]);
        assert_eq!(result.content, "deeds are judged by intentions.");
    }

    #[tokio::test]
    async fn test_from_pattern() {
        let result = normalizer()
            .normalize("From Anas that the Prophet smiled.")
            .await
            .unwrap();
        assert_eq!(result.narrators, vec!["Anas"]);
        assert_eq!(result.content, "the Prophet smiled.");
    }

    #[tokio::test]
    async fn test_case_insensitive() {
        let result = normalizer()
            .normalize("it was narrated from Jabir that patience is light.")
            .await
            .unwrap();
        assert_eq!(result.narrators, vec!["Jabir"]);
    }

    #[tokio::test]
    async fn test_no_pattern_passes_through() {
        let text = "A sentence with no chain at all.";
        let result = normalizer().normalize(text).await.unwrap();
        assert!(result.narrators.is_empty());
        assert_eq!(result.content, text);
    }

    #[tokio::test]
    async fn test_short_chain_parts_dropped() {
        let result = normalizer()
            .normalize("It was narrated from A, Abu Bakr that honesty saves.")
            .await
            .unwrap();
        assert_eq!(result.narrators, vec!["Abu Bakr"]);
    }
}
