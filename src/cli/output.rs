//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{OutputFormat, SanadArgs};
use crate::error::Result;
use crate::pipeline::ScoredResult;

/// Result structure for full pipeline searches.
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    /// The query text the pipeline actually ran with.
    pub query: String,
    /// Narrators stripped from the raw text, when extraction ran.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub narrators: Vec<String>,
    pub results: Vec<ScoredResult>,
    pub duration_ms: u64,
}

/// One lexical hit resolved to its verse record.
#[derive(Debug, Serialize)]
pub struct KeywordHit {
    pub score: f32,
    pub surah_name: String,
    pub aya_number: u32,
    pub translation: String,
}

/// Result structure for lexical-only searches.
#[derive(Debug, Serialize)]
pub struct KeywordSearchOutput {
    pub query: String,
    pub mode: &'static str,
    pub hits: Vec<KeywordHit>,
    /// Hits whose text had no verse record; dropped, reported for
    /// corpus/metadata drift diagnosis.
    pub unmapped: usize,
    pub duration_ms: u64,
}

/// Result structure for the stats command.
#[derive(Debug, Serialize)]
pub struct StatsOutput {
    /// Documents in the lexical index.
    pub corpus_documents: usize,
    /// Verse records in the metadata store.
    pub verse_records: usize,
    /// Distinct terms in the lexical vocabulary.
    pub vocabulary_size: usize,
    /// Average corpus document length in tokens.
    pub avg_doc_length: f32,
}

/// Human-readable rendering for a command result.
pub trait HumanDisplay {
    fn render_human(&self, verbosity: u8) -> String;
}

impl HumanDisplay for SearchOutput {
    fn render_human(&self, verbosity: u8) -> String {
        let mut out = String::new();
        if verbosity > 1 {
            out.push_str(&format!("Query: {}\n", self.query));
            if !self.narrators.is_empty() {
                out.push_str(&format!("Narrators: {}\n", self.narrators.join(", ")));
            }
            out.push('\n');
        }
        if self.results.is_empty() {
            out.push_str("No related verses found.\n");
        } else {
            for (index, result) in self.results.iter().enumerate() {
                out.push_str(&format!(
                    "{}. [{:.2}] {} {} — {}\n",
                    index + 1,
                    result.final_score,
                    result.verse.surah_name,
                    result.verse.aya_number,
                    result.verse.translation_text
                ));
            }
        }
        if verbosity > 0 {
            out.push_str(&format!(
                "\n{} result(s) in {} ms\n",
                self.results.len(),
                self.duration_ms
            ));
        }
        out
    }
}

impl HumanDisplay for KeywordSearchOutput {
    fn render_human(&self, verbosity: u8) -> String {
        let mut out = String::new();
        if verbosity > 1 {
            out.push_str(&format!("Query: {} ({} mode)\n\n", self.query, self.mode));
        }
        if self.hits.is_empty() {
            out.push_str("No matching verses found.\n");
        } else {
            for (index, hit) in self.hits.iter().enumerate() {
                out.push_str(&format!(
                    "{}. [{:.4}] {} {} — {}\n",
                    index + 1,
                    hit.score,
                    hit.surah_name,
                    hit.aya_number,
                    hit.translation
                ));
            }
        }
        if verbosity > 0 {
            out.push_str(&format!(
                "\n{} hit(s) ({} unmapped) in {} ms\n",
                self.hits.len(),
                self.unmapped,
                self.duration_ms
            ));
        }
        out
    }
}

impl HumanDisplay for StatsOutput {
    fn render_human(&self, _verbosity: u8) -> String {
        format!(
            "Corpus documents:   {}\n\
             Verse records:      {}\n\
             Vocabulary size:    {}\n\
             Avg. doc length:    {:.2} tokens\n",
            self.corpus_documents,
            self.verse_records,
            self.vocabulary_size,
            self.avg_doc_length
        )
    }
}

/// Output a result in the format the CLI was invoked with.
pub fn output_result<T: Serialize + HumanDisplay>(result: &T, args: &SanadArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", result.render_human(args.verbosity()));
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            println!("{json}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Verse;

    fn search_output() -> SearchOutput {
        SearchOutput {
            query: "mercy".to_string(),
            narrators: vec![],
            results: vec![ScoredResult {
                verse: Verse::new("Al-Fatihah", 1, "In the name of Allah."),
                final_score: 4.0,
            }],
            duration_ms: 12,
        }
    }

    #[test]
    fn test_search_output_human_lists_results() {
        let rendered = search_output().render_human(1);
        assert!(rendered.contains("[4.00] Al-Fatihah 1"));
        assert!(rendered.contains("1 result(s)"));
    }

    #[test]
    fn test_search_output_quiet_omits_summary() {
        let rendered = search_output().render_human(0);
        assert!(rendered.contains("Al-Fatihah"));
        assert!(!rendered.contains("result(s)"));
    }

    #[test]
    fn test_search_output_json_shape() {
        let json = serde_json::to_value(search_output()).unwrap();
        assert_eq!(json["query"], "mercy");
        assert_eq!(json["results"][0]["final_score"], 4.0);
        assert_eq!(json["results"][0]["surah_name_english"], "Al-Fatihah");
        // Empty narrator list stays out of the payload.
        assert!(json.get("narrators").is_none());
    }

    #[test]
    fn test_empty_results_message() {
        let output = SearchOutput {
            query: "x".to_string(),
            narrators: vec![],
            results: vec![],
            duration_ms: 1,
        };
        assert!(output.render_human(1).contains("No related verses found."));
    }
}
