//! Verse metadata records and identity-keyed lookup.

use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SanadError};

/// A single Quranic verse with its translation and identifying metadata.
///
/// The serde field names match the metadata JSON produced by the corpus
/// preparation tooling, so a metadata file can be deserialized directly
/// into `Vec<Verse>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    /// English name of the surah containing this verse.
    #[serde(rename = "surah_name_english")]
    pub surah_name: String,

    /// Verse number within the surah.
    pub aya_number: u32,

    /// English translation of the verse. This is the text that is
    /// indexed, embedded, and shown to the grading model.
    #[serde(rename = "english_translation")]
    pub translation_text: String,

    /// Arabic text with diacritics, when available.
    #[serde(
        rename = "arabic_diacritics",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub diacritics_text: Option<String>,
}

impl Verse {
    /// Create a new verse record.
    pub fn new(
        surah_name: impl Into<String>,
        aya_number: u32,
        translation_text: impl Into<String>,
    ) -> Self {
        Verse {
            surah_name: surah_name.into(),
            aya_number,
            translation_text: translation_text.into(),
            diacritics_text: None,
        }
    }

    /// Attach the Arabic text with diacritics.
    pub fn with_diacritics(mut self, diacritics: impl Into<String>) -> Self {
        self.diacritics_text = Some(diacritics.into());
        self
    }

    /// The identity key of this verse.
    pub fn key(&self) -> VerseKey {
        VerseKey {
            surah_name: self.surah_name.clone(),
            aya_number: self.aya_number,
        }
    }
}

/// Identity of a verse: surah name plus verse number.
///
/// Translation text is not part of the identity because the same English
/// rendering can appear for more than one verse (repeated refrains).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseKey {
    pub surah_name: String,
    pub aya_number: u32,
}

impl VerseKey {
    pub fn new(surah_name: impl Into<String>, aya_number: u32) -> Self {
        VerseKey {
            surah_name: surah_name.into(),
            aya_number,
        }
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah_name, self.aya_number)
    }
}

/// Normalize text for corpus-line-to-verse matching.
///
/// Trims, lowercases, and strips ASCII punctuation. Corpus lines and
/// metadata translations go through the same normalization, so small
/// formatting differences between the two files do not break the mapping.
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// In-memory store of verse records with lookup by normalized translation
/// text and by verse identity.
#[derive(Debug, Clone)]
pub struct VerseStore {
    verses: Vec<Verse>,
    by_text: AHashMap<String, usize>,
    by_key: AHashMap<VerseKey, usize>,
}

impl VerseStore {
    /// Build a store from verse records.
    ///
    /// Duplicate identity keys are a metadata defect and fail the load.
    /// Duplicate normalized translations are legitimate (repeated refrains);
    /// the later record wins the text lookup.
    pub fn from_verses(verses: Vec<Verse>) -> Result<Self> {
        let mut by_text = AHashMap::with_capacity(verses.len());
        let mut by_key = AHashMap::with_capacity(verses.len());

        for (idx, verse) in verses.iter().enumerate() {
            let key = verse.key();
            if by_key.insert(key.clone(), idx).is_some() {
                return Err(SanadError::corpus(format!(
                    "duplicate verse key in metadata: {key}"
                )));
            }
            by_text.insert(normalize_text(&verse.translation_text), idx);
        }

        Ok(VerseStore {
            verses,
            by_text,
            by_key,
        })
    }

    /// Load verse records from a JSON metadata file (an array of verses).
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        let mut verses: Vec<Verse> = serde_json::from_reader(reader)?;

        // Some metadata files carry the diacritics field as an empty string.
        for verse in &mut verses {
            if verse
                .diacritics_text
                .as_ref()
                .is_some_and(|d| d.trim().is_empty())
            {
                verse.diacritics_text = None;
            }
        }

        tracing::debug!(
            "loaded {} verse records from {}",
            verses.len(),
            path.as_ref().display()
        );
        Self::from_verses(verses)
    }

    /// Look up a verse by its translation text, normalized on both sides.
    pub fn find_by_text(&self, text: &str) -> Option<&Verse> {
        self.by_text
            .get(&normalize_text(text))
            .map(|&idx| &self.verses[idx])
    }

    /// Look up a verse by its identity key.
    pub fn find_by_key(&self, key: &VerseKey) -> Option<&Verse> {
        self.by_key.get(key).map(|&idx| &self.verses[idx])
    }

    /// Number of verse records in the store.
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Iterate over all verse records.
    pub fn iter(&self) -> impl Iterator<Item = &Verse> {
        self.verses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_verses() -> Vec<Verse> {
        vec![
            Verse::new("Al-Fatihah", 1, "In the name of Allah, the Merciful."),
            Verse::new("Al-Fatihah", 2, "All praise is due to Allah."),
            Verse::new("Ar-Rahman", 13, "Which of the favors of your Lord would you deny?"),
        ]
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text("  In the name of Allah, the Merciful. "),
            "in the name of allah the merciful"
        );
        assert_eq!(normalize_text("no-change"), "nochange");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_verse_deserializes_original_field_names() {
        let json = r#"{
            "surah_name_english": "Al-Baqarah",
            "aya_number": 255,
            "english_translation": "Allah - there is no deity except Him.",
            "arabic_diacritics": "text"
        }"#;
        let verse: Verse = serde_json::from_str(json).unwrap();
        assert_eq!(verse.surah_name, "Al-Baqarah");
        assert_eq!(verse.aya_number, 255);
        assert_eq!(verse.diacritics_text.as_deref(), Some("text"));
    }

    #[test]
    fn test_verse_missing_diacritics_is_none() {
        let json = r#"{
            "surah_name_english": "Al-Ikhlas",
            "aya_number": 1,
            "english_translation": "Say, He is Allah, the One."
        }"#;
        let verse: Verse = serde_json::from_str(json).unwrap();
        assert!(verse.diacritics_text.is_none());
    }

    #[test]
    fn test_find_by_text_normalizes_both_sides() {
        let store = VerseStore::from_verses(sample_verses()).unwrap();
        let found = store
            .find_by_text("in the name of allah the merciful")
            .unwrap();
        assert_eq!(found.aya_number, 1);

        // Punctuation and case differences do not break the lookup.
        let found = store
            .find_by_text("IN THE NAME OF ALLAH, THE MERCIFUL.")
            .unwrap();
        assert_eq!(found.surah_name, "Al-Fatihah");
    }

    #[test]
    fn test_find_by_key() {
        let store = VerseStore::from_verses(sample_verses()).unwrap();
        let key = VerseKey::new("Ar-Rahman", 13);
        assert!(store.find_by_key(&key).is_some());
        assert!(store.find_by_key(&VerseKey::new("Ar-Rahman", 14)).is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let verses = vec![
            Verse::new("Al-Fatihah", 1, "first"),
            Verse::new("Al-Fatihah", 1, "second"),
        ];
        let result = VerseStore::from_verses(verses);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_translation_last_wins() {
        let verses = vec![
            Verse::new("Ar-Rahman", 13, "Which of the favors would you deny?"),
            Verse::new("Ar-Rahman", 16, "Which of the favors would you deny?"),
        ];
        let store = VerseStore::from_verses(verses).unwrap();
        let found = store
            .find_by_text("Which of the favors would you deny?")
            .unwrap();
        assert_eq!(found.aya_number, 16);
    }

    #[test]
    fn test_verse_key_display() {
        let key = VerseKey::new("Al-Baqarah", 255);
        assert_eq!(key.to_string(), "Al-Baqarah:255");
    }
}
