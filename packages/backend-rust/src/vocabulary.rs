//! Word and sentence lists read from JSON files at startup

use std::path::Path;

use flashdeck_algo::{number_entries, Item, Sentence, WordEntry};
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub words: Vec<Item>,
    pub sentences: Vec<Sentence>,
}

impl Vocabulary {
    /// Loads both lists; a missing or malformed file leaves that list empty
    pub async fn load(words_path: &Path, sentences_path: &Path) -> Self {
        let words = match read_json::<Vec<WordEntry>>(words_path).await {
            Ok(entries) => number_entries(entries),
            Err(err) => {
                tracing::warn!(error = %err, "word list unavailable, starting with no words");
                Vec::new()
            }
        };

        let sentences = match read_json::<Vec<Sentence>>(sentences_path).await {
            Ok(sentences) => sentences,
            Err(err) => {
                tracing::warn!(error = %err, "sentence list unavailable, sentence practice disabled");
                Vec::new()
            }
        };

        tracing::info!(
            words = words.len(),
            sentences = sentences.len(),
            "vocabulary loaded"
        );

        Self { words, sentences }
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, VocabularyError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| VocabularyError::Io {
            path: path.display().to_string(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| VocabularyError::Json {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_numbers_words_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let words = write_file(
            &dir,
            "words.json",
            r#"[{"spanish": "el", "english": "the"}, {"sourceText": "de", "targetText": "of; from"}]"#,
        );
        let sentences = write_file(
            &dir,
            "sentences.json",
            r#"[{"spanish": "El de.", "english": "The of."}]"#,
        );

        let vocabulary = Vocabulary::load(&words, &sentences).await;
        assert_eq!(vocabulary.words.len(), 2);
        assert_eq!(vocabulary.words[1].id, 1);
        assert_eq!(vocabulary.words[1].target_text, "of; from");
        assert_eq!(vocabulary.sentences[0].source_text, "El de.");
    }

    #[tokio::test]
    async fn test_missing_or_malformed_files_degrade_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let broken = write_file(&dir, "words.json", "{ not json");
        let vocabulary = Vocabulary::load(&broken, &dir.path().join("missing.json")).await;
        assert!(vocabulary.words.is_empty());
        assert!(vocabulary.sentences.is_empty());
    }
}
