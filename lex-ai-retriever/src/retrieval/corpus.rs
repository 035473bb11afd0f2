//! Corpus loading and paragraph chunking.
//!
//! The corpus is a UTF-8 plain-text file in which retrievable passages are
//! separated by blank lines. Chunking policy: split on runs of two or more
//! consecutive newlines, trim each segment, and drop segments that are empty
//! after trimming. Surviving segments keep their original document order.

use crate::error::{Result, RetrievalError};
use regex::Regex;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();

fn paragraph_break() -> &'static Regex {
    PARAGRAPH_BREAK.get_or_init(|| Regex::new(r"\n{2,}").expect("static pattern compiles"))
}

/// Split raw corpus text into ordered, trimmed, non-empty chunks.
///
/// Multiple consecutive blank lines collapse into a single split, so
/// `"A\n\nB\n\n\nC"` yields `["A", "B", "C"]`.
pub fn split_chunks(raw: &str) -> Vec<String> {
    paragraph_break()
        .split(raw)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Load a corpus file and split it into chunks.
///
/// Fails with [`RetrievalError::CorpusNotFound`] if the file is absent and
/// with [`RetrievalError::EmptyCorpus`] if splitting yields zero chunks, so
/// callers can tell "no file" from "file with no content" in diagnostics.
pub async fn load_corpus(path: &Path) -> Result<Vec<String>> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            RetrievalError::CorpusNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RetrievalError::Io { source: e }
        }
    })?;

    let chunks = split_chunks(&raw);
    if chunks.is_empty() {
        return Err(RetrievalError::EmptyCorpus {
            path: path.to_path_buf(),
        });
    }

    info!("Loaded {} chunks from {}", chunks.len(), path.display());
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_blank_lines() {
        assert_eq!(split_chunks("A\n\nB\n\n\nC"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_whitespace_only_segments_vanish() {
        assert_eq!(split_chunks("A\n\n   \n\nB"), vec!["A", "B"]);
        assert_eq!(split_chunks("\n\n\n"), Vec::<String>::new());
        assert_eq!(split_chunks(""), Vec::<String>::new());
    }

    #[test]
    fn test_single_newlines_stay_inside_chunks() {
        let chunks = split_chunks("Section 1.\nTheft.\n\nSection 2.\nRobbery.");
        assert_eq!(chunks, vec!["Section 1.\nTheft.", "Section 2.\nRobbery."]);
    }

    #[test]
    fn test_segments_are_trimmed() {
        let chunks = split_chunks("  leading\n\ntrailing  \n\n  both  ");
        assert_eq!(chunks, vec!["leading", "trailing", "both"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let raw = (0..50)
            .map(|i| format!("chunk {i}"))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = split_chunks(&raw);
        assert_eq!(chunks.len(), 50);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk, &format!("chunk {i}"));
        }
    }

    #[tokio::test]
    async fn test_load_corpus_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");

        let err = load_corpus(&path).await.unwrap_err();
        assert!(matches!(err, RetrievalError::CorpusNotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_corpus_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        tokio::fs::write(&path, "\n\n\n").await.unwrap();

        let err = load_corpus(&path).await.unwrap_err();
        assert!(matches!(err, RetrievalError::EmptyCorpus { .. }));
    }

    #[tokio::test]
    async fn test_load_corpus_reads_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acts.txt");
        tokio::fs::write(&path, "Section 378. Theft.\n\nSection 390. Robbery.\n")
            .await
            .unwrap();

        let chunks = load_corpus(&path).await.unwrap();
        assert_eq!(chunks, vec!["Section 378. Theft.", "Section 390. Robbery."]);
    }
}
