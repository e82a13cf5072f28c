//! Recursive character text splitter
//!
//! Text is split on the first separator that occurs in it (paragraphs, then lines,
//! then words, then characters). Pieces that are still too long are split again
//! with the remaining separators, and small neighbouring pieces are merged back
//! into chunks of at most `chunk_size` characters. Each separator stays attached
//! to the start of the piece that follows it, so merging is plain concatenation.

use std::collections::VecDeque;
use tracing::warn;

use digiskill_core::{Error, Result};

pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct RecursiveCharacterTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterTextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Configuration("Chunk size must be greater than zero".to_string()));
        }
        if chunk_overlap > chunk_size {
            return Err(Error::Configuration(format!(
                "Chunk overlap ({}) cannot be larger than chunk size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Split text into trimmed, non-empty chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.as_str();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut good_splits: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if remaining.is_empty() {
                final_chunks.push(piece.to_string());
            } else {
                final_chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Merge small pieces into chunks, carrying up to `chunk_overlap` characters
    /// of trailing pieces into the next chunk.
    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        chunk_chars = total,
                        chunk_size = self.chunk_size,
                        "created a chunk longer than the configured size"
                    );
                }

                if !current.is_empty() {
                    if let Some(doc) = join_trimmed(&current) {
                        docs.push(doc);
                    }

                    while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                        match current.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_trimmed(&current) {
            docs.push(doc);
        }

        docs
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn join_trimmed(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split `text` on `separator`, keeping each separator at the start of the piece
/// that follows it. An empty separator splits into characters.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        pieces.push(&text[start..idx]);
        start = idx;
    }
    pieces.push(&text[start..]);
    pieces.retain(|piece| !piece.is_empty());
    pieces
}
