//! Text preprocessing utilities for embedding generation
//!
//! Questions come out of scraped HTML, so they can carry newlines, tabs and
//! stray control characters. These are normalized before the text reaches
//! the model so identical questions always embed identically.

use tracing::debug;
use tracing::warn;

use crate::errors::FaqRagError;
use crate::errors::Result;

/// all-MiniLM-L6-v2 truncates at 256 word pieces; past this many characters
/// the tail would be ignored anyway.
pub const MAX_EMBED_CHARS: usize = 1000;

/// Preprocess text for embedding generation
///
/// This function handles:
/// - Normalizing whitespace and newlines
/// - Removing control characters
/// - Truncating very long text at a word boundary
pub fn preprocess_text_for_embedding(text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(FaqRagError::EmbeddingError(
            "Empty text provided".to_string(),
        ));
    }

    let sanitized = sanitize_text(&normalize_whitespace(text));

    if sanitized.is_empty() {
        return Err(FaqRagError::EmbeddingError(
            "Text contains only control characters".to_string(),
        ));
    }

    let char_count = sanitized.chars().count();
    if char_count > MAX_EMBED_CHARS {
        warn!(
            "Text too long ({} chars), truncating to {}",
            char_count, MAX_EMBED_CHARS
        );
        return Ok(smart_truncate_text(&sanitized, MAX_EMBED_CHARS));
    }

    debug!(
        "Preprocessed text: {} -> {} chars",
        text.len(),
        sanitized.len()
    );
    Ok(sanitized)
}

/// Collapse every run of whitespace (newlines and tabs included) to one space
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Replace control characters with spaces, then re-collapse spaces
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Truncate to `max_chars` characters, preferring the last word boundary
/// when it is not too far back
fn smart_truncate_text(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    if let Some(last_space) = truncated.rfind(' ') {
        if truncated[..last_space].chars().count() > max_chars * 3 / 4 {
            return truncated[..last_space].to_string();
        }
    }
    truncated
}
