use url::Url;

use super::SkipReason;
use crate::config::AppConfig;
use crate::errors::FaqRagError;
use crate::errors::Result;
use crate::models::EligibleFaq;
use crate::models::FaqRecord;
use crate::models::Suggestion;

/// Eligibility check applied at the ingestion boundary.
///
/// Checks run in a fixed order and the first failure is the reason:
/// essential data, embedding presence, embedding dimension, url.
#[derive(Debug, Clone)]
pub struct Validator {
    dimension: usize,
    base_url: Option<Url>,
}

impl Validator {
    pub const fn new(dimension: usize) -> Self {
        Self {
            dimension,
            base_url: None,
        }
    }

    /// Dimension from `embeddings.dimension`, base from `ingest.base_url`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let validator = Self::new(config.embedding_dimension());
        match config.ingest.base_url.as_deref() {
            Some(base) => {
                let base = Url::parse(base).map_err(|e| {
                    FaqRagError::ConfigError(format!("ingest.base_url '{base}' is invalid: {e}"))
                })?;
                Ok(validator.with_base_url(base))
            }
            None => Ok(validator),
        }
    }

    /// Resolve relative links against `base` instead of rejecting them
    #[must_use]
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base_url = Some(base);
        self
    }

    pub fn check(&self, record: FaqRecord) -> std::result::Result<EligibleFaq, SkipReason> {
        if !record.has_embeddable_question() || !record.has_real_answer() {
            return Err(SkipReason::MissingEssentialData);
        }

        let Some(embedding) = record.embedding else {
            return Err(SkipReason::MissingEmbedding);
        };
        if embedding.len() != self.dimension {
            return Err(SkipReason::InvalidDimension {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        let url = match record.url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(self.absolute_url(raw)?),
        };

        // Suggestions are weak references: a bad link is dropped, not fatal
        let suggestions = record
            .suggestions
            .into_iter()
            .filter(|s| !s.text.trim().is_empty())
            .map(|s| Suggestion {
                url: s
                    .url
                    .as_deref()
                    .and_then(|raw| self.absolute_url(raw.trim()).ok()),
                text: s.text,
            })
            .collect();

        let tags = record
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(EligibleFaq::new(
            record.question.trim().to_string(),
            record.answer.trim().to_string(),
            tags,
            url,
            suggestions,
            embedding,
        ))
    }

    /// Absolute http(s) url with a host, joining relative links to the base
    fn absolute_url(&self, raw: &str) -> std::result::Result<String, SkipReason> {
        let invalid = || SkipReason::InvalidUrl {
            url: raw.to_string(),
        };

        let parsed = match Url::parse(raw) {
            Ok(parsed) => parsed,
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(raw).map_err(|_| invalid())?,
                None => return Err(invalid()),
            },
            Err(_) => return Err(invalid()),
        };

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid());
        }
        Ok(parsed.to_string())
    }
}
