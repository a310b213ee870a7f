use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

/// Question placeholder written when a scraped card had no title
pub const QUESTION_PLACEHOLDER: &str = "N/A";

/// Answer placeholder written by the first scrape pass
pub const ANSWER_PENDING: &str = "YET TO SCRAPE";

/// Prefix of the answer written when the article body was missing
pub const ANSWER_NOT_FOUND_PREFIX: &str = "Answer content element not found";

/// Prefixes of answers the scraper writes on its failure paths
const ANSWER_FAILURE_PREFIXES: [&str; 3] = [
    "Timed out waiting for page to load",
    "Selenium WebDriver error:",
    "An unexpected error occurred:",
];

/// Related-record pointer attached to an FAQ entry.
///
/// Suggestions are weak references by URL only; nothing checks that the
/// target exists in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// An FAQ entry as it moves through scrape, embed and ingest.
///
/// `embedding` is derived from `question` and is absent until the embedding
/// pass runs. The serde aliases accept the field names used by the scraper
/// output (`full_url`, `question_embedding`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqRecord {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "full_url")]
    pub url: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(
        default,
        alias = "question_embedding",
        skip_serializing_if = "Option::is_none"
    )]
    pub embedding: Option<Vec<f32>>,
}

impl FaqRecord {
    /// Raw record as produced by the first scrape pass
    pub fn pending(question: impl Into<String>, url: Option<String>) -> Self {
        Self {
            question: question.into(),
            answer: ANSWER_PENDING.to_string(),
            tags: Vec::new(),
            url,
            suggestions: Vec::new(),
            embedding: None,
        }
    }

    /// Replace the question; a stale embedding is dropped with it.
    pub fn set_question(&mut self, question: impl Into<String>) {
        let question = question.into();
        if question != self.question {
            self.question = question;
            self.embedding = None;
        }
    }

    /// Whether the question can be embedded at all
    pub fn has_embeddable_question(&self) -> bool {
        !is_question_placeholder(&self.question)
    }

    /// Whether the answer holds real content rather than a scraper sentinel
    pub fn has_real_answer(&self) -> bool {
        !is_answer_placeholder(&self.answer)
    }
}

/// Empty, whitespace-only or `N/A` questions
pub fn is_question_placeholder(question: &str) -> bool {
    let trimmed = question.trim();
    trimmed.is_empty() || trimmed == QUESTION_PLACEHOLDER
}

/// Empty answers and every sentinel the scraper writes into `answer`
pub fn is_answer_placeholder(answer: &str) -> bool {
    let trimmed = answer.trim();
    trimmed.is_empty()
        || trimmed == ANSWER_PENDING
        || trimmed.starts_with(ANSWER_NOT_FOUND_PREFIX)
        || ANSWER_FAILURE_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
}

/// SHA-256 over question and url, hex encoded.
///
/// Used as an optional dedup key; never enforced unique by the schema.
pub fn content_hash(question: &str, url: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(question.trim().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.unwrap_or_default().as_bytes());
    hex::encode(hasher.finalize())
}

/// A record that passed ingestion validation.
///
/// Only the ingestion validator can build one, so everything handed to the
/// store has a real question and answer, an absolute url (if any) and an
/// embedding of the configured dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleFaq {
    question: String,
    answer: String,
    tags: Vec<String>,
    url: Option<String>,
    suggestions: Vec<Suggestion>,
    embedding: Vec<f32>,
    content_hash: String,
}

impl EligibleFaq {
    pub(crate) fn new(
        question: String,
        answer: String,
        tags: Vec<String>,
        url: Option<String>,
        suggestions: Vec<Suggestion>,
        embedding: Vec<f32>,
    ) -> Self {
        let content_hash = content_hash(&question, url.as_deref());
        Self {
            question,
            answer,
            tags,
            url,
            suggestions,
            embedding,
            content_hash,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Back to a plain record, embedding included
    pub fn into_record(self) -> FaqRecord {
        FaqRecord {
            question: self.question,
            answer: self.answer,
            tags: self.tags,
            url: self.url,
            suggestions: self.suggestions,
            embedding: Some(self.embedding),
        }
    }
}

/// Nearest stored record for a query vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqMatch {
    pub record: FaqRecord,
    /// Cosine distance between the query and the stored embedding
    pub distance: f64,
}
