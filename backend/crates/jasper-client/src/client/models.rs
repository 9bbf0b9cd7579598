//! Request and response shapes of the NLP backend.

use crate::{ClientError, ClientResult};

use serde::{Deserialize, Serialize};

/// Status value reported by a ready backend.
pub const HEALTH_OK: &str = "ok";

pub const SUMMARY_MAX_LENGTH_RANGE: (u32, u32) = (30, 500);
pub const SUMMARY_MIN_LENGTH_RANGE: (u32, u32) = (10, 200);
pub const PARAPHRASE_VARIATIONS_RANGE: (u32, u32) = (1, 5);

const DEFAULT_SUMMARY_MAX_LENGTH: u32 = 130;
const DEFAULT_SUMMARY_MIN_LENGTH: u32 = 30;
const DEFAULT_PARAPHRASE_VARIATIONS: u32 = 2;

// =========================================================================
// Requests
// =========================================================================

#[derive(Debug, Serialize)]
pub(crate) struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummarizeRequest<'a> {
    pub text: &'a str,
    pub max_length: u32,
    pub min_length: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ParaphraseRequest<'a> {
    pub text: &'a str,
    pub variations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizeOptions {
    pub max_length: u32,
    pub min_length: u32,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_SUMMARY_MAX_LENGTH,
            min_length: DEFAULT_SUMMARY_MIN_LENGTH,
        }
    }
}

impl SummarizeOptions {
    #[track_caller]
    pub fn validate(&self) -> ClientResult<()> {
        check_range("max_length", self.max_length, SUMMARY_MAX_LENGTH_RANGE)?;
        check_range("min_length", self.min_length, SUMMARY_MIN_LENGTH_RANGE)?;
        if self.min_length >= self.max_length {
            return Err(ClientError::validation(format!(
                "min_length ({}) must be less than max_length ({})",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParaphraseOptions {
    pub variations: u32,
}

impl Default for ParaphraseOptions {
    fn default() -> Self {
        Self {
            variations: DEFAULT_PARAPHRASE_VARIATIONS,
        }
    }
}

impl ParaphraseOptions {
    #[track_caller]
    pub fn validate(&self) -> ClientResult<()> {
        check_range("variations", self.variations, PARAPHRASE_VARIATIONS_RANGE)
    }
}

/// Reject empty input before it reaches the backend.
#[track_caller]
pub(crate) fn validate_text(text: &str) -> ClientResult<()> {
    if text.trim().is_empty() {
        return Err(ClientError::validation("text must not be empty"));
    }
    Ok(())
}

#[track_caller]
fn check_range(field: &str, value: u32, (min, max): (u32, u32)) -> ClientResult<()> {
    if value < min || value > max {
        return Err(ClientError::validation(format!(
            "{field} must be {min}-{max}, got {value}"
        )));
    }
    Ok(())
}

// =========================================================================
// Responses
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status == HEALTH_OK
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParaphraseResponse {
    pub result: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarChange {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub original: String,
    pub suggestions: Vec<String>,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarResponse {
    pub original: String,
    pub corrected: String,
    pub changes: Vec<GrammarChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub lexical_diversity: f64,
    pub sentence_length_variance: f64,
    pub avg_sentence_length: f64,
    pub pattern_matches: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDetectResponse {
    pub ai_score: f64,
    pub is_ai_generated: bool,
    pub analysis: AiAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismMatch {
    pub phrase: String,
    pub position: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismResponse {
    pub plagiarism_score: f64,
    pub originality_score: f64,
    pub matches: Vec<PlagiarismMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSentence {
    pub input_sentence: String,
    pub matched_source: String,
    pub similarity: f64,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismResult {
    pub plagiarism_score: f64,
    pub plagiarism_level: String,
    pub matched_sentences: Vec<MatchedSentence>,
    pub corpus_size: u64,
    pub method: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDetectionDetails {
    pub perplexity_score: f64,
    pub burstiness_score: f64,
    pub classifier_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDetectionResult {
    pub ai_probability: f64,
    pub ai_confidence: String,
    #[serde(default)]
    pub perplexity: Option<f64>,
    #[serde(default)]
    pub burstiness: Option<f64>,
    pub method: String,
    #[serde(default)]
    pub details: Option<AiDetectionDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridDetectionResult {
    pub plagiarism: PlagiarismResult,
    pub ai_detection: AiDetectionResult,
}

/// Raw text of an uploaded file, decoded as UTF-8 with replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub text: String,
    pub filename: String,
}

/// Text extracted from a PDF, DOCX or plain-text upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub text: String,
    pub filename: String,
    /// Length of `text` in characters
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_documents: u64,
    pub total_vectors: u64,
    pub index_size_mb: f64,
}
