//! jasper-client library
//!
//! HTTP client for the Jasper NLP backend, shared by the `jasper` CLI and
//! the desktop shell's health probe.

pub(crate) mod client;


pub use client::{
    ApiClient, ClientError, ClientResult,
    models::{
        AiAnalysis, AiDetectResponse, AiDetectionDetails, AiDetectionResult, CorpusStats,
        ExtractResponse, GrammarChange, GrammarResponse, HEALTH_OK, HealthResponse,
        HybridDetectionResult, MatchedSentence, ParaphraseOptions, ParaphraseResponse,
        PlagiarismMatch, PlagiarismResponse, PlagiarismResult, SummarizeOptions, TextResponse,
        UploadResponse,
    },
    retry::{Retry, RetryContext, RetryPolicy},
};
