use crate::client::models::{
    AiDetectResponse, AiDetectionResult, CorpusStats, ExtractResponse, GrammarResponse,
    HealthResponse, HybridDetectionResult, ParaphraseOptions, ParaphraseRequest,
    ParaphraseResponse, PlagiarismResponse, PlagiarismResult, SummarizeOptions,
    SummarizeRequest, TextRequest, TextResponse, UploadResponse, validate_text,
};
use crate::client::retry::{Retry, RetryContext, RetryPolicy};
use crate::{ClientError, ClientResult};

use std::path::Path;
use std::time::Duration;

use jasper_config::Config;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Method, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// HTTP client for the Jasper backend REST API.
pub struct ApiClient {
    pub base_url: String,
    policy: RetryPolicy,
    client: ReqwestClient,
}

impl ApiClient {
    /// Create a client with the default retry policy.
    ///
    /// # Arguments
    /// * `base_url` - Backend URL (e.g., "http://127.0.0.1:5123")
    pub fn new(base_url: &str) -> Self {
        Self::with_policy(base_url, RetryPolicy::default())
    }

    pub fn with_policy(base_url: &str, policy: RetryPolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
            client: ReqwestClient::new(),
        }
    }

    /// Client for the configured backend, using the configured retry policy.
    pub fn from_config(config: &Config) -> Self {
        Self::with_policy(&config.backend.base_url(), RetryPolicy::from(&config.retry))
    }

    /// Replace the underlying HTTP client with one enforcing a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> ClientResult<Self> {
        self.client = ReqwestClient::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(1)
            .build()?;
        Ok(self)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Send a request, resending it under the retry policy when allowed.
    ///
    /// Each attempt sends an identical copy of the built request. The error
    /// of the last attempt is returned unchanged once retries run out.
    async fn execute<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        retry: Retry,
    ) -> ClientResult<T> {
        let request = req.build()?;
        self.execute_with(
            || {
                request.try_clone().ok_or_else(|| {
                    ClientError::validation("request body cannot be replayed for retry")
                })
            },
            retry,
        )
        .await
    }

    /// Retry loop over freshly built requests. Streaming bodies such as
    /// multipart forms cannot be cloned, so every attempt asks `next` for one.
    async fn execute_with<T, F>(&self, next: F, retry: Retry) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: Fn() -> ClientResult<Request>,
    {
        let mut ctx = RetryContext::default();

        loop {
            let attempt = next()?;
            let method = attempt.method().clone();
            let url = attempt.url().clone();

            let err = match self.send_once(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if retry == Retry::Never || !err.is_transient() {
                return Err(err);
            }

            let Some(delay) = self.policy.next_delay(&mut ctx) else {
                debug!("{method} {url} giving up after {} retries", ctx.retries);
                return Err(err);
            };

            warn!(
                "{method} {url} failed ({err}); retry {}/{} in {}ms",
                ctx.retries,
                self.policy.max_retries,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn send_once<T: DeserializeOwned>(&self, request: Request) -> ClientResult<T> {
        let response = self.client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(
                status.as_u16(),
                error_message(&body, status.canonical_reason()),
            ));
        }

        Ok(response.json::<T>().await?)
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Query the readiness endpoint.
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let req = self.request(Method::GET, jasper_config::HEALTH_PATH);
        self.execute(req, Retry::default_for(&Method::GET)).await
    }

    // =========================================================================
    // Text Processing
    // =========================================================================
    //
    // The NLP endpoints are POSTs without side effects, so they opt in to
    // retries explicitly.

    /// Rewrite AI-sounding text in a more natural voice
    pub async fn humanize(&self, text: &str) -> ClientResult<TextResponse> {
        validate_text(text)?;
        let req = self
            .request(Method::POST, "/api/humanize")
            .json(&TextRequest { text });
        self.execute(req, Retry::OnTransient).await
    }

    pub async fn summarize(
        &self,
        text: &str,
        options: SummarizeOptions,
    ) -> ClientResult<TextResponse> {
        validate_text(text)?;
        options.validate()?;
        let req = self
            .request(Method::POST, "/api/summarize")
            .json(&SummarizeRequest {
                text,
                max_length: options.max_length,
                min_length: options.min_length,
            });
        self.execute(req, Retry::OnTransient).await
    }

    pub async fn paraphrase(
        &self,
        text: &str,
        options: ParaphraseOptions,
    ) -> ClientResult<ParaphraseResponse> {
        validate_text(text)?;
        options.validate()?;
        let req = self
            .request(Method::POST, "/api/paraphrase")
            .json(&ParaphraseRequest {
                text,
                variations: options.variations,
            });
        self.execute(req, Retry::OnTransient).await
    }

    pub async fn grammar(&self, text: &str) -> ClientResult<GrammarResponse> {
        validate_text(text)?;
        let req = self
            .request(Method::POST, "/api/grammar")
            .json(&TextRequest { text });
        self.execute(req, Retry::OnTransient).await
    }

    /// Heuristic AI-content score
    pub async fn ai_detect(&self, text: &str) -> ClientResult<AiDetectResponse> {
        validate_text(text)?;
        let req = self
            .request(Method::POST, "/api/ai-detect")
            .json(&TextRequest { text });
        self.execute(req, Retry::OnTransient).await
    }

    /// Phrase-level plagiarism check
    pub async fn plagiarism(&self, text: &str) -> ClientResult<PlagiarismResponse> {
        validate_text(text)?;
        let req = self
            .request(Method::POST, "/api/plagiarism")
            .json(&TextRequest { text });
        self.execute(req, Retry::OnTransient).await
    }

    // =========================================================================
    // Detection Engines
    // =========================================================================

    pub async fn detect_plagiarism(&self, text: &str) -> ClientResult<PlagiarismResult> {
        validate_text(text)?;
        let req = self
            .request(Method::POST, "/api/detect/plagiarism")
            .json(&TextRequest { text });
        self.execute(req, Retry::OnTransient).await
    }

    pub async fn detect_ai(&self, text: &str) -> ClientResult<AiDetectionResult> {
        validate_text(text)?;
        let req = self
            .request(Method::POST, "/api/detect/ai")
            .json(&TextRequest { text });
        self.execute(req, Retry::OnTransient).await
    }

    /// Run both detection engines on the same text
    pub async fn detect_hybrid(&self, text: &str) -> ClientResult<HybridDetectionResult> {
        validate_text(text)?;
        let req = self
            .request(Method::POST, "/api/detect/hybrid")
            .json(&TextRequest { text });
        self.execute(req, Retry::OnTransient).await
    }

    pub async fn corpus_stats(&self) -> ClientResult<CorpusStats> {
        let req = self.request(Method::GET, "/api/corpus/stats");
        self.execute(req, Retry::default_for(&Method::GET)).await
    }

    // =========================================================================
    // File Upload
    // =========================================================================

    /// Upload a file and get its contents back as text.
    pub async fn upload(&self, file: &Path) -> ClientResult<UploadResponse> {
        self.send_file("/api/upload", file).await
    }

    /// Upload a PDF, DOCX or text file and get the extracted text.
    pub async fn upload_extract(&self, file: &Path) -> ClientResult<ExtractResponse> {
        self.send_file("/api/upload/extract", file).await
    }

    /// POST `file` as the multipart field `file`. The backend picks the
    /// extractor from the file name, so it is always sent.
    async fn send_file<T: DeserializeOwned>(&self, route: &str, file: &Path) -> ClientResult<T> {
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ClientError::validation(format!("{} has no usable file name", file.display()))
            })?
            .to_string();

        let content = tokio::fs::read(file)
            .await
            .map_err(|e| ClientError::file(file, e))?;

        self.execute_with(
            || {
                let part = Part::bytes(content.clone()).file_name(file_name.clone());
                self.request(Method::POST, route)
                    .multipart(Form::new().part("file", part))
                    .build()
                    .map_err(ClientError::from_reqwest)
            },
            Retry::OnTransient,
        )
        .await
    }
}

/// Pull a readable message out of a backend error body.
///
/// The backend answers with `{"error": ..}` from its global handler or
/// `{"detail": ..}` from request validation; anything else is passed through.
pub(crate) fn error_message(body: &str, reason: Option<&str>) -> String {
    let fallback = || reason.unwrap_or("Unknown error").to_string();

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return if body.trim().is_empty() {
            fallback()
        } else {
            body.trim().to_string()
        };
    };

    match value.get("error").or_else(|| value.get("detail")) {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => fallback(),
    }
}
