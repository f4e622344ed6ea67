//! HTTP client for the Promo Studio web API.
//!
//! Wraps the hosted endpoints behind the research, content generation,
//! and Composio bridge tools. All calls carry bearer auth from the
//! configured token; multipart uploads get a longer timeout than the
//! JSON endpoints.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use promo_core::error::ToolError;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

pub const DEFAULT_API_URL: &str = "https://promo.studio/api";

pub const API_URL_ENV_VAR: &str = "PROMO_API_URL";
pub const API_TOKEN_ENV_VAR: &str = "PROMO_API_TOKEN";

pub const PERPLEXITY_SEARCH_ENDPOINT: &str = "/tools/perplexity-search";
pub const DEEP_RESEARCH_ENDPOINT: &str = "/tools/openai-deep-research";
pub const REDDIT_POSTS_ENDPOINT: &str = "/tools/fetch-reddit-posts";
pub const ANALYZE_VIDEOS_ENDPOINT: &str = "/tools/analyze-videos";
pub const ENHANCE_AUDIO_ENDPOINT: &str = "/tools/enhance-audio";
pub const COMPOSIO_ENDPOINT: &str = "/tools/composio/call-mcp-tool";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection settings for the web API.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub upload_timeout: Duration,
}

impl ApiClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_upload_timeout(mut self, upload_timeout: Duration) -> Self {
        self.upload_timeout = upload_timeout;
        self
    }

    /// Reads `PROMO_API_URL` and `PROMO_API_TOKEN` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = std::env::var(API_TOKEN_ENV_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self::new(base_url).with_token(token)
    }
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Error raised by web API calls.
#[derive(Debug)]
pub enum ApiError {
    MissingToken,
    Unauthorized,
    Unprocessable(String),
    RateLimited,
    Status { status: u16, body: String },
    Timeout,
    Transport(reqwest::Error),
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Unprocessable(_) => Some(422),
            Self::RateLimited => Some(429),
            Self::Status { status, .. } => Some(*status),
            Self::MissingToken | Self::Timeout | Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(
                f,
                "the PROMO_API_TOKEN environment variable is required for web API calls"
            ),
            Self::Unauthorized => {
                write!(f, "authentication failed, check your PROMO_API_TOKEN")
            }
            Self::Unprocessable(body) => write!(f, "the web API rejected the request: {body}"),
            Self::RateLimited => write!(f, "rate limit exceeded, try again later"),
            Self::Status { status, body } => {
                write!(f, "web API request failed with status {status}: {body}")
            }
            Self::Timeout => write!(f, "the web API request timed out"),
            Self::Transport(err) => write!(f, "failed to reach the web API: {err}"),
            Self::Decode(message) => {
                write!(f, "failed to decode the web API response: {message}")
            }
        }
    }
}

impl Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

impl From<ApiError> for ToolError {
    fn from(err: ApiError) -> Self {
        let status = err.status_code();
        Self::api(err.to_string(), status)
    }
}

/// Token accounting reported by the Perplexity endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Response body of the Perplexity search endpoint.
#[derive(Debug, Deserialize)]
pub struct PerplexitySearch {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of the deep research endpoint.
#[derive(Debug, Deserialize)]
pub struct DeepResearch {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub enriched_query: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A single post from the Reddit endpoint.
#[derive(Debug, Deserialize)]
pub struct RedditPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub selftext: String,
}

/// Response body of the Reddit posts endpoint.
#[derive(Debug, Deserialize)]
pub struct RedditPosts {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub posts: Vec<RedditPost>,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of the video analysis endpoint.
#[derive(Debug, Deserialize)]
pub struct VideoAnalyses {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub analyses: Vec<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of the audio enhancement endpoint.
#[derive(Debug, Deserialize)]
pub struct EnhancedAudio {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub url_expires_in: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of a Composio bridge call.
///
/// HTTP failures surface here as a failed outcome with the response
/// body in `details`, mirroring the bridge's own error shape.
#[derive(Debug, Default, Deserialize)]
pub struct ComposioOutcome {
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub details: Option<String>,
    pub status: Option<u16>,
}

/// Client for the Promo Studio web API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Builds a client with the config's default timeout applied.
    ///
    /// # Errors
    /// Returns `ApiError` if the underlying HTTP client cannot be built.
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub const fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Runs a Perplexity search in `web` or `academic` mode.
    ///
    /// # Errors
    /// Returns `ApiError` if the request fails or cannot be decoded.
    pub async fn perplexity_search(
        &self,
        query: &str,
        search_mode: &str,
    ) -> Result<PerplexitySearch, ApiError> {
        tracing::info!(search_mode, "searching with Perplexity");
        self.post_json(
            PERPLEXITY_SEARCH_ENDPOINT,
            &json!({ "query": query, "search_mode": search_mode }),
        )
        .await
    }

    /// Runs an enriched deep research query.
    ///
    /// # Errors
    /// Returns `ApiError` if the request fails or cannot be decoded.
    pub async fn deep_research(&self, query: &str) -> Result<DeepResearch, ApiError> {
        tracing::info!("running deep research");
        self.post_json(DEEP_RESEARCH_ENDPOINT, &json!({ "query": query }))
            .await
    }

    /// Fetches top posts from a subreddit.
    ///
    /// # Errors
    /// Returns `ApiError` if the request fails or cannot be decoded.
    pub async fn fetch_reddit_posts(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<RedditPosts, ApiError> {
        tracing::info!(subreddit, limit, "fetching Reddit posts");
        self.post_json(
            REDDIT_POSTS_ENDPOINT,
            &json!({ "subreddit": subreddit, "limit": limit }),
        )
        .await
    }

    /// Uploads videos for analysis, named parts under `video_files[]`.
    ///
    /// # Errors
    /// Returns `ApiError` if the upload fails or cannot be decoded.
    pub async fn analyze_videos(
        &self,
        videos: Vec<(String, Vec<u8>)>,
        force: bool,
        custom_prompt: Option<&str>,
    ) -> Result<VideoAnalyses, ApiError> {
        tracing::info!(count = videos.len(), force, "uploading videos for analysis");
        let mut form = Form::new();
        for (name, bytes) in videos {
            let part = Part::bytes(bytes).file_name(name).mime_str("video/mp4")?;
            form = form.part("video_files[]", part);
        }
        if force {
            form = form.text("force", "true");
        }
        if let Some(prompt) = custom_prompt {
            form = form.text("custom_prompt", prompt.to_string());
        }

        let response = self
            .http
            .post(self.url(ANALYZE_VIDEOS_ENDPOINT))
            .bearer_auth(self.token()?)
            .header(ACCEPT, "application/json")
            .timeout(self.config.upload_timeout)
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Uploads one audio file for enhancement as `audio_file`.
    ///
    /// # Errors
    /// Returns `ApiError` if the upload fails or cannot be decoded.
    pub async fn enhance_audio(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<EnhancedAudio, ApiError> {
        tracing::info!(file_name, "enhancing audio");
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("audio/mpeg")?;
        let form = Form::new().part("audio_file", part);

        let response = self
            .http
            .post(self.url(ENHANCE_AUDIO_ENDPOINT))
            .bearer_auth(self.token()?)
            .header(ACCEPT, "application/json")
            .timeout(self.config.upload_timeout)
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Downloads bytes from an absolute URL, typically a temporary
    /// enhanced-audio link. No bearer auth is attached.
    ///
    /// # Errors
    /// Returns `ApiError` if the download fails.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        tracing::info!("downloading from temporary URL");
        let response = self
            .http
            .get(url)
            .timeout(self.config.upload_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Calls a Composio-connected tool through the bridge endpoint.
    ///
    /// HTTP-level failures come back as a failed [`ComposioOutcome`],
    /// not an error; only missing tokens and transport problems error.
    ///
    /// # Errors
    /// Returns `ApiError` if the token is missing or the request cannot
    /// be sent or decoded.
    pub async fn composio_call(
        &self,
        tool_name: &str,
        parameters: Map<String, Value>,
    ) -> Result<ComposioOutcome, ApiError> {
        tracing::info!(tool_name, "calling Composio bridge");
        let response = self
            .http
            .post(self.url(COMPOSIO_ENDPOINT))
            .bearer_auth(self.token()?)
            .header(ACCEPT, "application/json")
            .json(&json!({ "tool_name": tool_name, "parameters": parameters }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: Value = response
                .json()
                .await
                .map_err(|err| ApiError::Decode(err.to_string()))?;
            let success = body.get("success").and_then(Value::as_bool).unwrap_or(true);
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string);
            let result = body.get("result").cloned().unwrap_or(body);
            Ok(ComposioOutcome {
                success,
                result: Some(result),
                error,
                details: None,
                status: None,
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(tool_name, status = status.as_u16(), "Composio bridge call failed");
            Ok(ComposioOutcome {
                success: false,
                result: None,
                error: Some("Web API request failed".to_string()),
                details: Some(body),
                status: Some(status.as_u16()),
            })
        }
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .post(self.url(endpoint))
            .bearer_auth(self.token()?)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    fn token(&self) -> Result<&str, ApiError> {
        self.config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingToken)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.config.base_url.trim_end_matches('/'))
    }
}

fn map_status(status: StatusCode, body: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::UNPROCESSABLE_ENTITY => ApiError::Unprocessable(body),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        _ => ApiError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_the_hosted_api() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert!(config.token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.upload_timeout, Duration::from_secs(300));
    }

    #[test]
    fn config_builders_override_each_setting() {
        let config = ApiClientConfig::new("http://localhost:3000/api")
            .with_token(Some("secret".to_string()))
            .with_timeout(Duration::from_secs(5))
            .with_upload_timeout(Duration::from_secs(60));

        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.upload_timeout, Duration::from_secs(60));
    }

    #[test]
    fn urls_join_without_doubled_slashes() {
        let client = ApiClient::new(ApiClientConfig::new("http://localhost:3000/api/"))
            .expect("client builds");
        assert_eq!(
            client.url(COMPOSIO_ENDPOINT),
            "http://localhost:3000/api/tools/composio/call-mcp-tool"
        );
    }

    #[test]
    fn blank_tokens_count_as_missing() {
        let client = ApiClient::new(
            ApiClientConfig::default().with_token(Some("   ".to_string())),
        )
        .expect("client builds");
        assert!(matches!(client.token(), Err(ApiError::MissingToken)));

        let client =
            ApiClient::new(ApiClientConfig::default().with_token(Some("secret".to_string())))
                .expect("client builds");
        assert_eq!(client.token().expect("token present"), "secret");
    }

    #[test]
    fn statuses_map_to_user_facing_errors() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            map_status(StatusCode::UNPROCESSABLE_ENTITY, "bad query".to_string()),
            ApiError::Unprocessable(body) if body == "bad query"
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ApiError::RateLimited
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, "upstream".to_string()),
            ApiError::Status { status: 502, .. }
        ));
    }

    #[test]
    fn tool_errors_carry_the_status_code() {
        let err = ToolError::from(ApiError::RateLimited);
        assert!(matches!(err, ToolError::Api { status: Some(429), .. }));

        let err = ToolError::from(ApiError::MissingToken);
        assert!(matches!(err, ToolError::Api { status: None, .. }));
    }

    #[test]
    fn decodes_perplexity_payloads() {
        let payload: PerplexitySearch = serde_json::from_value(json!({
            "success": true,
            "result": "Rust is a systems language.",
            "model": "sonar-pro",
            "citations": ["https://example.com/a", "https://example.com/b"],
            "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
        }))
        .expect("payload decodes");

        assert!(payload.success);
        assert_eq!(payload.citations.len(), 2);
        assert_eq!(payload.usage.expect("usage present").total_tokens, 30);
    }

    #[test]
    fn tolerates_sparse_payloads() {
        let payload: DeepResearch =
            serde_json::from_value(json!({ "success": false, "error": "quota" }))
                .expect("payload decodes");
        assert!(!payload.success);
        assert_eq!(payload.error.as_deref(), Some("quota"));
        assert!(payload.result.is_empty());

        let payload: RedditPosts = serde_json::from_value(json!({
            "success": true,
            "posts": [{ "title": "TIL", "score": 42 }]
        }))
        .expect("payload decodes");
        assert_eq!(payload.posts.len(), 1);
        assert_eq!(payload.posts[0].score, 42);
        assert!(payload.posts[0].url.is_empty());
    }

    #[test]
    fn decodes_enhancement_payloads() {
        let payload: EnhancedAudio = serde_json::from_value(json!({
            "success": true,
            "download_url": "https://cdn.example.com/enhanced.mp3",
            "url_expires_in": 900
        }))
        .expect("payload decodes");
        assert_eq!(
            payload.download_url.as_deref(),
            Some("https://cdn.example.com/enhanced.mp3")
        );
    }
}
