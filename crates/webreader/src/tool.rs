//! Tool builder and contract for the `read_website` tool

use crate::client::{read_website_until, read_website_with_options, validate_url, ReadOptions};
use crate::error::FetchError;
use crate::types::{MarkdownResult, ReadRequest};
use crate::{DEFAULT_TIMEOUT, TOOL_DESCRIPTION, TOOL_LABEL, TOOL_LLMTXT, TOOL_NAME};
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Status update during tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStatus {
    /// Current phase ("validate", "fetch", "complete")
    pub phase: String,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Estimated completion percentage (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,
}

impl ToolStatus {
    /// Create a new status with phase
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            message: None,
            percent_complete: None,
        }
    }

    /// Set message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set completion percentage
    pub fn with_percent(mut self, percent: f32) -> Self {
        self.percent_complete = Some(percent);
        self
    }
}

/// Builder for configuring the tool
#[derive(Debug, Clone)]
pub struct ToolBuilder {
    /// Custom User-Agent
    user_agent: Option<String>,
    /// Fetch timeout
    timeout: Duration,
}

impl Default for ToolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolBuilder {
    /// Create a new tool builder with default settings
    pub fn new() -> Self {
        Self {
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set fetch timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the tool
    pub fn build(self) -> Tool {
        Tool {
            user_agent: self.user_agent,
            timeout: self.timeout,
        }
    }
}

/// Configured `read_website` tool
#[derive(Debug, Clone)]
pub struct Tool {
    user_agent: Option<String>,
    timeout: Duration,
}

impl Default for Tool {
    fn default() -> Self {
        ToolBuilder::new().build()
    }
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Tool name used for registration
    pub fn name(&self) -> &'static str {
        TOOL_NAME
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        TOOL_LABEL
    }

    /// Get tool description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ReadRequest);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Get output schema as JSON
    pub fn output_schema(&self) -> serde_json::Value {
        let schema = schema_for!(MarkdownResult);
        serde_json::to_value(schema).unwrap_or_default()
    }

    fn options(&self) -> ReadOptions {
        ReadOptions {
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        }
    }

    /// Execute the tool with the given request
    pub async fn execute(&self, req: ReadRequest) -> Result<MarkdownResult, FetchError> {
        read_website_with_options(&req.url, self.options()).await
    }

    /// Execute the tool, aborting when `cancel` completes first
    pub async fn execute_until<F>(
        &self,
        req: ReadRequest,
        cancel: F,
    ) -> Result<MarkdownResult, FetchError>
    where
        F: Future<Output = ()>,
    {
        read_website_until(&req.url, self.options(), cancel).await
    }

    /// Execute the tool with status updates
    pub async fn execute_with_status<F>(
        &self,
        req: ReadRequest,
        mut status_callback: F,
    ) -> Result<MarkdownResult, FetchError>
    where
        F: FnMut(ToolStatus),
    {
        status_callback(ToolStatus::new("validate").with_percent(0.0));

        validate_url(&req.url)?;

        status_callback(
            ToolStatus::new("fetch")
                .with_message(format!("Fetching {}", req.url))
                .with_percent(10.0),
        );

        let result = read_website_with_options(&req.url, self.options()).await;

        let status = match &result {
            Ok(result) => ToolStatus::new("complete").with_message(result.detection.to_string()),
            Err(err) => ToolStatus::new("complete").with_message(err.to_string()),
        };
        status_callback(status.with_percent(100.0));

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_builder() {
        let tool = Tool::builder()
            .user_agent("TestAgent/1.0")
            .timeout(Duration::from_secs(3))
            .build();

        assert_eq!(tool.user_agent, Some("TestAgent/1.0".to_string()));
        assert_eq!(tool.timeout, Duration::from_secs(3));

        let options = tool.options();
        assert_eq!(options.user_agent.as_deref(), Some("TestAgent/1.0"));
        assert_eq!(options.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_tool_metadata() {
        let tool = Tool::default();
        assert_eq!(tool.name(), "read_website");
        assert_eq!(tool.label(), "Read Website");
        assert!(!tool.description().is_empty());
        assert!(tool.llmtxt().contains("certificate"));
        assert_eq!(tool.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_tool_schemas() {
        let tool = Tool::default();
        let input_schema = tool.input_schema();
        let output_schema = tool.output_schema();

        assert!(input_schema["properties"]["url"].is_object());
        assert_eq!(input_schema["required"][0], "url");

        assert!(output_schema["properties"]["markdown"].is_object());
        assert!(output_schema["properties"]["detection"].is_object());
    }

    #[test]
    fn test_tool_status() {
        let status = ToolStatus::new("fetch")
            .with_message("Fetching URL")
            .with_percent(50.0);

        assert_eq!(status.phase, "fetch");
        assert_eq!(status.message, Some("Fetching URL".to_string()));
        assert_eq!(status.percent_complete, Some(50.0));
    }

    #[tokio::test]
    async fn test_execute_with_status_rejects_invalid_url() {
        let tool = Tool::default();
        let mut phases = Vec::new();
        let result = tool
            .execute_with_status(ReadRequest::new("ftp://example.com"), |status| {
                phases.push(status.phase)
            })
            .await;

        assert!(matches!(result, Err(FetchError::InvalidUrlScheme)));
        assert_eq!(phases, vec!["validate"]);
    }

    #[tokio::test]
    async fn test_execute_with_status_accepts_uppercase_scheme() {
        let tool = Tool::builder().timeout(Duration::from_millis(1)).build();
        let mut phases = Vec::new();
        let result = tool
            .execute_with_status(ReadRequest::new("HTTPS://example.invalid/"), |status| {
                phases.push(status.phase)
            })
            .await;

        assert!(!matches!(result, Err(FetchError::InvalidUrlScheme)));
        assert_eq!(phases, vec!["validate", "fetch", "complete"]);
    }

    #[tokio::test]
    async fn test_execute_with_status_rejects_empty_url() {
        let tool = Tool::default();
        let result = tool
            .execute_with_status(ReadRequest::new(""), |_| {})
            .await;

        assert!(matches!(result, Err(FetchError::MissingUrl)));
    }
}
