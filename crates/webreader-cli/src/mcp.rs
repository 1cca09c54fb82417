//! MCP (Model Context Protocol) server implementation

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};
use webreader::{ReadRequest, Tool};

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// MCP Server implementation
struct McpServer {
    tool: Tool,
}

impl McpServer {
    fn new(tool: Tool) -> Self {
        Self { tool }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "MCP request");
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "webreader",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "tools": [{
                    "name": self.tool.name(),
                    "title": self.tool.label(),
                    "description": self.tool.description(),
                    "inputSchema": self.tool.input_schema()
                }]
            }),
        )
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if tool_name != self.tool.name() {
            return JsonRpcResponse::error(id, -32602, format!("Unknown tool: {}", tool_name));
        }

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let request: ReadRequest = match serde_json::from_value(arguments) {
            Ok(req) => req,
            Err(e) => {
                return JsonRpcResponse::error(id, -32602, format!("Invalid arguments: {}", e));
            }
        };

        match self.tool.execute(request).await {
            Ok(result) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": result.markdown
                    }],
                    "structuredContent": {
                        "url": result.url,
                        "source_url": result.source_url,
                        "detection": result.detection,
                        "selector": result.selector
                    }
                }),
            ),
            Err(e) => {
                warn!(error = %e, "read_website failed");
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": format!("Error: {}", e)
                        }],
                        "isError": true
                    }),
                )
            }
        }
    }
}

/// Run the MCP server over stdio
pub async fn run_server() {
    let server = McpServer::new(Tool::default());
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(error = %e, "Error reading stdin");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let response = JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e));
                let json = serde_json::to_string(&response).unwrap_or_default();
                let _ = writeln!(stdout, "{}", json);
                let _ = stdout.flush();
                continue;
            }
        };

        // Notifications get no response
        if request.id.is_none() {
            continue;
        }

        let response = server.handle_request(request).await;
        let json = serde_json::to_string(&response).unwrap_or_default();
        let _ = writeln!(stdout, "{}", json);
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = McpServer::new(Tool::default());
        let response = server.handle_request(request("initialize", json!({}))).await;
        let result = response.result.unwrap();

        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "webreader");
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = McpServer::new(Tool::default());
        let response = server.handle_request(request("tools/list", json!({}))).await;
        let result = response.result.unwrap();

        assert_eq!(result["tools"][0]["name"], "read_website");
        assert_eq!(result["tools"][0]["title"], "Read Website");
        assert!(result["tools"][0]["inputSchema"]["properties"]["url"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = McpServer::new(Tool::default());
        let response = server.handle_request(request("resources/list", json!({}))).await;

        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let server = McpServer::new(Tool::default());
        let response = server
            .handle_request(request("tools/call", json!({"name": "fetch"})))
            .await;

        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tool_error_is_result() {
        let server = McpServer::new(Tool::default());
        let response = server
            .handle_request(request(
                "tools/call",
                json!({"name": "read_website", "arguments": {"url": "ftp://example.com"}}),
            ))
            .await;
        let result = response.result.unwrap();

        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "Error: Invalid URL: must start with http:// or https://"
        );
    }
}
