//! HTTP transport MCP client
//!
//! Communicates with a remote MCP server via HTTP POST requests carrying
//! JSON-RPC 2.0 messages.

use super::*;
use crate::{MCPError, PROTOCOL_VERSION};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// MCP client using HTTP transport
pub struct HttpMCPClient {
    url: String,
    headers: HashMap<String, String>,

    /// HTTP client
    http_client: reqwest::Client,

    /// Server info from initialization
    server_info: Mutex<Option<MCPServerInfo>>,

    /// Connection state
    connected: AtomicBool,

    /// Request ID counter
    request_id: AtomicU64,
}

impl HttpMCPClient {
    /// Create a new HTTP MCP client
    ///
    /// # Arguments
    ///
    /// * `url` - Server URL
    /// * `headers` - HTTP headers
    /// * `timeout` - Request timeout
    pub fn new(url: String, headers: HashMap<String, String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MCPError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            url,
            headers,
            http_client,
            server_info: Mutex::new(None),
            connected: AtomicBool::new(false),
            request_id: AtomicU64::new(0),
        })
    }

    /// Server URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build HTTP headers
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut header_map = HeaderMap::new();
        header_map.insert("Content-Type", HeaderValue::from_static("application/json"));

        for (key, value) in &self.headers {
            let name = HeaderName::from_str(key).map_err(|e| {
                MCPError::ConfigError(format!("Invalid header name '{key}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                MCPError::ConfigError(format!("Invalid header value '{value}': {e}"))
            })?;
            header_map.insert(name, value);
        }

        Ok(header_map)
    }

    /// Send a JSON-RPC request over HTTP
    async fn send_request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed) + 1;

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });

        debug!("Sending HTTP request to {}: {}", self.url, method);

        let response = self
            .http_client
            .post(&self.url)
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| MCPError::ConnectionFailed(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MCPError::RequestFailed(format!(
                "HTTP {} for {}: {}",
                response.status(),
                method,
                response.text().await.unwrap_or_default()
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| MCPError::RequestFailed(format!("Failed to parse response: {e}")))?;

        // Check for JSON-RPC error
        if let Some(error) = response_json.get("error") {
            return Err(MCPError::RequestFailed(format!("{method}: {error}")));
        }

        response_json
            .get("result")
            .cloned()
            .ok_or_else(|| MCPError::RequestFailed("No result in response".to_string()))
    }

    /// Send initialize request
    async fn initialize(&self) -> Result<MCPServerInfo> {
        let params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {}},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }
        });

        let result = self.send_request("initialize", params).await?;

        let server_info = MCPServerInfo {
            name: result["serverInfo"]["name"]
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
            version: result["serverInfo"]["version"]
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
            protocol_version: result["protocolVersion"]
                .as_str()
                .unwrap_or(PROTOCOL_VERSION)
                .to_string(),
        };

        info!(
            "Connected to MCP server: {} v{}",
            server_info.name, server_info.version
        );

        // Send initialized notification (fire and forget)
        let notification = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        });
        let _ = self
            .http_client
            .post(&self.url)
            .headers(self.build_headers()?)
            .json(&notification)
            .send()
            .await;

        Ok(server_info)
    }
}

#[async_trait]
impl MCPClient for HttpMCPClient {
    async fn connect(&self) -> Result<()> {
        debug!("Connecting to MCP server: {}", self.url);

        let server_info = self.initialize().await?;
        *self.server_info.lock().await = Some(server_info);
        self.connected.store(true, Ordering::Release);

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn list_tools(&self) -> Result<Vec<MCPToolDefinition>> {
        if !self.is_connected() {
            return Err(MCPError::NotConnected);
        }

        let result = self
            .send_request("tools/list", serde_json::json!({}))
            .await?;

        let tools: Vec<MCPToolDefinition> = serde_json::from_value(result["tools"].clone())
            .map_err(|e| MCPError::RequestFailed(format!("Failed to parse tools: {e}")))?;

        Ok(tools)
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<MCPToolResult> {
        if !self.is_connected() {
            return Err(MCPError::NotConnected);
        }

        let params = serde_json::json!({
            "name": name,
            "arguments": arguments
        });

        let result = self.send_request("tools/call", params).await?;

        let tool_result: MCPToolResult = serde_json::from_value(result)
            .map_err(|e| MCPError::ToolCallFailed(format!("Failed to parse result: {e}")))?;

        Ok(tool_result)
    }

    async fn server_info(&self) -> Option<MCPServerInfo> {
        self.server_info.lock().await.clone()
    }
}
