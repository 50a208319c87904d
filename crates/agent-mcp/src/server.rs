//! Serving a tool registry over JSON-RPC
//!
//! A single `POST /` endpoint answers `initialize`, `tools/list` and
//! `tools/call`. Notifications (requests without an id) are accepted and
//! ignored.

use agent_tools::{Tool, ToolError, ToolRegistry};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::{MCPToolDefinition, MCPToolResult};
use crate::{PROTOCOL_VERSION, Result};

const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// Serves the tools of one registry
#[derive(Clone)]
pub struct ToolServer {
    name: String,
    version: String,
    registry: Arc<ToolRegistry>,
}

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

impl ToolServer {
    /// Create a server advertising itself as `name`
    pub fn new(name: impl Into<String>, registry: ToolRegistry) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            registry: Arc::new(registry),
        }
    }

    /// Build the axum router
    pub fn router(self) -> Router {
        Router::new().route("/", post(handle)).with_state(self)
    }

    /// Bind `addr` and serve until the process stops
    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, server = %self.name, tools = ?self.registry.names(), "serving tools");
        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    fn definitions(&self) -> Vec<MCPToolDefinition> {
        self.registry
            .list_tools()
            .iter()
            .map(|tool| MCPToolDefinition {
                name: tool.name().to_string(),
                description: Some(tool.description().to_string()),
                input_schema: tool.descriptor().input_schema(),
            })
            .collect()
    }

    async fn call(&self, params: CallParams) -> std::result::Result<MCPToolResult, String> {
        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| format!("Unknown tool: {}", params.name))?;

        Ok(match tool.invoke(params.arguments).await {
            Ok(output) => MCPToolResult::text(output.to_string()),
            Err(e) => {
                warn!(tool = %params.name, error = %e, "tool call failed");
                MCPToolResult::error(describe(&e))
            }
        })
    }
}

fn describe(err: &ToolError) -> String {
    match err {
        ToolError::InvalidArgument { reason, .. } => format!("Invalid argument: {reason}"),
        ToolError::Execution { cause, .. } => cause.clone(),
    }
}

async fn handle(State(server): State<ToolServer>, Json(request): Json<RpcRequest>) -> Response {
    let Some(id) = request.id else {
        debug!(method = %request.method, "notification");
        return StatusCode::ACCEPTED.into_response();
    };
    debug!(method = %request.method, "rpc request");

    let outcome = match request.method.as_str() {
        "initialize" => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": server.name, "version": server.version}
        })),
        "tools/list" => Ok(json!({"tools": server.definitions()})),
        "tools/call" => match serde_json::from_value::<CallParams>(request.params) {
            Ok(params) => server
                .call(params)
                .await
                .map(|result| json!(result))
                .map_err(|message| (INVALID_PARAMS, message)),
            Err(e) => Err((INVALID_PARAMS, e.to_string())),
        },
        other => Err((METHOD_NOT_FOUND, format!("Method not found: {other}"))),
    };

    let body = match outcome {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err((code, message)) => {
            json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
        }
    };
    Json(body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HttpMCPClient, MCPClient, MCPTool};
    use agent_tools::{ParameterSpec, ToolDescriptor, ValueType};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Map;
    use std::collections::HashMap;
    use std::time::Duration;
    use tower::ServiceExt;

    struct Greet(ToolDescriptor);

    #[async_trait]
    impl Tool for Greet {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.0
        }

        async fn execute(&self, args: Map<String, Value>) -> agent_tools::Result<Value> {
            let name = args["name"].as_str().unwrap_or_default();
            if name == "nobody" {
                return Err(ToolError::execution("greet", "nobody to greet"));
            }
            Ok(json!({"status": "success", "message": format!("Hello, {name}")}))
        }
    }

    fn server() -> ToolServer {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(Greet(
                ToolDescriptor::new("greet", "Greets someone")
                    .param(ParameterSpec::required("name", ValueType::String, "Who")),
            )))
            .unwrap();
        ToolServer::new("greeter", registry)
    }

    async fn rpc(body: Value) -> (StatusCode, Value) {
        let response = server()
            .router()
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_tools_list_publishes_schema() {
        let (_, reply) = rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).await;
        let tool = &reply["result"]["tools"][0];
        assert_eq!(tool["name"], "greet");
        assert_eq!(tool["inputSchema"]["required"], json!(["name"]));
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_error_results() {
        let (_, reply) = rpc(json!({
            "jsonrpc": "2.0", "id": 2, "method": "tools/call",
            "params": {"name": "greet", "arguments": {}}
        }))
        .await;
        assert_eq!(reply["result"]["isError"], true);
        assert!(
            reply["result"]["content"][0]["text"]
                .as_str()
                .unwrap()
                .starts_with("Invalid argument")
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_and_method() {
        let (_, reply) = rpc(json!({
            "jsonrpc": "2.0", "id": 3, "method": "tools/call",
            "params": {"name": "missing"}
        }))
        .await;
        assert_eq!(reply["error"]["code"], INVALID_PARAMS);

        let (_, reply) = rpc(json!({"jsonrpc": "2.0", "id": 4, "method": "resources/list"})).await;
        assert_eq!(reply["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_notifications_are_accepted() {
        let (status, body) =
            rpc(json!({"jsonrpc": "2.0", "method": "notifications/initialized"})).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_client_round_trip_over_http() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, server().router()).await.unwrap();
        });

        let client = Arc::new(
            HttpMCPClient::new(format!("http://{addr}/"), HashMap::new(), Duration::from_secs(5))
                .unwrap(),
        );
        client.connect().await.unwrap();
        assert_eq!(client.server_info().await.unwrap().name, "greeter");

        let tools = MCPTool::discover_all(client, None).await.unwrap();
        let greet = &tools[0];
        let out = greet.invoke(json!({"name": "Asha"})).await.unwrap();
        assert_eq!(out, json!({"status": "success", "message": "Hello, Asha"}));

        let err = greet.invoke(json!({"name": "nobody"})).await.unwrap_err();
        assert_eq!(err, ToolError::execution("greet", "nobody to greet"));
    }
}
