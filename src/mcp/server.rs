//! MCP server implementation.
//!
//! Each request line is handled on its own task; responses are funneled
//! through a single writer so lines never interleave on stdout.

use super::protocol::*;
use super::tools::{
    get_prompts, get_resource_templates, get_resources, get_tools, parse_resource_uri,
    ResourceTarget,
};
use crate::config::Prompts;
use crate::orchestrator::Orchestrator;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "tubecache";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for tubecache.
pub struct McpServer {
    orchestrator: Arc<Orchestrator>,
    prompts: Prompts,
}

impl McpServer {
    /// Create a new MCP server around a ready orchestrator.
    pub fn new(orchestrator: Arc<Orchestrator>, prompts: Prompts) -> Self {
        Self {
            orchestrator,
            prompts,
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(self) -> anyhow::Result<()> {
        let server = Arc::new(self);
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(response) = rx.recv().await {
                let mut line = serde_json::to_string(&response)?;
                line.push('\n');
                stdout.write_all(line.as_bytes()).await?;
                stdout.flush().await?;
            }
            Ok::<_, anyhow::Error>(())
        });

        info!("tubecache MCP server starting");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let request = match decode_request(&line) {
                Ok(req) => req,
                Err(response) => {
                    let _ = tx.send(response);
                    continue;
                }
            };

            let server = server.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_request(request).await {
                    let _ = tx.send(response);
                }
            });
        }

        // Writer drains once every in-flight handler has dropped its sender.
        drop(tx);
        writer.await??;
        info!("stdin closed, MCP server exiting");
        Ok(())
    }

    /// Handle a single JSON-RPC request. Notifications yield no response.
    pub(crate) async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        let id = request.id;
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::from_result(id, &ToolsListResult { tools: get_tools() }),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            "resources/list" => JsonRpcResponse::from_result(
                id,
                &ResourcesListResult {
                    resources: get_resources(),
                },
            ),
            "resources/templates/list" => JsonRpcResponse::from_result(
                id,
                &ResourceTemplatesListResult {
                    resource_templates: get_resource_templates(),
                },
            ),
            "resources/read" => self.handle_resources_read(id, request.params).await,
            "prompts/list" => {
                JsonRpcResponse::from_result(id, &PromptsListResult { prompts: get_prompts() })
            }
            "prompts/get" => self.handle_prompts_get(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        if let Some(client) = &params.client_info {
            info!(
                "Client {} {} connected (protocol {})",
                client.name,
                client.version,
                params.protocol_version.as_deref().unwrap_or("unknown")
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ListChanged { list_changed: false },
                resources: ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                },
                prompts: ListChanged { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match parse_params(params) {
            Ok(params) => params,
            Err(message) => return JsonRpcResponse::error(id, INVALID_PARAMS, &message),
        };

        let result = match params.name.as_str() {
            "download_transcript" => self.tool_download_transcript(params.arguments).await,
            "list_available_transcripts" => {
                ToolCallResult::text(self.orchestrator.list_available_transcripts().await)
            }
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Download transcript tool.
    async fn tool_download_transcript(&self, args: Option<Value>) -> ToolCallResult {
        let url = match string_arg(args.as_ref(), "youtube_url") {
            Some(url) => url,
            None => return ToolCallResult::error("Missing 'youtube_url' argument".to_string()),
        };

        ToolCallResult::text(self.orchestrator.download_transcript(url).await)
    }

    /// Handle resources/read request.
    async fn handle_resources_read(
        &self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: ResourceReadParams = match parse_params(params) {
            Ok(params) => params,
            Err(message) => return JsonRpcResponse::error(id, INVALID_PARAMS, &message),
        };

        let text = match parse_resource_uri(&params.uri) {
            Some(ResourceTarget::Transcript(video_id)) => {
                self.orchestrator.transcript_resource(video_id).await
            }
            Some(ResourceTarget::List) => self.orchestrator.list_available_transcripts().await,
            None => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    &format!("Unknown resource: {}", params.uri),
                )
            }
        };

        let result = ResourceReadResult {
            contents: vec![ResourceContents {
                uri: params.uri,
                mime_type: "text/plain".to_string(),
                text,
            }],
        };
        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle prompts/get request.
    fn handle_prompts_get(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: PromptGetParams = match parse_params(params) {
            Ok(params) => params,
            Err(message) => return JsonRpcResponse::error(id, INVALID_PARAMS, &message),
        };
        let args = params.arguments.as_ref();

        let Some(video_id) = string_arg(args, "video_id") else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing 'video_id' argument");
        };

        let result = match params.name.as_str() {
            "summarize_transcript" => PromptGetResult::user(
                "Summarize a video transcript",
                self.prompts.summarize_transcript(video_id),
            ),
            "highlight_new_information" => {
                let Some(topic) = string_arg(args, "topic") else {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing 'topic' argument");
                };
                PromptGetResult::user(
                    "Highlight new information in a video transcript",
                    self.prompts.highlight_new_information(video_id, topic),
                )
            }
            _ => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    &format!("Unknown prompt: {}", params.name),
                )
            }
        };

        JsonRpcResponse::from_result(id, &result)
    }
}

/// Decode one input line. Malformed JSON is a parse error; well-formed JSON
/// that is not a request is an invalid request.
fn decode_request(line: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        warn!("Failed to parse request: {}", e);
        JsonRpcResponse::error(None, PARSE_ERROR, "Parse error")
    })?;
    let id = value.get("id").cloned().filter(|id| !id.is_null());

    serde_json::from_value(value).map_err(|e| {
        warn!("Invalid request: {}", e);
        JsonRpcResponse::error(id, INVALID_REQUEST, &format!("Invalid Request: {}", e))
    })
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    let params = params.ok_or_else(|| "Missing params".to_string())?;
    serde_json::from_value(params).map_err(|e| format!("Invalid params: {}", e))
}

fn string_arg<'a>(args: Option<&'a Value>, name: &str) -> Option<&'a str> {
    args?.get(name)?.as_str()
}
