//! The MCP surface: one `invokeGemini` tool.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Implementation, JsonObject, ServerCapabilities, ServerInfo, Tool};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Deserialize;
use serde_json::json;

use crate::cli::GeminiCli;

/// Name reported in the initialize handshake.
pub const SERVER_NAME: &str = "gemini-cli-server";

pub const TOOL_NAME: &str = "invokeGemini";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InvokeGeminiArgs {
    /// The prompt to send to gemini-cli
    pub prompt: String,
}

/// Advertised result shape. A failed run returns `{error}` instead.
fn output_schema() -> Arc<JsonObject> {
    let schema = json!({
        "type": "object",
        "properties": {
            "result": {"type": "string"}
        },
        "required": ["result"],
        "additionalProperties": false,
        "$schema": "http://json-schema.org/draft-07/schema#"
    });
    Arc::new(serde_json::from_value(schema).unwrap_or_default())
}

/// Proxies a prompt to the gemini CLI.
#[derive(Clone)]
pub struct GeminiServer {
    cli: GeminiCli,
    tool_router: ToolRouter<Self>,
}

impl Default for GeminiServer {
    fn default() -> Self {
        Self::new(GeminiCli::default())
    }
}

#[tool_router]
impl GeminiServer {
    pub fn new(cli: GeminiCli) -> Self {
        Self {
            cli,
            tool_router: Self::tool_router(),
        }
    }

    /// Descriptors of the registered tools.
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    #[tool(
        name = "invokeGemini",
        title = "Invoke Gemini CLI",
        description = "Invokes the gemini-cli with a given prompt. This is useful when there is a sub task that can be effectively completed off the main thread to save context. Good for highly parallelizable or \"research\" like tasks that may produce a lot of excess context.",
        output_schema = output_schema()
    )]
    pub async fn invoke_gemini(
        &self,
        Parameters(args): Parameters<InvokeGeminiArgs>,
    ) -> Result<CallToolResult, McpError> {
        let output = self.cli.invoke(&args.prompt).await?;
        let value = serde_json::to_value(output)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::structured(value))
    }
}

#[tool_handler]
impl ServerHandler for GeminiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(prompt: &str) -> Parameters<InvokeGeminiArgs> {
        Parameters(InvokeGeminiArgs {
            prompt: prompt.to_string(),
        })
    }

    #[test]
    fn serves_exactly_one_tool() {
        let server = GeminiServer::default();
        let tools = server.tools();
        assert_eq!(tools.len(), 1);

        let tool = &tools[0];
        assert_eq!(tool.name, TOOL_NAME);
        assert_eq!(tool.title.as_deref(), Some("Invoke Gemini CLI"));
        assert_eq!(tool.input_schema["required"], json!(["prompt"]));
        assert_eq!(tool.input_schema["properties"]["prompt"]["type"], "string");
        assert_eq!(
            tool.output_schema.as_ref().unwrap()["properties"],
            json!({"result": {"type": "string"}})
        );
    }

    #[test]
    fn reports_its_identity() {
        let info = GeminiServer::default().get_info();
        assert_eq!(info.server_info.name, "gemini-cli-server");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn prompt_is_required() {
        let missing = serde_json::from_value::<InvokeGeminiArgs>(json!({"text": "hi"}));
        assert!(missing.is_err());
        let empty = serde_json::from_value::<InvokeGeminiArgs>(json!({"prompt": ""}));
        assert!(empty.is_ok());
    }

    #[tokio::test]
    async fn spawn_failure_is_a_protocol_fault() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-gemini");
        let server = GeminiServer::new(GeminiCli::default().with_command(missing.to_string_lossy()));

        let err = server.invoke_gemini(args("hi")).await.unwrap_err();
        assert_eq!(err.code.0, -32603);
        assert!(err.message.starts_with("failed to start"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn payload_shapes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gemini");
        std::fs::write(&path, "#!/bin/sh\n[ \"$5\" = fail ] && { echo bad >&2; exit 2; }\necho ok\n")
            .unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let server = GeminiServer::new(GeminiCli::default().with_command(path.to_string_lossy()));

        let ok = server.invoke_gemini(args("go")).await.unwrap();
        assert_eq!(ok.structured_content, Some(json!({"result": "ok\n"})));
        assert_ne!(ok.is_error, Some(true));

        // A failing run is still a tool result, not an error.
        let failed = server.invoke_gemini(args("fail")).await.unwrap();
        assert_eq!(failed.structured_content, Some(json!({"error": "bad\n"})));
        assert_ne!(failed.is_error, Some(true));
    }
}
