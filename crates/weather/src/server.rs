//! The MCP surface: one `getCurrentWeather` tool.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Implementation, JsonObject, ServerCapabilities, ServerInfo, Tool};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Deserialize;
use serde_json::json;

use crate::client::WeatherClient;

/// Name reported in the initialize handshake.
pub const SERVER_NAME: &str = "weather-server";

pub const TOOL_NAME: &str = "getCurrentWeather";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetCurrentWeatherArgs {
    /// The city and state, e.g. San Francisco, CA
    pub location: String,
}

// Not enforced; an unknown location yields `{error}`.
fn output_schema() -> Arc<JsonObject> {
    let schema = json!({
        "type": "object",
        "properties": {
            "temperature": {"type": "number"},
            "windspeed": {"type": "number"},
            "winddirection": {"type": "number"},
            "weathercode": {"type": "number"},
            "is_day": {"type": "number"},
            "time": {"type": "string"}
        },
        "required": ["temperature", "windspeed", "winddirection", "weathercode", "is_day", "time"],
        "additionalProperties": false,
        "$schema": "http://json-schema.org/draft-07/schema#"
    });
    Arc::new(serde_json::from_value(schema).unwrap_or_default())
}

/// Current conditions for a free-text location.
#[derive(Clone)]
pub struct WeatherServer {
    client: WeatherClient,
    tool_router: ToolRouter<Self>,
}

impl Default for WeatherServer {
    fn default() -> Self {
        Self::new(WeatherClient::default())
    }
}

#[tool_router]
impl WeatherServer {
    pub fn new(client: WeatherClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    #[tool(
        name = "getCurrentWeather",
        title = "Current Weather Tool",
        description = "Get the current weather for a specified location",
        output_schema = output_schema()
    )]
    pub async fn get_current_weather(
        &self,
        Parameters(args): Parameters<GetCurrentWeatherArgs>,
    ) -> Result<CallToolResult, McpError> {
        let output = self.client.lookup(&args.location).await?;
        let value = serde_json::to_value(output)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::structured(value))
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
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

    fn unreachable_client() -> WeatherClient {
        // Port 9 on loopback is closed in test environments.
        WeatherClient::new()
            .with_geocode_url("http://127.0.0.1:9/search")
            .with_forecast_url("http://127.0.0.1:9/v1/forecast")
    }

    #[test]
    fn serves_exactly_one_tool() {
        let tools = WeatherServer::default().tools();
        assert_eq!(tools.len(), 1);

        let tool = &tools[0];
        assert_eq!(tool.name, TOOL_NAME);
        assert_eq!(tool.title.as_deref(), Some("Current Weather Tool"));
        assert_eq!(tool.input_schema["required"], json!(["location"]));

        let output = tool.output_schema.as_ref().unwrap();
        let fields = output["properties"].as_object().unwrap();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields["time"]["type"], "string");
        assert_eq!(fields["is_day"]["type"], "number");
    }

    #[test]
    fn reports_its_identity() {
        let info = WeatherServer::default().get_info();
        assert_eq!(info.server_info.name, "weather-server");
    }

    #[test]
    fn location_must_be_a_string() {
        let args = serde_json::from_value::<GetCurrentWeatherArgs>(json!({"location": 42}));
        assert!(args.is_err());
    }

    #[tokio::test]
    async fn network_failure_is_a_protocol_fault() {
        let server = WeatherServer::new(unreachable_client());
        let err = server
            .get_current_weather(Parameters(GetCurrentWeatherArgs {
                location: "Paris".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32603);
    }
}
