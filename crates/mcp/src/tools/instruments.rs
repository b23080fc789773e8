use crucible_client::CrucibleApi;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_args, ToolDefinition};
use crate::dispatch::ToolError;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "list_instruments".to_string(),
            description: "List all available instruments".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 100
                    }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "get_instrument".to_string(),
            description: "Get an instrument by name or ID. Returns nothing if no instrument matches".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "instrument_name": {
                        "type": "string",
                        "description": "Name of the instrument"
                    },
                    "instrument_id": {
                        "type": "string",
                        "description": "Unique ID of the instrument"
                    }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "get_or_add_instrument".to_string(),
            description: "Get an instrument by name, creating it if it does not exist".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "instrument_name": {
                        "type": "string",
                        "description": "Name of the instrument"
                    },
                    "location": {
                        "type": "string",
                        "description": "Where the instrument is located"
                    },
                    "instrument_owner": {
                        "type": "string",
                        "description": "Owner of the instrument"
                    }
                },
                "required": ["instrument_name"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct ListInstrumentsArgs {
    #[serde(default = "super::default_limit")]
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct GetInstrumentArgs {
    instrument_name: Option<String>,
    #[serde(default, deserialize_with = "super::optional_string_or_number")]
    instrument_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetOrAddInstrumentArgs {
    instrument_name: String,
    location: Option<String>,
    instrument_owner: Option<String>,
}

pub fn call(client: &dyn CrucibleApi, name: &str, arguments: Value) -> Result<Value, ToolError> {
    let result = match name {
        "list_instruments" => {
            let args: ListInstrumentsArgs = parse_args(name, arguments)?;
            client.list_instruments(args.limit)
        }
        "get_instrument" => {
            let args: GetInstrumentArgs = parse_args(name, arguments)?;
            client.get_instrument(args.instrument_name.as_deref(), args.instrument_id.as_deref())
        }
        "get_or_add_instrument" => {
            let args: GetOrAddInstrumentArgs = parse_args(name, arguments)?;
            client.get_or_add_instrument(
                &args.instrument_name,
                args.location.as_deref(),
                args.instrument_owner.as_deref(),
            )
        }
        _ => {
            return Err(ToolError::UnknownTool {
                name: name.to_string(),
            })
        }
    };

    result.map_err(|e| ToolError::api(name, e))
}
