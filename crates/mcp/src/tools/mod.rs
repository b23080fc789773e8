//! The tool registry: names, descriptions and input schemas of every tool, and
//! the routing of a call to the module that owns it.

mod datasets;
mod instruments;
mod metadata;
mod projects;
mod samples;

use crucible_client::CrucibleApi;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::dispatch::ToolError;

/// Applied wherever a tool takes a `limit` and the caller omits it.
pub const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub fn list_tools() -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    tools.extend(projects::definitions());
    tools.extend(datasets::definitions());
    tools.extend(metadata::definitions());
    tools.extend(instruments::definitions());
    tools.extend(samples::definitions());
    tools
}

pub fn call_tool(client: &dyn CrucibleApi, name: &str, arguments: Value) -> Result<Value, ToolError> {
    match name {
        "get_project" | "list_projects" | "get_user" | "get_account" | "get_project_users" => {
            projects::call(client, name, arguments)
        }
        "get_dataset" | "list_datasets" | "create_dataset" | "update_dataset"
        | "download_dataset" | "upload_dataset" | "request_ingestion" | "send_to_scicat"
        | "get_request_status" | "get_google_drive_location" => {
            datasets::call(client, name, arguments)
        }
        "get_scientific_metadata" | "update_scientific_metadata" | "get_keywords"
        | "add_dataset_keyword" | "get_thumbnails" | "add_thumbnail" | "get_associated_files"
        | "add_associated_file" => metadata::call(client, name, arguments),
        "list_instruments" | "get_instrument" | "get_or_add_instrument" => {
            instruments::call(client, name, arguments)
        }
        "get_sample" | "list_samples" | "add_sample" | "add_sample_to_dataset" => {
            samples::call(client, name, arguments)
        }
        _ => Err(ToolError::UnknownTool {
            name: name.to_string(),
        }),
    }
}

pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Arguments of tools that only take a dataset ID.
#[derive(Debug, Deserialize)]
struct DatasetArgs {
    dsid: String,
}

/// Accepts an identifier given either as a JSON string or an integer.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or integer identifier, got {}",
            other
        ))),
    }
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => string_or_number(value).map(Some).map_err(de::Error::custom),
    }
}
