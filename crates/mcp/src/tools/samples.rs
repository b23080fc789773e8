use crucible_client::{CrucibleApi, NewSample, SampleFilter};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_args, ToolDefinition};
use crate::dispatch::ToolError;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_sample".to_string(),
            description: "Get a sample and its associated datasets".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "sample_id": { "type": "string", "description": "Sample unique identifier" }
                },
                "required": ["sample_id"]
            }),
        },
        ToolDefinition {
            name: "list_samples".to_string(),
            description: "List samples, optionally those of a dataset or the children of a parent sample, with exact-match filters".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dataset_id": {
                        "type": "string",
                        "description": "Only list samples of this dataset"
                    },
                    "parent_id": {
                        "type": "string",
                        "description": "Only list children of this sample"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 100
                    },
                    "unique_id": { "type": "string", "description": "Filter by sample unique ID" },
                    "sample_name": { "type": "string", "description": "Filter by sample name" },
                    "owner_orcid": { "type": "string", "description": "Filter by owner ORCID" },
                    "date_created": { "type": "string", "description": "Filter by creation date" },
                    "description": { "type": "string", "description": "Filter by description" }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "add_sample".to_string(),
            description: "Create a new sample".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "unique_id": { "type": "string", "description": "Unique ID for the sample" },
                    "sample_name": { "type": "string", "description": "Name of the sample" },
                    "description": { "type": "string", "description": "Description of the sample" },
                    "creation_date": { "type": "string", "description": "Creation date in ISO 8601 format" },
                    "owner_orcid": { "type": "string", "description": "ORCID of the sample owner" }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "add_sample_to_dataset".to_string(),
            description: "Link a sample to a dataset".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dataset_id": { "type": "string", "description": "Dataset ID" },
                    "sample_id": { "type": "string", "description": "Sample ID" }
                },
                "required": ["dataset_id", "sample_id"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct GetSampleArgs {
    sample_id: String,
}

#[derive(Debug, Deserialize)]
struct ListSamplesArgs {
    dataset_id: Option<String>,
    parent_id: Option<String>,
    #[serde(default = "super::default_limit")]
    limit: usize,
    #[serde(flatten)]
    filter: SampleFilter,
}

#[derive(Debug, Deserialize)]
struct LinkSampleArgs {
    dataset_id: String,
    sample_id: String,
}

pub fn call(client: &dyn CrucibleApi, name: &str, arguments: Value) -> Result<Value, ToolError> {
    let result = match name {
        "get_sample" => {
            let args: GetSampleArgs = parse_args(name, arguments)?;
            client.get_sample(&args.sample_id)
        }
        "list_samples" => {
            let args: ListSamplesArgs = parse_args(name, arguments)?;
            client.list_samples(
                args.dataset_id.as_deref(),
                args.parent_id.as_deref(),
                args.limit,
                &args.filter,
            )
        }
        "add_sample" => {
            let sample: NewSample = parse_args(name, arguments)?;
            client.add_sample(&sample)
        }
        "add_sample_to_dataset" => {
            let args: LinkSampleArgs = parse_args(name, arguments)?;
            client.add_sample_to_dataset(&args.dataset_id, &args.sample_id)
        }
        _ => {
            return Err(ToolError::UnknownTool {
                name: name.to_string(),
            })
        }
    };

    result.map_err(|e| ToolError::api(name, e))
}
