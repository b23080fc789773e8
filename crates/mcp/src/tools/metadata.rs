use crucible_client::CrucibleApi;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

use super::{parse_args, DatasetArgs, ToolDefinition};
use crate::dispatch::ToolError;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_scientific_metadata".to_string(),
            description: "Get the scientific metadata of a dataset".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" }
                },
                "required": ["dsid"]
            }),
        },
        ToolDefinition {
            name: "update_scientific_metadata".to_string(),
            description: "Update the scientific metadata of a dataset. Merges into existing metadata unless overwrite is set".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "metadata": {
                        "type": "object",
                        "description": "Scientific metadata to write"
                    },
                    "overwrite": {
                        "type": "boolean",
                        "description": "Replace existing metadata instead of merging",
                        "default": false
                    }
                },
                "required": ["dsid", "metadata"]
            }),
        },
        ToolDefinition {
            name: "get_keywords".to_string(),
            description: "List keywords with their dataset counts, optionally only those of one dataset".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": {
                        "type": "string",
                        "description": "Only list keywords of this dataset (optional)"
                    },
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
            name: "add_dataset_keyword".to_string(),
            description: "Attach a keyword to a dataset".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "keyword": { "type": "string", "description": "Keyword to add" }
                },
                "required": ["dsid", "keyword"]
            }),
        },
        ToolDefinition {
            name: "get_thumbnails".to_string(),
            description: "List thumbnails of a dataset (base64-encoded images)".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 100
                    }
                },
                "required": ["dsid"]
            }),
        },
        ToolDefinition {
            name: "add_thumbnail".to_string(),
            description: "Attach a local image file to a dataset as a thumbnail".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "file_path": { "type": "string", "description": "Path to the image file" },
                    "thumbnail_name": {
                        "type": "string",
                        "description": "Display name (optional, defaults to the file name)"
                    }
                },
                "required": ["dsid", "file_path"]
            }),
        },
        ToolDefinition {
            name: "get_associated_files".to_string(),
            description: "List files associated with a dataset, with names, sizes and hashes".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 100
                    }
                },
                "required": ["dsid"]
            }),
        },
        ToolDefinition {
            name: "add_associated_file".to_string(),
            description: "Register a local file as associated with a dataset (records name, size and SHA-256)".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "file_path": { "type": "string", "description": "Path to the file" },
                    "filename": {
                        "type": "string",
                        "description": "Name to record (optional, defaults to the file name)"
                    }
                },
                "required": ["dsid", "file_path"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct UpdateMetadataArgs {
    dsid: String,
    metadata: Map<String, Value>,
    #[serde(default)]
    overwrite: bool,
}

#[derive(Debug, Deserialize)]
struct KeywordsArgs {
    dsid: Option<String>,
    #[serde(default = "super::default_limit")]
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct AddKeywordArgs {
    dsid: String,
    keyword: String,
}

#[derive(Debug, Deserialize)]
struct LimitedDatasetArgs {
    dsid: String,
    #[serde(default = "super::default_limit")]
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct AddThumbnailArgs {
    dsid: String,
    file_path: PathBuf,
    thumbnail_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddAssociatedFileArgs {
    dsid: String,
    file_path: PathBuf,
    filename: Option<String>,
}

pub fn call(client: &dyn CrucibleApi, name: &str, arguments: Value) -> Result<Value, ToolError> {
    let result = match name {
        "get_scientific_metadata" => {
            let args: DatasetArgs = parse_args(name, arguments)?;
            client.get_scientific_metadata(&args.dsid)
        }
        "update_scientific_metadata" => {
            let args: UpdateMetadataArgs = parse_args(name, arguments)?;
            client.update_scientific_metadata(&args.dsid, &Value::Object(args.metadata), args.overwrite)
        }
        "get_keywords" => {
            let args: KeywordsArgs = parse_args(name, arguments)?;
            client.get_keywords(args.dsid.as_deref(), args.limit)
        }
        "add_dataset_keyword" => {
            let args: AddKeywordArgs = parse_args(name, arguments)?;
            client.add_dataset_keyword(&args.dsid, &args.keyword)
        }
        "get_thumbnails" => {
            let args: LimitedDatasetArgs = parse_args(name, arguments)?;
            client.get_thumbnails(&args.dsid, args.limit)
        }
        "add_thumbnail" => {
            let args: AddThumbnailArgs = parse_args(name, arguments)?;
            client.add_thumbnail(&args.dsid, &args.file_path, args.thumbnail_name.as_deref())
        }
        "get_associated_files" => {
            let args: LimitedDatasetArgs = parse_args(name, arguments)?;
            client.get_associated_files(&args.dsid, args.limit)
        }
        "add_associated_file" => {
            let args: AddAssociatedFileArgs = parse_args(name, arguments)?;
            client.add_associated_file(&args.dsid, &args.file_path, args.filename.as_deref())
        }
        _ => {
            return Err(ToolError::UnknownTool {
                name: name.to_string(),
            })
        }
    };

    result.map_err(|e| ToolError::api(name, e))
}
