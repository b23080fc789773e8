use crucible_client::{CrucibleApi, DatasetFilter, DatasetUpdate, NewDataset, RequestType};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use super::{parse_args, DatasetArgs, ToolDefinition};
use crate::dispatch::ToolError;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_dataset".to_string(),
            description: "Get dataset details, optionally including scientific metadata".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": {
                        "type": "string",
                        "description": "Dataset unique identifier"
                    },
                    "include_metadata": {
                        "type": "boolean",
                        "description": "Whether to include scientific metadata",
                        "default": false
                    }
                },
                "required": ["dsid"]
            }),
        },
        ToolDefinition {
            name: "list_datasets".to_string(),
            description: "List datasets with optional filtering. Filters are exact, case-sensitive matches, except keyword which matches substrings case-insensitively (keyword 'TEM' matches TEM, tem, Stem)".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "sample_id": {
                        "type": "string",
                        "description": "Only list datasets associated with this sample"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 100
                    },
                    "keyword": {
                        "type": "string",
                        "description": "Case-insensitive substring match on dataset keywords"
                    },
                    "unique_id": {
                        "type": "string",
                        "description": "Filter by dataset unique ID"
                    },
                    "public": {
                        "type": "boolean",
                        "description": "Filter by public visibility"
                    },
                    "dataset_name": {
                        "type": "string",
                        "description": "Filter by dataset name"
                    },
                    "owner_orcid": {
                        "type": "string",
                        "description": "Filter by owner ORCID"
                    },
                    "project_id": {
                        "type": "string",
                        "description": "Filter by project"
                    },
                    "instrument_name": {
                        "type": "string",
                        "description": "Filter by instrument name"
                    },
                    "source_folder": {
                        "type": "string",
                        "description": "Filter by source folder"
                    },
                    "creation_time": {
                        "type": "string",
                        "description": "Filter by creation time"
                    },
                    "size": {
                        "type": "integer",
                        "description": "Filter by size in bytes"
                    },
                    "data_format": {
                        "type": "string",
                        "description": "Filter by data format"
                    },
                    "measurement": {
                        "type": "string",
                        "description": "Filter by measurement type"
                    },
                    "session_name": {
                        "type": "string",
                        "description": "Filter by session name"
                    },
                    "file_to_upload": {
                        "type": "string",
                        "description": "Filter by primary file name"
                    },
                    "sha256_hash_file_to_upload": {
                        "type": "string",
                        "description": "Filter by SHA-256 hash of the primary file"
                    }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "create_dataset".to_string(),
            description: "Create a new dataset record with metadata".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dataset_name": { "type": "string", "description": "Name of the dataset" },
                    "unique_id": { "type": "string", "description": "Unique identifier for the dataset" },
                    "public": {
                        "type": "boolean",
                        "description": "Whether the dataset is public",
                        "default": false
                    },
                    "owner_orcid": { "type": "string", "description": "ORCID of the dataset owner" },
                    "project_id": { "type": "string", "description": "Project the dataset belongs to" },
                    "instrument_name": { "type": "string", "description": "Instrument used" },
                    "measurement": { "type": "string", "description": "Type of measurement" },
                    "session_name": { "type": "string", "description": "Measurement session name" },
                    "data_format": { "type": "string", "description": "Format of the data" },
                    "source_folder": { "type": "string", "description": "Folder the data came from" },
                    "scientific_metadata": {
                        "type": "object",
                        "description": "Scientific metadata to attach"
                    },
                    "keywords": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Keywords to associate with the dataset"
                    }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "update_dataset".to_string(),
            description: "Update fields of an existing dataset. Only the fields given are changed".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "dataset_name": { "type": "string", "description": "New dataset name" },
                    "public": { "type": "boolean", "description": "New public visibility" },
                    "owner_orcid": { "type": "string", "description": "New owner ORCID" },
                    "project_id": { "type": "string", "description": "New project" },
                    "instrument_name": { "type": "string", "description": "New instrument name" },
                    "measurement": { "type": "string", "description": "New measurement type" },
                    "session_name": { "type": "string", "description": "New session name" },
                    "data_format": { "type": "string", "description": "New data format" },
                    "source_folder": { "type": "string", "description": "New source folder" }
                },
                "required": ["dsid"]
            }),
        },
        ToolDefinition {
            name: "download_dataset".to_string(),
            description: "Download a dataset file to the local filesystem".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "file_name": {
                        "type": "string",
                        "description": "File to download (optional, defaults to the dataset's file_to_upload)"
                    },
                    "output_path": {
                        "type": "string",
                        "description": "Local path to save the file (optional, defaults to crucible-downloads/<file name>)"
                    }
                },
                "required": ["dsid"]
            }),
        },
        ToolDefinition {
            name: "upload_dataset".to_string(),
            description: "Upload a local file to a dataset".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "file_path": { "type": "string", "description": "Path to the file to upload" }
                },
                "required": ["dsid", "file_path"]
            }),
        },
        ToolDefinition {
            name: "request_ingestion".to_string(),
            description: "Request server-side ingestion of a dataset file".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "file_to_upload": { "type": "string", "description": "File to ingest (optional)" },
                    "ingestion_class": { "type": "string", "description": "Ingestion class to use (optional)" }
                },
                "required": ["dsid"]
            }),
        },
        ToolDefinition {
            name: "send_to_scicat".to_string(),
            description: "Request that a dataset record be pushed to SciCat".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "wait_for_response": {
                        "type": "boolean",
                        "description": "Wait until SciCat reports a final status",
                        "default": false
                    }
                },
                "required": ["dsid"]
            }),
        },
        ToolDefinition {
            name: "get_request_status".to_string(),
            description: "Get the status of an ingestion or SciCat update request".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" },
                    "reqid": { "type": "string", "description": "Request ID" },
                    "request_type": {
                        "type": "string",
                        "description": "Type of request",
                        "enum": ["ingest", "scicat_update"]
                    }
                },
                "required": ["dsid", "reqid", "request_type"]
            }),
        },
        ToolDefinition {
            name: "get_google_drive_location".to_string(),
            description: "Get the current Google Drive location of a dataset".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dsid": { "type": "string", "description": "Dataset ID" }
                },
                "required": ["dsid"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct GetDatasetArgs {
    dsid: String,
    #[serde(default)]
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct ListDatasetsArgs {
    sample_id: Option<String>,
    #[serde(default = "super::default_limit")]
    limit: usize,
    #[serde(flatten)]
    filter: DatasetFilter,
}

#[derive(Debug, Deserialize)]
struct UpdateDatasetArgs {
    dsid: String,
    #[serde(flatten)]
    update: DatasetUpdate,
}

#[derive(Debug, Deserialize)]
struct DownloadArgs {
    dsid: String,
    file_name: Option<String>,
    output_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct UploadArgs {
    dsid: String,
    file_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct IngestionArgs {
    dsid: String,
    file_to_upload: Option<String>,
    ingestion_class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScicatArgs {
    dsid: String,
    #[serde(default)]
    wait_for_response: bool,
}

#[derive(Debug, Deserialize)]
struct RequestStatusArgs {
    dsid: String,
    #[serde(deserialize_with = "super::string_or_number")]
    reqid: String,
    request_type: RequestType,
}

pub fn call(client: &dyn CrucibleApi, name: &str, arguments: Value) -> Result<Value, ToolError> {
    let result = match name {
        "get_dataset" => {
            let args: GetDatasetArgs = parse_args(name, arguments)?;
            client.get_dataset(&args.dsid, args.include_metadata)
        }
        "list_datasets" => {
            let args: ListDatasetsArgs = parse_args(name, arguments)?;
            client.list_datasets(args.sample_id.as_deref(), args.limit, &args.filter)
        }
        "create_dataset" => {
            let dataset: NewDataset = parse_args(name, arguments)?;
            client.create_dataset(&dataset)
        }
        "update_dataset" => {
            let args: UpdateDatasetArgs = parse_args(name, arguments)?;
            client.update_dataset(&args.dsid, &args.update)
        }
        "download_dataset" => {
            let args: DownloadArgs = parse_args(name, arguments)?;
            client.download_dataset(
                &args.dsid,
                args.file_name.as_deref(),
                args.output_path.as_deref(),
            )
        }
        "upload_dataset" => {
            let args: UploadArgs = parse_args(name, arguments)?;
            client.upload_dataset(&args.dsid, &args.file_path)
        }
        "request_ingestion" => {
            let args: IngestionArgs = parse_args(name, arguments)?;
            client.request_ingestion(
                &args.dsid,
                args.file_to_upload.as_deref(),
                args.ingestion_class.as_deref(),
            )
        }
        "send_to_scicat" => {
            let args: ScicatArgs = parse_args(name, arguments)?;
            client.send_to_scicat(&args.dsid, args.wait_for_response)
        }
        "get_request_status" => {
            let args: RequestStatusArgs = parse_args(name, arguments)?;
            client.get_request_status(&args.dsid, &args.reqid, args.request_type)
        }
        "get_google_drive_location" => {
            let args: DatasetArgs = parse_args(name, arguments)?;
            client.get_google_drive_location(&args.dsid)
        }
        _ => {
            return Err(ToolError::UnknownTool {
                name: name.to_string(),
            })
        }
    };

    result.map_err(|e| ToolError::api(name, e))
}
