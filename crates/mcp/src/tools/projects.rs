use crucible_client::CrucibleApi;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_args, ToolDefinition};
use crate::dispatch::ToolError;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_project".to_string(),
            description: "Get details of a specific project, including its description and project lead".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Unique project identifier, usually the project name (case sensitive)"
                    }
                },
                "required": ["project_id"]
            }),
        },
        ToolDefinition {
            name: "list_projects".to_string(),
            description: "List accessible projects, optionally only those associated with a user".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "orcid": {
                        "type": "string",
                        "description": "Only list projects associated with this ORCID (optional)"
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
            name: "get_user".to_string(),
            description: "Get user details by ORCID or email. Requires admin permissions. If both are given, ORCID is used".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "orcid": {
                        "type": "string",
                        "description": "ORCID identifier (format: 0000-0000-0000-000X)"
                    },
                    "email": {
                        "type": "string",
                        "description": "Email address of the user"
                    }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "get_account".to_string(),
            description: "Get the account associated with the configured API key".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        ToolDefinition {
            name: "get_project_users".to_string(),
            description: "Get team members of a project, excluding the project lead. Requires admin permissions".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Unique project identifier"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 100
                    }
                },
                "required": ["project_id"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct GetProjectArgs {
    project_id: String,
}

#[derive(Debug, Deserialize)]
struct ListProjectsArgs {
    orcid: Option<String>,
    #[serde(default = "super::default_limit")]
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct GetUserArgs {
    orcid: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectUsersArgs {
    project_id: String,
    #[serde(default = "super::default_limit")]
    limit: usize,
}

pub fn call(client: &dyn CrucibleApi, name: &str, arguments: Value) -> Result<Value, ToolError> {
    let result = match name {
        "get_project" => {
            let args: GetProjectArgs = parse_args(name, arguments)?;
            client.get_project(&args.project_id)
        }
        "list_projects" => {
            let args: ListProjectsArgs = parse_args(name, arguments)?;
            client.list_projects(args.orcid.as_deref(), args.limit)
        }
        "get_user" => {
            let args: GetUserArgs = parse_args(name, arguments)?;
            client.get_user(args.orcid.as_deref(), args.email.as_deref())
        }
        "get_account" => client.get_account(),
        "get_project_users" => {
            let args: ProjectUsersArgs = parse_args(name, arguments)?;
            client.get_project_users(&args.project_id, args.limit)
        }
        _ => {
            return Err(ToolError::UnknownTool {
                name: name.to_string(),
            })
        }
    };

    result.map_err(|e| ToolError::api(name, e))
}
