#![allow(dead_code)]

use crucible_client::{
    ApiError, ApiResult, CrucibleApi, DatasetFilter, DatasetUpdate, NewDataset, NewSample,
    RequestType, SampleFilter,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub args: Value,
}

enum Reply {
    Value(Value),
    Fail(u16, String),
}

/// Records every client call and answers with canned replies.
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<HashMap<&'static str, Reply>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: &'static str, value: Value) {
        self.replies.lock().unwrap().insert(method, Reply::Value(value));
    }

    pub fn fail(&self, method: &'static str, status: u16, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(method, Reply::Fail(status, message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn record(&self, method: &'static str, args: Value) -> ApiResult {
        self.calls.lock().unwrap().push(Call { method, args });
        match self.replies.lock().unwrap().get(method) {
            Some(Reply::Value(v)) => Ok(v.clone()),
            Some(Reply::Fail(status, message)) => Err(ApiError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(json!({ "method": method })),
        }
    }
}

fn path_arg(path: Option<&Path>) -> Value {
    path.map(|p| json!(p.display().to_string())).unwrap_or(Value::Null)
}

impl CrucibleApi for RecordingClient {
    fn get_project(&self, project_id: &str) -> ApiResult {
        self.record("get_project", json!({ "project_id": project_id }))
    }

    fn list_projects(&self, orcid: Option<&str>, limit: usize) -> ApiResult {
        self.record("list_projects", json!({ "orcid": orcid, "limit": limit }))
    }

    fn get_user(&self, orcid: Option<&str>, email: Option<&str>) -> ApiResult {
        self.record("get_user", json!({ "orcid": orcid, "email": email }))
    }

    fn get_account(&self) -> ApiResult {
        self.record("get_account", json!({}))
    }

    fn get_project_users(&self, project_id: &str, limit: usize) -> ApiResult {
        self.record("get_project_users", json!({ "project_id": project_id, "limit": limit }))
    }

    fn get_dataset(&self, dsid: &str, include_metadata: bool) -> ApiResult {
        self.record(
            "get_dataset",
            json!({ "dsid": dsid, "include_metadata": include_metadata }),
        )
    }

    fn list_datasets(&self, sample_id: Option<&str>, limit: usize, filter: &DatasetFilter) -> ApiResult {
        self.record(
            "list_datasets",
            json!({ "sample_id": sample_id, "limit": limit, "filter": filter }),
        )
    }

    fn create_dataset(&self, dataset: &NewDataset) -> ApiResult {
        self.record("create_dataset", json!(dataset))
    }

    fn update_dataset(&self, dsid: &str, update: &DatasetUpdate) -> ApiResult {
        self.record("update_dataset", json!({ "dsid": dsid, "update": update }))
    }

    fn download_dataset(&self, dsid: &str, file_name: Option<&str>, output_path: Option<&Path>) -> ApiResult {
        self.record(
            "download_dataset",
            json!({ "dsid": dsid, "file_name": file_name, "output_path": path_arg(output_path) }),
        )
    }

    fn upload_dataset(&self, dsid: &str, file_path: &Path) -> ApiResult {
        self.record(
            "upload_dataset",
            json!({ "dsid": dsid, "file_path": path_arg(Some(file_path)) }),
        )
    }

    fn request_ingestion(&self, dsid: &str, file_to_upload: Option<&str>, ingestion_class: Option<&str>) -> ApiResult {
        self.record(
            "request_ingestion",
            json!({ "dsid": dsid, "file_to_upload": file_to_upload, "ingestion_class": ingestion_class }),
        )
    }

    fn send_to_scicat(&self, dsid: &str, wait_for_response: bool) -> ApiResult {
        self.record(
            "send_to_scicat",
            json!({ "dsid": dsid, "wait_for_response": wait_for_response }),
        )
    }

    fn get_request_status(&self, dsid: &str, reqid: &str, request_type: RequestType) -> ApiResult {
        self.record(
            "get_request_status",
            json!({ "dsid": dsid, "reqid": reqid, "request_type": request_type }),
        )
    }

    fn get_google_drive_location(&self, dsid: &str) -> ApiResult {
        self.record("get_google_drive_location", json!({ "dsid": dsid }))
    }

    fn get_scientific_metadata(&self, dsid: &str) -> ApiResult {
        self.record("get_scientific_metadata", json!({ "dsid": dsid }))
    }

    fn update_scientific_metadata(&self, dsid: &str, metadata: &Value, overwrite: bool) -> ApiResult {
        self.record(
            "update_scientific_metadata",
            json!({ "dsid": dsid, "metadata": metadata, "overwrite": overwrite }),
        )
    }

    fn get_keywords(&self, dsid: Option<&str>, limit: usize) -> ApiResult {
        self.record("get_keywords", json!({ "dsid": dsid, "limit": limit }))
    }

    fn add_dataset_keyword(&self, dsid: &str, keyword: &str) -> ApiResult {
        self.record("add_dataset_keyword", json!({ "dsid": dsid, "keyword": keyword }))
    }

    fn get_thumbnails(&self, dsid: &str, limit: usize) -> ApiResult {
        self.record("get_thumbnails", json!({ "dsid": dsid, "limit": limit }))
    }

    fn add_thumbnail(&self, dsid: &str, file_path: &Path, thumbnail_name: Option<&str>) -> ApiResult {
        self.record(
            "add_thumbnail",
            json!({ "dsid": dsid, "file_path": path_arg(Some(file_path)), "thumbnail_name": thumbnail_name }),
        )
    }

    fn get_associated_files(&self, dsid: &str, limit: usize) -> ApiResult {
        self.record("get_associated_files", json!({ "dsid": dsid, "limit": limit }))
    }

    fn add_associated_file(&self, dsid: &str, file_path: &Path, filename: Option<&str>) -> ApiResult {
        self.record(
            "add_associated_file",
            json!({ "dsid": dsid, "file_path": path_arg(Some(file_path)), "filename": filename }),
        )
    }

    fn list_instruments(&self, limit: usize) -> ApiResult {
        self.record("list_instruments", json!({ "limit": limit }))
    }

    fn get_instrument(&self, instrument_name: Option<&str>, instrument_id: Option<&str>) -> ApiResult {
        self.record(
            "get_instrument",
            json!({ "instrument_name": instrument_name, "instrument_id": instrument_id }),
        )
    }

    fn get_or_add_instrument(&self, instrument_name: &str, location: Option<&str>, instrument_owner: Option<&str>) -> ApiResult {
        self.record(
            "get_or_add_instrument",
            json!({ "instrument_name": instrument_name, "location": location, "instrument_owner": instrument_owner }),
        )
    }

    fn get_sample(&self, sample_id: &str) -> ApiResult {
        self.record("get_sample", json!({ "sample_id": sample_id }))
    }

    fn list_samples(&self, dataset_id: Option<&str>, parent_id: Option<&str>, limit: usize, filter: &SampleFilter) -> ApiResult {
        self.record(
            "list_samples",
            json!({ "dataset_id": dataset_id, "parent_id": parent_id, "limit": limit, "filter": filter }),
        )
    }

    fn add_sample(&self, sample: &NewSample) -> ApiResult {
        self.record("add_sample", json!(sample))
    }

    fn add_sample_to_dataset(&self, dataset_id: &str, sample_id: &str) -> ApiResult {
        self.record(
            "add_sample_to_dataset",
            json!({ "dataset_id": dataset_id, "sample_id": sample_id }),
        )
    }
}
