use serde_json::Value;
use std::path::Path;

use crate::error::ApiError;
use crate::types::{DatasetFilter, DatasetUpdate, NewDataset, NewSample, RequestType, SampleFilter};

/// Every call returns plain JSON. `Value::Null` means the operation had no
/// return value.
pub type ApiResult = Result<Value, ApiError>;

/// Synchronous interface to the Crucible platform, one method per MCP tool.
///
/// Implementations must tolerate concurrent use from several threads; the tool
/// layer holds a single shared instance for the life of the process.
pub trait CrucibleApi: Send + Sync {
    // Projects and users
    fn get_project(&self, project_id: &str) -> ApiResult;
    fn list_projects(&self, orcid: Option<&str>, limit: usize) -> ApiResult;
    /// Looks a user up by ORCID, falling back to email when no ORCID is given.
    fn get_user(&self, orcid: Option<&str>, email: Option<&str>) -> ApiResult;
    fn get_account(&self) -> ApiResult;
    fn get_project_users(&self, project_id: &str, limit: usize) -> ApiResult;

    // Datasets
    fn get_dataset(&self, dsid: &str, include_metadata: bool) -> ApiResult;
    fn list_datasets(
        &self,
        sample_id: Option<&str>,
        limit: usize,
        filter: &DatasetFilter,
    ) -> ApiResult;
    fn create_dataset(&self, dataset: &NewDataset) -> ApiResult;
    fn update_dataset(&self, dsid: &str, update: &DatasetUpdate) -> ApiResult;
    fn download_dataset(
        &self,
        dsid: &str,
        file_name: Option<&str>,
        output_path: Option<&Path>,
    ) -> ApiResult;
    fn upload_dataset(&self, dsid: &str, file_path: &Path) -> ApiResult;
    fn request_ingestion(
        &self,
        dsid: &str,
        file_to_upload: Option<&str>,
        ingestion_class: Option<&str>,
    ) -> ApiResult;
    fn send_to_scicat(&self, dsid: &str, wait_for_response: bool) -> ApiResult;
    fn get_request_status(&self, dsid: &str, reqid: &str, request_type: RequestType)
        -> ApiResult;
    fn get_google_drive_location(&self, dsid: &str) -> ApiResult;

    // Scientific metadata and attachments
    fn get_scientific_metadata(&self, dsid: &str) -> ApiResult;
    fn update_scientific_metadata(&self, dsid: &str, metadata: &Value, overwrite: bool)
        -> ApiResult;
    fn get_keywords(&self, dsid: Option<&str>, limit: usize) -> ApiResult;
    fn add_dataset_keyword(&self, dsid: &str, keyword: &str) -> ApiResult;
    fn get_thumbnails(&self, dsid: &str, limit: usize) -> ApiResult;
    fn add_thumbnail(&self, dsid: &str, file_path: &Path, thumbnail_name: Option<&str>)
        -> ApiResult;
    fn get_associated_files(&self, dsid: &str, limit: usize) -> ApiResult;
    fn add_associated_file(&self, dsid: &str, file_path: &Path, filename: Option<&str>)
        -> ApiResult;

    // Instruments
    fn list_instruments(&self, limit: usize) -> ApiResult;
    fn get_instrument(&self, instrument_name: Option<&str>, instrument_id: Option<&str>)
        -> ApiResult;
    fn get_or_add_instrument(
        &self,
        instrument_name: &str,
        location: Option<&str>,
        instrument_owner: Option<&str>,
    ) -> ApiResult;

    // Samples
    fn get_sample(&self, sample_id: &str) -> ApiResult;
    fn list_samples(
        &self,
        dataset_id: Option<&str>,
        parent_id: Option<&str>,
        limit: usize,
        filter: &SampleFilter,
    ) -> ApiResult;
    fn add_sample(&self, sample: &NewSample) -> ApiResult;
    fn add_sample_to_dataset(&self, dataset_id: &str, sample_id: &str) -> ApiResult;
}
