use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::api::{ApiResult, CrucibleApi};
use crate::error::ApiError;
use crate::types::{DatasetFilter, DatasetUpdate, NewDataset, NewSample, RequestType, SampleFilter};

/// Where downloads land when the caller gives no output path.
const DEFAULT_DOWNLOAD_DIR: &str = "crucible-downloads";

const USER_AGENT: &str = concat!("crucible-mcp/", env!("CARGO_PKG_VERSION"));
const SCICAT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const SCICAT_POLL_TIMEOUT: Duration = Duration::from_secs(60);
const TERMINAL_STATUSES: &[&str] = &["complete", "completed", "failed", "error"];

/// Blocking REST adapter for a Crucible deployment.
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
            api_key: api_key.into(),
            poll_interval: SCICAT_POLL_INTERVAL,
            poll_timeout: SCICAT_POLL_TIMEOUT,
        }
    }

    /// Overrides how `send_to_scicat` waits for a terminal request status.
    pub fn with_scicat_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> String {
        let path: Vec<_> = segments.iter().map(|s| urlencoding::encode(s)).collect();
        format!("{}/{}", self.base_url, path.join("/"))
    }

    /// Authenticates and sends a request, turning non-2xx statuses into errors.
    fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.bearer_auth(&self.api_key).send()?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "crucible response");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }
        Ok(response)
    }

    fn send(&self, request: RequestBuilder) -> ApiResult {
        let body = self.execute(request)?.text()?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Like `send`, but a 404 is an empty result instead of an error.
    fn send_optional(&self, request: RequestBuilder) -> ApiResult {
        match self.send(request) {
            Err(e) if e.is_not_found() => Ok(Value::Null),
            other => other,
        }
    }

    fn get(&self, segments: &[&str]) -> ApiResult {
        self.send(self.client.get(self.url(segments)))
    }

    fn get_limited(&self, segments: &[&str], limit: usize) -> ApiResult {
        self.send(self.client.get(self.url(segments)).query(&[("limit", limit)]))
    }

    fn post_json(&self, segments: &[&str], body: &Value) -> ApiResult {
        self.send(self.client.post(self.url(segments)).json(body))
    }

    fn wait_for_request(&self, dsid: &str, reqid: &str, request_type: RequestType) -> ApiResult {
        let started = Instant::now();
        loop {
            let status = self.get_request_status(dsid, reqid, request_type)?;
            let state = status
                .get("status")
                .and_then(Value::as_str)
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if TERMINAL_STATUSES.contains(&state.as_str()) {
                return Ok(status);
            }
            if started.elapsed() >= self.poll_timeout {
                return Err(ApiError::Timeout {
                    what: format!("{} request {}", request_type, reqid),
                    seconds: self.poll_timeout.as_secs(),
                });
            }
            debug!(dsid, reqid, state = %state, "request still pending");
            thread::sleep(self.poll_interval);
        }
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn file_name_of(path: &Path) -> Result<String, ApiError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ApiError::invalid(format!("not a file path: {}", path.display())))
}

impl CrucibleApi for HttpClient {
    fn get_project(&self, project_id: &str) -> ApiResult {
        self.get(&["projects", project_id])
    }

    fn list_projects(&self, orcid: Option<&str>, limit: usize) -> ApiResult {
        match orcid {
            Some(orcid) => self.get_limited(&["users", orcid, "projects"], limit),
            None => self.get_limited(&["projects"], limit),
        }
    }

    fn get_user(&self, orcid: Option<&str>, email: Option<&str>) -> ApiResult {
        match (orcid, email) {
            (Some(orcid), _) => self.get(&["users", orcid]),
            (None, Some(email)) => {
                let users = self.send(self.client.get(self.url(&["users"])).query(&[("email", email)]))?;
                // The collection endpoint answers with a list even for a unique email.
                Ok(match users {
                    Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
                    Value::Array(_) => Value::Null,
                    other => other,
                })
            }
            (None, None) => Err(ApiError::invalid("either orcid or email must be provided")),
        }
    }

    fn get_account(&self) -> ApiResult {
        self.get(&["account"])
    }

    fn get_project_users(&self, project_id: &str, limit: usize) -> ApiResult {
        self.get_limited(&["projects", project_id, "users"], limit)
    }

    fn get_dataset(&self, dsid: &str, include_metadata: bool) -> ApiResult {
        let mut dataset = self.get(&["datasets", dsid])?;
        if include_metadata {
            let metadata = self.get_scientific_metadata(dsid)?;
            if let Value::Object(fields) = &mut dataset {
                fields.insert("scientific_metadata".to_string(), metadata);
            }
        }
        Ok(dataset)
    }

    fn list_datasets(
        &self,
        sample_id: Option<&str>,
        limit: usize,
        filter: &DatasetFilter,
    ) -> ApiResult {
        let url = match sample_id {
            Some(sample_id) => self.url(&["samples", sample_id, "datasets"]),
            None => self.url(&["datasets"]),
        };
        self.send(self.client.get(url).query(filter).query(&[("limit", limit)]))
    }

    fn create_dataset(&self, dataset: &NewDataset) -> ApiResult {
        self.send(self.client.post(self.url(&["datasets"])).json(dataset))
    }

    fn update_dataset(&self, dsid: &str, update: &DatasetUpdate) -> ApiResult {
        self.send(self.client.patch(self.url(&["datasets", dsid])).json(update))
    }

    fn download_dataset(
        &self,
        dsid: &str,
        file_name: Option<&str>,
        output_path: Option<&Path>,
    ) -> ApiResult {
        let file_name = match file_name {
            Some(name) => name.to_string(),
            None => self
                .get(&["datasets", dsid])?
                .get("file_to_upload")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    ApiError::invalid(format!(
                        "dataset {} has no file_to_upload; pass file_name explicitly",
                        dsid
                    ))
                })?,
        };

        let output_path = match output_path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_DOWNLOAD_DIR).join(file_name_of(Path::new(&file_name))?),
        };

        let mut response =
            self.execute(self.client.get(self.url(&["datasets", dsid, "download", &file_name])))?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = fs::File::create(&output_path)?;
        let bytes = response.copy_to(&mut file)?;
        debug!(dsid, path = %output_path.display(), bytes, "downloaded dataset file");

        Ok(json!({
            "dsid": dsid,
            "file_name": file_name,
            "output_path": output_path.display().to_string(),
            "bytes": bytes,
        }))
    }

    fn upload_dataset(&self, dsid: &str, file_path: &Path) -> ApiResult {
        let form = multipart::Form::new().file("file", file_path)?;
        self.send(self.client.post(self.url(&["datasets", dsid, "upload"])).multipart(form))
    }

    fn request_ingestion(
        &self,
        dsid: &str,
        file_to_upload: Option<&str>,
        ingestion_class: Option<&str>,
    ) -> ApiResult {
        self.post_json(
            &["datasets", dsid, "ingest"],
            &json!({
                "file_to_upload": file_to_upload,
                "ingestion_class": ingestion_class,
            }),
        )
    }

    fn send_to_scicat(&self, dsid: &str, wait_for_response: bool) -> ApiResult {
        let request = self.send(self.client.post(self.url(&["datasets", dsid, "scicat_update"])))?;
        if !wait_for_response {
            return Ok(request);
        }
        match request.get("id").and_then(id_string) {
            Some(reqid) => self.wait_for_request(dsid, &reqid, RequestType::ScicatUpdate),
            None => Err(ApiError::invalid(format!(
                "SciCat update for dataset {} was submitted, but the response carried no request id to wait on: {}",
                dsid, request
            ))),
        }
    }

    fn get_request_status(&self, dsid: &str, reqid: &str, request_type: RequestType) -> ApiResult {
        self.get(&["datasets", dsid, request_type.as_str(), reqid])
    }

    fn get_google_drive_location(&self, dsid: &str) -> ApiResult {
        self.get(&["datasets", dsid, "drive_location"])
    }

    fn get_scientific_metadata(&self, dsid: &str) -> ApiResult {
        self.get(&["datasets", dsid, "scientific_metadata"])
    }

    fn update_scientific_metadata(&self, dsid: &str, metadata: &Value, overwrite: bool) -> ApiResult {
        let url = self.url(&["datasets", dsid, "scientific_metadata"]);
        let request = if overwrite {
            self.client.put(url)
        } else {
            self.client.patch(url)
        };
        self.send(request.json(metadata))
    }

    fn get_keywords(&self, dsid: Option<&str>, limit: usize) -> ApiResult {
        match dsid {
            Some(dsid) => self.get_limited(&["datasets", dsid, "keywords"], limit),
            None => self.get_limited(&["keywords"], limit),
        }
    }

    fn add_dataset_keyword(&self, dsid: &str, keyword: &str) -> ApiResult {
        self.post_json(&["datasets", dsid, "keywords"], &json!({ "keyword": keyword }))
    }

    fn get_thumbnails(&self, dsid: &str, limit: usize) -> ApiResult {
        self.get_limited(&["datasets", dsid, "thumbnails"], limit)
    }

    fn add_thumbnail(&self, dsid: &str, file_path: &Path, thumbnail_name: Option<&str>) -> ApiResult {
        let name = match thumbnail_name {
            Some(name) => name.to_string(),
            None => file_name_of(file_path)?,
        };
        let form = multipart::Form::new()
            .text("thumbnail_name", name)
            .file("file", file_path)?;
        self.send(self.client.post(self.url(&["datasets", dsid, "thumbnails"])).multipart(form))
    }

    fn get_associated_files(&self, dsid: &str, limit: usize) -> ApiResult {
        self.get_limited(&["datasets", dsid, "associated_files"], limit)
    }

    fn add_associated_file(&self, dsid: &str, file_path: &Path, filename: Option<&str>) -> ApiResult {
        let filename = match filename {
            Some(name) => name.to_string(),
            None => file_name_of(file_path)?,
        };
        let mut file = fs::File::open(file_path)?;
        let size = file.metadata()?.len();
        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher)?;
        let sha256_hash = format!("{:x}", hasher.finalize());

        self.post_json(
            &["datasets", dsid, "associated_files"],
            &json!({
                "filename": filename,
                "size": size,
                "sha256_hash": sha256_hash,
            }),
        )
    }

    fn list_instruments(&self, limit: usize) -> ApiResult {
        self.get_limited(&["instruments"], limit)
    }

    fn get_instrument(&self, instrument_name: Option<&str>, instrument_id: Option<&str>) -> ApiResult {
        match (instrument_name, instrument_id) {
            (Some(name), _) => {
                let found = self.send_optional(
                    self.client
                        .get(self.url(&["instruments"]))
                        .query(&[("instrument_name", name)]),
                )?;
                Ok(match found {
                    Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
                    Value::Array(_) => Value::Null,
                    other => other,
                })
            }
            (None, Some(id)) => self.send_optional(self.client.get(self.url(&["instruments", id]))),
            (None, None) => Err(ApiError::invalid(
                "either instrument_name or instrument_id must be provided",
            )),
        }
    }

    fn get_or_add_instrument(
        &self,
        instrument_name: &str,
        location: Option<&str>,
        instrument_owner: Option<&str>,
    ) -> ApiResult {
        let existing = self.get_instrument(Some(instrument_name), None)?;
        if !existing.is_null() {
            return Ok(existing);
        }
        debug!(instrument_name, "instrument not found, creating");
        self.post_json(
            &["instruments"],
            &json!({
                "instrument_name": instrument_name,
                "location": location,
                "owner": instrument_owner,
            }),
        )
    }

    fn get_sample(&self, sample_id: &str) -> ApiResult {
        self.get(&["samples", sample_id])
    }

    fn list_samples(
        &self,
        dataset_id: Option<&str>,
        parent_id: Option<&str>,
        limit: usize,
        filter: &SampleFilter,
    ) -> ApiResult {
        let url = match (dataset_id, parent_id) {
            (Some(dataset_id), _) => self.url(&["datasets", dataset_id, "samples"]),
            (None, Some(parent_id)) => self.url(&["samples", parent_id, "children"]),
            (None, None) => self.url(&["samples"]),
        };
        self.send(self.client.get(url).query(filter).query(&[("limit", limit)]))
    }

    fn add_sample(&self, sample: &NewSample) -> ApiResult {
        self.send(self.client.post(self.url(&["samples"])).json(sample))
    }

    fn add_sample_to_dataset(&self, dataset_id: &str, sample_id: &str) -> ApiResult {
        self.send(
            self.client
                .post(self.url(&["datasets", dataset_id, "samples", sample_id])),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpClient::new("https://crucible.example.org/api/v1/", "key");
        assert_eq!(client.base_url(), "https://crucible.example.org/api/v1");
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let client = HttpClient::new("https://crucible.example.org", "key");
        assert_eq!(
            client.url(&["datasets", "a b/c", "keywords"]),
            "https://crucible.example.org/datasets/a%20b%2Fc/keywords"
        );
    }

    #[test]
    fn ids_accept_strings_and_numbers() {
        assert_eq!(id_string(&json!("r-1")).as_deref(), Some("r-1"));
        assert_eq!(id_string(&json!(42)).as_deref(), Some("42"));
        assert_eq!(id_string(&json!(null)), None);
    }

    #[test]
    fn file_name_of_rejects_directory_like_paths() {
        assert_eq!(file_name_of(Path::new("data/run.h5")).unwrap(), "run.h5");
        assert!(file_name_of(Path::new("..")).is_err());
    }
}
