//! Purpose: Artifact depositories, artifacts and their backing storages.
//! Exports: `Artifacts`.
//! Role: Service façade over `api/artifact/...`; obtained from `Client::artifacts`.
//! Invariants: Storage replies always go through the `Storage` variant decoder.

use super::multipart::MultipartForm;
use super::request::ApiRequest;
use super::transport::{Client, Reply};
use super::upload_file::UploadFile;
use crate::core::error::ApiResult;
use crate::model::{
    Artifact, ArtifactCreatedResponse, Attribute, Depository, DepositoryIdResponse, Storage,
    StorageNumberResponse, TaskRef,
};
use std::path::Path;

const DEPOSITORIES: &str = "api/artifact/depositories";
const ARTIFACTS: &str = "api/artifact/artifacts";

pub struct Artifacts<'a> {
    client: &'a Client,
}

impl<'a> Artifacts<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn create_depository(
        &self,
        project_id: i64,
        depository_id: &str,
        name: &str,
    ) -> ApiResult<Reply<DepositoryIdResponse>> {
        let depository = Depository {
            id: depository_id.to_string(),
            name: name.to_string(),
            ..Depository::default()
        };
        let request = ApiRequest::post(DEPOSITORIES)
            .query("projectId", project_id)
            .json(&depository)?;
        self.client.fetch(request)
    }

    pub fn get_depositories(&self, project_id: i64) -> ApiResult<Reply<Vec<Depository>>> {
        let request = ApiRequest::get(DEPOSITORIES).query("projectId", project_id);
        self.client.fetch(request)
    }

    pub fn get_depository(&self, depository_id: &str) -> ApiResult<Reply<Depository>> {
        let request = ApiRequest::get(DEPOSITORIES).segment(depository_id);
        self.client.fetch(request)
    }

    pub fn delete_depository(&self, depository_id: &str) -> ApiResult<Reply<()>> {
        let request = ApiRequest::delete(DEPOSITORIES).segment(depository_id);
        self.client.send(request)
    }

    /// Streams the file as the `file` part; each attribute is sent as `attributes=key=value`.
    pub fn upload_artifact(
        &self,
        depository_id: &str,
        artifact_path: impl AsRef<Path>,
        attributes: &[Attribute],
    ) -> ApiResult<Reply<ArtifactCreatedResponse>> {
        let file = UploadFile::open(artifact_path)?;
        let form = MultipartForm::new(file)?;
        let mut request = ApiRequest::post(ARTIFACTS).query("depositoryId", depository_id);
        for attribute in attributes {
            request = request.query(
                "attributes",
                format!("{}={}", attribute.key, attribute.value),
            );
        }
        self.client.fetch(request.multipart(form))
    }

    pub fn get_artifact(&self, artifact_id: &str) -> ApiResult<Reply<Artifact>> {
        let request = ApiRequest::get(ARTIFACTS).segment(artifact_id);
        self.client.fetch(request)
    }

    pub fn get_storages(&self, depository_id: &str) -> ApiResult<Reply<Vec<Storage>>> {
        self.client.fetch(storages(depository_id))
    }

    pub fn get_storage(
        &self,
        depository_id: &str,
        storage_number: i64,
    ) -> ApiResult<Reply<Storage>> {
        let request = storages(depository_id).segment(storage_number);
        self.client.fetch(request)
    }

    pub fn create_storage(
        &self,
        depository_id: &str,
        storage: &Storage,
    ) -> ApiResult<Reply<StorageNumberResponse>> {
        let request = ApiRequest::post(DEPOSITORIES)
            .segment(depository_id)
            .segment("storages")
            .json(storage)?;
        self.client.fetch(request)
    }

    /// Files already in the storage stay there unless `remove_all_files` is `Some(true)`.
    pub fn delete_storage(
        &self,
        depository_id: &str,
        storage_number: i64,
        remove_all_files: Option<bool>,
    ) -> ApiResult<Reply<TaskRef>> {
        let request = ApiRequest::delete(DEPOSITORIES)
            .segment(depository_id)
            .segment("storages")
            .segment(storage_number)
            .query_opt("removeAllFilesFromStorage", remove_all_files);
        self.client.fetch(request)
    }

    pub fn activate_storage(
        &self,
        depository_id: &str,
        storage_number: i64,
    ) -> ApiResult<Reply<()>> {
        let request = ApiRequest::put(DEPOSITORIES)
            .segment(depository_id)
            .segment("storages")
            .segment(storage_number)
            .segment("activate");
        self.client.send(request)
    }

    /// Deactivates whichever storage is currently active in the depository.
    pub fn deactivate_storage(&self, depository_id: &str) -> ApiResult<Reply<()>> {
        let request = ApiRequest::put(DEPOSITORIES)
            .segment(depository_id)
            .segment("storages")
            .segment("deactivate");
        self.client.send(request)
    }
}

fn storages(depository_id: &str) -> ApiRequest {
    ApiRequest::get(DEPOSITORIES)
        .segment(depository_id)
        .segment("storages")
}
