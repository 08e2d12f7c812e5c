// Project and system settings (`api/platform/...`).
use super::request::ApiRequest;
use super::transport::{Client, Reply};
use crate::core::error::ApiResult;
use crate::model::Project;

pub struct Platform<'a> {
    client: &'a Client,
}

impl<'a> Platform<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn get_project(&self, project_id: i64) -> ApiResult<Reply<Project>> {
        self.client
            .fetch(ApiRequest::get("api/platform/projects").segment(project_id))
    }
}
