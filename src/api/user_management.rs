// Users and project roles (`api/userManagement/...`).
use super::request::ApiRequest;
use super::transport::{Client, Reply};
use crate::core::error::ApiResult;
use crate::model::{ProjectRole, User};

pub struct UserManagement<'a> {
    client: &'a Client,
}

impl<'a> UserManagement<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// The user owning the auth key.
    pub fn whoami(&self) -> ApiResult<Reply<User>> {
        self.client
            .fetch(ApiRequest::get("api/userManagement/whoami"))
    }

    pub fn get_users(&self) -> ApiResult<Reply<Vec<User>>> {
        self.client
            .fetch(ApiRequest::get("api/userManagement/users"))
    }

    pub fn get_roles(&self, project_id: i64) -> ApiResult<Reply<Vec<ProjectRole>>> {
        self.client.fetch(
            ApiRequest::get("api/userManagement/roles").query("projectId", project_id),
        )
    }
}
