use tracing::debug;

use crate::api::error::ApiResult;
use crate::api::request::Request;
use crate::api::ApiClient;
use crate::models::{
    Branch, CreateBranchRequest, OrganizationData, OrganizationForm, UpdateBranchRequest,
};

use super::segment;

const ORGANIZATIONS: &str = "/api/v1/organizations";

/// Organizations and their branches. Reads are public.
pub struct Organizations<'a> {
    client: &'a ApiClient,
}

impl<'a> Organizations<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<OrganizationData>> {
        self.client
            .fetch(Request::get(ORGANIZATIONS).public())
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResult<OrganizationData> {
        self.client
            .fetch(Request::get(Self::item(id)).public())
            .await
    }

    pub async fn create(&self, organization: &OrganizationData) -> ApiResult<OrganizationData> {
        self.client
            .fetch(Request::post(ORGANIZATIONS).json(organization)?)
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        organization: &OrganizationData,
    ) -> ApiResult<OrganizationData> {
        self.client
            .fetch(Request::put(Self::item(id)).json(organization)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.send(Request::delete(Self::item(id))).await
    }

    /// The first organization, or a placeholder when none exist yet.
    pub async fn info(&self) -> ApiResult<OrganizationData> {
        let organizations = self.list().await?;
        Ok(organizations
            .into_iter()
            .next()
            .unwrap_or_else(OrganizationData::placeholder))
    }

    /// Save the organization editor. Updates when the form carries an id,
    /// creates otherwise.
    pub async fn save_info(&self, form: &OrganizationForm) -> ApiResult<OrganizationData> {
        let payload = form.to_payload();
        match form.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => {
                debug!(organization_id = id, "Updating organization info");
                self.update(id, &payload).await
            }
            None => {
                debug!("Creating organization from info form");
                self.create(&payload).await
            }
        }
    }

    pub async fn branches(&self, organization_id: &str) -> ApiResult<Vec<Branch>> {
        self.client
            .fetch(Request::get(Self::branches_path(organization_id)))
            .await
    }

    pub async fn branch(&self, organization_id: &str, branch_id: &str) -> ApiResult<Branch> {
        self.client
            .fetch(Request::get(Self::branch_path(organization_id, branch_id)))
            .await
    }

    pub async fn create_branch(
        &self,
        organization_id: &str,
        branch: &CreateBranchRequest,
    ) -> ApiResult<Branch> {
        self.client
            .fetch(Request::post(Self::branches_path(organization_id)).json(branch)?)
            .await
    }

    pub async fn update_branch(
        &self,
        organization_id: &str,
        branch_id: &str,
        branch: &UpdateBranchRequest,
    ) -> ApiResult<Branch> {
        self.client
            .fetch(Request::put(Self::branch_path(organization_id, branch_id)).json(branch)?)
            .await
    }

    pub async fn delete_branch(&self, organization_id: &str, branch_id: &str) -> ApiResult<()> {
        self.client
            .send(Request::delete(Self::branch_path(organization_id, branch_id)))
            .await
    }

    fn item(id: &str) -> String {
        format!("{}/{}", ORGANIZATIONS, segment(id))
    }

    fn branches_path(organization_id: &str) -> String {
        format!("{}/branches", Self::item(organization_id))
    }

    fn branch_path(organization_id: &str, branch_id: &str) -> String {
        format!(
            "{}/{}",
            Self::branches_path(organization_id),
            segment(branch_id)
        )
    }
}
