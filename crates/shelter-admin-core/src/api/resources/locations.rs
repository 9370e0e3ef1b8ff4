//! Locations are the branches of the first organization. There is no
//! location endpoint of its own, so every call starts by listing
//! organizations.

use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::api::request::Request;
use crate::api::ApiClient;
use crate::models::{Branch, BranchForm, OrganizationData};

use super::segment;

const ORGANIZATIONS: &str = "/api/v1/organizations";

pub struct Locations<'a> {
    client: &'a ApiClient,
}

impl<'a> Locations<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Branches embedded in the first organization, or none.
    pub async fn list(&self) -> ApiResult<Vec<Branch>> {
        let organizations = self.organizations().await?;
        Ok(organizations
            .into_iter()
            .next()
            .and_then(|org| org.branches)
            .unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> ApiResult<Branch> {
        self.list()
            .await?
            .into_iter()
            .find(|branch| branch.id.as_deref() == Some(id))
            .ok_or_else(|| ApiError::not_found(format!("Branch with ID {} not found", id)))
    }

    pub async fn create(&self, form: BranchForm) -> ApiResult<Branch> {
        let organization_id = self.first_organization_id().await?;
        let branch = Branch::from(form);
        debug!(organization_id = %organization_id, name = %branch.name, "Creating location");

        let endpoint = format!("{}/{}/branches", ORGANIZATIONS, segment(&organization_id));
        self.client
            .fetch(Request::post(endpoint).json(&branch)?)
            .await
    }

    pub async fn update(&self, id: &str, form: BranchForm) -> ApiResult<Branch> {
        let organization_id = self.first_organization_id().await?;
        let branch = Branch::from(form);
        debug!(organization_id = %organization_id, branch_id = id, "Updating location");

        self.client
            .fetch(Request::put(Self::branch_path(&organization_id, id)).json(&branch)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let organization_id = self.first_organization_id().await?;
        self.client
            .send(Request::delete(Self::branch_path(&organization_id, id)))
            .await
    }

    async fn organizations(&self) -> ApiResult<Vec<OrganizationData>> {
        self.client.fetch(Request::get(ORGANIZATIONS)).await
    }

    async fn first_organization_id(&self) -> ApiResult<String> {
        self.organizations()
            .await?
            .into_iter()
            .next()
            .and_then(|org| org.id)
            .ok_or_else(|| ApiError::not_found("No organization found"))
    }

    fn branch_path(organization_id: &str, branch_id: &str) -> String {
        format!(
            "{}/{}/branches/{}",
            ORGANIZATIONS,
            segment(organization_id),
            segment(branch_id)
        )
    }
}
