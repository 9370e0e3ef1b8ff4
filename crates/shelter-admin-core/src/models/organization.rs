use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Organization type sent when a form leaves it blank
const DEFAULT_ORGANIZATION_TYPE: &str = "charity";

/// Country code used for branches that do not specify one
const DEFAULT_BRANCH_COUNTRY: &str = "US";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    #[serde(deserialize_with = "super::null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialMedia {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(rename = "type", deserialize_with = "super::null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub contact_info: ContactInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<Branch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission_statement: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrganizationData {
    /// Shown when the backend has no organization yet.
    pub fn placeholder() -> Self {
        Self {
            name: "Your Organization".to_string(),
            description: "Organization description".to_string(),
            kind: DEFAULT_ORGANIZATION_TYPE.to_string(),
            ..Self::default()
        }
    }
}

/// Organization editor input. Older screens send contact details flat on the
/// form instead of nested under `contactInfo`; both are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationForm {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub contact_info: Option<ContactInfo>,
}

impl OrganizationForm {
    /// The body the organization endpoints accept.
    pub fn to_payload(&self) -> OrganizationData {
        let nested = self.contact_info.clone().unwrap_or_default();
        let pick = |flat: &Option<String>, nested: String| {
            flat.clone().filter(|v| !v.is_empty()).unwrap_or(nested)
        };

        OrganizationData {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self
                .kind
                .clone()
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| DEFAULT_ORGANIZATION_TYPE.to_string()),
            contact_info: ContactInfo {
                phone: pick(&self.phone, nested.phone),
                email: pick(&self.email, nested.email),
                address: pick(&self.address, nested.address),
            },
            ..OrganizationData::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Branch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub postal_code: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub is_main_branch: bool,
}

pub type CreateBranchRequest = Branch;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_main_branch: Option<bool>,
}

/// Loosely filled location form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BranchForm {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_main_branch: Option<bool>,
}

impl From<BranchForm> for Branch {
    fn from(form: BranchForm) -> Self {
        Self {
            id: None,
            name: form.name,
            address: form.address,
            city: form.city.unwrap_or_default(),
            state: form.state.unwrap_or_default(),
            country: form
                .country
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_BRANCH_COUNTRY.to_string()),
            postal_code: form.postal_code.unwrap_or_default(),
            phone: form.phone.unwrap_or_default(),
            email: form.email.unwrap_or_default(),
            is_main_branch: form.is_main_branch == Some(true),
        }
    }
}
