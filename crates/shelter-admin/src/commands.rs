//! Command handlers. Each one maps a subcommand onto resource calls and
//! prints the result as JSON.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use shelter_admin_core::api::FileUpload;
use shelter_admin_core::models::{
    BranchForm, ChangePasswordRequest, CreateBranchRequest, CreatePostRequest, CreateUserRequest,
    GenerateApiKeyRequest, LoginRequest, OrganizationData, OrganizationForm, SettingsUpdate,
    UpdateBranchRequest, UpdatePostRequest, UpdateUserRequest,
};
use shelter_admin_core::{ApiClient, Config, DashboardPoller};

use crate::cli::{
    BranchesAction, ConfigAction, KeysAction, LocationsAction, OrgsAction, PostsAction,
    SettingsAction, UsersAction,
};

/// Multipart field the profile picture endpoint reads
const PROFILE_PICTURE_FIELD: &str = "file";

/// Stand-in for secrets in printed configuration
const HIDDEN_SECRET: &str = "********";

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

pub async fn login(client: &ApiClient, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    if email.is_empty() || password.is_empty() {
        bail!("Email and password required");
    }

    let response = client
        .auth()
        .login(&LoginRequest { email, password })
        .await?;
    info!(user_id = %response.user.id, "Logged in");
    print_json(&response.user)
}

pub async fn logout(client: &ApiClient) -> Result<()> {
    let outcome = client.auth().logout().await;
    if let Some(e) = &outcome.remote_error {
        eprintln!("Warning: server-side logout failed ({}); local session cleared", e);
    }
    print_json(&json!({ "redirect": outcome.redirect.location }))
}

pub fn whoami(client: &ApiClient) -> Result<()> {
    match client.auth().current_user() {
        Some(user) => print_json(&user),
        None => bail!("Not signed in. Run `shelter-admin login`."),
    }
}

pub async fn verify(client: &ApiClient) -> Result<()> {
    let valid = client.auth().verify_token().await?;
    print_json(&json!({ "valid": valid }))
}

pub async fn users(client: &ApiClient, action: UsersAction) -> Result<()> {
    let users = client.users();
    match action {
        UsersAction::List => print_json(&users.list().await?),
        UsersAction::Get { id } => print_json(&users.get(&id).await?),
        UsersAction::Create { file } => {
            let request: CreateUserRequest = read_json(&file)?;
            print_json(&users.create(&request).await?)
        }
        UsersAction::Update { id, file } => {
            let request: UpdateUserRequest = read_json(&file)?;
            print_json(&users.update(&id, &request).await?)
        }
        UsersAction::Delete { id } => {
            users.delete(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

pub async fn posts(client: &ApiClient, action: PostsAction) -> Result<()> {
    let posts = client.posts();
    match action {
        PostsAction::List => print_json(&posts.list().await?),
        PostsAction::Get { id } => print_json(&posts.get(&id).await?),
        PostsAction::Create { file } => {
            let request: CreatePostRequest = read_json(&file)?;
            print_json(&posts.create(&request).await?)
        }
        PostsAction::Update { id, file } => {
            let request: UpdatePostRequest = read_json(&file)?;
            print_json(&posts.update(&id, &request).await?)
        }
        PostsAction::Delete { id } => {
            posts.delete(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
        PostsAction::Search { term } => print_json(&posts.search(&term).await?),
        PostsAction::Publish { id } => print_json(&posts.set_published(&id, true).await?),
        PostsAction::Unpublish { id } => print_json(&posts.set_published(&id, false).await?),
        PostsAction::Popular => {
            let dashboard = client.analytics().dashboard().await?;
            let all = posts.list().await?;
            print_json(&dashboard.popular_posts(&all))
        }
    }
}

pub async fn organizations(client: &ApiClient, action: OrgsAction) -> Result<()> {
    let orgs = client.organizations();
    match action {
        OrgsAction::List => print_json(&orgs.list().await?),
        OrgsAction::Get { id } => print_json(&orgs.get(&id).await?),
        OrgsAction::Info => print_json(&orgs.info().await?),
        OrgsAction::SaveInfo { file } => {
            let form: OrganizationForm = read_json(&file)?;
            print_json(&orgs.save_info(&form).await?)
        }
        OrgsAction::Create { file } => {
            let organization: OrganizationData = read_json(&file)?;
            print_json(&orgs.create(&organization).await?)
        }
        OrgsAction::Update { id, file } => {
            let organization: OrganizationData = read_json(&file)?;
            print_json(&orgs.update(&id, &organization).await?)
        }
        OrgsAction::Delete { id } => {
            orgs.delete(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

pub async fn branches(client: &ApiClient, action: BranchesAction) -> Result<()> {
    let orgs = client.organizations();
    match action {
        BranchesAction::List { org } => print_json(&orgs.branches(&org).await?),
        BranchesAction::Get { org, id } => print_json(&orgs.branch(&org, &id).await?),
        BranchesAction::Create { org, file } => {
            let branch: CreateBranchRequest = read_json(&file)?;
            print_json(&orgs.create_branch(&org, &branch).await?)
        }
        BranchesAction::Update { org, id, file } => {
            let branch: UpdateBranchRequest = read_json(&file)?;
            print_json(&orgs.update_branch(&org, &id, &branch).await?)
        }
        BranchesAction::Delete { org, id } => {
            orgs.delete_branch(&org, &id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

pub async fn locations(client: &ApiClient, action: LocationsAction) -> Result<()> {
    let locations = client.locations();
    match action {
        LocationsAction::List => print_json(&locations.list().await?),
        LocationsAction::Get { id } => print_json(&locations.get(&id).await?),
        LocationsAction::Create { file } => {
            let form: BranchForm = read_json(&file)?;
            print_json(&locations.create(form).await?)
        }
        LocationsAction::Update { id, file } => {
            let form: BranchForm = read_json(&file)?;
            print_json(&locations.update(&id, form).await?)
        }
        LocationsAction::Delete { id } => {
            locations.delete(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

pub async fn keys(client: &ApiClient, action: KeysAction) -> Result<()> {
    let keys = client.api_keys();
    match action {
        KeysAction::List { reveal } => {
            let mut listed = keys.list().await?;
            if !reveal {
                for key in &mut listed {
                    key.key = key.masked();
                }
            }
            print_json(&listed)
        }
        KeysAction::Generate {
            user_id,
            description,
            expiration,
            permissions,
        } => {
            let user_id = match user_id.or_else(|| client.auth().current_user().map(|u| u.id)) {
                Some(id) => id,
                None => bail!("No user to own the key; pass --user-id"),
            };
            let request = GenerateApiKeyRequest {
                user_id,
                description,
                expiration,
                permissions,
            };
            print_json(&keys.generate(&request).await?)
        }
        KeysAction::Revoke { key } => {
            keys.revoke(&key).await?;
            print_json(&json!({ "revoked": true }))
        }
    }
}

pub async fn dashboard(
    client: &ApiClient,
    watch: bool,
    interval: u64,
    count: Option<usize>,
    legacy: bool,
) -> Result<()> {
    if legacy {
        return print_json(&client.analytics().dashboard_stats().await?);
    }
    if !watch {
        return print_json(&client.analytics().dashboard().await?);
    }

    let (poller, mut rx) = DashboardPoller::spawn(client.clone(), Duration::from_secs(interval));
    let mut received = 0;

    while let Some(result) = rx.recv().await {
        match result {
            Ok(dashboard) => print_json(&dashboard)?,
            Err(e) => {
                warn!(status = e.status(), "Dashboard refresh failed");
                eprintln!("Refresh failed: {}", e);
            }
        }

        received += 1;
        if count.is_some_and(|limit| received >= limit) {
            break;
        }
    }

    poller.stop();
    Ok(())
}

pub async fn settings(client: &ApiClient, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => print_json(&client.settings().get().await?),
        SettingsAction::Update { file } => {
            let update: SettingsUpdate = read_json(&file)?;
            print_json(&client.settings().update(&update).await?)
        }
        SettingsAction::ChangePassword => {
            let current_password = rpassword::prompt_password("Current password: ")?;
            let new_password = rpassword::prompt_password("New password: ")?;
            let confirm = rpassword::prompt_password("Confirm new password: ")?;
            if new_password != confirm {
                bail!("Passwords do not match");
            }

            client
                .auth()
                .change_password(&ChangePasswordRequest {
                    current_password,
                    new_password,
                })
                .await?;
            print_json(&json!({ "changed": true }))
        }
    }
}

pub fn config(config: &Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut shown = serde_json::to_value(config)?;
            if !config.api_key.is_empty() {
                shown["api_key"] = json!(HIDDEN_SECRET);
            }
            print_json(&json!({ "path": Config::config_path()?, "config": shown }))
        }
        ConfigAction::Set {
            url,
            api_key,
            storage,
            timeout,
        } => {
            // Start from the file alone so environment overrides are not persisted
            let mut saved = Config::from_path(&Config::config_path()?)?;
            if let Some(url) = url {
                saved.base_url = url;
            }
            if let Some(api_key) = api_key {
                saved.api_key = api_key;
            }
            if let Some(storage) = storage {
                saved.storage = storage.into();
            }
            if let Some(secs) = timeout {
                saved.request_timeout_secs = Some(secs).filter(|s| *s > 0);
            }

            saved.save()?;
            info!(storage = ?saved.storage, "Configuration saved");
            print_json(&json!({ "saved": Config::config_path()? }))
        }
    }
}

pub async fn upload_picture(client: &ApiClient, path: &Path) -> Result<()> {
    let upload = FileUpload::from_path(PROFILE_PICTURE_FIELD, path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    print_json(&client.settings().upload_profile_picture(upload).await?)
}
