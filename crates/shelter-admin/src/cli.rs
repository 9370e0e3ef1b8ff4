//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use shelter_admin_core::session::StorageBackend;

#[derive(Parser)]
#[command(name = "shelter-admin")]
#[command(version)]
#[command(about = "Admin console for the Charity Shelter backend", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config file and API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email; prompted for when omitted
        #[arg(short, long, env = "SHELTER_ADMIN_EMAIL")]
        email: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the stored user without contacting the server
    Whoami,

    /// Check the stored token with the server
    Verify,

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage posts
    Posts {
        #[command(subcommand)]
        action: PostsAction,
    },

    /// Manage organizations
    Orgs {
        #[command(subcommand)]
        action: OrgsAction,
    },

    /// Manage the branches of a given organization
    Branches {
        #[command(subcommand)]
        action: BranchesAction,
    },

    /// Manage locations (branches of the first organization)
    Locations {
        #[command(subcommand)]
        action: LocationsAction,
    },

    /// Manage service API keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Show dashboard analytics
    Dashboard {
        /// Keep refreshing until interrupted
        #[arg(short, long)]
        watch: bool,

        /// Seconds between refreshes when watching
        #[arg(long, default_value = "300")]
        interval: u64,

        /// Stop after this many refreshes when watching
        #[arg(long)]
        count: Option<usize>,

        /// Use the older stats endpoint
        #[arg(long, conflicts_with = "watch")]
        legacy: bool,
    },

    /// View or change your own settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Upload a new profile picture
    UploadPicture {
        /// Image file to upload
        path: PathBuf,
    },

    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Commands {
    /// Commands that only touch local state skip the session check.
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            Commands::Login { .. }
                | Commands::Logout
                | Commands::Whoami
                | Commands::Verify
                | Commands::Config { .. }
        )
    }
}

#[derive(Subcommand)]
pub enum UsersAction {
    List,
    Get {
        id: String,
    },
    /// Create a user from a JSON file
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Apply a partial update from a JSON file
    Update {
        id: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PostsAction {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },
    Update {
        id: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    Delete {
        id: String,
    },
    Search {
        term: String,
    },
    Publish {
        id: String,
    },
    Unpublish {
        id: String,
    },
    /// Most viewed posts, as shown on the dashboard
    Popular,
}

#[derive(Subcommand)]
pub enum OrgsAction {
    List,
    Get {
        id: String,
    },
    /// Show the primary organization
    Info,
    /// Save the primary organization from a JSON form file
    SaveInfo {
        #[arg(short, long)]
        file: PathBuf,
    },
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },
    Update {
        id: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum BranchesAction {
    List {
        org: String,
    },
    Get {
        org: String,
        id: String,
    },
    Create {
        org: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    Update {
        org: String,
        id: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    Delete {
        org: String,
        id: String,
    },
}

#[derive(Subcommand)]
pub enum LocationsAction {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },
    Update {
        id: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum KeysAction {
    List {
        /// Print full secrets instead of masking them
        #[arg(long)]
        reveal: bool,
    },
    Generate {
        /// Owner of the key; defaults to the signed-in user
        #[arg(long)]
        user_id: Option<String>,

        #[arg(short, long)]
        description: String,

        /// "never" or a day count such as "30d"
        #[arg(short, long, default_value = "never")]
        expiration: String,

        /// Repeat for each permission
        #[arg(short, long = "permission")]
        permissions: Vec<String>,
    },
    Revoke {
        key: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    Show,
    /// Apply a partial update from a JSON file
    Update {
        #[arg(short, long)]
        file: PathBuf,
    },
    ChangePassword,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration, environment overrides included
    Show,
    /// Write values to the config file
    Set {
        /// Backend base URL
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        api_key: Option<String>,

        #[arg(long, value_enum)]
        storage: Option<StorageArg>,

        /// Request timeout in seconds; 0 removes it
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageArg {
    File,
    Keyring,
    Memory,
}

impl From<StorageArg> for StorageBackend {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::File => StorageBackend::File,
            StorageArg::Keyring => StorageBackend::Keyring,
            StorageArg::Memory => StorageBackend::Memory,
        }
    }
}
