use clap::{Args, Parser, Subcommand};

use crate::check::Group;
use crate::cms_config::DuplicateScope;
use crate::config::{DEFAULT_ENV_FILE, DEFAULT_ENV_KEY};

#[derive(Parser, Debug)]
#[command(name = "cms-smoke", about = "Smoke tests for the CMS backend API and admin config")]
pub struct Cli {
    /// Print each request URL before it is sent
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the backend and frontend check groups (default)
    Run(RunArgs),

    /// Validate a local CMS config.yml without any network access
    ValidateConfig {
        /// Path to the config.yml file
        path: String,

        /// Which field names are compared when looking for duplicates
        #[arg(long, value_enum, default_value_t = DuplicateScope::Global)]
        duplicate_scope: DuplicateScope,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Env file holding the backend URL
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: String,

    /// Key of the backend URL entry in the env file
    #[arg(long, default_value = DEFAULT_ENV_KEY)]
    pub env_key: String,

    /// Use this base URL instead of reading the env file
    #[arg(long)]
    pub base_url: Option<String>,

    /// Only run the given groups (repeatable; default: backend then frontend)
    #[arg(long = "group", value_enum)]
    pub groups: Vec<Group>,

    /// Which field names are compared when looking for duplicates in config.yml.
    /// "global" compares names across all collections.
    #[arg(long, value_enum, default_value_t = DuplicateScope::Global)]
    pub duplicate_scope: DuplicateScope,

    /// Also write a JSON report to this path
    #[arg(long)]
    pub json: Option<String>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            env_file: DEFAULT_ENV_FILE.to_string(),
            env_key: DEFAULT_ENV_KEY.to_string(),
            base_url: None,
            groups: Vec::new(),
            duplicate_scope: DuplicateScope::default(),
            json: None,
        }
    }
}
