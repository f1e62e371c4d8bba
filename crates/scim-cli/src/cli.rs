//! Command-line arguments.

use clap::{ArgAction, Args, Parser, Subcommand};
use scim_directory::UserEntity;
use std::path::PathBuf;

/// Manage users in a SCIM directory.
#[derive(Debug, Parser)]
#[command(name = "scim-cli", version, about)]
pub struct Cli {
    /// Directory holding `default.toml` and friends.
    #[arg(long, env = "SCIM_CONFIG_DIR", default_value = "./config")]
    pub config_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the authenticated caller.
    Me,
    /// Read a user by id.
    Get { id: String },
    /// List users, optionally filtered (e.g. `userName eq 'a@example.com'`).
    List {
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Create a user.
    Create(UserArgs),
    /// Replace a user, keeping its groups and roles.
    Update {
        id: String,
        #[command(flatten)]
        user: UserArgs,
    },
    /// Apply a raw SCIM PATCH document read from a JSON file.
    Patch {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a user.
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct UserArgs {
    #[arg(long)]
    pub user_name: String,

    #[arg(long, default_value = "")]
    pub display_name: String,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub active: bool,

    #[arg(long)]
    pub allow_cluster_create: bool,

    #[arg(long)]
    pub allow_sql_analytics_access: bool,

    #[arg(long)]
    pub allow_instance_pool_create: bool,
}

impl From<UserArgs> for UserEntity {
    fn from(args: UserArgs) -> Self {
        Self {
            user_name: args.user_name,
            display_name: args.display_name,
            active: args.active,
            allow_cluster_create: args.allow_cluster_create,
            allow_sql_analytics_access: args.allow_sql_analytics_access,
            allow_instance_pool_create: args.allow_instance_pool_create,
        }
    }
}
