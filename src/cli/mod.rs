pub mod commands;
pub mod config;
pub mod context;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::services::{MasterDataService, PermissionService, ResourceService, RoleService, UserService};
use context::CliContext;

#[derive(Parser)]
#[command(name = "smart-hr")]
#[command(about = "Smart HR CLI - manage users, roles, permissions and master data")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign out and account management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "User management")]
    Users {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Role management")]
    Roles {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Permission management")]
    Permissions {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Master data management, import and export")]
    MasterData {
        #[command(subcommand)]
        cmd: commands::master_data::MasterDataCommands,
    },

    #[command(about = "Client settings")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Config { cmd } => commands::config::handle(cmd, output_format).await,
        Commands::Users { cmd } => run_resource(cmd, output_format, UserService::new).await,
        Commands::Roles { cmd } => run_resource(cmd, output_format, RoleService::new).await,
        Commands::Permissions { cmd } => run_resource(cmd, output_format, PermissionService::new).await,
        Commands::MasterData { cmd } => {
            let mut ctx = CliContext::open(output_format)?;
            let service = Arc::new(MasterDataService::new(ctx.client.clone()));
            let result = commands::master_data::handle(cmd, service, &mut ctx).await;
            ctx.finish()?;
            result
        }
    }
}

async fn run_resource<S: ResourceService>(
    cmd: commands::resource::ResourceCommands,
    output_format: OutputFormat,
    make: fn(ApiClient) -> S,
) -> anyhow::Result<()> {
    let mut ctx = CliContext::open(output_format)?;
    let service = Arc::new(make(ctx.client.clone()));
    let result = commands::resource::handle(cmd, service, &mut ctx).await;
    ctx.finish()?;
    result
}
