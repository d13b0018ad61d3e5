use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use super::auth::report;
use super::resource::{self, ResourceCommands};
use crate::cli::context::CliContext;
use crate::cli::utils::{output_empty_collection, output_success, output_table};
use crate::models::{ResourceKind, StatusEntity};
use crate::permissions::Action;
use crate::routing::Route;
use crate::services::{MasterDataService, ResourceService, StatusToggle};

#[derive(Subcommand)]
pub enum MasterDataCommands {
    #[command(flatten)]
    Common(ResourceCommands),

    #[command(about = "Switch a record between active and inactive")]
    Toggle {
        #[arg(help = "Record ID")]
        id: u64,
    },

    #[command(about = "Import records from a spreadsheet")]
    Import {
        #[arg(help = "Spreadsheet file (.xlsx, .csv)")]
        file: PathBuf,
    },

    #[command(about = "Export all records to a spreadsheet")]
    Export {
        #[arg(long, short, help = "Output file (defaults to the configured export file)")]
        output: Option<PathBuf>,
    },

    #[command(about = "List the distinct master data types")]
    Types,

    #[command(about = "List active records")]
    Active,
}

pub async fn handle(cmd: MasterDataCommands, service: Arc<MasterDataService>, ctx: &mut CliContext) -> anyhow::Result<()> {
    let kind = ResourceKind::MasterData;

    match cmd {
        MasterDataCommands::Common(common) => resource::handle(common, service, ctx).await,
        MasterDataCommands::Toggle { id } => {
            ctx.enter(Route::Detail(kind, id))?;
            let record = report(ctx, service.get(id).await)?;
            let action = if record.status() {
                Action::Deactivate
            } else {
                Action::Activate
            };
            ctx.require(kind, action).await?;

            let status = report(ctx, service.toggle_status(id, !record.status()).await)?;
            output_success(
                &ctx.output,
                &format!(
                    "Master Data status updated successfully ({} is now {})",
                    record.name,
                    if status { "active" } else { "inactive" }
                ),
                Some(json!({ "id": id, "status": status })),
            )
        }
        MasterDataCommands::Import { file } => {
            ctx.enter(Route::MasterDataImport)?;
            ctx.require(kind, Action::Import).await?;
            let result = report(ctx, service.import_from_file(&file).await)?;
            let message = if result.message.is_empty() {
                format!("Imported {}", file.display())
            } else {
                result.message.clone()
            };
            output_success(&ctx.output, &message, Some(json!({ "imported": result.imported })))
        }
        MasterDataCommands::Export { output } => {
            ctx.enter(Route::List(kind))?;
            ctx.require(kind, Action::Export).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&crate::config::config().storage.export_file));
            let bytes = report(ctx, service.export_to_file(&path).await)?;
            output_success(
                &ctx.output,
                &format!("Exported {} bytes to {}", bytes, path.display()),
                Some(json!({ "path": path.display().to_string(), "bytes": bytes })),
            )
        }
        MasterDataCommands::Types => {
            ctx.enter(Route::List(kind))?;
            ctx.require(kind, Action::View).await?;
            let types = report(ctx, service.types().await)?;
            if types.is_empty() {
                return output_empty_collection(&ctx.output, "types", "No master data types found");
            }
            match ctx.output {
                crate::cli::OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "types": types }))?),
                crate::cli::OutputFormat::Text => {
                    for name in types {
                        println!("{}", name);
                    }
                }
            }
            Ok(())
        }
        MasterDataCommands::Active => {
            ctx.enter(Route::List(kind))?;
            ctx.require(kind, Action::View).await?;
            let records = report(ctx, service.active().await)?;
            if records.is_empty() {
                return output_empty_collection(&ctx.output, "data", "No active master data found");
            }
            let rows = records
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()?;
            let meta = crate::models::PageMeta {
                total: rows.len() as u64,
                from: Some(1),
                to: Some(rows.len() as u64),
                ..crate::models::PageMeta::default()
            };
            output_table(
                &ctx.output,
                kind,
                &rows,
                &crate::table::TableFooter::new(kind, &meta),
                &[],
            )
        }
    }
}
