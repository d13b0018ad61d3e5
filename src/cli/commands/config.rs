use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_settings, save_settings};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective client settings")]
    Show,

    #[command(about = "Point the client at another backend")]
    SetUrl {
        #[arg(help = "API base URL, e.g. https://hr.example.com/api")]
        url: String,
    },

    #[command(about = "Forget the stored API URL")]
    ResetUrl,
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut settings = load_settings()?;

    match cmd {
        ConfigCommands::Show => {
            let config = crate::config::config();
            let dir = crate::session::store::get_config_dir()?;
            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "api_url": settings.effective_api_url(),
                            "environment": config.environment,
                            "config_dir": dir.display().to_string(),
                            "request_timeout_secs": config.api.request_timeout_secs,
                            "search_debounce_ms": config.table.search_debounce_ms,
                            "export_file": config.storage.export_file,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("API URL:        {}", settings.effective_api_url());
                    println!("Environment:    {:?}", config.environment);
                    println!("Config dir:     {}", dir.display());
                    println!("Timeout:        {}s", config.api.request_timeout_secs);
                    println!("Debounce:       {}ms", config.table.search_debounce_ms);
                    println!("Export file:    {}", config.storage.export_file);
                }
            }
            Ok(())
        }
        ConfigCommands::SetUrl { url } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", url, e))?;
            settings.api_url = Some(url.clone());
            save_settings(&settings)?;
            output_success(&output_format, &format!("API URL set to {}", url), Some(json!({ "api_url": url })))
        }
        ConfigCommands::ResetUrl => {
            settings.api_url = None;
            save_settings(&settings)?;
            output_success(
                &output_format,
                &format!("API URL reset to {}", settings.effective_api_url()),
                None,
            )
        }
    }
}
