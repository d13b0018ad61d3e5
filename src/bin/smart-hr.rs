use clap::Parser;
use smart_hr::cli::Cli;
use smart_hr::cli::utils::ReportedError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so SMART_HR_API_URL and friends are picked up
    let _ = dotenvy::dotenv();

    let default_level = if smart_hr::is_production!() { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = smart_hr::cli::run(cli).await {
        if e.downcast_ref::<ReportedError>().is_none() {
            match std::env::var("CLI_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
