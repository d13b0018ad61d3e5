use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{save_settings, LoginRecord};
use crate::cli::context::CliContext;
use crate::cli::utils::{output_error, output_success, ReportedError};
use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::routing::Route;
use crate::services::{AuthService, Credentials, PasswordChange, ProfileSource, ProfileUpdate, Registration};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in and persist the session")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, env = "SMART_HR_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Create an account and sign in")]
    Register {
        #[arg(help = "Full name")]
        name: String,
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, env = "SMART_HR_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
        #[arg(long, help = "Password confirmation")]
        confirm: String,
    },

    #[command(about = "Sign out and clear the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show the signed-in user and their permissions")]
    Whoami,

    #[command(about = "Show the profile, or update name, email and optionally the password")]
    Profile {
        #[arg(long, help = "New full name")]
        name: Option<String>,
        #[arg(long, help = "New email address")]
        email: Option<String>,
        #[arg(long, help = "New password (leave out to keep the current one)")]
        password: Option<String>,
        #[arg(long, help = "New password confirmation")]
        confirm: Option<String>,
    },

    #[command(about = "Change the account password")]
    Password {
        #[arg(long, help = "Current password")]
        current: String,
        #[arg(long, help = "New password")]
        new: String,
        #[arg(long, help = "New password confirmation")]
        confirm: String,
    },

    #[command(about = "Permanently delete the signed-in account")]
    DeleteAccount {
        #[arg(long, help = "Confirm deletion")]
        yes: bool,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut ctx = CliContext::open(output_format)?;
    let result = dispatch(cmd, &mut ctx).await;
    ctx.finish()?;
    result
}

async fn dispatch(cmd: AuthCommands, ctx: &mut CliContext) -> anyhow::Result<()> {
    let auth = AuthService::new(ctx.client.clone());

    match cmd {
        AuthCommands::Login { email, password } => {
            ctx.enter(Route::Login)?;
            let user = report(ctx, auth.login(&Credentials { email, password }).await)?;
            ctx.settings.last_login = Some(LoginRecord::now(&user.email, ctx.settings.effective_api_url()));
            save_settings(&ctx.settings)?;
            ctx.enter(Route::Dashboard)?;
            output_success(
                &ctx.output,
                &format!("Signed in as {} <{}>", user.name, user.email),
                Some(json!({ "user": { "id": user.id, "name": user.name, "email": user.email } })),
            )
        }
        AuthCommands::Register { name, email, password, confirm } => {
            ctx.enter(Route::Register)?;
            let registration = Registration {
                name,
                email,
                password,
                confirmed_password: confirm,
            };
            let user = report(ctx, auth.register(&registration).await)?;
            ctx.enter(Route::Dashboard)?;
            output_success(
                &ctx.output,
                &format!("Registered and signed in as {}", user.email),
                Some(json!({ "user": { "id": user.id, "name": user.name, "email": user.email } })),
            )
        }
        AuthCommands::Logout => {
            report(ctx, auth.logout().await)?;
            ctx.enter(Route::Login)?;
            output_success(&ctx.output, "Signed out", None)
        }
        AuthCommands::Status => {
            let authenticated = ctx.session.is_authenticated();
            let user = ctx.session.user();
            let last_login = ctx.settings.last_login.clone();
            match ctx.output {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "authenticated": authenticated,
                            "api_url": ctx.settings.effective_api_url(),
                            "user": user.as_ref().map(|u| json!({ "id": u.id, "name": u.name, "email": u.email })),
                            "last_login": last_login,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("API: {}", ctx.settings.effective_api_url());
                    match (authenticated, user) {
                        (true, Some(user)) => println!("Signed in as {} <{}>", user.name, user.email),
                        _ => println!("Not signed in"),
                    }
                    if let Some(record) = last_login {
                        println!("Last login: {} at {}", record.email, record.at.to_rfc3339());
                    }
                }
            }
            Ok(())
        }
        AuthCommands::Whoami => {
            ctx.enter(Route::Profile)?;
            let profile = report(ctx, auth.me().await)?;
            match ctx.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
                OutputFormat::Text => {
                    println!("{} <{}> (#{})", profile.name, profile.email, profile.id);
                    let mut permissions = profile.permissions.clone();
                    permissions.sort();
                    println!("Permissions: {}", permissions.join(", "));
                }
            }
            Ok(())
        }
        AuthCommands::Profile {
            name: None,
            email: None,
            password: None,
            confirm: None,
        } => {
            ctx.enter(Route::Profile)?;
            let profile = report(ctx, auth.profile().await)?;
            match ctx.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
                OutputFormat::Text => {
                    println!("Name:  {}", profile.name);
                    println!("Email: {}", profile.email);
                }
            }
            Ok(())
        }
        AuthCommands::Profile { name, email, password, confirm } => {
            ctx.enter(Route::UpdateProfile)?;
            let current = ctx.session.user();
            let update = ProfileUpdate {
                name: name
                    .or_else(|| current.as_ref().map(|u| u.name.clone()))
                    .unwrap_or_default(),
                email: email
                    .or_else(|| current.as_ref().map(|u| u.email.clone()))
                    .unwrap_or_default(),
                password: password.unwrap_or_default(),
                confirmed_password: confirm.unwrap_or_default(),
            };
            let user = report(ctx, auth.update_profile(&update).await)?;
            ctx.enter(Route::Profile)?;
            output_success(&ctx.output, &format!("Profile updated for {}", user.email), None)
        }
        AuthCommands::Password { current, new, confirm } => {
            ctx.enter(Route::ChangePassword)?;
            let change = PasswordChange {
                current_password: current,
                password: new,
                password_confirmation: confirm,
            };
            report(ctx, auth.change_password(&change).await)?;
            output_success(&ctx.output, "Password changed", None)
        }
        AuthCommands::DeleteAccount { yes } => {
            ctx.enter(Route::DeleteAccount)?;
            if !yes {
                anyhow::bail!("Refusing to delete the account without --yes");
            }
            report(ctx, auth.delete_account().await)?;
            ctx.enter(Route::Login)?;
            output_success(&ctx.output, "Account deleted", None)
        }
    }
}

/// Print a client failure with its details before handing it on
pub(crate) fn report<T>(ctx: &CliContext, result: Result<T, ClientError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            output_error(&ctx.output, &e)?;
            Err(ReportedError(e).into())
        }
    }
}
