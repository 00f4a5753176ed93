use clap::Subcommand;
use serde_json::json;

use crate::auth::password::hash_password;
use crate::cli::utils::{connect, output_rows, output_success, value_or_stdin};
use crate::cli::OutputFormat;
use crate::database::models::Admin;
use crate::database::AdminRepository;

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Create an admin account")]
    Create {
        #[arg(help = "Login name")]
        username: String,
        #[arg(long, help = "Display name (defaults to the username)")]
        name: Option<String>,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "List admin accounts")]
    List,

    #[command(about = "Allow an admin to log in again")]
    Activate {
        #[arg(help = "Login name")]
        username: String,
    },

    #[command(about = "Block an admin from logging in")]
    Deactivate {
        #[arg(help = "Login name")]
        username: String,
    },

    #[command(about = "Print a bcrypt hash for a password without touching the database")]
    HashPassword {
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AdminCommands::Create { username, name, password } => {
            let username = username.trim().to_string();
            if username.is_empty() {
                anyhow::bail!("Username cannot be blank");
            }
            let password = value_or_stdin(password, "Password")?;
            let name = name.unwrap_or_else(|| username.clone());
            let hash = hash_password(&password).await?;

            let pool = connect().await?;
            let admin = AdminRepository::new(pool).create(&username, &hash, &name).await?;
            output_success(
                output_format,
                &format!("Created admin '{}' (id {})", admin.username, admin.id),
                Some(json!({ "admin": Admin::from(admin) })),
            )
        }
        AdminCommands::List => {
            let pool = connect().await?;
            let rows = AdminRepository::new(pool)
                .list()
                .await?
                .into_iter()
                .map(|row| serde_json::to_value(Admin::from(row)))
                .collect::<Result<Vec<_>, _>>()?;
            output_rows(
                output_format,
                "admins",
                rows,
                &["id", "username", "name", "isActive", "loginCount", "lastLogin"],
            )
        }
        AdminCommands::Activate { username } => set_active(&username, true, output_format).await,
        AdminCommands::Deactivate { username } => set_active(&username, false, output_format).await,
        AdminCommands::HashPassword { password } => {
            let password = value_or_stdin(password, "Password")?;
            let hash = hash_password(&password).await?;
            match output_format {
                OutputFormat::Json => output_success(output_format, "Password hashed", Some(json!({ "hash": hash }))),
                OutputFormat::Text => {
                    println!("{}", hash);
                    Ok(())
                }
            }
        }
    }
}

async fn set_active(username: &str, is_active: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect().await?;
    AdminRepository::new(pool).set_active(username, is_active).await?;
    let verb = if is_active { "Activated" } else { "Deactivated" };
    output_success(
        output_format,
        &format!("{} admin '{}'", verb, username),
        Some(json!({ "username": username, "isActive": is_active })),
    )
}
