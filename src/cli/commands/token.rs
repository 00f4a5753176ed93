use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::json;

use crate::auth::{tokens, TokenService};
use crate::cli::utils::value_or_stdin;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Decode a session token and report whether this server would accept it")]
    Inspect {
        #[arg(help = "Token (read from stdin if not provided)")]
        token: Option<String>,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Inspect { token } => {
            let token = value_or_stdin(token, "Token")?;
            let claims = TokenService::decode(token.trim())?;
            // Signature and expiry are checked separately from the payload dump.
            let verdict = match tokens().verify(token.trim()) {
                Ok(_) => "valid".to_string(),
                Err(e) => e.to_string(),
            };
            let issued_at = DateTime::<Utc>::from_timestamp(claims.iat, 0);
            let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0);

            match output_format {
                OutputFormat::Json => {
                    let report = json!({
                        "claims": claims,
                        "issuedAt": issued_at,
                        "expiresAt": expires_at,
                        "status": verdict,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text => {
                    println!("Admin:   {} ({}, id {})", claims.name, claims.username, claims.id);
                    println!("Issued:  {}", display_time(issued_at));
                    println!("Expires: {}", display_time(expires_at));
                    println!("Status:  {}", verdict);
                }
            }
            Ok(())
        }
    }
}

fn display_time(value: Option<DateTime<Utc>>) -> String {
    value.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".to_string())
}
