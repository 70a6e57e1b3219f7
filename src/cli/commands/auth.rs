use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a token signed with SECURITY_JWT_SECRET for local API calls")]
    Token {
        #[arg(long, help = "User id to put in the sub claim (random if omitted)")]
        user: Option<Uuid>,
        #[arg(long, help = "Email claim")]
        email: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { user, email } => {
            let security = AppConfig::from_env().security;
            let user = user.unwrap_or_else(Uuid::new_v4);
            let claims = Claims::new(user, email, &security);
            let token = generate_jwt(&claims, &security)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token issued",
                    Some(json!({ "user_id": user, "expires_at": claims.exp, "token": token })),
                ),
                OutputFormat::Text => {
                    // Bare token so it can be captured with $(quill auth token)
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
