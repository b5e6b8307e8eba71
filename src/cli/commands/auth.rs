use clap::Subcommand;
use serde_json::json;

use crate::cli::cache::{CacheKey, Mutation};
use crate::cli::client::ApiClient;
use crate::cli::{config, utils, Context};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account and start a session")]
    Register {
        #[arg(help = "Email address")]
        email: String,
        #[arg(help = "Display name")]
        name: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Login and store the session token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Discard the stored session")]
    Logout,

    #[command(about = "Show the currently authenticated user")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register { email, name, password } => {
            let body = json!({ "email": email, "name": name, "password": password });
            let result = ctx.client.post("/auth/register", &body).await?;
            store_session(ctx, &email, &result.data)?;
            utils::output_success(&ctx.output, "Registered and logged in");
            Ok(())
        }
        AuthCommands::Login { email, password } => {
            let body = json!({ "email": email, "password": password });
            let result = ctx.client.post("/auth/login", &body).await?;
            store_session(ctx, &email, &result.data)?;
            utils::output_success(&ctx.output, "Logged in");
            Ok(())
        }
        AuthCommands::Logout => {
            // Best effort; the token is stateless so local removal is what counts.
            let _ = ctx.client.post("/auth/logout", &json!({})).await;
            config::clear_session()?;
            ctx.cache.invalidate(&Mutation::SessionChanged);
            utils::output_success(&ctx.output, "Logged out");
            Ok(())
        }
        AuthCommands::Whoami => {
            if ctx.use_cache {
                if let Some(cached) = ctx.cache.get(&CacheKey::Profile) {
                    return utils::output_value(&ctx.output, &cached.clone());
                }
            }
            let result = ctx.client.get("/auth/me", &[]).await?;
            ctx.cache.put(CacheKey::Profile, result.data.clone());
            utils::output_value(&ctx.output, &result.data)
        }
    }
}

fn store_session(
    ctx: &mut Context,
    email: &str,
    data: &serde_json::Value,
) -> anyhow::Result<()> {
    let token = data
        .get("token")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("server response missing token"))?;

    let session = config::Session {
        server_url: ctx.session.server_url.clone(),
        token: Some(token.to_string()),
        email: Some(email.to_string()),
        logged_in_at: Some(chrono::Utc::now()),
    };
    config::save_session(&session)?;
    ctx.client = ApiClient::from_session(&session);
    ctx.session = session;
    ctx.cache.invalidate(&Mutation::SessionChanged);
    Ok(())
}
