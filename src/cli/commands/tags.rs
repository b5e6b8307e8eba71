use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::cache::{CacheKey, Mutation};
use crate::cli::{utils, Context};

#[derive(Subcommand)]
pub enum TagCommands {
    #[command(about = "List tags with usage counts")]
    List {
        #[arg(long, help = "Filter by name")]
        search: Option<String>,
    },

    #[command(about = "Create a tag")]
    Create {
        #[arg(help = "Tag name")]
        name: String,
        #[arg(long, help = "Hex color like #3B82F6")]
        color: Option<String>,
    },

    #[command(about = "Rename or recolor a tag")]
    Update {
        #[arg(help = "Tag id")]
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, help = "Hex color like #3B82F6")]
        color: Option<String>,
    },

    #[command(about = "Delete an unused tag")]
    Delete {
        #[arg(help = "Tag id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: TagCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        TagCommands::List { search } => {
            let key = CacheKey::Tags(search.clone());
            if ctx.use_cache {
                if let Some(cached) = ctx.cache.get(&key) {
                    return utils::output_value(&ctx.output, &cached.clone());
                }
            }
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(search) = &search {
                query.push(("search", search.clone()));
            }
            let result = ctx.client.get("/tags", &query).await?;
            ctx.cache.put(key, result.data.clone());
            utils::output_value(&ctx.output, &result.data)
        }
        TagCommands::Create { name, color } => {
            let body = json!({ "name": name, "color": color });
            let result = ctx.client.post("/tags", &body).await?;
            ctx.cache.invalidate(&Mutation::TagsChanged);
            utils::output_value(&ctx.output, &result.data)
        }
        TagCommands::Update { id, name, color } => {
            let mut body = serde_json::Map::new();
            if let Some(name) = name {
                body.insert("name".into(), json!(name));
            }
            if let Some(color) = color {
                body.insert("color".into(), json!(color));
            }
            let result = ctx
                .client
                .put(&format!("/tags/{}", id), &serde_json::Value::Object(body))
                .await?;
            ctx.cache.invalidate(&Mutation::TagsChanged);
            utils::output_value(&ctx.output, &result.data)
        }
        TagCommands::Delete { id } => {
            let result = ctx.client.delete(&format!("/tags/{}", id)).await?;
            ctx.cache.invalidate(&Mutation::TagsChanged);
            utils::output_success(
                &ctx.output,
                result.message.as_deref().unwrap_or("Tag deleted"),
            );
            Ok(())
        }
    }
}
