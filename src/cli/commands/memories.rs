use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

use crate::cli::cache::{CacheKey, ListKey, Mutation};
use crate::cli::{utils, Context};

#[derive(Subcommand)]
pub enum MemoryCommands {
    #[command(about = "List memories in a lane")]
    List {
        #[arg(help = "Lane id")]
        lane: Uuid,
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long)]
        limit: Option<i64>,
    },

    #[command(about = "Add a memory to a lane")]
    Create {
        #[arg(help = "Lane id")]
        lane: Uuid,
        #[arg(help = "Memory title")]
        title: String,
        #[arg(long, help = "When it happened (RFC 3339)")]
        occurred_at: String,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "Update a memory")]
    Update {
        #[arg(help = "Memory id")]
        id: Uuid,
        #[arg(long, help = "Lane id, used to refresh the cache")]
        lane: Option<Uuid>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "When it happened (RFC 3339)")]
        occurred_at: Option<String>,
    },

    #[command(about = "Delete a memory")]
    Delete {
        #[arg(help = "Memory id")]
        id: Uuid,
        #[arg(long, help = "Lane id, used to refresh the cache")]
        lane: Option<Uuid>,
    },

    #[command(about = "Upload image files to a memory")]
    Upload {
        #[arg(help = "Memory id")]
        id: Uuid,
        #[arg(help = "Image files", required = true)]
        files: Vec<PathBuf>,
        #[arg(long, help = "Lane id, used to refresh the cache")]
        lane: Option<Uuid>,
    },

    #[command(about = "Remove an image from a memory")]
    RemoveImage {
        #[arg(help = "Image id")]
        id: Uuid,
        #[arg(long, help = "Lane id, used to refresh the cache")]
        lane: Option<Uuid>,
    },
}

pub async fn handle(cmd: MemoryCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        MemoryCommands::List { lane, page, limit } => {
            let list_key = ListKey { page: Some(page), limit, ..Default::default() };
            let key = CacheKey::LaneMemories(lane, list_key);
            if ctx.use_cache {
                if let Some(cached) = ctx.cache.get(&key) {
                    return utils::output_value(&ctx.output, &cached.clone());
                }
            }
            let mut query = vec![("page", page.to_string())];
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            let result = ctx
                .client
                .get(&format!("/lanes/{}/memories", lane), &query)
                .await?;
            ctx.cache.put(key, result.data.clone());
            utils::output_value(&ctx.output, &result.data)
        }
        MemoryCommands::Create { lane, title, occurred_at, description } => {
            let body = json!({
                "title": title,
                "occurredAt": occurred_at,
                "description": description,
            });
            let result = ctx
                .client
                .post(&format!("/lanes/{}/memories", lane), &body)
                .await?;
            ctx.cache.invalidate(&Mutation::MemoriesChanged(lane));
            utils::output_value(&ctx.output, &result.data)
        }
        MemoryCommands::Update { id, lane, title, description, occurred_at } => {
            let mut body = serde_json::Map::new();
            if let Some(title) = title {
                body.insert("title".into(), json!(title));
            }
            if let Some(description) = description {
                body.insert("description".into(), json!(description));
            }
            if let Some(occurred_at) = occurred_at {
                body.insert("occurredAt".into(), json!(occurred_at));
            }
            let result = ctx
                .client
                .put(&format!("/memories/{}", id), &serde_json::Value::Object(body))
                .await?;
            invalidate_lane(ctx, lane);
            utils::output_value(&ctx.output, &result.data)
        }
        MemoryCommands::Delete { id, lane } => {
            let result = ctx.client.delete(&format!("/memories/{}", id)).await?;
            invalidate_lane(ctx, lane);
            utils::output_success(
                &ctx.output,
                result.message.as_deref().unwrap_or("Memory deleted"),
            );
            Ok(())
        }
        MemoryCommands::Upload { id, files, lane } => {
            let result = ctx
                .client
                .upload(&format!("/memories/{}/images", id), &files)
                .await?;
            invalidate_lane(ctx, lane);
            utils::output_value(&ctx.output, &result.data)
        }
        MemoryCommands::RemoveImage { id, lane } => {
            let result = ctx.client.delete(&format!("/images/{}", id)).await?;
            invalidate_lane(ctx, lane);
            utils::output_success(
                &ctx.output,
                result.message.as_deref().unwrap_or("Image deleted"),
            );
            Ok(())
        }
    }
}

fn invalidate_lane(ctx: &mut Context, lane: Option<Uuid>) {
    match lane {
        Some(lane) => ctx.cache.invalidate(&Mutation::MemoriesChanged(lane)),
        // Without a lane id we cannot tell which reads went stale.
        None => ctx.cache.clear(),
    }
}
