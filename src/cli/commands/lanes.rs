use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::cache::{CacheKey, ListKey, Mutation};
use crate::cli::{utils, Context};

#[derive(Subcommand)]
pub enum LaneCommands {
    #[command(about = "List memory lanes")]
    List {
        #[arg(long, help = "Only my lanes")]
        mine: bool,
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long, help = "Filter by title or description")]
        search: Option<String>,
        #[arg(long, help = "Filter by tag id")]
        tag: Option<Uuid>,
        #[arg(long, help = "Sort field (createdAt, updatedAt, title)")]
        sort_by: Option<String>,
        #[arg(long, help = "asc or desc")]
        sort_order: Option<String>,
    },

    #[command(about = "Show a single lane with its memories")]
    Show {
        #[arg(help = "Lane id")]
        id: Uuid,
    },

    #[command(about = "Create a memory lane")]
    Create {
        #[arg(help = "Lane title")]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Cover image URL")]
        cover: Option<String>,
        #[arg(long = "tag", help = "Tag id to attach (repeatable)")]
        tags: Vec<Uuid>,
    },

    #[command(about = "Update a memory lane")]
    Update {
        #[arg(help = "Lane id")]
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Cover image URL")]
        cover: Option<String>,
        #[arg(long = "tag", help = "Replacement tag set (repeatable)")]
        tags: Option<Vec<Uuid>>,
    },

    #[command(about = "Delete a memory lane and everything in it")]
    Delete {
        #[arg(help = "Lane id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: LaneCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        LaneCommands::List { mine, page, limit, search, tag, sort_by, sort_order } => {
            let list_key = ListKey {
                page,
                limit,
                search: search.clone(),
                tag_id: tag,
                sort_by: sort_by.clone(),
                sort_order: sort_order.clone(),
            };
            let key = if mine {
                CacheKey::MyLanes(list_key)
            } else {
                CacheKey::Lanes(list_key)
            };
            if ctx.use_cache {
                if let Some(cached) = ctx.cache.get(&key) {
                    return utils::output_value(&ctx.output, &cached.clone());
                }
            }

            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(search) = &search {
                query.push(("search", search.clone()));
            }
            if let Some(tag) = tag {
                query.push(("tagId", tag.to_string()));
            }
            if let Some(sort_by) = &sort_by {
                query.push(("sortBy", sort_by.clone()));
            }
            if let Some(sort_order) = &sort_order {
                query.push(("sortOrder", sort_order.clone()));
            }

            let path = if mine { "/lanes/my" } else { "/lanes" };
            let result = ctx.client.get(path, &query).await?;
            ctx.cache.put(key, result.data.clone());
            utils::output_value(&ctx.output, &result.data)
        }
        LaneCommands::Show { id } => {
            let key = CacheKey::Lane(id);
            if ctx.use_cache {
                if let Some(cached) = ctx.cache.get(&key) {
                    return utils::output_value(&ctx.output, &cached.clone());
                }
            }
            let result = ctx.client.get(&format!("/lanes/{}", id), &[]).await?;
            ctx.cache.put(key, result.data.clone());
            utils::output_value(&ctx.output, &result.data)
        }
        LaneCommands::Create { title, description, cover, tags } => {
            let body = json!({
                "title": title,
                "description": description,
                "coverImageUrl": cover,
                "tagIds": tags,
            });
            let result = ctx.client.post("/lanes", &body).await?;
            ctx.cache.invalidate(&Mutation::LaneCreated);
            utils::output_value(&ctx.output, &result.data)
        }
        LaneCommands::Update { id, title, description, cover, tags } => {
            let mut body = serde_json::Map::new();
            if let Some(title) = title {
                body.insert("title".into(), json!(title));
            }
            if let Some(description) = description {
                body.insert("description".into(), json!(description));
            }
            if let Some(cover) = cover {
                body.insert("coverImageUrl".into(), json!(cover));
            }
            if let Some(tags) = tags {
                body.insert("tagIds".into(), json!(tags));
            }
            let result = ctx
                .client
                .put(&format!("/lanes/{}", id), &serde_json::Value::Object(body))
                .await?;
            ctx.cache.invalidate(&Mutation::LaneUpdated(id));
            utils::output_value(&ctx.output, &result.data)
        }
        LaneCommands::Delete { id } => {
            let result = ctx.client.delete(&format!("/lanes/{}", id)).await?;
            ctx.cache.invalidate(&Mutation::LaneDeleted(id));
            utils::output_success(
                &ctx.output,
                result.message.as_deref().unwrap_or("Lane deleted"),
            );
            Ok(())
        }
    }
}
