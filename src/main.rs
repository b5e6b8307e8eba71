use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use memory_lane_api::database::manager::DatabaseManager;
use memory_lane_api::database::schema;
use memory_lane_api::handlers;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = memory_lane_api::config::config();
    tracing::info!("Starting Memory Lane API in {:?} mode", config.environment);

    let pool = DatabaseManager::pool()
        .await
        .unwrap_or_else(|e| panic!("database unavailable: {}", e));
    schema::ensure_schema(&pool)
        .await
        .unwrap_or_else(|e| panic!("schema setup failed: {}", e));

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("MEMORY_LANE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Memory Lane API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(lane_routes())
        .merge(memory_routes())
        .merge(tag_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}

fn lane_routes() -> Router {
    use handlers::lanes;

    Router::new()
        .route("/lanes", get(lanes::list).post(lanes::create))
        .route("/lanes/my", get(lanes::my))
        .route(
            "/lanes/:id",
            get(lanes::show).put(lanes::update).delete(lanes::delete),
        )
        .route(
            "/lanes/:id/memories",
            get(lanes::list_memories).post(lanes::create_memory),
        )
}

fn memory_routes() -> Router {
    use axum::routing::post;
    use handlers::{images, memories};

    Router::new()
        .route(
            "/memories/:id",
            axum::routing::put(memories::update).delete(memories::delete),
        )
        .route("/memories/:id/images", post(memories::upload_images))
        .route("/images/:id", axum::routing::delete(images::delete))
}

fn tag_routes() -> Router {
    use handlers::tags;

    Router::new()
        .route("/tags", get(tags::list).post(tags::create))
        .route("/tags/:id", axum::routing::put(tags::update).delete(tags::delete))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Memory Lane API",
            "version": version,
            "description": "Photo memory collections backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login, /auth/logout, /auth/me",
                "lanes": "/lanes, /lanes/my, /lanes/:id, /lanes/:id/memories",
                "memories": "/memories/:id, /memories/:id/images",
                "images": "/images/:id",
                "tags": "/tags, /tags/:id",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
