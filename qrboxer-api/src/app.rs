/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use qrboxer_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = qrboxer_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::{
    config::Config,
    middleware::auth::{authenticate, ensure_admin, ensure_correct_user_or_admin},
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Secret used to sign and verify user tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check
/// ├── /auth/
/// │   ├── POST /token
/// │   └── POST /register
/// ├── /users/                    # Guarded
/// │   ├── POST   /               # admin
/// │   ├── GET    /               # admin
/// │   └── GET|PATCH|DELETE /:username   # same user or admin
/// ├── /moves/
/// │   ├── POST|GET /
/// │   ├── GET|PATCH|DELETE /:id
/// │   └── GET /:id/boxes
/// ├── /boxes/
/// │   ├── POST|GET /
/// │   ├── GET|PATCH|DELETE /:id
/// │   └── GET /:id/items
/// └── /items/
///     ├── POST|GET /
///     └── GET|PATCH|DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Token authentication (claims stored when a valid token is sent)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Guards (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{auth, boxes, health, items, moves, users};

    let auth_routes = Router::new()
        .route("/token", post(auth::token))
        .route("/register", post(auth::register));

    let admin_user_routes = Router::new()
        .route("/", post(users::create_user).get(users::list_users))
        .route_layer(from_fn(ensure_admin));

    let own_user_routes = Router::new()
        .route(
            "/:username",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(from_fn(ensure_correct_user_or_admin));

    let move_routes = Router::new()
        .route("/", post(moves::create_move).get(moves::list_moves))
        .route(
            "/:id",
            get(moves::get_move)
                .patch(moves::update_move)
                .delete(moves::delete_move),
        )
        .route("/:id/boxes", get(moves::list_move_boxes));

    let box_routes = Router::new()
        .route("/", post(boxes::create_box).get(boxes::list_boxes))
        .route(
            "/:id",
            get(boxes::get_box)
                .patch(boxes::update_box)
                .delete(boxes::delete_box),
        )
        .route("/:id/items", get(boxes::list_box_items));

    let item_routes = Router::new()
        .route("/", post(items::create_item).get(items::list_items))
        .route(
            "/:id",
            get(items::get_item)
                .patch(items::update_item)
                .delete(items::delete_item),
        );

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth_routes)
        .nest("/users", admin_user_routes.merge(own_user_routes))
        .nest("/moves", move_routes)
        .nest("/boxes", box_routes)
        .nest("/items", item_routes)
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
