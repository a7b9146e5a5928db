/// Application state and router assembly
///
/// The router splits into three groups: the public health route, the
/// public auth routes that hand out tokens, and everything else, which
/// sits behind the token gate. The gate is a single middleware layer; no
/// route under it runs without a verified identity in the request
/// extensions.
///
/// # Example
///
/// ```no_run
/// use taskpoints_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
/// # Ok(())
/// # }
/// ```

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskpoints_shared::auth::middleware::jwt_auth_middleware;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// State cloned into every handler
///
/// Both fields are cheap to clone; the config is behind an `Arc` and is
/// never written after startup.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool, shared by all handlers
    pub db: PgPool,

    /// Startup configuration, including the signing secret
    pub config: Arc<Config>,
}

impl AppState {
    /// Wraps pool and config into shareable state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Signing secret for token issuance
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// CORS layer from the configured origin list
///
/// A literal `*` entry gives the permissive development layer; otherwise
/// only the listed origins are allowed, with the methods and headers the
/// API actually uses.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Assembles the full router
///
/// ```text
/// /health                          public
/// /api/auth/register   POST        public, returns a token
/// /api/auth/login      POST        public, returns a token
/// /api/auth/account    DELETE      gated
/// /api/tasks           POST, GET   gated
/// /api/tasks/:id       PUT, DELETE gated
/// /api/tasks/:id/status PATCH      gated
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // The gate owns a copy of the secret; verification is local
    // computation only, so no state lookup happens per request.
    let secret = state.config.jwt.secret.clone();
    let auth_gate = axum::middleware::from_fn(move |req, next| {
        jwt_auth_middleware(secret.clone(), req, next)
    });

    let token_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let account_routes = Router::new()
        .route("/account", delete(routes::auth::delete_account))
        .layer(auth_gate.clone());

    // Task handlers take the owner id from the AuthContext the gate
    // injected, never from the client.
    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task).get(routes::tasks::list_tasks))
        .route(
            "/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/:id/status", patch(routes::tasks::set_task_status))
        .layer(auth_gate);

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", token_routes.merge(account_routes))
                .nest("/tasks", task_routes),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
