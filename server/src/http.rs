use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, Request, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use platform_db::{DbPool, NewStore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::AppConfig;

/// Session cookie written by the external identity provider; this server only
/// decrypts and validates it.
const SESSION_COOKIE: &str = "__Host-retail_session";

const LOGIN_PATH: &str = "/login";
const SETTINGS_PATH: &str = "/settings";

/// Page prefixes behind the session gate.
const PROTECTED_PREFIXES: [&str; 5] = [
    "/dashboard",
    "/settings",
    "/products",
    "/orders",
    "/customers",
];

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "retail admin server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    // Credentials cannot be combined with a wildcard origin.
    let (allow_origin, credentials) = if allowed.is_empty() {
        (AllowOrigin::any(), false)
    } else {
        (AllowOrigin::list(allowed), true)
    };
    CorsLayer::new()
        .allow_credentials(credentials)
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/stores", get(list_stores_handler))
        .route("/api/stores", post(create_store_handler))
        .route("/api/user/store", put(update_user_store_handler))
        .route("/api/products", get(search_products_handler))
        .route("/api/products/{id}", delete(delete_product_handler))
        .route(LOGIN_PATH, get(page_shell))
        .route("/dashboard", get(page_shell))
        .route(SETTINGS_PATH, get(page_shell))
        .route("/products", get(page_shell))
        .route("/orders", get(page_shell))
        .route("/customers", get(page_shell))
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

/// Claims carried in the encrypted session cookie. The identity provider owns
/// issuance; `id` is only present once the user row exists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

fn read_session(jar: &PrivateCookieJar) -> Option<SessionUser> {
    let cookie = jar.get(SESSION_COOKIE)?;
    serde_json::from_str(cookie.value()).ok()
}

/// Gate ahead of the dashboard page prefixes: unauthenticated requests go to
/// the login page; authenticated users with no row in `users` are pushed to
/// the settings page to pick a store, except when already headed there.
async fn session_gate(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    request: Request,
    next: Next,
) -> HttpResult<Response> {
    let path = request.uri().path();
    let protected = PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")));
    if !protected {
        return Ok(next.run(request).await);
    }

    let Some(session) = read_session(&jar) else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    if let Some(email) = session.email.as_deref() {
        let registered = platform_db::find_user_by_email(&state.pool, email)
            .await
            .map_err(|err| {
                error!(?err, "session gate user lookup failed");
                HttpError::internal("Failed to resolve user")
            })?;
        if registered.is_none() && !path.starts_with(SETTINGS_PATH) {
            return Ok(Redirect::to(SETTINGS_PATH).into_response());
        }
    }

    Ok(next.run(request).await)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.pool.ping().await.is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

/// Public endpoint; failures are a 500, not an empty list.
async fn list_stores_handler(
    State(state): State<AppState>,
) -> HttpResult<Json<Vec<entity::stores::Model>>> {
    let stores = platform_db::list_active_stores(&state.pool)
        .await
        .map_err(|err| {
            error!(?err, "failed to fetch stores");
            HttpError::internal("Failed to fetch stores")
        })?;
    Ok(Json(stores))
}

#[derive(Debug, Deserialize)]
struct CreateStoreRequest {
    name: String,
    address: String,
    phone: String,
    email: String,
}

async fn create_store_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(body): Json<CreateStoreRequest>,
) -> HttpResult<Json<entity::stores::Model>> {
    if read_session(&jar).is_none() {
        return Err(HttpError::unauthorized());
    }
    let store = platform_db::create_store(
        &state.pool,
        NewStore {
            name: body.name,
            address: body.address,
            phone: body.phone,
            email: body.email,
        },
    )
    .await
    .map_err(|err| {
        error!(?err, "failed to create store");
        HttpError::internal("Failed to create store")
    })?;
    Ok(Json(store))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserStoreRequest {
    store_id: i32,
}

async fn update_user_store_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(body): Json<UpdateUserStoreRequest>,
) -> HttpResult<Json<serde_json::Value>> {
    let user_id = read_session(&jar)
        .and_then(|session| session.id)
        .ok_or_else(HttpError::unauthorized)?;
    let updated = platform_db::update_user_store(&state.pool, user_id, body.store_id)
        .await
        .map_err(|err| {
            error!(?err, "failed to update user store");
            HttpError::internal("Failed to update store")
        })?;
    if !updated {
        return Err(HttpError::internal("Failed to update store"));
    }
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductSearchQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    offset: u64,
    store_id: Option<i32>,
}

async fn search_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> HttpResult<Json<platform_db::ProductPage>> {
    let page = platform_db::search_products(&state.pool, &query.search, query.offset, query.store_id)
        .await
        .map_err(|err| {
            error!(?err, "failed to fetch products");
            HttpError::internal("Failed to fetch products")
        })?;
    Ok(Json(page))
}

async fn delete_product_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Path(id): Path<i32>,
) -> HttpResult<Json<serde_json::Value>> {
    if read_session(&jar).is_none() {
        return Err(HttpError::unauthorized());
    }
    platform_db::delete_product(&state.pool, id)
        .await
        .map_err(|err| {
            error!(?err, product_id = id, "failed to delete product");
            HttpError::internal("Failed to delete product")
        })?;
    Ok(Json(json!({ "success": true })))
}

/// Placeholder shell for the page routes; the dashboard frontend owns the
/// markup, the server only owns the gate in front of it.
async fn page_shell(uri: Uri) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><title>Retail Admin</title></head>\
         <body data-page=\"{}\"></body></html>",
        uri.path()
    ))
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    fn internal(msg: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
