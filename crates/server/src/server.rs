use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::Serialize;

use std::sync::Arc;

use crate::{accounts, auth::TokenVerifier, categories, statistics, transactions, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub verifier: Arc<dyn TokenVerifier>,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Resolve the bearer token and attach the caller's profile to the request.
///
/// The user row is upserted on first sight, so the first authenticated call
/// a client ever makes already has a profile to work with.
async fn auth(
    State(state): State<ServerState>,
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let claims = match state.verifier.verify(header.token()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!("rejected bearer token: {err}");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let profile = state
        .engine
        .ensure_user(&claims.subject, claims.email.as_deref())
        .await
        .map_err(|err| {
            tracing::error!("user sync failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    request.extensions_mut().insert(profile);
    Ok(next.run(request).await)
}

/// Build the full application router. Exposed for in-process tests.
pub fn app(engine: Engine, verifier: Arc<dyn TokenVerifier>) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        verifier,
    })
}

fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/auth/sync", post(user::sync))
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            put(transactions::update).delete(transactions::remove),
        )
        .route("/user/profile", get(user::profile).put(user::update_profile))
        .route("/categories", get(categories::list))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
        .route("/stats", get(statistics::balance))
        .route("/stats/monthly", get(statistics::monthly))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}

pub async fn run(engine: Engine, verifier: Arc<dyn TokenVerifier>) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, verifier, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    verifier: Arc<dyn TokenVerifier>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        verifier,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    verifier: Arc<dyn TokenVerifier>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, verifier, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
