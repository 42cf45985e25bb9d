//! HTTP endpoints for health checks, event listings, and session operations.

use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    extract::{Query as AxumQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::gate::EventView;
use crate::identity::IdentityProvider;
use crate::session::{Session, UpgradeError};
use crate::storage::Store;
use crate::tier::Tier;

/// Shared state handed to every handler.
#[derive(Clone)]
struct HttpState {
    store: Store,
    identity: Arc<dyn IdentityProvider>,
}

/// Uniform error body. Internal fault detail is logged server-side and never
/// crosses the boundary.
#[derive(Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Boundary-facing error classes mapped onto status codes.
enum ApiError {
    /// Missing or malformed request parameter; the store is never touched.
    BadRequest(String),
    /// No identity record for the supplied token.
    UnknownIdentity,
    /// Upgrade precondition failure: a rejected operation, not a fault.
    Rejected(String),
    /// Identity provider call failed.
    Provider(anyhow::Error),
    /// Backing store unavailable or query failed.
    Store(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UnknownIdentity => {
                (StatusCode::NOT_FOUND, "unknown identity".to_string())
            }
            ApiError::Rejected(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Provider(err) => {
                tracing::error!("identity provider call failed: {err:#}");
                (
                    StatusCode::BAD_GATEWAY,
                    "identity provider unavailable".to_string(),
                )
            }
            ApiError::Store(err) => {
                tracing::error!("store query failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Start the HTTP server on `addr`.
pub async fn serve_http(
    addr: SocketAddr,
    store: Store,
    identity: Arc<dyn IdentityProvider>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let app = router(Arc::new(HttpState { store, identity }));
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/events", get(list_events))
        .route("/events/tier", get(list_events_for_tier))
        .route("/events/mine", get(list_my_events))
        .route("/session", get(get_session))
        .route("/session/upgrade", post(upgrade_session))
        .with_state(state)
}

/// Response body for the `/healthz` endpoint.
#[derive(Serialize, Deserialize)]
struct Health {
    status: String,
}

async fn healthz() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

#[derive(Serialize, Deserialize)]
struct EventsBody {
    events: Vec<Event>,
}

/// Unfiltered listing, ascending by event date. Diagnostic surface; the
/// gated product path is `/events/tier` and `/events/mine`.
async fn list_events(State(state): State<Arc<HttpState>>) -> Result<Json<EventsBody>, ApiError> {
    let events = state.store.list_all().await.map_err(ApiError::Store)?;
    Ok(Json(EventsBody { events }))
}

#[derive(Deserialize)]
struct TierParams {
    tier: Option<String>,
}

/// Listing restricted to the entitlement prefix of the declared tier.
async fn list_events_for_tier(
    State(state): State<Arc<HttpState>>,
    AxumQuery(params): AxumQuery<TierParams>,
) -> Result<Json<EventsBody>, ApiError> {
    // Reject missing or unparseable tiers before touching the store.
    let raw = params
        .tier
        .ok_or_else(|| ApiError::BadRequest("tier parameter is required".to_string()))?;
    let tier: Tier = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown tier: {raw}")))?;
    let events = state
        .store
        .list_for_tier(tier)
        .await
        .map_err(ApiError::Store)?;
    tracing::debug!("GET /events/tier?tier={tier} -> {} events", events.len());
    Ok(Json(EventsBody { events }))
}

#[derive(Deserialize)]
struct TokenParams {
    token: Option<String>,
}

async fn resolve_session(state: &HttpState, params: TokenParams) -> Result<Session, ApiError> {
    let token = params
        .token
        .ok_or_else(|| ApiError::BadRequest("token parameter is required".to_string()))?;
    let identity = state
        .identity
        .fetch(&token)
        .await
        .map_err(ApiError::Provider)?
        .ok_or(ApiError::UnknownIdentity)?;
    Ok(Session::from_identity(&identity))
}

/// Resolved caller view, including the tier toggle affordances.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody {
    token: String,
    name: String,
    tier: Tier,
    entitled_tiers: Vec<Tier>,
    available_upgrades: Vec<Tier>,
}

impl From<Session> for SessionBody {
    fn from(session: Session) -> Self {
        Self {
            entitled_tiers: session.tier.entitled().to_vec(),
            available_upgrades: session.tier.upgrades().to_vec(),
            token: session.token,
            name: session.name,
            tier: session.tier,
        }
    }
}

async fn get_session(
    State(state): State<Arc<HttpState>>,
    AxumQuery(params): AxumQuery<TokenParams>,
) -> Result<Json<SessionBody>, ApiError> {
    let session = resolve_session(&state, params).await?;
    Ok(Json(SessionBody::from(session)))
}

#[derive(Serialize)]
struct GatedEventsBody {
    tier: Tier,
    events: Vec<EventView>,
}

/// Listing for the resolved caller: filtered at the store, then re-checked
/// per item by the gate before anything is rendered.
async fn list_my_events(
    State(state): State<Arc<HttpState>>,
    AxumQuery(params): AxumQuery<TokenParams>,
) -> Result<Json<GatedEventsBody>, ApiError> {
    let session = resolve_session(&state, params).await?;
    let events = state
        .store
        .list_for_tier(session.tier)
        .await
        .map_err(ApiError::Store)?;
    let events = events
        .into_iter()
        .map(|ev| EventView::for_member(ev, session.tier))
        .collect();
    Ok(Json(GatedEventsBody {
        tier: session.tier,
        events,
    }))
}

#[derive(Serialize, Deserialize)]
struct UpgradeBody {
    token: String,
    tier: String,
}

/// Self-service tier upgrade. Server-side filtering remains the only real
/// enforcement; this merely moves the metadata the filter reads.
async fn upgrade_session(
    State(state): State<Arc<HttpState>>,
    Json(body): Json<UpgradeBody>,
) -> Result<Json<SessionBody>, ApiError> {
    let requested: Tier = body
        .tier
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown tier: {}", body.tier)))?;
    let mut session = resolve_session(
        &state,
        TokenParams {
            token: Some(body.token),
        },
    )
    .await?;
    match session.upgrade(state.identity.as_ref(), requested).await {
        Ok(()) => {
            tracing::info!("session {} upgraded to {}", session.token, session.tier);
            Ok(Json(SessionBody::from(session)))
        }
        Err(err @ UpgradeError::NotAnUpgrade { .. }) => Err(ApiError::Rejected(err.to_string())),
        Err(UpgradeError::Provider(err)) => Err(ApiError::Provider(err)),
    }
}
