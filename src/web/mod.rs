mod assets;
mod error;

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

pub use error::ApiError;

use crate::{
    config::AnalysisSettings,
    dataset::MapStatistics,
    engine::AnalysisEngine,
    intent::AnalysisRequest,
    map::MapDocument,
    session::{
        ChatMessage, DataSource, ProgressStep, QuickAction, Session, CAPABILITIES, DATA_SOURCES,
    },
};

/// Everything the page needs to draw itself.
#[derive(Clone, Serialize)]
pub struct StateEnvelope {
    pub messages: Vec<ChatMessage>,
    pub request: Option<AnalysisRequest>,
    pub generated_at: Option<DateTime<Utc>>,
    pub map: Option<MapDocument>,
    pub statistics: Option<MapStatistics>,
    pub progress: Vec<ProgressStep>,
    pub data_sources: &'static [DataSource],
    pub capabilities: &'static [&'static str],
    pub quick_actions: Vec<QuickActionView>,
}

#[derive(Clone, Serialize)]
pub struct QuickActionView {
    pub slug: &'static str,
    pub label: &'static str,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// The single session served by this instance and the engine feeding it.
pub struct Dashboard {
    session: Session,
    engine: AnalysisEngine,
}

impl Dashboard {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            session: Session::new(),
            engine: AnalysisEngine::new(settings),
        }
    }

    pub fn envelope(&self) -> StateEnvelope {
        let current = self.session.current();
        StateEnvelope {
            messages: self.session.messages().to_vec(),
            request: current.map(|analysis| analysis.request.clone()),
            generated_at: current.map(|analysis| analysis.created_at),
            map: current.map(|analysis| analysis.map()),
            statistics: current.map(|analysis| analysis.statistics()),
            progress: self.session.progress(),
            data_sources: &DATA_SOURCES,
            capabilities: &CAPABILITIES,
            quick_actions: QuickAction::ALL
                .into_iter()
                .map(|action| QuickActionView {
                    slug: action.slug(),
                    label: action.label(),
                })
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<Mutex<Dashboard>>,
    broadcaster: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(settings: AnalysisSettings) -> Self {
        let (broadcaster, _) = broadcast::channel::<String>(64);
        Self {
            dashboard: Arc::new(Mutex::new(Dashboard::new(settings))),
            broadcaster,
        }
    }

    fn dashboard(&self) -> Result<MutexGuard<'_, Dashboard>, ApiError> {
        self.dashboard
            .lock()
            .map_err(|_| ApiError::Internal("dashboard lock poisoned".into()))
    }

    /// Apply `change` under the lock and push the resulting state to
    /// subscribers.
    fn update(
        &self,
        change: impl FnOnce(&mut Dashboard) -> bool,
    ) -> Result<StateEnvelope, ApiError> {
        let (changed, envelope) = {
            let mut dashboard = self.dashboard()?;
            let changed = change(&mut dashboard);
            (changed, dashboard.envelope())
        };
        if changed {
            match serde_json::to_string(&envelope) {
                Ok(payload) => {
                    let _ = self.broadcaster.send(payload);
                }
                Err(err) => tracing::warn!(error = %err, "failed to encode state event"),
            }
        }
        Ok(envelope)
    }
}

pub struct WebServerConfig {
    pub analysis: AnalysisSettings,
    pub host: String,
    pub port: u16,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/assets/:name", get(asset))
        .route("/api/state", get(current_state))
        .route("/api/chat", post(chat))
        .route("/api/quick/:action", post(quick_action))
        .route("/api/reset", post(reset))
        .route("/api/map.html", get(download_map))
        .route("/api/events", get(stream_events))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        analysis,
        host,
        port,
    } = config;

    let state = AppState::new(analysis);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("🌍 GeoSpectre dashboard live at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down dashboard");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn asset(Path(name): Path<String>) -> Result<Response, ApiError> {
    let asset = assets::lookup(&name).ok_or_else(|| ApiError::NotFound(name.clone()))?;
    Ok(([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response())
}

async fn current_state(State(state): State<AppState>) -> Result<Json<StateEnvelope>, ApiError> {
    Ok(Json(state.dashboard()?.envelope()))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<StateEnvelope>, ApiError> {
    let envelope = state.update(|dashboard| {
        let Dashboard { session, engine } = dashboard;
        session.submit(engine, &request.text).is_some()
    })?;
    Ok(Json(envelope))
}

async fn quick_action(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StateEnvelope>, ApiError> {
    let action = QuickAction::from_slug(&slug)
        .ok_or_else(|| ApiError::NotFound(format!("quick action '{slug}'")))?;
    let envelope = state.update(|dashboard| {
        let Dashboard { session, engine } = dashboard;
        session.quick_action(engine, action).is_some()
    })?;
    Ok(Json(envelope))
}

async fn reset(State(state): State<AppState>) -> Result<Json<StateEnvelope>, ApiError> {
    let envelope = state.update(|dashboard| {
        dashboard.session.reset();
        true
    })?;
    Ok(Json(envelope))
}

async fn download_map(State(state): State<AppState>) -> Result<Response, ApiError> {
    let html = {
        let dashboard = state.dashboard()?;
        let analysis = dashboard
            .session
            .current()
            .ok_or_else(|| ApiError::NotFound("no map generated yet".into()))?;
        analysis.map().to_html()?
    };
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"geospectre-map.html\"",
            ),
        ],
        html,
    )
        .into_response())
}

async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().event("state").data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
