use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    env,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::sync::{broadcast, Mutex};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::services::{ServeDir, ServeFile};

use crate::api::{ApiRecommendRequest, ApiRecommendResponse};
use crate::llm::OllamaClient;
use focus_reco::config::EngineConfig;
use focus_reco::context::{ContextProvider, NicheContext, StaticContext};
use focus_reco::{recommend, recommend_with_generator};

#[derive(Clone)]
struct AppState {
    config: Arc<EngineConfig>,
    generator: Option<Arc<OllamaClient>>,
    context: Arc<dyn ContextProvider>,
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>,
}

#[derive(Clone, Serialize)]
struct StreamEvent {
    event: String,
    message: String,
    timestamp_ms: u128,
}

#[derive(serde::Deserialize)]
struct StreamQuery {
    request_id: String,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(args: crate::ServeArgs, config: EngineConfig) -> Result<(), String> {
    let generator = match OllamaClient::from_config(&config.generator) {
        Ok(client) => Some(Arc::new(client)),
        Err(err) => {
            tracing::warn!(error = %err, "generator client unavailable; llm endpoint degraded");
            None
        }
    };

    let state = AppState {
        config: Arc::new(config),
        generator,
        context: Arc::new(StaticContext(NicheContext::default())),
        channels: Arc::new(Mutex::new(HashMap::new())),
    };

    let web_root = args.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/recommend", post(recommend_handler))
        .route("/api/recommend/llm", post(recommend_llm_handler))
        .route("/api/recommend/stream", get(stream_handler))
        .nest_service("/", static_service)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    tracing::info!(%addr, "listening");
    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| format!("failed to bind server: {}", err))?,
        app,
    )
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

// Requests must carry the configured key; an unset API_KEY leaves the
// surface open, which is the local-dev default.
fn authorized(headers: &HeaderMap) -> bool {
    match env::var("API_KEY") {
        Ok(expected) if !expected.trim().is_empty() => headers
            .get("x-api-key")
            .and_then(|value| value.to_str().ok())
            .map(|value| value == expected)
            .unwrap_or(false),
        _ => true,
    }
}

async fn recommend_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ApiRecommendRequest>,
) -> Result<Json<ApiRecommendResponse>, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()));
    }

    let request_id = request.request_id.clone().unwrap_or_else(generate_request_id);
    let metrics = request
        .to_metrics()
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;

    let output = recommend(&metrics, &request.specialties, &state.config);
    Ok(Json(ApiRecommendResponse::from_output(
        output,
        Vec::new(),
        request_id,
    )))
}

async fn recommend_llm_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ApiRecommendRequest>,
) -> Result<Json<ApiRecommendResponse>, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()));
    }

    let request_id = request.request_id.clone().unwrap_or_else(generate_request_id);
    let metrics = request
        .to_metrics()
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let top_k = request.top_k.unwrap_or(10).max(1);
    let temperature = request
        .temperature
        .unwrap_or(state.config.generator.temperature);

    let channel = get_or_create_channel(&state, &request_id).await;
    send_event(&channel, "start", "Fetching niche context");

    let mut warnings = Vec::new();
    let niche_context = match state
        .context
        .fetch(&metrics.niche, request.region.as_deref(), top_k)
        .await
    {
        Ok(context) => context,
        Err(err) => {
            warnings.push(format!("context lookup failed: {}", err));
            send_event(&channel, "degraded", "Context lookup failed; continuing without it");
            NicheContext::default()
        }
    };

    let output = match state.generator.as_ref() {
        Some(generator) => {
            send_event(&channel, "calling", "Calling the text generator");
            let output = recommend_with_generator(
                &metrics,
                &request.specialties,
                generator.as_ref(),
                &niche_context,
                temperature,
                &state.config,
            )
            .await;
            if !output.fully_valid {
                warnings.push("draft not fully valid after one repair round".to_string());
            }
            output
        }
        None => {
            warnings.push("generator not configured; heuristic response".to_string());
            send_event(&channel, "degraded", "Generator not configured");
            recommend(&metrics, &request.specialties, &state.config)
        }
    };

    send_event(&channel, "done", "Recommendation ready");
    schedule_cleanup(state.channels.clone(), request_id.clone());

    Ok(Json(ApiRecommendResponse::from_output(
        output,
        warnings,
        request_id,
    )))
}

async fn stream_handler(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>, StatusCode>
{
    let sender = get_or_create_channel(&state, &query.request_id).await;
    let receiver = sender.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|event| match event {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data)))
        }
        Err(_) => None,
    });

    send_event(&sender, "connected", "Streaming recommendation status");
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8))))
}

async fn get_or_create_channel(
    state: &AppState,
    request_id: &str,
) -> broadcast::Sender<StreamEvent> {
    let mut guard = state.channels.lock().await;
    if let Some(sender) = guard.get(request_id) {
        return sender.clone();
    }
    let (sender, _) = broadcast::channel(32);
    guard.insert(request_id.to_string(), sender.clone());
    sender
}

fn send_event(sender: &broadcast::Sender<StreamEvent>, event: &str, message: &str) {
    let _ = sender.send(StreamEvent {
        event: event.to_string(),
        message: message.to_string(),
        timestamp_ms: now_ms(),
    });
}

fn schedule_cleanup(
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>,
    request_id: String,
) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        let mut guard = channels.lock().await;
        guard.remove(&request_id);
    });
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}
