//! Servidor web Axum com WebSocket para visualização da análise de sentimento em tempo real

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use sentimetric_core::{
    corpus::{demo_texts, labeled_examples, BenchmarkReport},
    Method, RemoteAnalyzer, RemoteError, ScoringEvent, SentimentAnalyzer,
    SentimentResult,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Estado compartilhado da aplicação
struct AppState {
    analyzer: SentimentAnalyzer,
    /// `None` quando não há chave de API: o servidor atende só por regras.
    remote: Option<RemoteAnalyzer>,
}

/// Motor escolhido pelo cliente
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Engine {
    #[default]
    Rule,
    Remote,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
    #[serde(default)]
    engine: Engine,
}

#[derive(Deserialize)]
struct BatchRequest {
    texts: Vec<String>,
    #[serde(default)]
    engine: Engine,
}

#[derive(Deserialize)]
struct EngineQuery {
    #[serde(default)]
    engine: Engine,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    #[serde(flatten)]
    result: SentimentResult,
    /// Cor CSS da categoria, usada pela página
    color: &'static str,
    processing_ms: u64,
}

#[derive(Serialize)]
struct BatchResponse {
    results: Vec<SentimentResult>,
    total: usize,
    processing_ms: u64,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let remote = match RemoteAnalyzer::from_env() {
        Ok(remote) => Some(remote),
        Err(RemoteError::MissingApiKey) => {
            warn!("ANTHROPIC_API_KEY ausente: análise remota desativada");
            None
        }
        Err(e) => {
            warn!("Analisador remoto indisponível: {}", e);
            None
        }
    };
    let state = Arc::new(AppState {
        analyzer: SentimentAnalyzer::new(),
        remote,
    });

    let addr = std::env::var("SENTIMETRIC_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Servidor de sentimento iniciado em http://{}", addr);
    axum::serve(listener, app(state)).await
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/analyze/batch", post(batch_handler))
        .route("/benchmark", get(benchmark_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Analisa um texto com o motor pedido.
///
/// Sem analisador remoto configurado, um pedido remoto é atendido pelas
/// regras e marcado como fallback.
async fn analyze_one(state: &AppState, text: &str, engine: Engine) -> SentimentResult {
    match (engine, &state.remote) {
        (Engine::Rule, _) => state.analyzer.analyze(text),
        (Engine::Remote, Some(remote)) => remote.analyze(text).await.into_result(),
        (Engine::Remote, None) => state
            .analyzer
            .analyze(text)
            .with_method(Method::RuleBasedFallback),
    }
}

async fn analyze_many(
    state: &Arc<AppState>,
    texts: Vec<String>,
    engine: Engine,
) -> Result<Vec<SentimentResult>, StatusCode> {
    match (engine, &state.remote) {
        (Engine::Remote, Some(remote)) => Ok(remote
            .analyze_batch(&texts)
            .await
            .into_iter()
            .map(|outcome| outcome.into_result())
            .collect()),
        _ => {
            let method = if engine == Engine::Remote {
                Method::RuleBasedFallback
            } else {
                Method::RuleBased
            };
            // Lote por regras roda no pool do rayon, fora do runtime
            let state = Arc::clone(state);
            let results = run_blocking(move || state.analyzer.analyze_batch(&texts)).await?;
            Ok(results.into_iter().map(|r| r.with_method(method)).collect())
        }
    }
}

/// Executa um lote síncrono fora do runtime. Um worker que entra em pânico
/// vira 500: nunca uma resposta com menos resultados que textos.
async fn run_blocking<F>(job: F) -> Result<Vec<SentimentResult>, StatusCode>
where
    F: FnOnce() -> Vec<SentimentResult> + Send + 'static,
{
    tokio::task::spawn_blocking(job).await.map_err(|e| {
        error!("Worker do lote falhou: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn internal_error(status: StatusCode) -> axum::response::Response {
    (status, Json(serde_json::json!({"error": "Falha interna na análise"}))).into_response()
}

/// Análise via HTTP POST (sem streaming)
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Texto vazio"})),
        )
            .into_response();
    }

    let start = Instant::now();
    let result = analyze_one(&state, &req.text, req.engine).await;

    Json(AnalyzeResponse {
        color: result.category.color(),
        result,
        processing_ms: start.elapsed().as_millis() as u64,
    })
    .into_response()
}

/// Análise em lote; a ordem da resposta segue a ordem dos textos
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> impl IntoResponse {
    let start = Instant::now();
    let results = match analyze_many(&state, req.texts, req.engine).await {
        Ok(results) => results,
        Err(status) => return internal_error(status),
    };
    let total = results.len();

    Json(BatchResponse {
        results,
        total,
        processing_ms: start.elapsed().as_millis() as u64,
    })
    .into_response()
}

/// Acurácia do motor escolhido sobre o conjunto rotulado
async fn benchmark_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EngineQuery>,
) -> impl IntoResponse {
    let examples = labeled_examples();
    let texts: Vec<String> = examples.iter().map(|e| e.text.clone()).collect();
    match analyze_many(&state, texts, query.engine).await {
        Ok(results) => Json(BenchmarkReport::from_results(&examples, &results)).into_response(),
        Err(status) => internal_error(status),
    }
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(group, text)| {
            serde_json::json!({
                "group": group,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe texto, executa o pipeline e envia os eventos de pontuação
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // Aceita JSON {text} ou texto puro
                let text_str = serde_json::from_str::<AnalyzeRequest>(&text)
                    .map(|req| req.text)
                    .unwrap_or(text);

                if text_str.trim().is_empty() {
                    continue;
                }

                info!("Analisando via WebSocket: {} chars", text_str.len());

                // O pipeline é síncrono: roda fora do runtime e os eventos são coletados no fim
                let (tx_std, rx_std) = std::sync::mpsc::channel::<ScoringEvent>();
                let state_for_thread = Arc::clone(&state);
                let handle = tokio::task::spawn_blocking(move || {
                    state_for_thread.analyzer.analyze_streaming(&text_str, tx_std);
                });
                handle.await.ok();

                let events: Vec<ScoringEvent> = rx_std.try_iter().collect();
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para animação visual (passo a passo)
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}
