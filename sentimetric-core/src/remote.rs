//! # Analisador Remoto (LLM) com Fallback para Regras
//!
//! Envia o texto para uma API de mensagens de um modelo de linguagem e pede um
//! objeto JSON estrito com `polarity`, `category`, `confidence`, `reasoning`,
//! `emotions` e `tone`. Capta sarcasmo e emoções mistas que o léxico não vê.
//!
//! ## Fluxo com Fallback
//!
//! ```text
//! texto ──▶ Transport ──▶ JSON ──▶ RemoteOutcome::Remote(resultado)
//!              │            │
//!              └── erro ────┴────▶ SentimentAnalyzer ──▶ RemoteOutcome::Fallback
//! ```
//!
//! Nenhuma falha de rede, status HTTP ou JSON atravessa a fronteira deste
//! módulo: o resultado vem do motor de regras, marcado como
//! [`Method::RuleBasedFallback`]. A única falha visível é a chave de API
//! ausente, na construção ([`RemoteAnalyzer::new`]).
//!
//! ## Lotes
//!
//! [`RemoteAnalyzer::analyze_batch`] mantém no máximo `max_workers` requisições
//! em andamento e atrasa o item `i` em `i × stagger` ([`RemoteAnalyzer::dispatch_offset`])
//! para não estourar o limite de taxa da API. A espera passa por um
//! [`Scheduler`], substituível nos testes.

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RemoteError, Result};
use crate::pipeline::SentimentAnalyzer;
use crate::result::{Category, Method, SentimentResult};
use crate::tokenizer::is_blank;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Análises de LLM são tratadas como opinativas por natureza.
const REMOTE_SUBJECTIVITY: f64 = 0.8;
const DEFAULT_CONFIDENCE: f64 = 0.5;

const SYSTEM_PROMPT: &str = r#"Analyze sentiment. Respond ONLY with JSON (no markdown):
{
  "polarity": <-1.0 to 1.0>,
  "category": "<positive|negative|neutral|mixed>",
  "confidence": <0.0 to 1.0>,
  "reasoning": "<brief explanation>",
  "emotions": ["<emotion1>", "<emotion2>"],
  "tone": "<enthusiastic|sarcastic|grateful|critical|etc>"
}

Understand: modern slang, sarcasm, emojis, context, mixed emotions."#;

/// Configuração do analisador remoto.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    /// Timeout de cada requisição.
    pub timeout: Duration,
    pub max_tokens: u32,
    /// Máximo de requisições simultâneas em um lote.
    pub max_workers: usize,
    /// Atraso adicional entre os disparos de um lote.
    pub stagger: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            max_tokens: 500,
            max_workers: 5,
            stagger: Duration::from_millis(200),
        }
    }
}

impl RemoteConfig {
    /// Lê `ANTHROPIC_API_KEY` e, opcionalmente, `SENTIMETRIC_MODEL` e `SENTIMETRIC_ENDPOINT`.
    pub fn from_env() -> Self {
        let mut config = Self {
            api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            ..Self::default()
        };
        if let Ok(model) = std::env::var("SENTIMETRIC_MODEL") {
            config.model = model;
        }
        if let Ok(endpoint) = std::env::var("SENTIMETRIC_ENDPOINT") {
            config.endpoint = endpoint;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Corpo da requisição à API de mensagens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Objeto JSON devolvido pelo modelo. Todos os campos são opcionais.
#[derive(Debug, Deserialize)]
struct RemoteVerdict {
    polarity: Option<f64>,
    category: Option<String>,
    confidence: Option<f64>,
    reasoning: Option<String>,
    emotions: Option<Vec<String>>,
    tone: Option<String>,
}

/// Envia uma requisição e devolve o texto produzido pelo modelo.
pub trait Transport: Send + Sync {
    fn complete(&self, request: &MessagesRequest) -> impl Future<Output = Result<String>> + Send;
}

/// Transporte HTTP real, via `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &RemoteConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

impl Transport for HttpTransport {
    fn complete(&self, request: &MessagesRequest) -> impl Future<Output = Result<String>> + Send {
        async move {
            let response = self
                .client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Status(status.as_u16()));
            }

            let envelope: MessagesResponse = response.json().await?;
            envelope
                .content
                .into_iter()
                .find_map(|block| block.text)
                .ok_or(RemoteError::EmptyResponse)
        }
    }
}

/// Espera antes de um disparo agendado.
pub trait Scheduler: Send + Sync {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Agendador de produção, sobre o relógio do tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Resultado de uma chamada remota: a resposta do modelo ou o fallback por regras.
#[derive(Debug)]
pub enum RemoteOutcome {
    Remote(SentimentResult),
    Fallback {
        result: SentimentResult,
        reason: RemoteError,
    },
}

impl RemoteOutcome {
    pub fn result(&self) -> &SentimentResult {
        match self {
            RemoteOutcome::Remote(result) => result,
            RemoteOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> SentimentResult {
        match self {
            RemoteOutcome::Remote(result) => result,
            RemoteOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RemoteOutcome::Fallback { .. })
    }

    /// Motivo do fallback, se houve.
    pub fn reason(&self) -> Option<&RemoteError> {
        match self {
            RemoteOutcome::Remote(_) => None,
            RemoteOutcome::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Analisador de sentimento via LLM.
pub struct RemoteAnalyzer<T = HttpTransport, S = TokioScheduler> {
    transport: T,
    scheduler: S,
    fallback: SentimentAnalyzer,
    model: String,
    max_tokens: u32,
    max_workers: usize,
    stagger: Duration,
}

impl RemoteAnalyzer {
    /// Cria o analisador com transporte HTTP. Falha se não houver chave de API.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(RemoteError::MissingApiKey)?;
        let transport = HttpTransport::new(&config, api_key)?;
        Ok(Self::with_transport(config, transport, TokioScheduler))
    }

    /// Atalho para `RemoteAnalyzer::new(RemoteConfig::from_env())`.
    pub fn from_env() -> Result<Self> {
        Self::new(RemoteConfig::from_env())
    }
}

impl<T: Transport, S: Scheduler> RemoteAnalyzer<T, S> {
    /// Cria o analisador sobre um transporte e agendador arbitrários.
    pub fn with_transport(config: RemoteConfig, transport: T, scheduler: S) -> Self {
        Self {
            transport,
            scheduler,
            fallback: SentimentAnalyzer::new(),
            model: config.model,
            max_tokens: config.max_tokens,
            max_workers: config.max_workers.max(1),
            stagger: config.stagger,
        }
    }

    /// Analisa um texto. Nunca falha: erros resultam em [`RemoteOutcome::Fallback`].
    pub async fn analyze(&self, text: &str) -> RemoteOutcome {
        if is_blank(text) {
            return RemoteOutcome::Remote(SentimentResult::empty(Method::Remote));
        }

        match self.request(text).await {
            Ok(result) => {
                debug!("Resposta remota: {}", result);
                RemoteOutcome::Remote(result)
            }
            Err(reason) => {
                warn!("Erro no analisador remoto: {}. Usando análise por regras.", reason);
                let result = self
                    .fallback
                    .analyze(text)
                    .with_method(Method::RuleBasedFallback);
                RemoteOutcome::Fallback { result, reason }
            }
        }
    }

    /// Analisa um lote com concorrência limitada e disparos escalonados.
    ///
    /// A saída segue a ordem de entrada, independente da ordem de conclusão.
    /// A falha de um item não afeta os demais.
    ///
    /// [`dispatch_offset`](Self::dispatch_offset) conta a partir do momento em que
    /// o item ganha uma das `max_workers` vagas, não do início do lote. Resultados
    /// prontos esperando um item anterior lento continuam ocupando vaga.
    pub async fn analyze_batch<Q>(&self, texts: &[Q]) -> Vec<RemoteOutcome>
    where
        Q: AsRef<str> + Sync,
    {
        stream::iter(texts.iter().enumerate())
            .map(|(i, text)| async move {
                self.scheduler.sleep(self.dispatch_offset(i)).await;
                self.analyze(text.as_ref()).await
            })
            .buffered(self.max_workers)
            .boxed()
            .collect()
            .await
    }

    /// Atraso de disparo do item `index` em um lote: `index × stagger`.
    pub fn dispatch_offset(&self, index: usize) -> Duration {
        self.stagger
            .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Monta a requisição para um texto.
    pub fn build_request(&self, text: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: format!("Analyze: {}", text),
            }],
        }
    }

    async fn request(&self, text: &str) -> Result<SentimentResult> {
        let request = self.build_request(text);
        let content = self.transport.complete(&request).await?;
        parse_verdict(&content)
    }
}

/// Remove cercas de bloco de código markdown que alguns modelos insistem em enviar.
fn strip_code_fences(content: &str) -> String {
    content
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Converte o texto do modelo em um [`SentimentResult`].
///
/// Campos ausentes recebem padrões (polaridade 0.0, confiança 0.5); uma
/// categoria ausente ou desconhecida é derivada da polaridade.
pub fn parse_verdict(content: &str) -> Result<SentimentResult> {
    let verdict: RemoteVerdict = serde_json::from_str(&strip_code_fences(content))?;

    let polarity = verdict.polarity.unwrap_or(0.0).clamp(-1.0, 1.0);
    let category = verdict
        .category
        .as_deref()
        .and_then(Category::from_label)
        .unwrap_or_else(|| Category::from_polarity(polarity));

    Ok(SentimentResult {
        polarity,
        category,
        confidence: verdict.confidence.unwrap_or(DEFAULT_CONFIDENCE).clamp(0.0, 1.0),
        subjectivity: REMOTE_SUBJECTIVITY,
        method: Method::Remote,
        reasoning: verdict.reasoning,
        emotions: verdict.emotions,
        tone: verdict.tone,
    })
}

/// Comparação entre o motor de regras e o analisador remoto para o mesmo texto.
#[derive(Debug, Clone, Serialize)]
pub struct MethodComparison {
    pub rule_based: SentimentResult,
    /// `None` quando o analisador remoto não pôde ser criado (ex: sem chave de API).
    pub remote: Option<SentimentResult>,
}

/// Executa as duas análises sobre o mesmo texto.
pub async fn compare_methods(text: &str, config: RemoteConfig) -> MethodComparison {
    let rule_based = SentimentAnalyzer::new().analyze(text);
    let remote = match RemoteAnalyzer::new(config) {
        Ok(analyzer) => Some(analyzer.analyze(text).await.into_result()),
        Err(e) => {
            warn!("Análise remota indisponível: {}", e);
            None
        }
    };
    MethodComparison { rule_based, remote }
}
