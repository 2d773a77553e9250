//! Tipos de erro do analisador remoto

use thiserror::Error;

/// Falhas do analisador remoto.
///
/// Somente [`RemoteError::MissingApiKey`] chega ao chamador, na construção do
/// analisador. Todas as outras são absorvidas pelo fallback para o motor de regras.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error(
        "chave de API obrigatória: informe `api_key` em RemoteConfig ou defina a variável ANTHROPIC_API_KEY"
    )]
    MissingApiKey,

    /// Erro de rede, timeout ou corpo ilegível
    #[error("falha na requisição HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("a API respondeu com status {0}")]
    Status(u16),

    /// O modelo respondeu algo que não é o objeto JSON esperado
    #[error("resposta JSON inválida: {0}")]
    Json(#[from] serde_json::Error),

    #[error("a resposta não contém nenhum bloco de texto")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, RemoteError>;
