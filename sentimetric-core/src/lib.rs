//! # sentimetric-core: Análise de Sentimento Baseada em Léxico
//!
//! Este crate atribui um sentimento a textos curtos (avaliações, posts) com um
//! algoritmo determinístico de regras: sem aprendizado de máquina e sem rede.
//! Um analisador LLM opcional fica ao lado do pipeline e recorre a ele quando falha.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui em um pipeline linear:
//!
//! 1.  **Entrada**: Texto bruto (String).
//! 2.  **Tokenização** ([`tokenizer`]): Palavras minúsculas pela regra `\b\w+\b`.
//! 3.  **Pontuação** ([`pipeline`]): Consulta ao [`lexicon`] com negação,
//!     intensificadores, gírias condicionais e emojis.
//! 4.  **Normalização** ([`normalizer`]): Ajuste de `!`/`?` e conversão em
//!     polaridade, confiança, subjetividade e categoria.
//! 5.  **Saída**: [`SentimentResult`].
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use sentimetric_core::{SentimentAnalyzer, Category};
//!
//! let analyzer = SentimentAnalyzer::new();
//! let result = analyzer.analyze("I love this product! It's amazing! 😍");
//!
//! assert_eq!(result.category, Category::Positive);
//! println!("{}", result); // SentimentResult(polarity=+1.00, category='positive', confidence=1.00)
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Motor de regras e eventos observáveis.
//! - [`remote`]: Analisador LLM com fallback explícito ([`RemoteOutcome`]).
//! - [`corpus`]: Conjunto rotulado, textos de demonstração e relatório de acurácia.

use std::sync::OnceLock;

pub mod corpus;
pub mod error;
pub mod lexicon;
pub mod normalizer;
pub mod pipeline;
pub mod remote;
pub mod result;
pub mod tokenizer;

pub use error::RemoteError;
pub use lexicon::Lexicon;
pub use pipeline::{ScoringEvent, SentimentAnalyzer};
pub use remote::{compare_methods, RemoteAnalyzer, RemoteConfig, RemoteOutcome};
pub use result::{Category, Method, SentimentResult};

fn default_analyzer() -> &'static SentimentAnalyzer {
    static ANALYZER: OnceLock<SentimentAnalyzer> = OnceLock::new();
    ANALYZER.get_or_init(SentimentAnalyzer::new)
}

/// Análise rápida com o analisador por regras padrão.
pub fn analyze(text: &str) -> SentimentResult {
    default_analyzer().analyze(text)
}

/// Análise em lote com o analisador por regras padrão, preservando a ordem.
pub fn analyze_batch<S>(texts: &[S]) -> Vec<SentimentResult>
where
    S: AsRef<str> + Sync,
{
    default_analyzer().analyze_batch(texts)
}
