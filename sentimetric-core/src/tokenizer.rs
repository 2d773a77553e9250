//! # Tokenizador de Palavras
//!
//! Divide o texto em palavras minúsculas usando a regra de fronteira `\b\w+\b`
//! (sequências de letras, dígitos e sublinhado, com suporte a Unicode).
//!
//! Emojis não são caracteres de palavra, então nunca aparecem como tokens: o
//! motor de pontuação os encontra em uma varredura separada, caractere por
//! caractere, sobre o texto original.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use sentimetric_core::tokenizer::tokenize;
//!
//! let tokenized = tokenize("Don't STOP! 😍");
//!
//! // O apóstrofo não é caractere de palavra: "don't" vira "don", "t"
//! let words: Vec<&str> = tokenized.words.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(words, vec!["don", "t", "stop"]);
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Uma palavra extraída do texto em minúsculas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token, já em minúsculas.
    pub text: String,
    /// Índice de byte inicial no texto em minúsculas (inclusive).
    pub start: usize,
    /// Índice de byte final no texto em minúsculas (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Saída do tokenizador: o texto em minúsculas e suas palavras.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tokenized {
    /// Texto inteiro em minúsculas; usado também na checagem de contexto das gírias.
    pub lowercase: String,
    pub words: Vec<Token>,
}

impl Tokenized {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\b\w+\b").expect("padrão de palavra é um regex válido"))
}

/// Verdadeiro para texto vazio ou só com espaços: o pipeline inteiro é pulado.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Tokeniza o texto em palavras minúsculas.
pub fn tokenize(text: &str) -> Tokenized {
    let lowercase = text.to_lowercase();
    let words = word_pattern()
        .find_iter(&lowercase)
        .enumerate()
        .map(|(index, m)| Token {
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
            index,
        })
        .collect();

    Tokenized { lowercase, words }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        tokenize(text).words.into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(words("I LOVE this product!"), vec!["i", "love", "this", "product"]);
    }

    #[test]
    fn test_tokenize_splits_contractions() {
        assert_eq!(words("It's amazing"), vec!["it", "s", "amazing"]);
    }

    #[test]
    fn test_tokenize_ignores_emoji_and_punctuation() {
        let tokenized = tokenize("wow 🔥🔥 ... ok?");
        assert_eq!(tokenized.word_count(), 2);
        assert_eq!(tokenized.lowercase, "wow 🔥🔥 ... ok?");
    }

    #[test]
    fn test_tokenize_offsets_and_indices() {
        let tokenized = tokenize("good day_1");
        let second = &tokenized.words[1];
        assert_eq!(second.text, "day_1");
        assert_eq!((second.start, second.end, second.index), (5, 10, 1));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" a "));
    }
}
