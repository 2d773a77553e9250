//! # Ajuste de Pontuação e Normalização
//!
//! Converte a pontuação bruta acumulada pelo motor em valores limitados:
//!
//! 1. **Pontuação gráfica** ([`apply_punctuation`]): `!` amplifica
//!    (até ×1.3) e `?` atenua (×0.8) o total.
//! 2. **Normalização** ([`normalize`]): polaridade, subjetividade, confiança e
//!    categoria, arredondadas uma única vez, no final, a 4 casas decimais.

use serde::{Deserialize, Serialize};

use crate::result::{Category, Method, SentimentResult};

const EXCLAMATION_STEP: f64 = 0.1;
const EXCLAMATION_CAP: f64 = 1.3;
const QUESTION_FACTOR: f64 = 0.8;
/// Peso de cada token pontuado no denominador da polaridade.
const TOKEN_WEIGHT: f64 = 0.7;
const SUBJECTIVITY_SCALE: f64 = 2.0;
const CONFIDENCE_SCALE: f64 = 3.0;
const CONFIDENCE_FLOOR: f64 = 0.3;

/// Pontuação bruta produzida pelo motor de regras.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawScore {
    /// Soma com sinal das contribuições de palavras e emojis.
    pub total: f64,
    /// Quantidade de palavras e emojis que contribuíram com pontuação.
    pub scored: usize,
    /// Quantidade total de palavras do texto.
    pub word_count: usize,
}

/// Fatores de pontuação gráfica aplicados ao total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PunctuationAdjustment {
    pub exclamations: usize,
    /// 1.0 quando não aplicado.
    pub exclamation_boost: f64,
    /// 1.0 quando não aplicado.
    pub question_factor: f64,
}

/// Aplica os ajustes de `!` e `?` sobre o total bruto, considerando o texto original.
///
/// A amplificação só ocorre com total diferente de zero; a atenuação, quando
/// há ao menos um token pontuado. As duas se acumulam.
pub fn apply_punctuation(raw: RawScore, text: &str) -> (RawScore, PunctuationAdjustment) {
    let exclamations = text.chars().filter(|&c| c == '!').count();
    let mut adjustment = PunctuationAdjustment {
        exclamations,
        exclamation_boost: 1.0,
        question_factor: 1.0,
    };
    let mut total = raw.total;

    if exclamations > 0 && total != 0.0 {
        let boost = (1.0 + exclamations as f64 * EXCLAMATION_STEP).min(EXCLAMATION_CAP);
        total *= boost;
        adjustment.exclamation_boost = boost;
    }

    if text.contains('?') && raw.scored > 0 {
        total *= QUESTION_FACTOR;
        adjustment.question_factor = QUESTION_FACTOR;
    }

    (RawScore { total, ..raw }, adjustment)
}

/// Converte a pontuação (já ajustada) em um [`SentimentResult`] do motor de regras.
pub fn normalize(raw: RawScore) -> SentimentResult {
    let polarity = if raw.scored > 0 {
        let denominator = (raw.scored as f64 * TOKEN_WEIGHT).max(1.0);
        (raw.total / denominator).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    let density = raw.scored as f64 / raw.word_count.max(1) as f64;
    let subjectivity = (density * SUBJECTIVITY_SCALE).min(1.0);
    let confidence = (density * CONFIDENCE_SCALE).min(1.0).max(CONFIDENCE_FLOOR);

    SentimentResult {
        polarity: round4(polarity),
        category: Category::from_polarity(polarity),
        confidence: round4(confidence),
        subjectivity: round4(subjectivity),
        method: Method::RuleBased,
        reasoning: None,
        emotions: None,
        tone: None,
    }
}

/// Arredonda a 4 casas decimais; empates exatos vão para o dígito par
/// (`0.03125` → `0.0312`, `0.65625` → `0.6562`).
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round_ties_even() / 10_000.0
}
