//! # Resultado da Análise de Sentimento
//!
//! Define o objeto de valor produzido por cada análise e os vocabulários
//! discretos que ele carrega.
//!
//! ## Categorias
//!
//! | Categoria | Condição (regras)        | Produzida por          |
//! |-----------|--------------------------|------------------------|
//! | positive  | polaridade > 0.15        | regras e LLM           |
//! | negative  | polaridade < -0.15       | regras e LLM           |
//! | neutral   | caso contrário           | regras e LLM           |
//! | mixed     | -                        | apenas o analisador LLM |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Faixa em torno de zero considerada neutra.
pub const NEUTRAL_BAND: f64 = 0.15;

/// Classificação discreta do sentimento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Positive,
    Negative,
    Neutral,
    /// Sentimentos conflitantes no mesmo texto. O motor de regras nunca produz esta categoria.
    Mixed,
}

impl Category {
    /// Nome da categoria como string (para serialização e UI)
    pub fn name(&self) -> &'static str {
        match self {
            Category::Positive => "positive",
            Category::Negative => "negative",
            Category::Neutral => "neutral",
            Category::Mixed => "mixed",
        }
    }

    /// Cor CSS para highlight na UI
    pub fn color(&self) -> &'static str {
        match self {
            Category::Positive => "#10b981", // verde esmeralda
            Category::Negative => "#ef4444", // vermelho
            Category::Neutral => "#6b7280",  // cinza
            Category::Mixed => "#f59e0b",    // âmbar
        }
    }

    /// Ícone emoji para a categoria
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Positive => "🙂",
            Category::Negative => "🙁",
            Category::Neutral => "😐",
            Category::Mixed => "🤔",
        }
    }

    /// Tenta parsear a partir de string, sem diferenciar maiúsculas (ex: "Positive" → Some(Positive))
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Some(Category::Positive),
            "negative" => Some(Category::Negative),
            "neutral" => Some(Category::Neutral),
            "mixed" => Some(Category::Mixed),
            _ => None,
        }
    }

    /// Categoria derivada da polaridade pelos limiares de ±0.15.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > NEUTRAL_BAND {
            Category::Positive
        } else if polarity < -NEUTRAL_BAND {
            Category::Negative
        } else {
            Category::Neutral
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Qual motor produziu o resultado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    RuleBased,
    /// Motor de regras usado no lugar de uma chamada remota que falhou.
    RuleBasedFallback,
    Remote,
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::RuleBased => "rule_based",
            Method::RuleBasedFallback => "rule_based_fallback",
            Method::Remote => "remote",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resultado de uma análise de sentimento.
///
/// Construído uma vez por chamada e não alterado depois, exceto pela troca de
/// [`Method`] feita pelo caminho de fallback ([`SentimentResult::with_method`]).
/// Os campos `reasoning`, `emotions` e `tone` só são preenchidos pelo analisador remoto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// De -1.0 (mais negativo) a 1.0 (mais positivo).
    pub polarity: f64,
    pub category: Category,
    /// De 0.3 a 1.0; 0.0 somente para entrada vazia.
    pub confidence: f64,
    /// De 0.0 (objetivo) a 1.0 (opinativo).
    pub subjectivity: f64,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

impl SentimentResult {
    /// Resultado zerado usado para entrada vazia.
    pub fn empty(method: Method) -> Self {
        Self {
            polarity: 0.0,
            category: Category::Neutral,
            confidence: 0.0,
            subjectivity: 0.0,
            method,
            reasoning: None,
            emotions: None,
            tone: None,
        }
    }

    /// Retorna o mesmo resultado com outro método.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn is_positive(&self) -> bool {
        self.category == Category::Positive
    }

    pub fn is_negative(&self) -> bool {
        self.category == Category::Negative
    }

    /// Neutro inclui `mixed`.
    pub fn is_neutral(&self) -> bool {
        matches!(self.category, Category::Neutral | Category::Mixed)
    }

    /// Exporta campo a campo em um mapa plano.
    ///
    /// Todos os campos aparecem; os opcionais ausentes viram `null`.
    /// `emotions` é a única lista.
    pub fn to_structured(&self) -> serde_json::Map<String, serde_json::Value> {
        use serde_json::Value;

        let mut map = serde_json::Map::new();
        map.insert("polarity".into(), Value::from(self.polarity));
        map.insert("category".into(), Value::from(self.category.name()));
        map.insert("confidence".into(), Value::from(self.confidence));
        map.insert("subjectivity".into(), Value::from(self.subjectivity));
        map.insert("method".into(), Value::from(self.method.name()));
        map.insert(
            "reasoning".into(),
            self.reasoning.clone().map(Value::from).unwrap_or(Value::Null),
        );
        map.insert(
            "emotions".into(),
            self.emotions.clone().map(Value::from).unwrap_or(Value::Null),
        );
        map.insert(
            "tone".into(),
            self.tone.clone().map(Value::from).unwrap_or(Value::Null),
        );
        map
    }
}

impl fmt::Display for SentimentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SentimentResult(polarity={:+.2}, category='{}', confidence={:.2})",
            self.polarity, self.category, self.confidence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_polarity() {
        assert_eq!(Category::from_polarity(0.16), Category::Positive);
        assert_eq!(Category::from_polarity(0.15), Category::Neutral);
        assert_eq!(Category::from_polarity(-0.15), Category::Neutral);
        assert_eq!(Category::from_polarity(-0.2), Category::Negative);
    }

    #[test]
    fn test_category_from_label() {
        assert_eq!(Category::from_label(" Mixed "), Some(Category::Mixed));
        assert_eq!(Category::from_label("sarcastic"), None);
    }

    #[test]
    fn test_display() {
        let mut result = SentimentResult::empty(Method::RuleBased);
        result.polarity = 0.9;
        result.category = Category::Positive;
        result.confidence = 0.85;
        assert_eq!(
            result.to_string(),
            "SentimentResult(polarity=+0.90, category='positive', confidence=0.85)"
        );
    }

    #[test]
    fn test_to_structured_is_flat() {
        let mut result = SentimentResult::empty(Method::Remote);
        result.emotions = Some(vec!["joy".into(), "surprise".into()]);

        let map = result.to_structured();
        assert_eq!(map.len(), 8);
        assert_eq!(map["method"], "remote");
        assert_eq!(map["category"], "neutral");
        assert!(map["reasoning"].is_null());
        assert_eq!(map["emotions"], serde_json::json!(["joy", "surprise"]));
        assert!(map.values().all(|v| !v.is_object()));
    }

    #[test]
    fn test_neutral_includes_mixed() {
        let mut result = SentimentResult::empty(Method::Remote);
        result.category = Category::Mixed;
        assert!(result.is_neutral());
        assert!(!result.is_positive() && !result.is_negative());
    }

    #[test]
    fn test_serde_method_names() {
        let result = SentimentResult::empty(Method::RuleBasedFallback);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["method"], "rule_based_fallback");
        assert!(json.get("tone").is_none());
    }
}
