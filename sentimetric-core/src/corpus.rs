//! # Conjunto Rotulado e Avaliação de Acurácia
//!
//! Pequeno conjunto de textos com a categoria esperada, cobrindo os casos que
//! separam um analisador por regras de um analisador LLM:
//!
//! - Sentimento claro (positivo, negativo, neutro)
//! - Sarcasmo ("Oh great, another bug 🙄")
//! - Gírias modernas ("This slaps so hard 🔥")
//! - Emoções mistas
//! - Negação ("Not bad!")
//!
//! [`BenchmarkReport::from_results`] compara os resultados de qualquer
//! analisador com os rótulos; o chamador decide qual motor executar.

use serde::{Deserialize, Serialize};

use crate::result::{Category, Method, SentimentResult};

/// Um texto com a categoria esperada
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text: String,
    pub expected: Category,
}

/// Um erro de classificação no relatório
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Misclassification {
    pub text: String,
    pub expected: Category,
    pub got: Category,
    pub polarity: f64,
    pub confidence: f64,
}

/// Métricas de acurácia de um analisador sobre o conjunto rotulado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    pub errors: Vec<Misclassification>,
    /// Método do último resultado avaliado (um lote remoto pode misturar fallbacks).
    pub method: Option<Method>,
}

impl BenchmarkReport {
    /// Compara `results[i]` com `examples[i]`. Itens excedentes de qualquer lado são ignorados.
    pub fn from_results(examples: &[LabeledExample], results: &[SentimentResult]) -> Self {
        let mut correct = 0;
        let mut errors = Vec::new();

        for (example, result) in examples.iter().zip(results) {
            if result.category == example.expected {
                correct += 1;
            } else {
                errors.push(Misclassification {
                    text: example.text.clone(),
                    expected: example.expected,
                    got: result.category,
                    polarity: result.polarity,
                    confidence: result.confidence,
                });
            }
        }

        let total = examples.len().min(results.len());
        Self {
            accuracy: if total > 0 { correct as f64 / total as f64 } else { 0.0 },
            correct,
            total,
            errors,
            method: results.get(..total).and_then(|r| r.last()).map(|r| r.method),
        }
    }
}

/// Retorna o conjunto rotulado padrão
pub fn labeled_examples() -> Vec<LabeledExample> {
    use Category::*;

    let raw: &[(&str, Category)] = &[
        // Positivo claro
        ("This is amazing! Love it!", Positive),
        ("Absolutely fantastic work!", Positive),
        ("Thank you so much! 😊", Positive),
        // Negativo claro
        ("This is terrible. Complete waste.", Negative),
        ("I hate this so much.", Negative),
        ("Worst experience ever 😡", Negative),
        // Neutro
        ("It is what it is.", Neutral),
        ("Okay, I guess.", Neutral),
        // Sarcasmo
        ("Oh great, another bug 🙄", Negative),
        ("Yeah, real helpful buddy", Negative),
        ("Sure, that makes perfect sense", Negative),
        // Gírias
        ("This is insane! Thank you!", Positive),
        ("This slaps so hard 🔥", Positive),
        ("Bro this is sick!", Positive),
        // Emoções mistas
        ("Good but expected more", Neutral),
        ("Not bad, actually pretty decent", Positive),
        // Negação
        ("Not good at all", Negative),
        ("Not bad!", Positive),
    ];

    raw.iter()
        .map(|(text, expected)| LabeledExample {
            text: text.to_string(),
            expected: *expected,
        })
        .collect()
}

/// Textos de demonstração para a interface web e a CLI
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Básico", "I love this product! It's amazing! 😍"),
        ("Básico", "This is terrible. Waste of money. 😡"),
        ("Básico", "It's okay, I guess. Nothing special."),
        ("Básico", "Best purchase ever! Highly recommend! ⭐⭐⭐⭐⭐"),
        ("Gírias", "This slaps so hard 🔥🔥🔥"),
        ("Gírias", "Bro this is sick! Thanks!"),
        ("Gírias", "Not gonna lie, this is fire"),
        ("Gírias", "This is insane! OMG thank you!"),
        ("Gírias", "Bruh that's lit af 💯"),
        ("Sarcasmo", "Oh great, another bug 🙄"),
        ("Negação", "Not bad, actually pretty decent"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SentimentAnalyzer;

    #[test]
    fn test_labeled_examples_cover_all_groups() {
        let examples = labeled_examples();
        assert_eq!(examples.len(), 18);
        assert!(examples.iter().all(|e| e.expected != Category::Mixed));
    }

    #[test]
    fn test_rule_based_benchmark() {
        let examples = labeled_examples();
        let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
        let results = SentimentAnalyzer::new().analyze_batch(&texts);
        let report = BenchmarkReport::from_results(&examples, &results);

        // Sarcasmo e a frase mista enganam o léxico
        assert_eq!(report.total, 18);
        assert_eq!(report.correct, 14);
        assert!((report.accuracy - 14.0 / 18.0).abs() < 1e-12);
        assert_eq!(report.method, Some(Method::RuleBased));

        let missed: Vec<&str> = report.errors.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            missed,
            vec![
                "Oh great, another bug 🙄",
                "Yeah, real helpful buddy",
                "Sure, that makes perfect sense",
                "Good but expected more",
            ]
        );
        assert!(report.errors.iter().all(|e| e.got == Category::Positive));
    }

    #[test]
    fn test_report_with_no_results() {
        let report = BenchmarkReport::from_results(&labeled_examples(), &[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.accuracy, 0.0);
        assert!(report.method.is_none());
    }

    #[test]
    fn test_demo_texts_are_analyzable() {
        let analyzer = SentimentAnalyzer::new();
        for (_, text) in demo_texts() {
            let result = analyzer.analyze(text);
            assert!((-1.0..=1.0).contains(&result.polarity));
            assert!(result.confidence >= 0.3);
        }
    }
}
