//! Formatação da saída em texto do terminal

use std::fmt::Write;

use sentimetric_core::{corpus::BenchmarkReport, SentimentResult};

/// Máximo de erros listados por relatório
const MAX_ERRORS_SHOWN: usize = 5;

pub fn render_analysis(text: &str, rule_based: &SentimentResult, remote: Option<&SentimentResult>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Texto: {}", text);
    let _ = writeln!(out, "{} Regras: {}", rule_based.category.icon(), rule_based);

    if let Some(remote) = remote {
        let _ = writeln!(out, "{} LLM ({}): {}", remote.category.icon(), remote.method.name(), remote);
        if let Some(reasoning) = &remote.reasoning {
            let _ = writeln!(out, "   Justificativa: {}", reasoning);
        }
        if let Some(emotions) = remote.emotions.as_ref().filter(|e| !e.is_empty()) {
            let _ = writeln!(out, "   Emoções: {}", emotions.join(", "));
        }
        if let Some(tone) = &remote.tone {
            let _ = writeln!(out, "   Tom: {}", tone);
        }
    }
    out
}

pub fn render_benchmark(label: &str, report: &BenchmarkReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: acurácia {:.1}% ({}/{})",
        label,
        report.accuracy * 100.0,
        report.correct,
        report.total
    );

    if !report.errors.is_empty() {
        let _ = writeln!(out, "  Erros ({}):", report.errors.len());
        for error in report.errors.iter().take(MAX_ERRORS_SHOWN) {
            let _ = writeln!(
                out,
                "  - {:?}: esperado {}, obtido {} (polaridade {:+.2})",
                truncate(&error.text, 50),
                error.expected,
                error.got,
                error.polarity
            );
        }
    }
    out
}

pub fn render_comparison(rule_based: &BenchmarkReport, remote: &BenchmarkReport) -> String {
    let delta = (remote.accuracy - rule_based.accuracy) * 100.0;
    format!("Diferença LLM - regras: {:+.1} pontos percentuais\n", delta)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
