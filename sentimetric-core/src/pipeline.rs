//! # Pipeline de Sentimento: Motor de Regras com Eventos Observáveis
//!
//! O pipeline coordena tokenizador, léxico e normalizador. A pontuação é uma
//! máquina de estados de uma única passada, da esquerda para a direita, com
//! dois estados transitórios:
//!
//! - **negação ativa**: ligada por `not`, `never`, ... e consumida pela próxima
//!   palavra pontuada (inverte o sinal e multiplica por 0.8);
//! - **multiplicador**: definido por intensificadores (`very` → 1.3) ou
//!   atenuadores (`slightly` → 0.5), também consumido pela próxima palavra pontuada.
//!
//! Palavras sem pontuação **não** zeram os modificadores: em "not the good",
//! a negação atravessa "the" e alcança "good".
//!
//! Cada passo pode ser emitido como [`ScoringEvent`] via canal (`mpsc`),
//! permitindo que o servidor WebSocket mostre o raciocínio em tempo real.
//! A análise síncrona e a análise com eventos usam o mesmo caminho de código.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexicon::{Lexicon, Modifier, WordClass};
use crate::normalizer::{apply_punctuation, normalize, PunctuationAdjustment, RawScore};
use crate::result::{Method, SentimentResult};
use crate::tokenizer::{is_blank, tokenize, Token};

/// Fator aplicado (além da inversão de sinal) a uma palavra negada.
const NEGATION_FACTOR: f64 = 0.8;

/// Eventos emitidos pelo pipeline durante a pontuação.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ScoringEvent {
    /// **Passo 1**: Tokenização concluída.
    Tokenized {
        tokens: Vec<Token>,
        total: usize,
        /// Se o texto tem `!`, "thank", "wow" ou "omg" (libera as gírias).
        positive_context: bool,
    },
    /// **Passo 2**: Um modificador foi armado para a próxima palavra pontuada.
    ModifierApplied {
        token_index: usize,
        token_text: String,
        modifier: Modifier,
    },
    /// **Passo 2**: Uma palavra contribuiu para o total.
    WordScored {
        token_index: usize,
        token_text: String,
        class: WordClass,
        base_score: f64,
        multiplier: f64,
        negated: bool,
        contribution: f64,
    },
    /// **Passo 2**: Gíria encontrada em texto sem contexto positivo; não pontua.
    SlangIgnored {
        token_index: usize,
        token_text: String,
    },
    /// **Passo 3**: Um emoji do texto original contribuiu para o total.
    EmojiScored {
        emoji: char,
        byte_offset: usize,
        score: f64,
    },
    /// **Passo 4**: Ajuste de `!` e `?` sobre o total.
    PunctuationApplied {
        adjustment: PunctuationAdjustment,
        total_before: f64,
        total_after: f64,
    },
    /// **Conclusão**: Resultado normalizado.
    Done {
        result: SentimentResult,
        raw: RawScore,
        processing_us: u64,
    },
}

/// Estado transitório carregado entre os tokens.
#[derive(Debug, Clone, Copy)]
struct ModifierState {
    negation: bool,
    multiplier: f64,
}

impl Default for ModifierState {
    fn default() -> Self {
        Self { negation: false, multiplier: 1.0 }
    }
}

/// O analisador de sentimento baseado em regras.
///
/// É puro e sem estado entre chamadas: o léxico é somente leitura e
/// compartilhado via [`Arc`], então uma instância pode ser usada por
/// qualquer número de threads ao mesmo tempo.
///
/// # Modos de Uso
/// - **Sync**: [`SentimentAnalyzer::analyze`] e [`SentimentAnalyzer::analyze_batch`].
/// - **Streaming**: [`SentimentAnalyzer::analyze_streaming`] para UIs reativas (via WebSocket).
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl SentimentAnalyzer {
    /// Cria o analisador com o léxico padrão compartilhado do processo.
    pub fn new() -> Self {
        Self { lexicon: Lexicon::shared() }
    }

    /// Cria o analisador sobre um léxico próprio (pode ser compartilhado com outros analisadores).
    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Analisa um texto. Função total: qualquer string, inclusive vazia, gera um resultado.
    pub fn analyze(&self, text: &str) -> SentimentResult {
        self.run(text, &mut |_: ScoringEvent| {})
    }

    /// Analisa vários textos em paralelo, preservando a ordem de entrada.
    pub fn analyze_batch<S>(&self, texts: &[S]) -> Vec<SentimentResult>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|text| self.analyze(text.as_ref())).collect()
    }

    /// Executa a análise enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `Tokenized`
    /// 2. `ModifierApplied` / `WordScored` / `SlangIgnored` (loop sobre as palavras)
    /// 3. `EmojiScored` (loop sobre os caracteres)
    /// 4. `PunctuationApplied`
    /// 5. `Done`
    ///
    /// Para entrada vazia, apenas `Done` é emitido.
    pub fn analyze_streaming(&self, text: &str, tx: mpsc::Sender<ScoringEvent>) -> SentimentResult {
        self.run(text, &mut |event: ScoringEvent| {
            let _ = tx.send(event);
        })
    }

    fn run(&self, text: &str, emit: &mut dyn FnMut(ScoringEvent)) -> SentimentResult {
        let start = Instant::now();

        if is_blank(text) {
            let result = SentimentResult::empty(Method::RuleBased);
            emit(ScoringEvent::Done {
                result: result.clone(),
                raw: RawScore::default(),
                processing_us: start.elapsed().as_micros() as u64,
            });
            return result;
        }

        // === Passo 1: Tokenização ===
        let tokenized = tokenize(text);
        let positive_context = Lexicon::has_positive_context(&tokenized.lowercase);
        emit(ScoringEvent::Tokenized {
            tokens: tokenized.words.clone(),
            total: tokenized.word_count(),
            positive_context,
        });

        // === Passo 2: Palavras ===
        let mut raw = RawScore {
            word_count: tokenized.word_count(),
            ..RawScore::default()
        };
        let mut state = ModifierState::default();

        for token in &tokenized.words {
            if let Some(modifier) = self.lexicon.modifier(&token.text) {
                match modifier {
                    Modifier::Negation => state.negation = true,
                    Modifier::Intensifier(m) | Modifier::Diminisher(m) => state.multiplier = m,
                }
                emit(ScoringEvent::ModifierApplied {
                    token_index: token.index,
                    token_text: token.text.clone(),
                    modifier,
                });
                continue;
            }

            let Some(entry) = self.lexicon.lookup(&token.text) else {
                continue;
            };
            if entry.class == WordClass::Slang && !positive_context {
                emit(ScoringEvent::SlangIgnored {
                    token_index: token.index,
                    token_text: token.text.clone(),
                });
                continue;
            }
            if entry.score == 0.0 {
                continue;
            }

            let mut contribution = entry.score * state.multiplier;
            if state.negation {
                contribution = -contribution * NEGATION_FACTOR;
            }
            raw.total += contribution;
            raw.scored += 1;

            emit(ScoringEvent::WordScored {
                token_index: token.index,
                token_text: token.text.clone(),
                class: entry.class,
                base_score: entry.score,
                multiplier: state.multiplier,
                negated: state.negation,
                contribution,
            });
            state = ModifierState::default();
        }

        // === Passo 3: Emojis (texto original, independente dos modificadores) ===
        for (byte_offset, ch) in text.char_indices() {
            if let Some(score) = self.lexicon.emoji_score(ch) {
                raw.total += score;
                raw.scored += 1;
                emit(ScoringEvent::EmojiScored { emoji: ch, byte_offset, score });
            }
        }

        // === Passo 4: Pontuação gráfica ===
        let total_before = raw.total;
        let (raw, adjustment) = apply_punctuation(raw, text);
        emit(ScoringEvent::PunctuationApplied {
            adjustment,
            total_before,
            total_after: raw.total,
        });

        // === Passo 5: Normalização ===
        let result = normalize(raw);
        debug!(
            "Texto analisado: {} palavras, {} pontuadas, polaridade {:+.4} ({})",
            raw.word_count, raw.scored, result.polarity, result.category
        );

        emit(ScoringEvent::Done {
            result: result.clone(),
            raw,
            processing_us: start.elapsed().as_micros() as u64,
        });
        result
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Category;

    fn analyze(text: &str) -> SentimentResult {
        SentimentAnalyzer::new().analyze(text)
    }

    #[test]
    fn test_empty_input() {
        for text in ["", "   ", "\n\t"] {
            let result = analyze(text);
            assert_eq!(result.polarity, 0.0);
            assert_eq!(result.category, Category::Neutral);
            assert_eq!(result.confidence, 0.0);
            assert_eq!(result.subjectivity, 0.0);
            assert_eq!(result.method, Method::RuleBased);
        }
    }

    #[test]
    fn test_clear_positive() {
        let result = analyze("I love this product! It's amazing! 😍");
        assert_eq!(result.category, Category::Positive);
        assert!(result.polarity > 0.5);
        assert!(result.reasoning.is_none() && result.emotions.is_none() && result.tone.is_none());
    }

    #[test]
    fn test_clear_negative() {
        let result = analyze("This is terrible. Waste of money. 😡");
        assert_eq!(result.category, Category::Negative);
        assert!(result.polarity < -0.5);
    }

    #[test]
    fn test_negation_flips_and_attenuates() {
        let lexicon = Lexicon::english();
        for word in ["amazing", "great", "good", "love", "best", "happy"] {
            let score = lexicon.lookup(word).unwrap().score;
            assert!(score > 0.15 / 0.7);
            assert_eq!(analyze(word).category, Category::Positive, "{word}");
            assert_eq!(analyze(&format!("not {word}")).category, Category::Negative, "not {word}");
        }

        // -0.9 × 0.8 = -0.72
        assert_eq!(analyze("not amazing").polarity, -0.72);
    }

    #[test]
    fn test_intensifier_and_diminisher() {
        // 0.6 × 1.3 = 0.78
        assert_eq!(analyze("very good").polarity, 0.78);
        // 0.6 × 0.5 = 0.3
        assert_eq!(analyze("slightly good").polarity, 0.3);
        // O último modificador vence
        assert_eq!(analyze("slightly very good").polarity, 0.78);
    }

    #[test]
    fn test_modifiers_consumed_once() {
        // "not good bad": só "good" é negado. (-0.48 + -0.6) / max(1, 1.4)
        let result = analyze("not good bad");
        assert!((result.polarity - (-1.08 / 1.4)).abs() < 1e-4);
    }

    #[test]
    fn test_modifier_carries_over_unscored_words() {
        // A negação atravessa "the" e alcança "good"
        let carried = analyze("not the good");
        assert_eq!(carried.polarity, -0.48);
        assert_eq!(carried.polarity, analyze("not good").polarity);

        // O mesmo vale para intensificadores em lacunas de várias palavras
        assert_eq!(analyze("very much of a good").polarity, 0.78);
    }

    #[test]
    fn test_contractions_do_not_negate() {
        // "don't" vira "don", "t": nenhuma das duas é negação
        assert_eq!(analyze("I don't like it").category, Category::Positive);
    }

    #[test]
    fn test_idempotence() {
        let analyzer = SentimentAnalyzer::new();
        let text = "Not bad, actually pretty decent?! 🔥";
        let first = analyzer.analyze(text);
        let second = analyzer.analyze(text);
        assert_eq!(first, second);
        assert_eq!(first.polarity.to_bits(), second.polarity.to_bits());
    }

    #[test]
    fn test_exclamation_monotonicity() {
        let mut previous = analyze("this is good").polarity.abs();
        for count in 1..=6 {
            let text = format!("this is good{}", "!".repeat(count));
            let current = analyze(&text).polarity.abs();
            assert!(current >= previous, "{text}: {current} < {previous}");
            previous = current;
        }
        let negative = analyze("this is bad").polarity.abs();
        assert!(analyze("this is bad!!").polarity.abs() >= negative);
    }

    #[test]
    fn test_question_softens() {
        for text in ["this is good", "this is bad", "nice 😊"] {
            let plain = analyze(text).polarity.abs();
            let question = analyze(&format!("{text}?")).polarity.abs();
            assert!(question <= plain, "{text}");
        }
        // 0.6 × 0.8 = 0.48
        assert_eq!(analyze("good?").polarity, 0.48);
    }

    #[test]
    fn test_slang_requires_positive_context() {
        let bare = analyze("This is insane");
        let excited = analyze("This is insane! Thank you!");
        assert_eq!(bare.polarity, 0.0);
        assert_eq!(bare.category, Category::Neutral);
        assert!(bare.polarity < excited.polarity);
        assert_eq!(excited.category, Category::Positive);

        // "wow" e "omg" também liberam a gíria, em qualquer parte do texto
        assert!(analyze("wow that beat is fire").polarity > 0.0);
        assert!(analyze("OMG this slaps").polarity > 0.0);
    }

    #[test]
    fn test_slang_without_context_does_not_fall_through() {
        let mut lexicon = Lexicon::english();
        lexicon.add_negative("sick", 0.9);
        let analyzer = SentimentAnalyzer::with_lexicon(Arc::new(lexicon));
        // "sick" é gíria; sem contexto não pontua nem cai para a tabela negativa
        assert_eq!(analyzer.analyze("i feel sick").polarity, 0.0);
    }

    #[test]
    fn test_custom_lexicon_from_scratch() {
        let mut lexicon = Lexicon::new();
        lexicon.add_positive("bom", 0.6);
        lexicon.add_slang("top", 0.8);
        lexicon.add_intensifier("muito", 1.5);
        lexicon.add_diminisher("pouco", 0.5);
        lexicon.add_negation("nao");
        lexicon.add_emoji('👌', 0.5);
        let analyzer = SentimentAnalyzer::with_lexicon(Arc::new(lexicon));

        assert_eq!(analyzer.analyze("muito bom").polarity, 0.9);
        assert_eq!(analyzer.analyze("pouco bom").polarity, 0.3);
        assert_eq!(analyzer.analyze("nao bom").polarity, -0.48);
        assert_eq!(analyzer.analyze("top!").polarity, 0.88);
        assert_eq!(analyzer.analyze("top").polarity, 0.0);
        assert_eq!(analyzer.analyze("👌").polarity, 0.5);
        // Sem tabelas padrão: palavras inglesas não pontuam
        assert_eq!(analyzer.analyze("amazing").polarity, 0.0);
    }

    #[test]
    fn test_emoji_only_text() {
        let result = analyze("😍");
        assert_eq!(result.polarity, 0.9);
        assert_eq!(result.subjectivity, 1.0);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_emoji_ignores_modifiers() {
        // "not" fica armado, mas o emoji não o consome
        assert_eq!(analyze("not 😍").polarity, 0.9);
    }

    #[test]
    fn test_confidence_floor_without_sentiment() {
        for text in ["The meeting is at noon", "hello world", "!!!", "12345 ... ???"] {
            let result = analyze(text);
            assert_eq!(result.confidence, 0.3, "{text}");
            assert_eq!(result.polarity, 0.0);
            assert_eq!(result.category, Category::Neutral);
        }
    }

    #[test]
    fn test_density_ties_round_to_even() {
        // 1 pontuada em 64 palavras: subjetividade 2/64 = 0.03125
        let sparse = format!("good{}", " the".repeat(63));
        assert_eq!(analyze(&sparse).subjectivity, 0.0312);

        // 7 pontuadas em 32 palavras: confiança 21/32 = 0.65625
        let dense = format!("{}{}", "good ".repeat(7), "the ".repeat(25));
        let result = analyze(&dense);
        assert_eq!(result.confidence, 0.6562);
        assert_eq!(result.subjectivity, 0.4375);
    }

    #[test]
    fn test_never_mixed() {
        let result = analyze("good but terrible, love and hate 😍😡");
        assert_ne!(result.category, Category::Mixed);
    }

    #[test]
    fn test_batch_preserves_order() {
        let analyzer = SentimentAnalyzer::new();
        let texts = vec!["amazing", "terrible", "the table", "good?"];
        let results = analyzer.analyze_batch(&texts);
        assert_eq!(results.len(), texts.len());
        for (text, result) in texts.iter().zip(&results) {
            assert_eq!(*result, analyzer.analyze(text));
        }
        assert_eq!(results[0].category, Category::Positive);
        assert_eq!(results[1].category, Category::Negative);
        assert_eq!(results[2].category, Category::Neutral);
    }

    #[test]
    fn test_shared_lexicon_across_analyzers() {
        let lexicon = Arc::new(Lexicon::english());
        let a = SentimentAnalyzer::with_lexicon(Arc::clone(&lexicon));
        let b = SentimentAnalyzer::with_lexicon(Arc::clone(&lexicon));
        assert!(Arc::ptr_eq(a.lexicon(), b.lexicon()));
        assert_eq!(a.analyze("great"), b.analyze("great"));
    }

    #[test]
    fn test_streaming_events() {
        let analyzer = SentimentAnalyzer::new();
        let (tx, rx) = mpsc::channel();
        let result = analyzer.analyze_streaming("not really good 🔥", tx);

        let events: Vec<ScoringEvent> = rx.try_iter().collect();
        assert!(matches!(&events[0], ScoringEvent::Tokenized { total: 3, .. }));
        assert!(events.iter().any(|e| matches!(
            e,
            ScoringEvent::WordScored { negated: true, multiplier, .. } if *multiplier == 1.3
        )));
        assert!(events.iter().any(|e| matches!(e, ScoringEvent::EmojiScored { emoji: '🔥', .. })));

        match events.last().unwrap() {
            ScoringEvent::Done { result: done, raw, .. } => {
                assert_eq!(*done, result);
                assert_eq!(raw.scored, 2);
                assert_eq!(raw.word_count, 3);
            }
            other => panic!("Último evento deve ser Done, veio {other:?}"),
        }
        assert_eq!(result, analyzer.analyze("not really good 🔥"));
    }

    #[test]
    fn test_streaming_empty_emits_only_done() {
        let (tx, rx) = mpsc::channel();
        SentimentAnalyzer::new().analyze_streaming("  ", tx);
        let events: Vec<ScoringEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ScoringEvent::Done { .. }));
    }
}
