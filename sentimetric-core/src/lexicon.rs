//! # Léxico de Sentimento: Palavras, Gírias, Modificadores e Emojis
//!
//! O léxico é o conhecimento explícito do analisador: tabelas que associam
//! palavras e emojis a uma intensidade com sinal (de -1.0 a 1.0), além das
//! tabelas de modificadores que alteram a palavra seguinte.
//!
//! ## Tabelas
//!
//! | Tabela        | Conteúdo                                   | Exemplo            |
//! |---------------|--------------------------------------------|--------------------|
//! | positivas     | palavras de polaridade positiva            | `amazing` → 0.9    |
//! | negativas     | palavras de polaridade negativa            | `terrible` → -0.9  |
//! | gírias        | gírias positivas (só contam em contexto)   | `fire` → 0.9       |
//! | intensificad. | multiplicadores > 1                        | `very` → 1.3       |
//! | atenuadores   | multiplicadores em (0, 1)                  | `slightly` → 0.5   |
//! | negações      | invertem e atenuam a próxima palavra       | `not`, `never`     |
//! | emojis        | um único `char` → intensidade              | `😍` → 0.9         |
//!
//! A ordem de consulta das palavras é gíria → positiva → negativa; a primeira
//! tabela que contém a palavra decide. O léxico é imutável depois de montado e
//! pode ser compartilhado entre vários analisadores via [`Arc`].

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

/// Origem de uma pontuação encontrada no léxico
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordClass {
    /// Gíria positiva: só pontua se o texto tiver sinal de contexto positivo.
    Slang,
    Positive,
    Negative,
}

/// Resultado da consulta de uma palavra nas tabelas de polaridade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub score: f64,
    pub class: WordClass,
}

/// Modificador que altera a próxima palavra pontuada
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "multiplier", rename_all = "snake_case")]
pub enum Modifier {
    /// Inverte o sinal e atenua (×0.8) a próxima palavra pontuada.
    Negation,
    /// Amplifica a próxima palavra pontuada.
    Intensifier(f64),
    /// Atenua a próxima palavra pontuada.
    Diminisher(f64),
}

/// Léxico completo de sentimento
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    positive: HashMap<String, f64>,
    negative: HashMap<String, f64>,
    slang: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    diminishers: HashMap<String, f64>,
    negations: HashSet<String>,
    emoji: HashMap<char, f64>,
}

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("amazing", 0.9), ("awesome", 0.9), ("excellent", 0.9), ("perfect", 0.9),
    ("outstanding", 0.9), ("incredible", 0.9), ("fantastic", 0.9), ("brilliant", 0.9),
    ("wonderful", 0.9), ("spectacular", 0.9), ("phenomenal", 0.9), ("superb", 0.9),
    ("great", 0.7), ("good", 0.6), ("nice", 0.5), ("love", 0.8), ("like", 0.5),
    ("enjoy", 0.6), ("helpful", 0.6), ("useful", 0.6), ("cool", 0.6),
    ("impressive", 0.7), ("beautiful", 0.7), ("happy", 0.7), ("glad", 0.6),
    ("thanks", 0.6), ("thank", 0.6), ("best", 0.8),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("terrible", -0.9), ("horrible", -0.9), ("awful", -0.9), ("disgusting", -0.9),
    ("pathetic", -0.9), ("useless", -0.8), ("waste", -0.8), ("garbage", -0.8),
    ("trash", -0.8), ("worst", -0.9), ("hate", -0.8), ("disaster", -0.8),
    ("bad", -0.6), ("poor", -0.6), ("wrong", -0.5), ("disappointing", -0.7),
    ("disappointed", -0.7), ("boring", -0.6), ("confusing", -0.5), ("confused", -0.5),
    ("sucks", -0.7), ("shit", -0.7), ("crap", -0.7),
];

/// Gírias que só são positivas com contexto ("this is insane!" vs "this is insane")
const SLANG_POSITIVE: &[(&str, f64)] = &[
    ("insane", 0.8), ("crazy", 0.7), ("sick", 0.8), ("fire", 0.9),
    ("lit", 0.8), ("dope", 0.7), ("goat", 0.9), ("beast", 0.8),
    ("savage", 0.7), ("slaps", 0.8), ("vibes", 0.6), ("based", 0.6),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3), ("really", 1.3), ("extremely", 1.5), ("absolutely", 1.5),
    ("incredibly", 1.5), ("so", 1.2), ("super", 1.4), ("ultra", 1.4),
];

const DIMINISHERS: &[(&str, f64)] = &[
    ("slightly", 0.5), ("somewhat", 0.5), ("fairly", 0.6), ("rather", 0.6),
    ("pretty", 0.7), ("quite", 0.7), ("kinda", 0.5), ("sorta", 0.5),
];

// Contrações com apóstrofo nunca chegam inteiras do tokenizador (`\w` não
// inclui `'`), mas continuam na tabela para léxicos que as consultem direto.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nobody", "nothing",
    "don't", "doesn't", "didn't", "can't", "won't", "shouldn't",
    "isn't", "aren't", "wasn't", "weren't", "hasn't", "haven't",
    "without", "lack",
];

const EMOJI_SCORES: &[(char, f64)] = &[
    ('😊', 0.7), ('😀', 0.7), ('😃', 0.7), ('😄', 0.7), ('😁', 0.7),
    ('😍', 0.9), ('🥰', 0.9), ('😘', 0.8), ('💕', 0.8),
    ('👍', 0.7), ('👏', 0.7), ('🙌', 0.8), ('✨', 0.6), ('⭐', 0.6),
    ('🔥', 0.8), ('💯', 0.8), ('🎉', 0.7), ('😂', 0.6), ('🤣', 0.6),
    ('😢', -0.7), ('😭', -0.7), ('😞', -0.6), ('😔', -0.6), ('😠', -0.8),
    ('😡', -0.9), ('🤬', -0.9), ('💔', -0.8), ('👎', -0.7), ('😒', -0.6),
    ('🙄', -0.4),
];

/// Marcadores que liberam a pontuação das gírias
const POSITIVE_CONTEXT_MARKERS: &[&str] = &["!", "thank", "wow", "omg"];

static DEFAULT_LEXICON: OnceLock<Arc<Lexicon>> = OnceLock::new();

impl Lexicon {
    /// Léxico vazio, para montar tabelas do zero com os métodos `add_*`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Léxico padrão em inglês.
    pub fn english() -> Self {
        fn table(entries: &[(&str, f64)]) -> HashMap<String, f64> {
            entries.iter().map(|(w, s)| (w.to_string(), *s)).collect()
        }

        Self {
            positive: table(POSITIVE_WORDS),
            negative: table(NEGATIVE_WORDS),
            slang: table(SLANG_POSITIVE),
            intensifiers: table(INTENSIFIERS),
            diminishers: table(DIMINISHERS),
            negations: NEGATIONS.iter().map(|s| s.to_string()).collect(),
            emoji: EMOJI_SCORES.iter().copied().collect(),
        }
    }

    /// Instância compartilhada do léxico padrão, construída uma única vez por processo.
    pub fn shared() -> Arc<Lexicon> {
        Arc::clone(DEFAULT_LEXICON.get_or_init(|| Arc::new(Lexicon::english())))
    }

    pub fn add_positive(&mut self, word: &str, score: f64) {
        self.positive.insert(word.to_lowercase(), score.clamp(0.0, 1.0));
    }

    pub fn add_negative(&mut self, word: &str, score: f64) {
        self.negative.insert(word.to_lowercase(), -score.abs().min(1.0));
    }

    pub fn add_slang(&mut self, word: &str, score: f64) {
        self.slang.insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
    }

    pub fn add_intensifier(&mut self, word: &str, multiplier: f64) {
        self.intensifiers.insert(word.to_lowercase(), multiplier);
    }

    pub fn add_diminisher(&mut self, word: &str, multiplier: f64) {
        self.diminishers.insert(word.to_lowercase(), multiplier);
    }

    pub fn add_negation(&mut self, word: &str) {
        self.negations.insert(word.to_lowercase());
    }

    pub fn add_emoji(&mut self, emoji: char, score: f64) {
        self.emoji.insert(emoji, score.clamp(-1.0, 1.0));
    }

    /// Consulta os modificadores na ordem negação → intensificador → atenuador.
    pub fn modifier(&self, word: &str) -> Option<Modifier> {
        if self.negations.contains(word) {
            return Some(Modifier::Negation);
        }
        if let Some(&m) = self.intensifiers.get(word) {
            return Some(Modifier::Intensifier(m));
        }
        self.diminishers.get(word).map(|&m| Modifier::Diminisher(m))
    }

    /// Consulta a polaridade de uma palavra na ordem gíria → positiva → negativa.
    ///
    /// Gírias são retornadas mesmo sem contexto; cabe ao motor de pontuação
    /// decidir se contam (ver [`Lexicon::has_positive_context`]).
    pub fn lookup(&self, word: &str) -> Option<WordEntry> {
        if let Some(&score) = self.slang.get(word) {
            return Some(WordEntry { score, class: WordClass::Slang });
        }
        if let Some(&score) = self.positive.get(word) {
            return Some(WordEntry { score, class: WordClass::Positive });
        }
        self.negative
            .get(word)
            .map(|&score| WordEntry { score, class: WordClass::Negative })
    }

    pub fn emoji_score(&self, ch: char) -> Option<f64> {
        self.emoji.get(&ch).copied()
    }

    /// Verifica se o texto (já em minúsculas) contém um sinal de contexto positivo.
    pub fn has_positive_context(lowercase_text: &str) -> bool {
        POSITIVE_CONTEXT_MARKERS
            .iter()
            .any(|marker| lowercase_text.contains(marker))
    }

    /// Número total de entradas de palavras com polaridade
    pub fn word_count(&self) -> usize {
        self.positive.len() + self.negative.len() + self.slang.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_order() {
        let mut lexicon = Lexicon::english();
        lexicon.add_positive("fire", 0.1);

        // Gíria vence a tabela positiva
        let entry = lexicon.lookup("fire").unwrap();
        assert_eq!(entry.class, WordClass::Slang);
        assert_eq!(entry.score, 0.9);

        assert_eq!(lexicon.lookup("terrible").unwrap().class, WordClass::Negative);
        assert!(lexicon.lookup("table").is_none());
    }

    #[test]
    fn test_modifier_lookup() {
        let lexicon = Lexicon::english();
        assert_eq!(lexicon.modifier("never"), Some(Modifier::Negation));
        assert_eq!(lexicon.modifier("extremely"), Some(Modifier::Intensifier(1.5)));
        assert_eq!(lexicon.modifier("kinda"), Some(Modifier::Diminisher(0.5)));
        assert_eq!(lexicon.modifier("good"), None);
    }

    #[test]
    fn test_emoji_table() {
        let lexicon = Lexicon::english();
        assert_eq!(lexicon.emoji_score('😍'), Some(0.9));
        assert_eq!(lexicon.emoji_score('🙄'), Some(-0.4));
        assert_eq!(lexicon.emoji_score('a'), None);
    }

    #[test]
    fn test_positive_context() {
        assert!(Lexicon::has_positive_context("this is insane!"));
        assert!(Lexicon::has_positive_context("thanks a lot"));
        assert!(Lexicon::has_positive_context("omg"));
        assert!(!Lexicon::has_positive_context("this is insane"));
    }

    #[test]
    fn test_custom_negative_is_always_negative() {
        let mut lexicon = Lexicon::new();
        lexicon.add_negative("Meh", 0.3);
        let entry = lexicon.lookup("meh").unwrap();
        assert_eq!(entry.score, -0.3);
        assert_eq!(lexicon.word_count(), 1);
    }

    #[test]
    fn test_builders_normalize_input() {
        let mut lexicon = Lexicon::new();
        lexicon.add_slang("Lit", 1.7);
        lexicon.add_intensifier("SUPER", 1.4);
        lexicon.add_diminisher("Meio", 0.6);
        lexicon.add_negation("NAO");
        lexicon.add_emoji('🔥', -2.0);

        assert_eq!(lexicon.lookup("lit"), Some(WordEntry { score: 1.0, class: WordClass::Slang }));
        assert_eq!(lexicon.modifier("super"), Some(Modifier::Intensifier(1.4)));
        assert_eq!(lexicon.modifier("meio"), Some(Modifier::Diminisher(0.6)));
        assert_eq!(lexicon.modifier("nao"), Some(Modifier::Negation));
        assert_eq!(lexicon.emoji_score('🔥'), Some(-1.0));
        assert_eq!(lexicon.word_count(), 1);
    }

    #[test]
    fn test_shared_is_single_instance() {
        let a = Lexicon::shared();
        let b = Lexicon::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
