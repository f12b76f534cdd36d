//! Best-alignment selection and the JSON interchange documents.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Ibm1Result;
use crate::table::TranslationTable;
use crate::text::Vocabulary;
use crate::types::*;

/// The most probable source token for every target token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BestAlignment {
    choices: Vec<Option<(Token, Prob)>>,
}

// Higher probability wins; equal probabilities go to the smaller source word.
fn rank(a: (Token, Prob), b: (Token, Prob), source: &Vocabulary) -> Ordering {
    a.1.total_cmp(&b.1)
        .then_with(|| source.word(b.0).cmp(source.word(a.0)))
}

impl BestAlignment {
    /// Argmax over each row of `table`.
    ///
    /// Rows without entries (a target word that never met a source word)
    /// have no choice.
    pub fn select(table: &TranslationTable, source: &Vocabulary) -> Self {
        let choices = table
            .rows()
            .map(|(_, row)| {
                row.iter()
                    .map(|(&f, &p)| (f, p))
                    .max_by(|&a, &b| rank(a, b, source))
            })
            .collect();
        BestAlignment { choices }
    }

    pub fn get(&self, e: Token) -> Option<(Token, Prob)> {
        self.choices.get(e as usize).copied().flatten()
    }

    /// `(e, f, p)` for every target token that has a choice.
    pub fn iter(&self) -> impl Iterator<Item = (Token, Token, Prob)> + '_ {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(e, c)| c.map(|(f, p)| (e as Token, f, p)))
    }

    /// Choices ordered by descending probability, then target word.
    pub fn ranked(&self, target: &Vocabulary) -> Vec<(Token, Token, Prob)> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_by(|a, b| {
            b.2.total_cmp(&a.2)
                .then_with(|| target.word(a.0).cmp(target.word(b.0)))
        });
        out
    }
}

/// What a lexicon document says about one target word.
///
/// Accepts a bare source word, a `[source, probability]` pair, or a full
/// source-to-probability map as written for the trained model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LexicalEntry {
    Word(String),
    Scored(String, Prob),
    Distribution(BTreeMap<String, Prob>),
}

impl LexicalEntry {
    /// Score of `source` as a translation, if the entry mentions it.
    pub fn score(&self, source: &str) -> Option<Prob> {
        match self {
            LexicalEntry::Word(f) => (f == source).then_some(1.0),
            LexicalEntry::Scored(f, p) => (f == source).then_some(*p),
            LexicalEntry::Distribution(fs) => fs.get(source).copied(),
        }
    }
}

/// Target word to [`LexicalEntry`] document, with sorted keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    entries: BTreeMap<String, LexicalEntry>,
}

impl Lexicon {
    /// The complete sparse table as a document.
    pub fn from_table(table: &TranslationTable, target: &Vocabulary, source: &Vocabulary) -> Self {
        let entries = table
            .rows()
            .map(|(e, row)| {
                let fs = row
                    .iter()
                    .map(|(&f, &p)| (source.word(f).to_string(), p))
                    .collect();
                (target.word(e).to_string(), LexicalEntry::Distribution(fs))
            })
            .collect();
        Lexicon { entries }
    }

    pub fn from_best(
        best: &BestAlignment,
        target: &Vocabulary,
        source: &Vocabulary,
        with_probability: bool,
    ) -> Self {
        let entries = best
            .iter()
            .map(|(e, f, p)| {
                let f = source.word(f).to_string();
                let entry = if with_probability {
                    LexicalEntry::Scored(f, p)
                } else {
                    LexicalEntry::Word(f)
                };
                (target.word(e).to_string(), entry)
            })
            .collect();
        Lexicon { entries }
    }

    pub fn from_json(s: &str) -> Ibm1Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Ibm1Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, target: &str) -> Option<&LexicalEntry> {
        self.entries.get(target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LexicalEntry)> {
        self.entries.iter().map(|(e, entry)| (e.as_str(), entry))
    }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Ibm1Error;
    use crate::text::parse_plaintext;
    use hashbrown::HashMap;

    #[test]
    fn ties_go_to_smallest_source_word() {
        let source = parse_plaintext("zebra apfel mango");
        let z = source.vocabulary.id("zebra").unwrap();
        let a = source.vocabulary.id("apfel").unwrap();
        let m = source.vocabulary.id("mango").unwrap();
        let table = TranslationTable::from_rows(vec![
            HashMap::from([(z, 0.4), (a, 0.4), (m, 0.2)]),
            HashMap::from([(z, 0.1), (m, 0.7)]),
            HashMap::new(),
        ]);

        let best = BestAlignment::select(&table, &source.vocabulary);
        assert_eq!(best.get(0), Some((a, 0.4)));
        assert_eq!(best.get(1), Some((m, 0.7)));
        assert_eq!(best.get(2), None);
        assert_eq!(best.iter().count(), 2);
    }

    #[test]
    fn ranked_orders_by_probability() {
        let source = parse_plaintext("das haus");
        let target = parse_plaintext("house the");
        let table = TranslationTable::from_rows(vec![
            HashMap::from([(0, 0.2), (1, 0.6)]),
            HashMap::from([(0, 0.9), (1, 0.1)]),
        ]);
        let best = BestAlignment::select(&table, &source.vocabulary);
        let ranked = best.ranked(&target.vocabulary);
        assert_eq!(ranked, vec![(1, 0, 0.9), (0, 1, 0.6)]);
    }

    #[test]
    fn all_entry_shapes_parse() {
        let lexicon = Lexicon::from_json(
            r#"{"the": "das", "house": ["haus", 0.75], "book": {"buch": 0.5, "das": 0.25}}"#,
        )
        .unwrap();
        assert_eq!(lexicon.len(), 3);
        assert_eq!(lexicon.get("the"), Some(&LexicalEntry::Word("das".into())));
        assert_eq!(lexicon.get("the").unwrap().score("das"), Some(1.0));
        assert_eq!(lexicon.get("the").unwrap().score("haus"), None);
        assert_eq!(lexicon.get("house").unwrap().score("haus"), Some(0.75));
        assert_eq!(lexicon.get("book").unwrap().score("das"), Some(0.25));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        for doc in [r#"{"the": 3}"#, r#"["das"]"#, r#"{"the": ["das"]}"#, "{"] {
            assert!(matches!(Lexicon::from_json(doc), Err(Ibm1Error::Parse(_))), "{doc}");
        }
    }

    #[test]
    fn best_document_round_trips_through_json() {
        let source = parse_plaintext("das haus");
        let target = parse_plaintext("the house");
        let table = TranslationTable::from_rows(vec![
            HashMap::from([(0, 0.8), (1, 0.2)]),
            HashMap::from([(0, 0.3), (1, 0.7)]),
        ]);
        let best = BestAlignment::select(&table, &source.vocabulary);

        let plain = Lexicon::from_best(&best, &target.vocabulary, &source.vocabulary, false);
        assert_eq!(plain.to_json().unwrap(), r#"{"house":"haus","the":"das"}"#);

        let scored = Lexicon::from_best(&best, &target.vocabulary, &source.vocabulary, true);
        assert_eq!(Lexicon::from_json(&scored.to_json().unwrap()).unwrap(), scored);

        let full = Lexicon::from_table(&table, &target.vocabulary, &source.vocabulary);
        assert_eq!(
            full.to_json().unwrap(),
            r#"{"house":{"das":0.3,"haus":0.7},"the":{"das":0.8,"haus":0.2}}"#
        );
    }
}
