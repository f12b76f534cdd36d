use hashbrown::HashMap;

use crate::error::{Ibm1Error, Ibm1Result};
use crate::text::Text;
use crate::types::*;

/// Sparse lexical translation table `t(e|f)`, one row per target token.
///
/// A row only holds the source tokens its target token co-occurred with in
/// training. The key set is fixed when the table is initialized; training
/// replaces tables wholesale rather than editing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranslationTable {
    rows: Vec<HashMap<Token, Prob>>,
}

impl TranslationTable {
    /// Uniform table over every co-occurring `(e, f)` pair.
    ///
    /// Every entry starts at `1 / |target vocabulary|`, independent of how
    /// often the pair occurs.
    pub fn initialize(source: &Text, target: &Text) -> Ibm1Result<Self> {
        check_parallel(source, target)?;

        let n_target = target.vocabulary.len();
        let uniform = 1.0 / n_target as Prob;
        let mut rows: Vec<HashMap<Token, Prob>> = vec![HashMap::new(); n_target];
        for (src, tgt) in source.sentences.iter().zip(&target.sentences) {
            for &e in &tgt.tokens {
                let row = &mut rows[e as usize];
                for &f in &src.tokens {
                    row.entry(f).or_insert(uniform);
                }
            }
        }

        let table = TranslationTable { rows };
        log::debug!(
            "initialized translation table: {} target words, {} entries",
            table.n_targets(),
            table.len()
        );
        Ok(table)
    }

    pub(crate) fn from_rows(rows: Vec<HashMap<Token, Prob>>) -> Self {
        TranslationTable { rows }
    }

    #[inline]
    pub fn get(&self, e: Token, f: Token) -> Option<Prob> {
        self.rows.get(e as usize)?.get(&f).copied()
    }

    pub fn row(&self, e: Token) -> Option<&HashMap<Token, Prob>> {
        self.rows.get(e as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = (Token, &HashMap<Token, Prob>)> {
        self.rows.iter().enumerate().map(|(e, row)| (e as Token, row))
    }

    /// Every stored `(e, f, t(e|f))`.
    pub fn iter(&self) -> impl Iterator<Item = (Token, Token, Prob)> + '_ {
        self.rows()
            .flat_map(|(e, row)| row.iter().map(move |(&f, &p)| (e, f, p)))
    }

    #[inline] pub fn n_targets(&self) -> usize { self.rows.len() }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.rows.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(HashMap::is_empty)
    }

    pub fn same_keys(&self, other: &TranslationTable) -> bool {
        self.rows.len() == other.rows.len()
            && self.rows.iter().zip(&other.rows).all(|(a, b)| {
                a.len() == b.len() && a.keys().all(|f| b.contains_key(f))
            })
    }
}

/// Boundary check for a pair of corpora about to be trained on.
pub fn check_parallel(source: &Text, target: &Text) -> Ibm1Result<()> {
    if source.n_sentences() != target.n_sentences() {
        return Err(Ibm1Error::CorpusLengthMismatch {
            n_source: source.n_sentences(),
            n_target: target.n_sentences(),
        });
    }
    if source.n_sentences() == 0 {
        return Err(Ibm1Error::InvalidInput("empty corpus".into()));
    }
    if source.vocabulary.is_empty() {
        return Err(Ibm1Error::InvalidInput("source corpus has no words".into()));
    }
    if target.vocabulary.is_empty() {
        return Err(Ibm1Error::InvalidInput("target corpus has no words".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::parse_plaintext;

    #[test]
    fn initial_entries_are_uniform_over_target_vocabulary() {
        let source = parse_plaintext("das haus\ndas buch\nein buch");
        let target = parse_plaintext("the house\nthe book\na book");
        let table = TranslationTable::initialize(&source, &target).unwrap();

        let expected = 1.0 / 4.0;
        assert_eq!(table.len(), 3 + 2 + 3 + 2);
        for (_, _, p) in table.iter() {
            assert_eq!(p, expected);
        }
    }

    #[test]
    fn only_co_occurring_pairs_get_entries() {
        let source = parse_plaintext("das haus\nein buch");
        let target = parse_plaintext("the house\na book");
        let table = TranslationTable::initialize(&source, &target).unwrap();

        let the = target.vocabulary.id("the").unwrap();
        let das = source.vocabulary.id("das").unwrap();
        let buch = source.vocabulary.id("buch").unwrap();
        assert!(table.get(the, das).is_some());
        assert!(table.get(the, buch).is_none());
    }

    #[test]
    fn repeated_pairs_do_not_change_initial_value() {
        let source = parse_plaintext("das das\ndas");
        let target = parse_plaintext("the\nthe the");
        let table = TranslationTable::initialize(&source, &target).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, 0), Some(1.0));
    }

    #[test]
    fn mismatched_corpora_are_rejected() {
        let source = parse_plaintext("das haus\nein buch");
        let target = parse_plaintext("the house");
        let err = TranslationTable::initialize(&source, &target).unwrap_err();
        assert!(matches!(
            err,
            Ibm1Error::CorpusLengthMismatch { n_source: 2, n_target: 1 }
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        let empty = parse_plaintext("");
        assert!(matches!(
            TranslationTable::initialize(&empty, &empty),
            Err(Ibm1Error::InvalidInput(_))
        ));

        let blank = parse_plaintext("\n\n");
        let target = parse_plaintext("the\nhouse");
        assert!(matches!(
            TranslationTable::initialize(&blank, &target),
            Err(Ibm1Error::InvalidInput(_))
        ));
    }

    #[test]
    fn same_keys_ignores_values() {
        let source = parse_plaintext("das haus");
        let target = parse_plaintext("the house");
        let a = TranslationTable::initialize(&source, &target).unwrap();
        let mut rows = a.rows.clone();
        rows[0].insert(0, 0.9);
        let b = TranslationTable::from_rows(rows);
        assert!(a.same_keys(&b));
        assert_ne!(a, b);
    }
}
