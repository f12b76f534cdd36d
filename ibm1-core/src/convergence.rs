use crate::table::TranslationTable;
use crate::types::*;

/// Outcome of comparing two successive tables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Convergence {
    pub delta: Prob,
    pub converged: bool,
}

/// Euclidean distance between two tables over their stored entries.
///
/// An entry present in only one table counts against a zero on the other
/// side, which keeps the distance symmetric. Tables produced by one training
/// run always share their key set.
pub fn distance(a: &TranslationTable, b: &TranslationTable) -> Prob {
    let mut sum: Prob = 0.0;
    for (e, f, p) in a.iter() {
        let q = b.get(e, f).unwrap_or(0.0);
        sum += (p - q) * (p - q);
    }
    for (e, f, q) in b.iter() {
        if a.get(e, f).is_none() {
            sum += q * q;
        }
    }
    sum.sqrt()
}

pub fn is_converged(prev: &TranslationTable, curr: &TranslationTable, epsilon: Prob) -> Convergence {
    let delta = distance(prev, curr);
    Convergence { delta, converged: delta < epsilon }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::parse_plaintext;
    use hashbrown::HashMap;

    fn table() -> TranslationTable {
        let source = parse_plaintext("das haus\ndas buch");
        let target = parse_plaintext("the house\nthe book");
        TranslationTable::initialize(&source, &target).unwrap()
    }

    #[test]
    fn table_against_itself_is_converged() {
        let t = table();
        let c = is_converged(&t, &t, 1e-12);
        assert_eq!(c.delta, 0.0);
        assert!(c.converged);
    }

    #[test]
    fn distance_is_symmetric_and_euclidean() {
        let a = TranslationTable::from_rows(vec![
            HashMap::from([(0, 0.5), (1, 0.5)]),
            HashMap::from([(1, 1.0)]),
        ]);
        let b = TranslationTable::from_rows(vec![
            HashMap::from([(0, 0.8), (1, 0.1)]),
            HashMap::from([(1, 1.0)]),
        ]);
        let expected = (0.3f64 * 0.3 + 0.4 * 0.4).sqrt();
        assert!((distance(&a, &b) - expected).abs() < 1e-12);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn delta_at_epsilon_is_not_converged() {
        let a = TranslationTable::from_rows(vec![HashMap::from([(0, 0.5)])]);
        let b = TranslationTable::from_rows(vec![HashMap::from([(0, 0.25)])]);
        let c = is_converged(&a, &b, 0.25);
        assert_eq!(c.delta, 0.25);
        assert!(!c.converged);
        assert!(is_converged(&a, &b, 0.3).converged);
    }
}
