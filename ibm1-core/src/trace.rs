//! Per-iteration probability trace for inspecting convergence.

use crate::error::Ibm1Result;
use crate::table::TranslationTable;
use crate::text::Vocabulary;
use crate::types::*;

/// One row per `(e, f)` key of the initial table, one column per iteration.
#[derive(Clone, Debug, Default)]
pub struct IterationTrace {
    keys: Vec<(Token, Token)>,
    columns: Vec<Vec<Prob>>,
}

impl IterationTrace {
    /// Fix the row order (target word, then source word) from `initial`.
    pub fn new(initial: &TranslationTable, target: &Vocabulary, source: &Vocabulary) -> Self {
        let mut keys: Vec<(Token, Token)> = initial.iter().map(|(e, f, _)| (e, f)).collect();
        keys.sort_by(|a, b| {
            target
                .word(a.0)
                .cmp(target.word(b.0))
                .then_with(|| source.word(a.1).cmp(source.word(b.1)))
        });
        IterationTrace { keys, columns: Vec::new() }
    }

    /// Append a column; keys missing from `table` read as zero.
    pub fn record(&mut self, table: &TranslationTable) {
        let column = self
            .keys
            .iter()
            .map(|&(e, f)| table.get(e, f).unwrap_or(0.0))
            .collect();
        self.columns.push(column);
    }

    #[inline] pub fn n_rows(&self) -> usize { self.keys.len() }
    #[inline] pub fn n_columns(&self) -> usize { self.columns.len() }

    /// Probability of row `row` at iteration `column`.
    pub fn value(&self, row: usize, column: usize) -> Option<Prob> {
        self.columns.get(column)?.get(row).copied()
    }

    pub fn write_csv(&self, target: &Vocabulary, source: &Vocabulary) -> Ibm1Result<String> {
        let mut w = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["e".to_string(), "f".to_string()];
        header.extend((0..self.columns.len()).map(|i| format!("{i} it.")));
        w.write_record(&header)?;

        for (row, &(e, f)) in self.keys.iter().enumerate() {
            let mut record = vec![target.word(e).to_string(), source.word(f).to_string()];
            record.extend(self.columns.iter().map(|c| c[row].to_string()));
            w.write_record(&record)?;
        }

        let bytes = w.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::em::{train_with, TrainOptions};
    use crate::text::parse_plaintext;

    #[test]
    fn trace_has_a_column_per_iteration() {
        let source = parse_plaintext("das haus\ndas buch");
        let target = parse_plaintext("the house\nthe book");
        let initial = TranslationTable::initialize(&source, &target).unwrap();
        let mut trace = IterationTrace::new(&initial, &target.vocabulary, &source.vocabulary);

        let opts = TrainOptions { epsilon: 0.0, max_iterations: 2 };
        train_with(&source, &target, &opts, |_, t| trace.record(t)).unwrap();

        assert_eq!(trace.n_rows(), 7);
        assert_eq!(trace.n_columns(), 3);
        // First row is ("book", "buch").
        assert_eq!(trace.value(0, 0), Some(1.0 / 3.0));
        assert_eq!(trace.value(0, 1), Some(0.5));
    }

    #[test]
    fn csv_quotes_awkward_tokens() {
        let source = parse_plaintext("er , sagt");
        let target = parse_plaintext("he said");
        let initial = TranslationTable::initialize(&source, &target).unwrap();
        let mut trace = IterationTrace::new(&initial, &target.vocabulary, &source.vocabulary);
        trace.record(&initial);

        let csv = trace.write_csv(&target.vocabulary, &source.vocabulary).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "e,f,0 it.");
        assert_eq!(lines[1], "he,\",\",0.5");
        assert_eq!(lines.len(), 7);
    }
}
