//! Expectation-Maximization training of the translation table.
//!
//! Each sentence pair yields an independent [`SentenceCounts`] partial; the
//! partials are folded into corpus-wide [`Counts`] by key-wise addition and
//! the M-step turns those into a fresh [`TranslationTable`].

use hashbrown::HashMap;

use crate::convergence::{is_converged, Convergence};
use crate::error::{DegenerateAlignment, Ibm1Error, Ibm1Result};
use crate::table::TranslationTable;
use crate::text::{Sentence, Text};
use crate::types::*;

#[derive(Clone, Debug)]
pub struct TrainOptions {
    /// Stop once the table distance between iterations drops below this.
    pub epsilon: Prob,
    /// Hard cap on the number of iterations.
    pub max_iterations: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        TrainOptions {
            epsilon: DEFAULT_EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Expected counts of one sentence pair, as `(e, f, count)` per occurrence pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SentenceCounts {
    pub contributions: Vec<(Token, Token, Prob)>,
}

/// Corpus-wide `count(e|f)` and `total(f)` accumulators.
#[derive(Clone, Debug, PartialEq)]
pub struct Counts {
    pub count: Vec<HashMap<Token, Prob>>,
    pub total: Vec<Prob>,
}

impl Counts {
    pub fn new(n_target: usize, n_source: usize) -> Self {
        Counts {
            count: vec![HashMap::new(); n_target],
            total: vec![0.0; n_source],
        }
    }

    pub fn absorb(&mut self, partial: &SentenceCounts) {
        for &(e, f, c) in &partial.contributions {
            *self.count[e as usize].entry(f).or_insert(0.0) += c;
            self.total[f as usize] += c;
        }
    }

    pub fn count(&self, e: Token, f: Token) -> Prob {
        self.count
            .get(e as usize)
            .and_then(|row| row.get(&f))
            .copied()
            .unwrap_or(0.0)
    }
}

/// E-step for one sentence pair.
///
/// The normalizer of a target word sums `t(e|f)` over source *positions*, so
/// a source word repeated k times contributes k terms; counts likewise run
/// over every occurrence pair. If any target word of the sentence has no
/// probability mass the whole sentence is reported as degenerate and
/// contributes nothing.
pub fn collect_counts(
    table: &TranslationTable,
    index: usize,
    source: &Sentence,
    target: &Sentence,
) -> Result<SentenceCounts, DegenerateAlignment> {
    let mut s_total: HashMap<Token, Prob> = HashMap::with_capacity(target.len());
    for &e in &target.tokens {
        if s_total.contains_key(&e) {
            continue;
        }
        let mass: Prob = source
            .tokens
            .iter()
            .map(|&f| table.get(e, f).unwrap_or(0.0))
            .sum();
        if mass.is_nan() || mass <= 0.0 {
            return Err(DegenerateAlignment { sentence: index, target: e });
        }
        s_total.insert(e, mass);
    }

    let mut contributions = Vec::with_capacity(target.len() * source.len());
    for &e in &target.tokens {
        let norm = s_total[&e];
        for &f in &source.tokens {
            let p = table.get(e, f).unwrap_or(0.0);
            contributions.push((e, f, p / norm));
        }
    }
    Ok(SentenceCounts { contributions })
}

/// M-step: `t(e|f) = count(e|f) / total(f)` over the existing key set.
///
/// A source word with no mass this iteration (all of its sentences were
/// degenerate) keeps its previous probabilities.
pub fn maximize(prev: &TranslationTable, counts: &Counts) -> TranslationTable {
    let rows: Vec<HashMap<Token, Prob>> = prev
        .rows()
        .map(|(e, row)| {
            row.iter()
                .map(|(&f, &p_prev)| {
                    let total = counts.total.get(f as usize).copied().unwrap_or(0.0);
                    let p = if total > 0.0 { counts.count(e, f) / total } else { p_prev };
                    (f, p)
                })
                .collect()
        })
        .collect();
    TranslationTable::from_rows(rows)
}

/// One training iteration and the sentences it had to skip.
#[derive(Clone, Debug)]
pub struct Iteration {
    pub table: TranslationTable,
    pub degenerate: Vec<DegenerateAlignment>,
}

/// Expected counts over the whole corpus under `prev`.
///
/// The corpora are assumed to be paired already; see
/// [`check_parallel`](crate::table::check_parallel).
pub fn expectation(
    prev: &TranslationTable,
    source: &Text,
    target: &Text,
) -> (Counts, Vec<DegenerateAlignment>) {
    let mut counts = Counts::new(target.vocabulary.len(), source.vocabulary.len());
    let mut degenerate = Vec::new();
    for (s, (src, tgt)) in source.sentences.iter().zip(&target.sentences).enumerate() {
        match collect_counts(prev, s, src, tgt) {
            Ok(partial) => counts.absorb(&partial),
            Err(d) => {
                log::warn!("skipping degenerate sentence pair: {d}");
                degenerate.push(d);
            }
        }
    }
    (counts, degenerate)
}

/// Run one E-step and M-step, returning a new table with `prev`'s key set.
pub fn train_iteration(prev: &TranslationTable, source: &Text, target: &Text) -> Iteration {
    let (counts, degenerate) = expectation(prev, source, target);
    Iteration { table: maximize(prev, &counts), degenerate }
}

#[derive(Clone, Debug)]
pub struct TrainResult {
    pub table: TranslationTable,
    /// Iterations actually run.
    pub iterations: usize,
    /// Delta of the last iteration; `None` when no iteration ran.
    pub convergence: Option<Convergence>,
    /// Degenerate sentences, over all iterations.
    pub degenerate: Vec<DegenerateAlignment>,
}

impl TrainResult {
    pub fn converged(&self) -> bool {
        self.convergence.is_some_and(|c| c.converged)
    }
}

pub fn train(source: &Text, target: &Text, opts: &TrainOptions) -> Ibm1Result<TrainResult> {
    train_with(source, target, opts, |_, _| {})
}

/// Train until convergence or the iteration cap.
///
/// `on_iteration` sees the initial table as iteration 0 and then every new
/// table; history is the caller's business.
pub fn train_with<F>(
    source: &Text,
    target: &Text,
    opts: &TrainOptions,
    mut on_iteration: F,
) -> Ibm1Result<TrainResult>
where
    F: FnMut(usize, &TranslationTable),
{
    if !opts.epsilon.is_finite() || opts.epsilon < 0.0 {
        return Err(Ibm1Error::InvalidInput(format!("bad epsilon: {}", opts.epsilon)));
    }

    let mut table = TranslationTable::initialize(source, target)?;
    on_iteration(0, &table);

    let mut iterations = 0;
    let mut convergence = None;
    let mut degenerate = Vec::new();
    while iterations < opts.max_iterations {
        let next = train_iteration(&table, source, target);
        let c = is_converged(&table, &next.table, opts.epsilon);
        iterations += 1;
        log::info!("iteration {iterations} finished, delta = {}", c.delta);

        degenerate.extend(next.degenerate);
        table = next.table;
        convergence = Some(c);
        on_iteration(iterations, &table);
        if c.converged {
            break;
        }
    }

    match convergence {
        Some(c) if !c.converged => log::warn!(
            "stopped after {iterations} iterations without converging (delta = {})",
            c.delta
        ),
        None => log::warn!("iteration cap is zero, returning the initial table"),
        _ => {}
    }

    Ok(TrainResult { table, iterations, convergence, degenerate })
}
