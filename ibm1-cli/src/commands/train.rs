use std::path::PathBuf;

use ibm1_core::{
    parse_plaintext, train_with, write_ranked_alignment, BestAlignment, IterationTrace, Lexicon,
    TrainOptions,
};
use ibm1_core::types::{DEFAULT_EPSILON, DEFAULT_MAX_ITERATIONS};

use crate::logging::LogArgs;
use crate::{read_all, write_all};

/// Args for the train command.
#[derive(clap::Args, Debug)]
pub struct TrainArgs {
    /// Source-language ("f") corpus, one sentence per line; "-" for stdin.
    #[arg(short = 'f', long = "source")]
    source: String,

    /// Target-language ("e") corpus, line-aligned with the source.
    #[arg(short = 'e', long = "target")]
    target: String,

    /// Directory for the trained model and reports.
    #[arg(long, default_value = "output")]
    save_dir: PathBuf,

    /// Stop when the table moves less than this between iterations.
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,

    /// Maximum number of EM iterations.
    #[arg(long = "iter-num", default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Write every iteration's probabilities to iterations.csv.
    #[arg(long)]
    save_iteration: bool,

    /// Skip writing the alignment files.
    #[arg(long)]
    no_save_alignment: bool,

    #[clap(flatten)]
    logging: LogArgs,
}

impl TrainArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging()?;

        let source = parse_plaintext(&read_all(&self.source)?);
        let target = parse_plaintext(&read_all(&self.target)?);
        log::info!(
            "loaded {} sentence pairs ({} source words, {} target words)",
            source.n_sentences(),
            source.vocabulary.len(),
            target.vocabulary.len()
        );
        std::fs::create_dir_all(&self.save_dir)?;

        let opts = TrainOptions {
            epsilon: self.epsilon,
            max_iterations: self.max_iterations,
        };
        let mut trace: Option<IterationTrace> = None;
        let result = train_with(&source, &target, &opts, |i, table| {
            if !self.save_iteration {
                return;
            }
            let trace = trace.get_or_insert_with(|| {
                IterationTrace::new(table, &target.vocabulary, &source.vocabulary)
            });
            trace.record(table);
            log::debug!("recorded iteration {i}");
        })?;

        match result.convergence {
            Some(c) => log::info!(
                "finished after {} iterations, delta = {}, converged = {}",
                result.iterations,
                c.delta,
                c.converged
            ),
            None => log::info!("no iterations run"),
        }
        if !result.degenerate.is_empty() {
            log::warn!("{} degenerate sentence pairs were skipped", result.degenerate.len());
        }

        if let Some(trace) = &trace {
            let csv = trace.write_csv(&target.vocabulary, &source.vocabulary)?;
            write_all(&self.save_dir, "iterations.csv", &csv)?;
        }

        if !self.no_save_alignment {
            let (tv, sv) = (&target.vocabulary, &source.vocabulary);
            let full = Lexicon::from_table(&result.table, tv, sv);
            write_all(&self.save_dir, "alignment_all.json", &full.to_json()?)?;

            let best = BestAlignment::select(&result.table, sv);
            let one_to_one = Lexicon::from_best(&best, tv, sv, false);
            write_all(&self.save_dir, "alignment.json", &one_to_one.to_json()?)?;
            write_all(&self.save_dir, "alignment.txt", &write_ranked_alignment(&best, tv, sv))?;
        }

        Ok(())
    }
}
