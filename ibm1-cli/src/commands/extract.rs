use std::path::PathBuf;

use ibm1_core::{extract_corpus, parse_plaintext, write_phrases, Lexicon};

use crate::logging::LogArgs;
use crate::{read_all, write_all};

/// Args for the extract command.
#[derive(clap::Args, Debug)]
pub struct ExtractArgs {
    /// Source-language ("f") corpus, one sentence per line; "-" for stdin.
    #[arg(short = 'f', long = "source")]
    source: String,

    /// Target-language ("e") corpus, line-aligned with the source.
    #[arg(short = 'e', long = "target")]
    target: String,

    /// Alignment document: alignment.json, alignment_all.json, or
    /// target word to [source word, probability] pairs.
    #[arg(long)]
    alignment: String,

    /// Directory for phrases.txt.
    #[arg(long, default_value = "output")]
    save_dir: PathBuf,

    #[clap(flatten)]
    logging: LogArgs,
}

impl ExtractArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging()?;

        let source = parse_plaintext(&read_all(&self.source)?);
        let target = parse_plaintext(&read_all(&self.target)?);
        let lexicon = Lexicon::from_json(&read_all(&self.alignment)?)?;
        log::info!("loaded alignment for {} target words", lexicon.len());

        let pairs = extract_corpus(&source, &target, &lexicon)?;

        std::fs::create_dir_all(&self.save_dir)?;
        write_all(&self.save_dir, "phrases.txt", &write_phrases(&pairs))?;
        Ok(())
    }
}
