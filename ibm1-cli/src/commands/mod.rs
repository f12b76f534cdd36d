mod extract;
mod train;

/// Subcommands for ibm1.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Train a lexical translation table on a parallel corpus.
    Train(train::TrainArgs),

    /// Extract phrase pairs using a trained alignment.
    Extract(extract::ExtractArgs),
}

impl Commands {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Train(cmd) => cmd.run(),
            Commands::Extract(cmd) => cmd.run(),
        }
    }
}
