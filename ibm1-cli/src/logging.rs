use stderrlog::Timestamp;

/// Logging setup arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[clap(short, long)]
    pub quiet: bool,

    /// Raise log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Timestamp log lines.
    #[clap(long)]
    pub ts: bool,
}

impl LogArgs {
    /// Install the stderr logger; info level unless `-v` is given.
    pub fn setup_logging(&self) -> Result<(), Box<dyn std::error::Error>> {
        let log_level = match self.verbose {
            0 => stderrlog::LogLevelNum::Info,
            1 => stderrlog::LogLevelNum::Debug,
            _ => stderrlog::LogLevelNum::Trace,
        };

        stderrlog::new()
            .quiet(self.quiet)
            .verbosity(log_level)
            .timestamp(if self.ts { Timestamp::Second } else { Timestamp::Off })
            .init()?;

        Ok(())
    }
}
