mod commands;
mod logging;

use clap::Parser;
use std::fs;
use std::path::Path;

use commands::Commands;

/// IBM Model 1 word alignment and phrase extraction.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

pub(crate) fn read_all(path: &str) -> std::io::Result<String> {
    if path == "-" {
        use std::io::Read;
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        Ok(s)
    } else {
        fs::read_to_string(path)
    }
}

pub(crate) fn write_all(dir: &Path, name: &str, data: &str) -> std::io::Result<()> {
    let path = dir.join(name);
    log::info!("writing {}", path.display());
    fs::write(path, data)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.command.run()
}
