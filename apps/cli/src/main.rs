//! docsite-migrate moves a folder of plain markdown articles into the
//! documentation site's content directory.
//!
//! Generates front matter, rewrites relative links, escapes MDX-unsafe text
//! and emits category descriptors for recognized folders.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
