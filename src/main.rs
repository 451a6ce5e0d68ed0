//! pdfsift CLI: index a folder of documents, scan it for keywords, or query an existing index.

use anyhow::Result;
use clap::Parser;
use pdfsift::engine::arg_parser::Cli;
use pdfsift::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
