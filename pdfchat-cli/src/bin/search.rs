//! Run a fixed similarity query against the stored chunks.

use std::process::ExitCode;

use clap::Parser;
use pdfchat_cli::output::format_search_result;
use pdfchat_cli::setup;
use pdfchat_rag::{Profile, Settings};

const QUERY: &str = "What was the company's revenue?";

/// Print the chunks most similar to a sample question.
#[derive(Parser)]
#[command(version, about)]
struct Cli {}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    let pipeline = setup::connect_pipeline(settings).await?;
    let results = pipeline.search(QUERY, pipeline.config().top_k).await?;

    println!("Query: {QUERY}\n");
    if results.is_empty() {
        println!("No results found.");
    }
    for (i, result) in results.iter().enumerate() {
        println!("{}", format_search_result(i + 1, result));
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _cli = Cli::parse();
    setup::init_tracing();

    let settings = match setup::load_settings(Profile::Search) {
        Ok(settings) => settings,
        Err(e) => return setup::fail(e),
    };

    match run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => setup::fail(format!("{e:#}")),
    }
}
