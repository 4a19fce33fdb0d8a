//! Interactive question answering over the ingested PDF.

use std::process::ExitCode;

use clap::Parser;
use pdfchat_cli::{console, setup};
use pdfchat_rag::{AnswerEngine, Profile, Settings};

/// Ask questions about the ingested document.
#[derive(Parser)]
#[command(version, about)]
struct Cli {}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    let model = setup::language_model(settings)?;
    let pipeline = setup::connect_pipeline(settings).await?;
    let engine = AnswerEngine::new(pipeline, model);

    console::run_console(&engine).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _cli = Cli::parse();
    setup::init_tracing();

    let settings = match setup::load_settings(Profile::Chat) {
        Ok(settings) => settings,
        Err(e) => return setup::fail(e),
    };

    match run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => setup::fail(format!("{e:#}")),
    }
}
