//! Load `document.pdf`, chunk it, embed the chunks and store them.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use pdfchat_cli::output::format_ingest_report;
use pdfchat_cli::{DOCUMENT_PATH, setup};
use pdfchat_rag::{PdfLoader, Profile, RagError, Settings};
use tracing::warn;

/// Ingest document.pdf from the working directory into the vector store.
#[derive(Parser)]
#[command(version, about)]
struct Cli {}

async fn run(settings: &Settings, path: &Path) -> anyhow::Result<()> {
    let documents = PdfLoader::new(path).load()?;
    println!("Loaded {} pages from {}", documents.len(), path.display());

    let pipeline = setup::connect_pipeline(settings).await?;

    let existing = pipeline.count().await?;
    if existing > 0 {
        let collection = pipeline.collection();
        warn!(existing, collection, "collection already has rows, appending");
    }

    let report = pipeline.ingest(&documents).await?;
    println!("{}", format_ingest_report(&report));
    println!("Stored {} rows ({} total).", report.ids.len(), existing + report.ids.len());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _cli = Cli::parse();
    setup::init_tracing();

    let settings = match setup::load_settings(Profile::Ingest) {
        Ok(settings) => settings,
        Err(e) => return setup::fail(e),
    };

    let path = Path::new(DOCUMENT_PATH);
    if !path.is_file() {
        return setup::fail(RagError::SourceNotFound { path: DOCUMENT_PATH.into() });
    }

    match run(&settings, path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => setup::fail(format!("{e:#}")),
    }
}
