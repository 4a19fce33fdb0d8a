//! Binary-level startup checks. None of these reach the network.

use std::process::{Command, Output};

const VARS: [&str; 6] = [
    "API_KEY",
    "EMBEDDING_MODEL_NAME",
    "LLM_MODEL_NAME",
    "DATABASE_URL",
    "MODEL_PROVIDER",
    "OPENAI_BASE_URL",
];

/// Run a binary in an empty temp dir with only `vars` set.
fn run(bin: &str, vars: &[(&str, &str)]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::new(bin);
    cmd.current_dir(dir.path());
    for name in VARS {
        cmd.env_remove(name);
    }
    cmd.envs(vars.iter().copied()).env("RUST_LOG", "off");
    cmd.output().unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn ingest_without_api_key_exits_1_naming_it() {
    let output = run(
        env!("CARGO_BIN_EXE_ingest"),
        &[("EMBEDDING_MODEL_NAME", "text-embedding-004"), ("DATABASE_URL", "postgresql://x/y")],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("API_KEY"), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty());
}

#[test]
fn ingest_reports_the_first_missing_variable() {
    let output = run(env!("CARGO_BIN_EXE_ingest"), &[("API_KEY", "key")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("EMBEDDING_MODEL_NAME"));
}

#[test]
fn ingest_without_document_exits_1() {
    let output = run(
        env!("CARGO_BIN_EXE_ingest"),
        &[
            ("API_KEY", "key"),
            ("EMBEDDING_MODEL_NAME", "text-embedding-004"),
            ("DATABASE_URL", "postgresql://x/y"),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("File 'document.pdf' not found"));
}

#[test]
fn chat_requires_llm_model_name() {
    let output = run(
        env!("CARGO_BIN_EXE_chat"),
        &[
            ("API_KEY", "key"),
            ("EMBEDDING_MODEL_NAME", "text-embedding-004"),
            ("DATABASE_URL", "postgresql://x/y"),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("LLM_MODEL_NAME"));
}

#[test]
fn unknown_provider_is_a_startup_error() {
    let output = run(
        env!("CARGO_BIN_EXE_search"),
        &[
            ("API_KEY", "key"),
            ("EMBEDDING_MODEL_NAME", "text-embedding-004"),
            ("DATABASE_URL", "postgresql://x/y"),
            ("MODEL_PROVIDER", "anthropic"),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("MODEL_PROVIDER"));
}

#[test]
fn version_flag_succeeds() {
    let version = Command::new(env!("CARGO_BIN_EXE_search")).arg("--version").output().unwrap();
    assert!(version.status.success());
    assert!(String::from_utf8_lossy(&version.stdout).contains(env!("CARGO_PKG_VERSION")));
}
