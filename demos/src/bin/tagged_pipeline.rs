//! A small config loader that reports failures as tagged errors.
//!
//! Each step returns `Result<_, TaggedError>`; the caller decides at the edge
//! which kinds it can recover from.
//!
//! # Running
//!
//! ```bash
//! cargo run -p wari-demos --bin tagged_pipeline -- path/to/config.json
//!
//! # Show guard and dispatch events
//! RUST_LOG=wari=debug cargo run -p wari-demos --bin tagged_pipeline
//! ```

use std::env;

use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wari::prelude::*;

#[derive(Debug, Serialize, Details)]
#[details(tag = "FileError")]
struct FileFailure {
    operation: &'static str,
    #[serde(rename = "filePath")]
    file_path: String,
    error: String,
}

#[derive(Debug, Serialize, Details)]
struct JsonError {
    text: String,
}

#[derive(Debug, Serialize, Details)]
struct MissingKey {
    key: &'static str,
}

fn read(path: &str) -> Result<String, TaggedError> {
    std::fs::read_to_string(path).map_err(|err| {
        wari::make(FileFailure {
            operation: "read",
            file_path: path.to_owned(),
            error: err.to_string(),
        })
        .with_source(err)
    })
}

fn parse(text: &str) -> Result<serde_json::Value, TaggedError> {
    serde_json::from_str(text).map_err(|err| {
        wari::make(JsonError {
            text: text.chars().take(40).collect(),
        })
        .with_source(err)
    })
}

fn port(config: &serde_json::Value) -> Result<u64, TaggedError> {
    config
        .get("port")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| wari::make(MissingKey { key: "port" }))
}

fn load(path: &str) -> Result<u64, TaggedError> {
    let text = read(path)?;
    let config = parse(&text)?;
    port(&config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| "config.json".to_owned());

    // A missing file falls back to the default port; a missing key too.
    // Anything else is unhandled and surfaces as an `Unknown` error.
    let port = wari::dispatch(
        load(&path),
        Handlers::new()
            .with_kind::<FileFailure>(|err| {
                println!("{err}, using default port");
                8080
            })
            .with_kind::<MissingKey>(|_| 8080),
    );

    match port {
        Ok(port) => println!("listening on port {port}"),
        Err(err) => {
            if let Some(original) = err.unhandled() {
                eprintln!("could not load {path}: {original}");
            }
            return Err(err.into());
        },
    }

    Ok(())
}
