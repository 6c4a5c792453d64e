//! Running untrusted work behind guards.
//!
//! A panicking task does not bring down the runtime; the guard hands back an
//! error value instead.
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=wari=debug cargo run -p wari-demos --bin guarded_tasks
//! ```

use std::time::Duration;

use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wari::prelude::*;

#[derive(Debug, Serialize, Details)]
struct TaskFailed {
    id: u32,
    reason: String,
}

async fn work(id: u32) -> u32 {
    tokio::time::sleep(Duration::from_millis(u64::from(id) * 10)).await;
    assert!(id != 3, "task {id} hit a bad record");
    id * id
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let run = wari::safe_async(work, |caught, id| {
        wari::make(TaskFailed {
            id,
            reason: caught.message().to_owned(),
        })
    });

    let tasks: Vec<_> = (1..=5).map(|id| tokio::spawn(run(id))).collect();

    for task in tasks {
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("task aborted: {err}");
                continue;
            },
        };
        let line = wari::dispatch(
            outcome.map(|n| format!("ok: {n}")),
            Handlers::new().with_kind::<TaskFailed>(|err| format!("failed: {err}")),
        );
        match line {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("{err}"),
        }
    }

    // Synchronous code gets the same treatment.
    let parsed = wari::try_catch(|| "12x".parse::<u8>().map_err(|err| err.to_string()));
    println!("{parsed:?}");
}
