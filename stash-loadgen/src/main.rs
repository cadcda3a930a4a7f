// Copyright 2026 Stash Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Stash load generator.
//!
//! Drives a running Stash server with a mixed workload: service info,
//! health checks, small multipart uploads, and listings, with a random
//! think time between tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use reqwest::multipart;
use tracing::{info, warn};

const UPLOAD_CONTENT: &[u8] = b"load test file content";

/// Command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "stash-loadgen",
    about = "Load generator for the Stash file-storage service"
)]
struct Options {
    /// Base URL of the target server.
    #[arg(long, env = "STASH_TARGET", default_value = "http://127.0.0.1:8080")]
    target: String,
    /// Number of concurrent workers.
    #[arg(long, default_value_t = 4)]
    workers: usize,
    /// Iterations per worker.
    #[arg(long, default_value_t = 25)]
    iterations: usize,
}

/// Success counters shared across workers.
#[derive(Debug, Default)]
struct Tally {
    root: AtomicU64,
    health: AtomicU64,
    uploads: AtomicU64,
    listings: AtomicU64,
    failures: AtomicU64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let options = Options::parse();
    info!(
        "Running {} workers x {} iterations against {}",
        options.workers, options.iterations, options.target
    );

    let tally = Arc::new(Tally::default());
    let mut handles = Vec::new();

    for worker in 0..options.workers {
        let client = reqwest::Client::new();
        let target = options.target.clone();
        let iterations = options.iterations;
        let tally = Arc::clone(&tally);

        handles.push(tokio::spawn(async move {
            for _ in 0..iterations {
                if let Err(e) = run_task(&client, &target, worker, &tally).await {
                    warn!("Worker {worker}: request failed: {e}");
                    tally.failures.fetch_add(1, Ordering::Relaxed);
                }

                let pause_ms = rand::thread_rng().gen_range(1000..=3000);
                tokio::time::sleep(Duration::from_millis(pause_ms)).await;
            }
        }));
    }

    for handle in handles {
        handle.await?;
    }

    info!(
        root = tally.root.load(Ordering::Relaxed),
        health = tally.health.load(Ordering::Relaxed),
        uploads = tally.uploads.load(Ordering::Relaxed),
        listings = tally.listings.load(Ordering::Relaxed),
        failures = tally.failures.load(Ordering::Relaxed),
        "Load run complete"
    );
    Ok(())
}

/// Runs one randomly-chosen task against the server.
async fn run_task(
    client: &reqwest::Client,
    target: &str,
    worker: usize,
    tally: &Tally,
) -> Result<()> {
    let pick = rand::thread_rng().gen_range(0..4);
    match pick {
        0 => {
            client.get(format!("{target}/")).send().await?.error_for_status()?;
            tally.root.fetch_add(1, Ordering::Relaxed);
        }
        1 => {
            client.get(format!("{target}/health")).send().await?.error_for_status()?;
            tally.health.fetch_add(1, Ordering::Relaxed);
        }
        2 => {
            let part = multipart::Part::bytes(UPLOAD_CONTENT)
                .file_name(format!("loadgen-{worker}.txt"))
                .mime_str("text/plain")?;
            let form = multipart::Form::new().part("file", part);
            client
                .post(format!("{target}/files"))
                .multipart(form)
                .send()
                .await?
                .error_for_status()?;
            tally.uploads.fetch_add(1, Ordering::Relaxed);
        }
        _ => {
            client.get(format!("{target}/files")).send().await?.error_for_status()?;
            tally.listings.fetch_add(1, Ordering::Relaxed);
        }
    }
    Ok(())
}
