// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use std::time::Instant;
use the_spillway::config::{load_and_validate_config, OutputFormat, RuntimeBuilder};
use the_spillway::engine::PipelineContext;
use the_spillway::observability::init_tracing;

/// Cancellation reason recorded when the user interrupts a run.
const INTERRUPT_REASON: &str = "interrupt";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.yaml|config.toml> [more configs ...]", args[0]);
        eprintln!("Example: {} configs/primes-fan-out.yaml", args[0]);
        eprintln!(
            "Example: {} configs/primes-naive.yaml configs/primes-fan-out.yaml",
            args[0]
        );
        std::process::exit(1);
    }

    let config_files = &args[1..];
    let mut failures = 0;

    for (i, config_file) in config_files.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(60));
        }

        if let Err(e) = run_single_config(config_file).await {
            eprintln!("❌ Failed to run {}: {:#}", config_file, e);
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} pipelines failed", failures, config_files.len());
    }
    Ok(())
}

async fn run_single_config(config_file: &str) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let config = load_and_validate_config(config_file)
        .with_context(|| format!("loading {}", config_file))?;
    let runtime = RuntimeBuilder::from_config(&config);

    if runtime.output() == OutputFormat::Text {
        println!("📋 Configuration: {}", config_file);
        println!("🔧 Pipeline: {} ({} runner)", runtime.name(), runtime.runner_name());
        match config.take {
            Some(n) => println!("✂️  Take: {}", n),
            None => println!("✂️  Take: until the source ends"),
        }
        if let Some(timeout) = config.options.timeout() {
            println!("⏱️  Timeout: {:?}", timeout);
        }
        println!();
    }

    let ctx = PipelineContext::new(runtime.name());
    let interrupt = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctx.cancel(INTERRUPT_REASON);
            }
        })
    };

    let result = runtime.run_with(&ctx).await;
    interrupt.abort();
    let report = result?;

    let rendered = report.render(runtime.output())?;
    println!("{}", rendered);

    if runtime.output() == OutputFormat::Text {
        println!();
        println!(
            "✅ {} values, pipeline ran {:?}, total {:?}",
            report.values.len(),
            report.elapsed(),
            start_time.elapsed()
        );
    }

    Ok(())
}
