//! # Adforge
//!
//! Command-line entry point.

use adforge_cli::{run_plan, run_render, CliArgs, Command};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,adforge=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "info,adforge_core=debug,adforge_renderer=debug,adforge_genai=debug,adforge_cli=debug",
        )
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    match args.command {
        Command::Render(render) => {
            let summary = run_render(&render).await?;
            for failure in &summary.failures {
                tracing::warn!(layer = ?failure.layer, reason = %failure.reason, "layer left blank");
            }
            tracing::info!(
                output = %render.output.display(),
                width = summary.size.0,
                height = summary.size.1,
                bytes = summary.bytes,
                failures = summary.failures.len(),
                "banner rendered"
            );
        }
        Command::Plan(plan_args) => {
            let plan = run_plan(&plan_args).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }
    Ok(())
}
