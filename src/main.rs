//! Employee Directory Facade
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │               EMPLOYEE FACADE                 │
//!   Client Request      │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   ────────────────────┼─▶│  http  │──▶│employees │──▶│  upstream  │──┼──▶ Upstream
//!                       │  │handlers│   │ service  │   │   client   │  │    directory
//!   Client Response     │  └────────┘   └────┬─────┘   └─────┬──────┘  │
//!   ◀───────────────────┼──  (errors mapped   │               │         │
//!                       │    in response.rs)  ▼               ▼         │
//!                       │              ┌────────────┐  ┌────────────┐   │
//!                       │              │aggregation │  │ resilience │   │
//!                       │              │  engine    │  │retry/backoff│  │
//!                       │              └────────────┘  └────────────┘   │
//!                       │   config · observability · lifecycle          │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use employee_facade::config::{load_config, ConfigOverrides};
use employee_facade::lifecycle;
use employee_facade::observability::logging;

#[derive(Parser)]
#[command(name = "employee-facade")]
#[command(about = "Resilient facade over the employee directory API", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080.
    #[arg(short, long)]
    bind: Option<String>,

    /// Base URL of the upstream employee API.
    #[arg(long, env = "EMPLOYEE_FACADE_UPSTREAM_BASE_URL")]
    upstream_base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        bind_address: cli.bind,
        upstream_base_url: cli.upstream_base_url,
        log_level: cli.log_level,
    };

    let config = match load_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("employee-facade: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("employee-facade v{} starting", env!("CARGO_PKG_VERSION"));

    match lifecycle::start(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
