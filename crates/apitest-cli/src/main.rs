//! apitest command line runner
//!
//! Loads a test case or suite spec, runs it over HTTP and prints the logs
//! and a pass/fail summary.

mod cli;
mod output;

use anyhow::{bail, Context, Result};
use apitest_runner::{
    load_suite, load_test_case, CaseExecutor, DocumentLoader, HttpTransport, RunnerConfig,
    SuiteSpec, SuiteRunner,
};
use clap::Parser;
use cli::Cli;
use output::Output;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(2);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level '{}'", level))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Run the selected spec; returns whether every case passed
async fn run(cli: Cli) -> Result<bool> {
    let mut config = RunnerConfig::from_env();
    cli.apply(&mut config);

    let transport =
        HttpTransport::new(config.request_timeout).context("failed to set up HTTP transport")?;

    if let Some(url) = &cli.wait_for {
        info!("Waiting for {}...", url);
        if !transport.wait_for_ready(url, cli.wait_timeout()).await {
            bail!(
                "{} did not become ready within {}s",
                url,
                cli.wait_timeout
            );
        }
        info!("{} is ready", url);
    }

    let (spec_path, suite, is_suite) = match (&cli.suite, &cli.test) {
        (Some(path), _) => {
            let suite = load_suite(path)
                .with_context(|| format!("invalid test suite {}", path.display()))?;
            (path, suite, true)
        }
        (None, Some(path)) => {
            let case = load_test_case(path)
                .with_context(|| format!("invalid test case {}", path.display()))?;
            (path, SuiteSpec::single(case), false)
        }
        (None, None) => bail!("either --test or --suite is required"),
    };

    let executor = CaseExecutor::from_config(
        Arc::new(transport),
        DocumentLoader::for_spec_file(spec_path),
        &config,
    );
    let runner = SuiteRunner::new(executor);

    let mut out = Output::new(cli.no_color);
    if is_suite {
        out.suite_header(&suite, config.verbosity)?;
    }

    let mut report = runner.run(&suite, config.execution_mode()).await;
    info!("Ran {} case(s) in {:?}", report.total(), report.elapsed);
    if cli.ordered {
        report.sort_by_spec_order();
    }

    for result in &report.results {
        out.test_log(result)?;
    }
    if is_suite {
        out.summary(&report)?;
    }

    if let Some(path) = &cli.export {
        report
            .export_document()
            .write(path)
            .with_context(|| format!("failed to export results to {}", path.display()))?;
        info!("Results written to {}", path.display());
    }

    Ok(report.all_passed())
}
