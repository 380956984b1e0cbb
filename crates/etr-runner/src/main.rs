use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use etr_aws::AwsClients;
use etr_core::{LogAttachment, Orchestrator, Report, Services};
use etr_exec::BuildkiteAgent;
use etr_observe::logger_init;

mod config;
use config::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(&cli).await {
        Ok(report) => {
            print_report(&report);
            u8::try_from(report.exit_status()).map_or(ExitCode::FAILURE, ExitCode::from)
        }
        Err(e) => {
            println!("plugin execution failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<Report> {
    logger_init(&cli.logger()).context("logger initialization failed")?;
    info!("Executing task-runner plugin");

    let aws = AwsClients::from_env().await;
    let services = Services {
        store: Arc::new(aws.template_store()),
        runs: Arc::new(aws.run_service()),
        logs: Arc::new(aws.log_service()),
        sink: Arc::new(BuildkiteAgent::default()),
    };

    let invocation = cli.invocation();
    Orchestrator::new(services)
        .run(&invocation)
        .await
        .with_context(|| format!("task from {} did not run", invocation.parameter_key))
}

fn print_report(report: &Report) {
    match &report.logs {
        LogAttachment::Attached(_) => {
            println!("CloudWatch Logs for job:");
            for line in report.rendered_logs() {
                println!("{line}");
            }
        }
        LogAttachment::Skipped { reason } => println!("CloudWatch Logs skipped: {reason}"),
    }
    println!("Task {}: {}", report.handle, report.outcome);
    println!("done.");
}
