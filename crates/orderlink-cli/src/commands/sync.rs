use crate::commands::{print_json, Context};
use crate::progress::StdoutProgress;
use anyhow::{Context as _, Result};
use clap::Args;
use orderlink_config::validate_page_size;
use orderlink_core::RunOutcome;
use orderlink_sync::{run_sync, ProgressReporter, RunOptions, RunReport, TracingProgress};
use std::fmt::Write as _;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Match clients to orders without sending link requests
    #[arg(long)]
    pub dry_run: bool,
    /// Records per page when reading tables (overrides config)
    #[arg(long)]
    pub page_size: Option<usize>,
}

pub fn sync_all(ctx: &Context<'_>, args: SyncArgs) -> Result<()> {
    let page_size = args.page_size.map(validate_page_size).transpose()?;
    let client = ctx.client()?;
    let options = RunOptions {
        dry_run: args.dry_run,
        page_size,
    };

    let mut reporter: Box<dyn ProgressReporter + '_> = if ctx.json {
        Box::new(TracingProgress)
    } else {
        Box::new(StdoutProgress::new(&ctx.config.tables.relation_field_name))
    };
    let report = run_sync(&client, ctx.config, options, reporter.as_mut())
        .with_context(|| "sync orders to clients")?;

    if ctx.json {
        return print_json(&report);
    }
    print!("{}", render_report(&report));
    Ok(())
}

fn render_report(report: &RunReport) -> String {
    let summary = &report.summary;
    let rule = "=".repeat(50);
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Summary{}", if summary.dry_run { " (dry run)" } else { "" });
    let _ = writeln!(out);
    let rows = [
        ("Orders total", summary.total_orders),
        ("Unique order emails", summary.unique_order_emails),
        ("Orders without email", summary.orders_without_email),
        ("Clients processed", summary.total_clients),
        ("Clients updated", summary.clients_updated),
        ("Clients without orders", summary.clients_skipped),
        ("Errors", summary.clients_failed),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<24}{value}", format!("{label}:"));
    }
    if summary.orders_without_id > 0 {
        let _ = writeln!(
            out,
            "  {:<24}{}",
            "Orders without id:", summary.orders_without_id
        );
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failed clients:");
        for failure in &report.failures {
            let _ = writeln!(
                out,
                "- {} ({}): {}",
                failure.client, failure.email, failure.message
            );
        }
        let hidden = summary.clients_failed.saturating_sub(report.failures.len());
        if hidden > 0 {
            let _ = writeln!(out, "- ... and {hidden} more");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    match report.outcome {
        RunOutcome::Completed => {
            let _ = writeln!(out, "Sync completed successfully");
        }
        RunOutcome::CompletedWithErrors(count) => {
            let _ = writeln!(out, "Sync completed with {count} errors");
        }
    }
    out
}
