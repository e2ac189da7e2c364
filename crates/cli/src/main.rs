use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sas_topology_core::{
    collect_doctor_info, run_scan, Report, ScanOptions, DEFAULT_DEVICE_ROOT,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "sas-topology",
    version,
    about = "Discover SAS controller, enclosure and disk topology with multipath-ready identities."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan the device tree and emit a JSON topology report.
    Scan(ScanArgs),
    /// Show environment information and controller visibility.
    Doctor(DoctorArgs),
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Device tree root to scan.
    #[arg(long, default_value = DEFAULT_DEVICE_ROOT, value_name = "DIR")]
    device_root: PathBuf,

    /// Normalized WWID expected for the primary enclosure.
    #[arg(long, value_name = "WWID", requires = "secondary")]
    primary: Option<String>,

    /// Normalized WWID expected for the secondary enclosure.
    #[arg(long, value_name = "WWID", requires = "primary")]
    secondary: Option<String>,

    /// Output report path. Omit to print the report to stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct DoctorArgs {
    /// Device tree root to probe.
    #[arg(long, default_value = DEFAULT_DEVICE_ROOT, value_name = "DIR")]
    device_root: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => run_scan_command(args),
        Commands::Doctor(args) => {
            run_doctor_command(args);
            Ok(())
        }
    }
}

fn run_scan_command(args: ScanArgs) -> Result<()> {
    let options = ScanOptions {
        device_root: args.device_root,
        primary: args.primary,
        secondary: args.secondary,
    };
    debug!("scan requested for {}", options.device_root.display());

    let report = run_scan(&options).context("topology scan failed")?;
    let payload = serde_json::to_string_pretty(&report).context("failed to serialize report")?;

    match args.output {
        Some(output) => {
            fs::write(&output, payload)
                .with_context(|| format!("failed to write report to {}", output.display()))?;
            println!("Report written to {}", output.display());
            print_summary(&report);
        }
        None => println!("{payload}"),
    }

    Ok(())
}

fn print_summary(report: &Report) {
    if report.skipped {
        println!(
            "Scan skipped: {}",
            report.skip_reason.as_deref().unwrap_or("no reason recorded")
        );
        return;
    }
    println!(
        "Scanned {} controller(s), {} port(s), {} enclosure(s), {} disk(s) in {} ms.",
        report.scan_metrics.controllers,
        report.scan_metrics.ports,
        report.scan_metrics.enclosures,
        report.scan_metrics.disks,
        report.scan_metrics.elapsed_ms
    );
    for (wwid, enclosure) in &report.enclosures {
        println!(
            "- {} role={:?} ports={} disks={}",
            wwid,
            enclosure.role,
            enclosure.ports.len(),
            enclosure.disks.len()
        );
    }
}

fn run_doctor_command(args: DoctorArgs) {
    let info = collect_doctor_info(&args.device_root);
    println!("OS: {} ({})", info.os, info.arch);
    println!(
        "Device root: {} (present: {})",
        info.device_root, info.device_root_present
    );
    println!("SAS controllers visible: {}", info.controllers_visible);
    for note in info.notes {
        println!("Note: {}", note);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
