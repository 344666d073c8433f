//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_mx` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Console output of completed domains
//! - Saving the final result
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use domain_mx::app::{
    cancel_on_ctrl_c, load_domains, print_domain, print_error_statistics, print_summary,
    save_result,
};
use domain_mx::config::Opt;
use domain_mx::initialization::init_logger_with;
use domain_mx::{DomainNotifier, MxScan};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    // --input takes priority over domains given on the command line
    let domains = match &opt.input {
        Some(path) => load_domains(path)?,
        None => opt.domains.clone(),
    };

    let notifier: Option<DomainNotifier> = if opt.quiet {
        None
    } else {
        Some(Box::new(print_domain))
    };

    let start = Instant::now();
    let scan = MxScan::new(domains, notifier, opt.settings());
    let ctrl_c = cancel_on_ctrl_c(scan.clone());
    if !opt.quiet {
        println!("Press Ctrl-C to terminate the application...\n");
    }

    let result = scan.process_async().await;
    ctrl_c.abort();

    print_error_statistics(scan.stats());
    print_summary(&result, start.elapsed().as_secs_f64());

    if let Some(output) = &opt.output {
        if let Err(e) = save_result(&result, output, opt.human_readable) {
            println!("--output ERROR {e:#}");
            process::exit(1);
        }
    }
    Ok(())
}
