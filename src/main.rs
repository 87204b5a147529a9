use anyhow::{bail, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use capfilter::command::CommandAssembler;
use capfilter::filter::Validation;
use capfilter::models::plan::CapturePlan;
use capfilter::utils::logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Builds capture filter expressions and capture command lines")]
struct Args {
    /// JSON capture plan with options and filter steps
    #[clap(long)]
    plan: Option<PathBuf>,

    /// Match traffic to or from this host
    #[clap(long)]
    host: Option<String>,

    /// Match traffic on this port
    #[clap(long)]
    port: Option<String>,

    /// Network interface to capture from
    #[clap(short, long)]
    interface: Option<String>,

    /// Stop after this many packets
    #[clap(short, long)]
    count: Option<u64>,

    /// Write packets to this file
    #[clap(short, long)]
    write: Option<String>,

    /// Capture program to invoke
    #[clap(long)]
    tool: Option<String>,

    /// Accept any direction/protocol token and out-of-range ports
    #[clap(long)]
    permissive: bool,

    /// Print only the filter expression
    #[clap(long)]
    expression_only: bool,

    /// Compile the expression with libpcap before printing it
    #[cfg(feature = "libpcap")]
    #[clap(long)]
    check: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[clap(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger with specified level
    logging::init_logger(logging::get_log_level(&args.log_level));

    info!("Starting capfilter v{}", env!("CARGO_PKG_VERSION"));

    let mut plan = match &args.plan {
        Some(path) => CapturePlan::from_file(path)?,
        None => CapturePlan::default(),
    };

    apply_overrides(&mut plan, &args);

    if plan.steps.is_empty() && args.expression_only {
        bail!("Nothing to build: pass --plan, --host or --port");
    }

    let expression = plan.build_expression()?;
    if expression.is_empty() && !plan.steps.is_empty() {
        warn!("Plan produced an empty expression; was the last step an 'end' or 'group'?");
    }

    #[cfg(feature = "libpcap")]
    if args.check && !expression.is_empty() {
        capfilter::filter::compile::compile_check(&expression)?;
    }

    if args.expression_only {
        println!("{}", expression);
    } else {
        println!("{}", CommandAssembler::new(plan.options).assemble(&expression));
    }

    Ok(())
}

/// Fold command line flags into the loaded plan
fn apply_overrides(plan: &mut CapturePlan, args: &Args) {
    if let Some(interface) = &args.interface {
        plan.options.interface = Some(interface.clone());
    }
    if let Some(count) = args.count {
        plan.options.count = Some(count);
    }
    if let Some(path) = &args.write {
        plan.options.write_file = Some(path.clone());
    }
    if let Some(tool) = &args.tool {
        plan.options.tool = tool.clone();
    }
    if args.permissive {
        plan.validation = Validation::Permissive;
    }

    plan.push_quick_filter(args.host.as_deref(), args.port.as_deref());
}
