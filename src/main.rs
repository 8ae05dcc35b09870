mod assembler;
mod cli;
mod io;
mod logging;
mod outside;
mod result;
mod sampler;
mod timeline;
mod types;

use clap::Parser;
use miette::{bail, Context, IntoDiagnostic};
use tracing::{debug, info, Level};

use crate::{cli::Args, outside::Ffmpeg, sampler::IntervalSampler, types::ClipPlan};

fn main() -> miette::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    logging::init_logging(level)?;

    validate(&args)?;

    std::fs::create_dir_all(&args.out)
        .into_diagnostic()
        .wrap_err("Could not create the output directory")?;

    let plan = match &args.plan {
        Some(path) => ClipPlan::from_file(path)?,
        None => ClipPlan::default(),
    };
    debug!("Clip plan: {plan}");

    let rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut sampler = IntervalSampler::new(rng, args.gap);

    let engine = Ffmpeg::new()?;
    let output = io::highlight_output_path(&args.out, &args.input);

    info!(
        "Generating a {:.1}s highlight of '{}'",
        args.length,
        args.input.display()
    );
    let output = assembler::generate_highlight(
        &engine,
        &args.input,
        &plan,
        args.length,
        &output,
        &mut sampler,
    )?;

    info!("Highlight ready: '{}'", output.display());
    Ok(())
}

/// Reject unusable requests before any work starts
fn validate(args: &Args) -> miette::Result<()> {
    if args.length <= 0.0 {
        bail!("Final highlight length must be positive");
    }
    if args.gap < 0.0 {
        bail!("The gap between subclips cannot be negative");
    }
    if !args.input.is_file() {
        bail!("Source video '{}' does not exist", args.input.display());
    }

    Ok(())
}
