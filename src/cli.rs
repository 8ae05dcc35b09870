use std::path::PathBuf;

use clap::Parser;

use crate::sampler::DEFAULT_GAP;

macro_rules! arg_env {
    ($v:literal) => {
        concat!("SIZZLE_", $v)
    };
}

/// Assemble a short muted highlight reel out of a longer video.
/// Random non-overlapping subclips are cut following a clip plan,
/// concatenated, then looped or truncated to the requested length.
#[derive(Parser, Debug)]
pub struct Args {
    /// The source video to build the highlight from
    #[clap(env = arg_env!("INPUT"))]
    pub input: PathBuf,

    /// The desired length of the final highlight, in seconds
    #[clap(long, env = arg_env!("LENGTH"))]
    pub length: f64,

    /// The directory where the highlight is written,
    /// as `<source name>_highlights.<ext>`
    #[clap(long, default_value = "outputs", env = arg_env!("OUT"))]
    pub out: PathBuf,

    /// Path to a TOML clip plan: a `groups` array of arrays of subclip
    /// durations in seconds. Defaults to the built-in scene holders.
    #[clap(long, env = arg_env!("PLAN"))]
    pub plan: Option<PathBuf>,

    /// The minimum gap in seconds kept between two selected subclips
    #[clap(long, default_value_t = DEFAULT_GAP, env = arg_env!("GAP"))]
    pub gap: f64,

    /// Seed the interval sampler for a reproducible run
    #[clap(long, env = arg_env!("SEED"))]
    pub seed: Option<u64>,

    /// Log debug information
    #[clap(long, short)]
    pub verbose: bool,
}
