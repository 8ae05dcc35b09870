use tracing::{debug, trace};

use crate::{
    result::{Error, Result},
    types::Interval,
};

/// Default trailing margin kept between two selected subclips, in seconds
pub const DEFAULT_GAP: f64 = 1.0;

/// How many random draws to try before giving up on a duration
const MAX_ATTEMPTS: u32 = 100;

/// Draws random subclip intervals out of a stream, guaranteeing that no
/// two drawn intervals overlap.
///
/// The sampler owns the claimed-interval set for one assembly run:
/// every successful draw is recorded (with its trailing gap) and biases
/// all later draws away from it. The set is append-only and dies with
/// the sampler.
#[derive(Debug)]
pub struct IntervalSampler {
    rng: fastrand::Rng,
    gap: f64,
    claimed: Vec<Interval>,
}

impl IntervalSampler {
    pub fn new(rng: fastrand::Rng, gap: f64) -> Self {
        Self {
            rng,
            gap,
            claimed: Vec::new(),
        }
    }

    /// Draw one interval of `clip_duration` seconds, with its start
    /// uniform in `[0, total_duration - clip_duration]`, that does not
    /// overlap any previously claimed interval.
    ///
    /// Fails with [`Error::NoFreeInterval`] when `clip_duration` does not
    /// fit in the stream at all, or when no free spot was found within
    /// the attempt budget.
    pub fn sample(&mut self, total_duration: f64, clip_duration: f64) -> Result<Interval> {
        let max_start = total_duration - clip_duration;
        if max_start < 0.0 {
            debug!("A {clip_duration}s clip cannot fit in a {total_duration}s stream");
            return Err(Error::NoFreeInterval);
        }

        for attempt in 0..MAX_ATTEMPTS {
            let start = self.rng.f64() * max_start;
            let candidate = Interval::new(start, start + clip_duration);

            if self.claimed.iter().any(|iv| iv.overlaps(&candidate)) {
                trace!("Attempt {attempt}: {candidate} overlaps a claimed interval");
                continue;
            }

            // Claim the gap-padded interval but hand out the exact one
            self.claimed.push(candidate.padded(self.gap));
            return Ok(candidate);
        }

        debug!("No free {clip_duration}s interval found after {MAX_ATTEMPTS} attempts");
        Err(Error::NoFreeInterval)
    }

    /// The gap-padded intervals claimed so far, in claim order
    pub fn claimed(&self) -> &[Interval] {
        &self.claimed
    }
}
