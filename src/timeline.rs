use std::fmt::Display;

use crate::types::Interval;

/// The highlight under construction: an ordered sequence of subclip
/// references into the source stream, treated as one continuous media
/// object. No media data is touched until the timeline is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    segments: Vec<Interval>,
}

impl Timeline {
    pub fn new(segments: Vec<Interval>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Interval] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Derived total duration in seconds
    pub fn duration(&self) -> f64 {
        self.segments.iter().map(Interval::duration).sum()
    }

    /// Stretch the timeline by appending whole copies of its *original*
    /// segment sequence until the total duration reaches `target`.
    ///
    /// The repeated unit is the pre-loop timeline, fixed: the result is
    /// the smallest multiple of the original duration that is >= `target`.
    /// A timeline already long enough (or empty) is left untouched.
    pub fn loop_to(&mut self, target: f64) {
        let unit_duration = self.duration();
        if unit_duration <= 0.0 {
            return;
        }

        let unit = self.segments.clone();
        let mut total = unit_duration;
        while total < target {
            self.segments.extend_from_slice(&unit);
            total += unit_duration;
        }
    }

    /// Shrink the timeline to its `[0, target)` prefix, cutting the last
    /// kept segment short if needed. A timeline already within the target
    /// is left untouched.
    pub fn truncate_to(&mut self, target: f64) {
        if self.duration() <= target {
            return;
        }

        let mut remaining = target;
        let mut kept = Vec::new();
        for segment in &self.segments {
            if remaining <= 0.0 {
                break;
            }

            let kept_segment = if segment.duration() <= remaining {
                *segment
            } else {
                segment.truncated(remaining)
            };
            remaining -= kept_segment.duration();
            kept.push(kept_segment);
        }

        self.segments = kept;
    }
}

impl Display for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} segments, {:.2}s", self.len(), self.duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, duration: f64) -> Interval {
        Interval::new(start, start + duration)
    }

    /// An 8s highlight built out of two subclips
    fn eight_seconds() -> Timeline {
        Timeline::new(vec![seg(10.0, 5.0), seg(40.0, 3.0)])
    }

    #[test]
    fn duration_is_the_sum_of_the_segments() {
        assert!((eight_seconds().duration() - 8.0).abs() < 1e-9);
        assert_eq!(Timeline::new(vec![]).duration(), 0.0);
    }

    #[test]
    fn looping_repeats_the_original_unit() {
        // 8s unit, 30s target: 4 whole copies = 32s, never 8+16+32
        let mut timeline = eight_seconds();
        timeline.loop_to(30.0);

        assert_eq!(timeline.len(), 8);
        assert!((timeline.duration() - 32.0).abs() < 1e-9);

        // Every copy is the original sequence
        let unit = eight_seconds();
        for copy in timeline.segments().chunks(unit.len()) {
            assert_eq!(copy, unit.segments());
        }
    }

    #[test]
    fn looping_is_a_noop_when_long_enough() {
        let mut timeline = eight_seconds();
        timeline.loop_to(8.0);
        assert_eq!(timeline, eight_seconds());

        timeline.loop_to(5.0);
        assert_eq!(timeline, eight_seconds());
    }

    #[test]
    fn looping_an_empty_timeline_does_nothing() {
        let mut timeline = Timeline::new(vec![]);
        timeline.loop_to(30.0);
        assert!(timeline.is_empty());
    }

    #[test]
    fn truncation_cuts_the_last_segment_short() {
        let mut timeline = eight_seconds();
        timeline.truncate_to(6.5);

        assert_eq!(
            timeline.segments(),
            &[seg(10.0, 5.0), Interval::new(40.0, 41.5)]
        );
        assert!((timeline.duration() - 6.5).abs() < 1e-9);
    }

    #[test]
    fn truncation_drops_whole_trailing_segments() {
        let mut timeline = eight_seconds();
        timeline.truncate_to(5.0);
        assert_eq!(timeline.segments(), &[seg(10.0, 5.0)]);
    }

    #[test]
    fn truncation_is_a_noop_within_the_target() {
        let mut timeline = eight_seconds();
        timeline.truncate_to(8.0);
        assert_eq!(timeline, eight_seconds());

        timeline.truncate_to(30.0);
        assert_eq!(timeline, eight_seconds());
    }

    #[test]
    fn loop_then_truncate_hits_the_target_exactly() {
        // Naturally 8s, target 30s: looped to 32s then cut to 30s
        let mut timeline = eight_seconds();
        timeline.loop_to(30.0);
        timeline.truncate_to(30.0);

        assert!((timeline.duration() - 30.0).abs() < 1e-9);
        assert_eq!(timeline.len(), 8);
    }
}
