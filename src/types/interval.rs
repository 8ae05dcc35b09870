use std::fmt::Display;

/// A half-open time range `[start, end)` in seconds into a media stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Standard half-open overlap test
    pub fn overlaps(&self, other: &Interval) -> bool {
        other.start < self.end && self.start < other.end
    }

    /// The same interval with its end pushed back by `gap` seconds
    pub fn padded(&self, gap: f64) -> Interval {
        Interval::new(self.start, self.end + gap)
    }

    /// The same interval bounded to its first `duration` seconds
    pub fn truncated(&self, duration: f64) -> Interval {
        Interval::new(self.start, self.end.min(self.start + duration))
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.2}s - {:.2}s]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_half_open() {
        let a = Interval::new(0.0, 2.0);
        let b = Interval::new(2.0, 4.0);

        // Touching intervals do not overlap
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Interval::new(1.9, 3.0);
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn padding_only_moves_the_end() {
        let iv = Interval::new(3.0, 5.0).padded(1.0);
        assert_eq!(iv, Interval::new(3.0, 6.0));
    }

    #[test]
    fn truncation_never_grows() {
        let iv = Interval::new(10.0, 12.0);
        assert_eq!(iv.truncated(0.5), Interval::new(10.0, 10.5));
        assert_eq!(iv.truncated(5.0), iv);
    }
}
