use std::{
    io::Write,
    path::{Path, PathBuf},
};

use miette::IntoDiagnostic;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::{
    io::named_tempfile,
    outside::MediaEngine,
    result::{bail, Error, Result},
    sampler::IntervalSampler,
    timeline::Timeline,
    types::{ClipPlan, Extension},
};

/// Build a highlight of `target_duration` seconds out of `source` and
/// write it to `output`.
///
/// The plan is walked duration by duration against a single sampler, so
/// subclips never overlap across groups. A duration the sampler cannot
/// place is skipped with a warning; a plan yielding no subclip at all
/// aborts the run. The assembled timeline is then looped and truncated
/// to the target and rendered muted.
pub fn generate_highlight(
    engine: &dyn MediaEngine,
    source: &Path,
    plan: &ClipPlan,
    target_duration: f64,
    output: &Path,
    sampler: &mut IntervalSampler,
) -> Result<PathBuf> {
    let total_duration = engine
        .probe_duration(source)
        .map_err(|err| err.wrap_err_with(|| "Could not read the source video duration"))?;
    info!("Source duration: {total_duration:.2}s");

    let timeline = select_subclips(plan, total_duration, sampler)?;
    let timeline = reconcile(timeline, target_duration);

    render(engine, source, &timeline, output)
        .map_err(|err| err.wrap_err_with(|| "Could not render the highlight"))?;

    Ok(output.to_path_buf())
}

/// Walk the plan in order and sample one interval per duration.
fn select_subclips(
    plan: &ClipPlan,
    total_duration: f64,
    sampler: &mut IntervalSampler,
) -> Result<Timeline> {
    let mut segments = Vec::new();

    for group in plan.groups() {
        for &clip_duration in group {
            match sampler.sample(total_duration, clip_duration) {
                Ok(interval) => {
                    debug!("Selected {interval} for a {clip_duration}s subclip");
                    segments.push(interval);
                }
                Err(Error::NoFreeInterval) => {
                    warn!("No non-overlapping {clip_duration}s subclip found, skipping it");
                }
                Err(err) => return Err(err),
            }
        }
    }

    if segments.is_empty() {
        return bail("No subclips were produced from the clip plan");
    }

    Ok(Timeline::new(segments))
}

/// Loop then truncate the timeline to match the target duration.
fn reconcile(mut timeline: Timeline, target_duration: f64) -> Timeline {
    info!("Highlight assembled: {timeline}, target is {target_duration:.2}s");

    if timeline.duration() < target_duration {
        timeline.loop_to(target_duration);
        debug!("Looped up to {timeline}");
    }

    timeline.truncate_to(target_duration);
    debug!("Reconciled to {timeline}");

    timeline
}

/// Encode every segment of the timeline to its own temporary file, then
/// join them into the muted output.
///
/// The temporary segment files and the concat list live only for the
/// duration of this call, whatever its outcome.
fn render(
    engine: &dyn MediaEngine,
    source: &Path,
    timeline: &Timeline,
    output: &Path,
) -> Result<()> {
    let ext = Extension::from_path(output).unwrap_or(Extension::Mp4);

    let mut segment_files = Vec::with_capacity(timeline.len());
    for (n, segment) in timeline.segments().iter().enumerate() {
        debug!("Encoding segment {}/{}: {segment}", n + 1, timeline.len());

        let file = named_tempfile(ext.with_dot())?;
        engine.extract_segment(source, file.path(), segment)?;
        segment_files.push(file);
    }

    let list = concat_list(&segment_files)?;
    engine.concat_segments(list.path(), output)?;

    info!("Highlight written to '{}'", output.display());
    Ok(())
}

/// Write an ffmpeg concat-demuxer list referencing the segment files.
fn concat_list(segment_files: &[NamedTempFile]) -> Result<NamedTempFile> {
    let mut list = named_tempfile(".txt")?;

    for file in segment_files {
        writeln!(list, "file '{}'", file.path().display()).into_diagnostic()?;
    }
    list.flush().into_diagnostic()?;

    Ok(list)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::{sampler::DEFAULT_GAP, types::Interval};

    use super::*;

    /// A media engine that reports a fixed duration and records every
    /// extracted segment instead of invoking ffmpeg.
    #[derive(Debug)]
    struct FakeEngine {
        duration: f64,
        extracted: RefCell<Vec<Interval>>,
    }

    impl FakeEngine {
        fn new(duration: f64) -> Self {
            Self {
                duration,
                extracted: RefCell::new(Vec::new()),
            }
        }

        fn extracted_duration(&self) -> f64 {
            self.extracted.borrow().iter().map(Interval::duration).sum()
        }
    }

    impl MediaEngine for FakeEngine {
        fn probe_duration(&self, _input: &Path) -> Result<f64> {
            Ok(self.duration)
        }

        fn extract_segment(&self, _input: &Path, output: &Path, segment: &Interval) -> Result<()> {
            self.extracted.borrow_mut().push(*segment);
            std::fs::write(output, b"segment")?;
            Ok(())
        }

        fn concat_segments(&self, list: &Path, output: &Path) -> Result<()> {
            // Every listed segment file must still exist when joining
            let list = std::fs::read_to_string(list)?;
            for line in list.lines() {
                let path = line
                    .trim_start_matches("file '")
                    .trim_end_matches('\'');
                assert!(Path::new(path).is_file(), "missing segment {path}");
            }

            std::fs::write(output, b"highlight")?;
            Ok(())
        }
    }

    fn plan(groups: Vec<Vec<f64>>) -> ClipPlan {
        ClipPlan::new(groups).unwrap()
    }

    fn sampler(seed: u64) -> IntervalSampler {
        IntervalSampler::new(fastrand::Rng::with_seed(seed), DEFAULT_GAP)
    }

    fn generate(
        engine: &FakeEngine,
        plan: &ClipPlan,
        target: f64,
        seed: u64,
    ) -> Result<PathBuf> {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        generate_highlight(
            engine,
            Path::new("source.mp4"),
            plan,
            target,
            &output,
            &mut sampler(seed),
        )
    }

    #[test]
    fn scene_scenario_hits_the_target_duration() {
        // 120s source, one group of sub-second cuts, 10s target
        let engine = FakeEngine::new(120.0);
        let plan = plan(vec![vec![0.2, 0.2, 0.3, 0.7]]);

        generate(&engine, &plan, 10.0, 1).unwrap();

        assert!((engine.extracted_duration() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn looping_uses_whole_copies_of_the_original() {
        // One 8s subclip, 30s target: 3 full copies plus a 6s cut
        let engine = FakeEngine::new(1000.0);
        let plan = plan(vec![vec![8.0]]);

        generate(&engine, &plan, 30.0, 2).unwrap();

        let extracted = engine.extracted.borrow();
        assert_eq!(extracted.len(), 4);
        assert_eq!(extracted[0], extracted[1]);
        assert_eq!(extracted[0], extracted[2]);
        assert!((extracted[3].duration() - 6.0).abs() < 1e-9);
        assert_eq!(extracted[3].start, extracted[0].start);
    }

    #[test]
    fn longer_highlight_is_truncated() {
        let engine = FakeEngine::new(120.0);
        let plan = plan(vec![vec![4.0, 4.0]]);

        generate(&engine, &plan, 3.0, 3).unwrap();

        let extracted = engine.extracted.borrow();
        assert_eq!(extracted.len(), 1);
        assert!((extracted[0].duration() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn unsatisfiable_durations_are_skipped() {
        // The 20s request can never fit in a 10s source
        let engine = FakeEngine::new(10.0);
        let plan = plan(vec![vec![5.0, 20.0]]);

        generate(&engine, &plan, 5.0, 4).unwrap();

        assert!((engine.extracted_duration() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn empty_selection_is_fatal() {
        // A 5s subclip can never fit in a 3s source
        let engine = FakeEngine::new(3.0);
        let plan = plan(vec![vec![5.0]]);

        let err = generate(&engine, &plan, 10.0, 5).unwrap_err();
        let report = miette::Report::from(err);
        assert!(report.to_string().contains("No subclips were produced"));
        assert!(engine.extracted.borrow().is_empty());
    }

    #[test]
    fn output_file_is_written() {
        let engine = FakeEngine::new(60.0);
        let plan = plan(vec![vec![1.0, 1.0]]);

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("movie_highlights.mp4");
        let returned = generate_highlight(
            &engine,
            Path::new("movie.mp4"),
            &plan,
            2.0,
            &output,
            &mut sampler(6),
        )
        .unwrap();

        assert_eq!(returned, output);
        assert!(output.is_file());
    }
}
