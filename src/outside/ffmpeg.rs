use std::{ffi::OsString, fmt::Debug, path::Path};

use miette::{Context, IntoDiagnostic};

use crate::{result::Result, types::Interval};

use super::command::{
    assert_success_command, run_command, Capture, FFMPEG, FFPROBE, FFXXX_DEFAULT_ARGS,
};

/// Frame rate of every rendered segment and of the final highlight
pub const OUTPUT_FPS: u32 = 30;

/// Interface to the media toolbox: probing a source, cutting a
/// re-encoded segment out of it, and joining segments back together.
///
/// The assembler only talks to this trait so that it can be tested
/// without any external program installed.
pub trait MediaEngine: Debug {
    /// Total duration of the stream in seconds
    fn probe_duration(&self, input: &Path) -> Result<f64>;

    /// Re-encode the `[segment.start, segment.end)` range of `input`
    /// into `output`, video only, at [`OUTPUT_FPS`]
    fn extract_segment(&self, input: &Path, output: &Path, segment: &Interval) -> Result<()>;

    /// Join the segment files listed in the concat-demuxer file `list`
    /// into `output` without re-encoding
    fn concat_segments(&self, list: &Path, output: &Path) -> Result<()>;
}

/// Interface for the [ffmpeg](https://ffmpeg.org) and `ffprobe` programs
#[derive(Debug)]
pub struct Ffmpeg;

impl Ffmpeg {
    /// Verify that the `ffmpeg` and `ffprobe` binaries are reachable
    pub fn new() -> Result<Self> {
        assert_success_command(FFMPEG, |cmd| cmd.arg("-version"))?;
        assert_success_command(FFPROBE, |cmd| cmd.arg("-version"))?;

        Ok(Self)
    }
}

impl MediaEngine for Ffmpeg {
    fn probe_duration(&self, input: &Path) -> Result<f64> {
        let res = run_command(
            FFPROBE,
            |cmd| {
                cmd.args(FFXXX_DEFAULT_ARGS)
                    .args(["-of", "json"])
                    .arg("-show_format")
                    .arg(input.as_os_str())
            },
            Capture::STDOUT | Capture::STDERR,
        )?;

        if !res.status.success() {
            let stderr = String::from_utf8_lossy(&res.stderr);
            return Err(miette::miette!(
                "Could not probe '{}'. Here is ffprobe's stderr: {stderr}",
                input.display()
            )
            .into());
        }

        let output = String::from_utf8_lossy(&res.stdout);
        let json = serde_json::from_str::<serde_json::Value>(&output)
            .into_diagnostic()
            .wrap_err("Could not parse ffprobe JSON output")?;

        let duration = json
            .get("format")
            .and_then(|format| format.get("duration"))
            .and_then(|duration| duration.as_str())
            .ok_or_else(|| miette::miette!("Key 'format.duration' not found in ffprobe output"))?;

        Ok(duration
            .parse::<f64>()
            .into_diagnostic()
            .wrap_err("Could not parse stream duration")?)
    }

    fn extract_segment(&self, input: &Path, output: &Path, segment: &Interval) -> Result<()> {
        assert_success_command(FFMPEG, |cmd| {
            cmd.args(FFXXX_DEFAULT_ARGS)
                .args(extract_args(input, output, segment))
        })
    }

    fn concat_segments(&self, list: &Path, output: &Path) -> Result<()> {
        assert_success_command(FFMPEG, |cmd| {
            cmd.args(FFXXX_DEFAULT_ARGS).args(concat_args(list, output))
        })
    }
}

/// Arguments cutting `[segment.start, segment.end)` out of `input` into
/// `output`: accurate seek, video-only re-encode at [`OUTPUT_FPS`].
fn extract_args(input: &Path, output: &Path, segment: &Interval) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-ss".into(),
        format!("{:.6}", segment.start).into(),
        "-i".into(),
        input.into(),
        "-t".into(),
        format!("{:.6}", segment.duration()).into(),
        // Mute: drop the audio stream entirely
        "-an".into(),
        "-r".into(),
        OUTPUT_FPS.to_string().into(),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        "veryfast".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "--".into(),
        output.into(),
    ]
}

/// Arguments joining the segment files listed in `list` into `output`.
/// Segments share codec parameters, joining is a pure remux.
fn concat_args(list: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        list.into(),
        "-c".into(),
        "copy".into(),
        "-an".into(),
        "--".into(),
        output.into(),
    ]
}
