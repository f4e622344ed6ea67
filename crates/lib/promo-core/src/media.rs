//! ffmpeg and ffprobe plumbing for GIF rendering and audio work.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::command::{CommandOutput, run_command};
use crate::error::ToolError;

/// GIFs above this frame rate get heavy without looking better.
pub const MAX_GIF_FPS: f64 = 30.0;

/// Audio longer than this is enhanced in separate chunks.
pub const AUDIO_CHUNK_SECS: f64 = 300.0;

const FFMPEG_INSTALL_HINT: &str =
    "Install ffmpeg with `brew install ffmpeg` or run the install_brew_and_ffmpeg tool.";

/// Stream properties of a probed video file.
#[derive(Debug, Clone, Copy)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// Reads the video stream dimensions and frame rate via ffprobe.
///
/// # Errors
/// Returns `ToolError` if ffprobe fails or no video stream is present.
pub async fn probe_video(path: &Path) -> Result<VideoInfo, ToolError> {
    let streams = probe_streams(path).await?;
    let video = streams
        .iter()
        .find(|stream| stream.get("codec_type").and_then(Value::as_str) == Some("video"))
        .ok_or_else(|| {
            ToolError::validation(format!("no video stream found in {}", path.display()))
        })?;

    let width = video
        .get("width")
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| {
            ToolError::system(format!("missing video width in probe of {}", path.display()))
        })?;
    let height = video
        .get("height")
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| {
            ToolError::system(format!(
                "missing video height in probe of {}",
                path.display()
            ))
        })?;
    let fps = video
        .get("r_frame_rate")
        .and_then(Value::as_str)
        .and_then(parse_frame_rate)
        .ok_or_else(|| {
            ToolError::system(format!(
                "missing video frame rate in probe of {}",
                path.display()
            ))
        })?;

    Ok(VideoInfo { width, height, fps })
}

/// Whether the file carries an audio stream.
///
/// # Errors
/// Returns `ToolError` if ffprobe fails.
pub async fn has_audio_stream(path: &Path) -> Result<bool, ToolError> {
    let streams = probe_streams(path).await?;
    Ok(streams
        .iter()
        .any(|stream| stream.get("codec_type").and_then(Value::as_str) == Some("audio")))
}

/// Parses an ffprobe `r_frame_rate` value, either `30000/1001` or `25`.
#[must_use]
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    match raw.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.trim().parse().ok()?;
            let denominator: f64 = denominator.trim().parse().ok()?;
            if denominator.abs() < f64::EPSILON {
                Some(numerator)
            } else {
                Some(numerator / denominator)
            }
        }
        None => raw.trim().parse().ok(),
    }
}

/// File name without its final extension.
#[must_use]
pub fn video_stem(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// GIF file name derived from the source name and the cut timestamps.
#[must_use]
pub fn gif_file_name(screencast_name: &str, start: &str, end: &str) -> String {
    format!(
        "{}_{}_to_{}.gif",
        video_stem(screencast_name),
        start.replace(':', "-"),
        end.replace(':', "-"),
    )
}

/// Renders a GIF of the `start..end` cut at source dimensions.
///
/// Two passes: a generated palette keeps the colors stable, then the
/// actual render maps frames through it. The palette file is removed
/// afterwards either way.
///
/// # Errors
/// Returns `ToolError` if either ffmpeg pass fails.
pub async fn render_gif(
    video: &Path,
    gif: &Path,
    start: &str,
    end: &str,
    info: VideoInfo,
) -> Result<(), ToolError> {
    let video_str = path_str(video)?;
    let gif_str = path_str(gif)?;
    let palette = format!("{gif_str}.palette.png");
    let fps = info.fps.min(MAX_GIF_FPS);
    let filter = format!("fps={fps},scale={}:{}:flags=lanczos", info.width, info.height);

    media_command(
        "ffmpeg",
        &[
            "-ss",
            start,
            "-to",
            end,
            "-i",
            video_str,
            "-vf",
            &format!("{filter},palettegen"),
            "-y",
            &palette,
        ],
        "render the GIF palette",
    )
    .await?;

    let rendered = media_command(
        "ffmpeg",
        &[
            "-ss",
            start,
            "-to",
            end,
            "-i",
            video_str,
            "-i",
            &palette,
            "-lavfi",
            &format!("{filter}[x];[x][1:v]paletteuse"),
            "-y",
            gif_str,
        ],
        "render the GIF",
    )
    .await;

    if let Err(err) = tokio::fs::remove_file(&palette).await {
        tracing::warn!("failed to remove palette file {palette}: {err}");
    }
    rendered?;
    Ok(())
}

/// Extracts the audio track as a 192k 44.1 kHz MP3.
///
/// # Errors
/// Returns `ToolError` if ffmpeg fails.
pub async fn extract_audio(video: &Path, audio: &Path) -> Result<(), ToolError> {
    media_command(
        "ffmpeg",
        &[
            "-i",
            path_str(video)?,
            "-vn",
            "-acodec",
            "mp3",
            "-ab",
            "192k",
            "-ar",
            "44100",
            "-y",
            path_str(audio)?,
        ],
        "extract the audio track",
    )
    .await?;
    Ok(())
}

/// Audio duration in seconds via ffprobe.
///
/// # Errors
/// Returns `ToolError` if ffprobe fails or reports no duration.
pub async fn audio_duration_secs(audio: &Path) -> Result<f64, ToolError> {
    let output = media_command(
        "ffprobe",
        &[
            "-v",
            "quiet",
            "-show_entries",
            "format=duration",
            "-of",
            "csv=p=0",
            path_str(audio)?,
        ],
        "measure the audio duration",
    )
    .await?;

    let raw = output.stdout.trim();
    raw.parse()
        .map_err(|err| ToolError::system(format!("failed to parse audio duration {raw:?}: {err}")))
}

/// Splits a duration into `AUDIO_CHUNK_SECS` spans, last one shorter.
#[must_use]
pub fn chunk_spans(total_secs: f64) -> Vec<(f64, f64)> {
    let mut spans = Vec::new();
    let mut start = 0.0;
    while start < total_secs {
        let end = (start + AUDIO_CHUNK_SECS).min(total_secs);
        spans.push((start, end));
        start += AUDIO_CHUNK_SECS;
    }
    spans
}

/// Stream-copies `start..start+length` out of an audio file.
///
/// # Errors
/// Returns `ToolError` if ffmpeg fails.
pub async fn cut_audio_chunk(
    audio: &Path,
    chunk: &Path,
    start_secs: f64,
    length_secs: f64,
) -> Result<(), ToolError> {
    let start = start_secs.to_string();
    let length = length_secs.to_string();
    media_command(
        "ffmpeg",
        &[
            "-i",
            path_str(audio)?,
            "-ss",
            &start,
            "-t",
            &length,
            "-acodec",
            "copy",
            "-y",
            path_str(chunk)?,
        ],
        "cut an audio chunk",
    )
    .await?;
    Ok(())
}

/// Concatenates audio chunks through an ffmpeg concat list file.
///
/// # Errors
/// Returns `ToolError` if the list file cannot be written or ffmpeg fails.
pub async fn concat_audio(
    chunks: &[PathBuf],
    list_file: &Path,
    merged: &Path,
) -> Result<(), ToolError> {
    let mut lines = Vec::new();
    for chunk in chunks {
        lines.push(format!("file '{}'", path_str(chunk)?));
    }
    tokio::fs::write(list_file, lines.join("\n"))
        .await
        .map_err(|err| {
            ToolError::system(format!("failed to write {}: {err}", list_file.display()))
        })?;

    media_command(
        "ffmpeg",
        &[
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            path_str(list_file)?,
            "-c",
            "copy",
            "-y",
            path_str(merged)?,
        ],
        "merge the enhanced audio chunks",
    )
    .await?;
    Ok(())
}

/// Replaces the video's audio track, keeping the video stream as is.
///
/// # Errors
/// Returns `ToolError` if ffmpeg fails.
pub async fn remux_audio(video: &Path, audio: &Path, merged: &Path) -> Result<(), ToolError> {
    media_command(
        "ffmpeg",
        &[
            "-i",
            path_str(video)?,
            "-i",
            path_str(audio)?,
            "-c:v",
            "copy",
            "-c:a",
            "aac",
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-shortest",
            "-y",
            path_str(merged)?,
        ],
        "remux the enhanced audio onto the video",
    )
    .await?;
    Ok(())
}

async fn probe_streams(path: &Path) -> Result<Vec<Value>, ToolError> {
    let output = media_command(
        "ffprobe",
        &[
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            path_str(path)?,
        ],
        "probe the file",
    )
    .await?;

    let probe: Value = serde_json::from_str(&output.stdout)
        .map_err(|err| ToolError::system(format!("failed to parse ffprobe output: {err}")))?;
    Ok(probe
        .get("streams")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default())
}

async fn media_command(
    program: &str,
    args: &[&str],
    what: &str,
) -> Result<CommandOutput, ToolError> {
    let output = run_command(program, args)
        .await
        .map_err(|err| ToolError::dependency(err.to_string(), Some(FFMPEG_INSTALL_HINT.into())))?;
    if output.success {
        Ok(output)
    } else {
        Err(ToolError::dependency(
            format!("{program} failed to {what}"),
            Some(output.stderr.trim().to_string()),
        ))
    }
}

fn path_str(path: &Path) -> Result<&str, ToolError> {
    path.to_str().ok_or_else(|| {
        ToolError::validation(format!("path {} is not valid UTF-8", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fractional_frame_rates() {
        let fps = parse_frame_rate("30000/1001").expect("parses");
        assert!((fps - 29.970_029_970_029_97).abs() < 1e-9);
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        assert_eq!(parse_frame_rate("24/0"), Some(24.0));
        assert_eq!(parse_frame_rate("not-a-rate"), None);
    }

    #[test]
    fn strips_only_the_final_extension() {
        assert_eq!(video_stem("demo.mp4"), "demo");
        assert_eq!(video_stem("demo.final.mov"), "demo.final");
        assert_eq!(video_stem("demo"), "demo");
    }

    #[test]
    fn gif_names_replace_timestamp_colons() {
        assert_eq!(
            gif_file_name("demo.mp4", "00:00:05", "00:00:12"),
            "demo_00-00-05_to_00-00-12.gif"
        );
    }

    #[test]
    fn short_audio_is_a_single_span() {
        assert_eq!(chunk_spans(120.0), [(0.0, 120.0)]);
        assert_eq!(chunk_spans(300.0), [(0.0, 300.0)]);
    }

    #[test]
    fn long_audio_splits_into_even_chunks_with_a_remainder() {
        assert_eq!(
            chunk_spans(750.0),
            [(0.0, 300.0), (300.0, 600.0), (600.0, 750.0)]
        );
    }

    #[test]
    fn empty_audio_has_no_spans() {
        assert!(chunk_spans(0.0).is_empty());
    }
}
