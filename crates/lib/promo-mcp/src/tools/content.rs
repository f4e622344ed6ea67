//! Screencast content tools: analysis, GIF cuts, and audio enhancement.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use promo_core::error::ToolError;
use promo_core::gate::ToolGroup;
use promo_core::media::{
    audio_duration_secs, chunk_spans, concat_audio, cut_audio_chunk, extract_audio,
    gif_file_name, has_audio_stream, probe_video, remux_audio, render_gif, video_stem,
};
use promo_core::workspace::{gifs_dir, screencasts_dir, workspace_root};
use rmcp::model::CallToolResult;
use rmcp::schemars;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::catalog::{ToolContext, ToolDescriptor};
use crate::helpers;

const GROUPS: &[ToolGroup] = &[ToolGroup::ContentGenerators];

pub fn tools() -> Vec<ToolDescriptor> {
    vec![analyze_tool(), gif_tool(), enhance_tool()]
}

/// Parameters for `analyze_screencasts`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeScreencastsParams {
    /// Names of the screencast files to analyze.
    pub screencast_names: Vec<String>,
    /// Re-run the analysis even when a saved one exists.
    #[serde(default)]
    pub force: bool,
    /// Custom prompt forwarded verbatim to the analysis model.
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

/// Parameters for `generate_gif`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateGifParams {
    /// Name of the screencast file to cut.
    pub screencast_name: String,
    /// Start timestamp, `HH:MM:SS` or `MM:SS`.
    pub start_time: String,
    /// End timestamp, `HH:MM:SS` or `MM:SS`.
    pub end_time: String,
}

/// Parameters for `enhance_audio`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceAudioParams {
    /// Names of the screencast files whose speech should be enhanced.
    pub screencast_names: Vec<String>,
}

fn analyze_tool() -> ToolDescriptor {
    ToolDescriptor::new::<AnalyzeScreencastsParams, _, _>(
        "analyze_screencasts",
        "Analyzes screencast recordings through the Promo Studio web API and saves one JSON \
         description per screencast next to the video. IMPORTANT: You MUST provide the \
         screencastNames parameter. Optionally provide customPrompt for specialized \
         analysis; DO NOT MODIFY THE CUSTOM PROMPT, and never ask for visual analysis \
         unless the user explicitly asks for it. Example: analyze_screencasts({ \
         screencastNames: [\"screencast1.mp4\"], force: false, customPrompt: \"Focus on \
         user interface errors\" })",
        GROUPS,
        run_analyze,
    )
}

fn gif_tool() -> ToolDescriptor {
    ToolDescriptor::new::<GenerateGifParams, _, _>(
        "generate_gif",
        "Generates a GIF from a segment of a screencast using ffmpeg, at source resolution \
         and frame rate. IMPORTANT: You MUST provide the screencastName, startTime, and \
         endTime parameters. Example: generate_gif({ screencastName: \"screencast1.mp4\", \
         startTime: \"00:00:05\", endTime: \"00:00:12\" })",
        GROUPS,
        run_generate_gif,
    )
}

fn enhance_tool() -> ToolDescriptor {
    ToolDescriptor::new::<EnhanceAudioParams, _, _>(
        "enhance_audio",
        "Extracts the audio track of each screencast with ffmpeg, enhances the speech \
         through the Promo Studio web API, and remuxes the enhanced track back onto the \
         video. Requires PROMO_API_TOKEN and ffmpeg. IMPORTANT: You MUST provide the \
         screencastNames parameter. Example: enhance_audio({ screencastNames: \
         [\"screencast1.mp4\"] })",
        GROUPS,
        run_enhance_audio,
    )
}

async fn run_analyze(
    context: Arc<ToolContext>,
    params: AnalyzeScreencastsParams,
) -> Result<CallToolResult, ToolError> {
    let workspace = workspace_root()?;
    let screencasts = screencasts_dir(&workspace);

    let mut analyses = Vec::new();
    let mut pending = Vec::new();

    for name in &params.screencast_names {
        let json_path = screencasts.join(format!("{}.json", video_stem(name)));
        if !params.force && json_path.is_file() {
            tracing::info!(screencast = %name, "reusing saved analysis");
            analyses.push(load_analysis(&json_path).await?);
        } else {
            pending.push(name.clone());
        }
    }

    if !pending.is_empty() {
        let mut uploads = Vec::new();
        for name in &pending {
            let path = screencasts.join(name);
            if !path.is_file() {
                return Err(ToolError::validation(format!(
                    "Screencast file not found: {}",
                    path.display()
                )));
            }
            let bytes = tokio::fs::read(&path).await.map_err(|err| {
                ToolError::system(format!("failed to read {}: {err}", path.display()))
            })?;
            uploads.push((name.clone(), bytes));
        }

        tracing::info!(count = uploads.len(), "uploading screencasts for analysis");
        let response = context
            .api
            .analyze_videos(uploads, params.force, params.custom_prompt.as_deref())
            .await?;
        if !response.success {
            return Err(ToolError::api(
                format!(
                    "Screencast analysis failed: {}",
                    response
                        .error
                        .unwrap_or_else(|| "Unknown error".to_string())
                ),
                None,
            ));
        }

        for analysis in response.analyses {
            analyses.push(store_analysis(&screencasts, analysis).await);
        }
    }

    let has_existing = analyses.iter().any(|analysis| {
        analysis.get("existing_analysis").and_then(Value::as_bool) == Some(true)
    });
    let mut next_steps = vec![
        "Review the generated descriptions for each screencast".to_string(),
        "Use the descriptions for content creation or documentation".to_string(),
    ];
    if has_existing {
        next_steps.push(
            "Some screencasts already have analyses, ask the user if they want to force the \
             analysis again"
                .to_string(),
        );
    }

    let response = json!({
        "success": true,
        "message": "Successfully analyzed screencasts via the web API",
        "analyses": analyses,
        "existing_analyses": if has_existing {
            "Some screencasts already have analyses, use the force parameter to force the \
             analysis again"
        } else {
            "All specified screencasts have new analyses"
        },
        "nextSteps": next_steps,
    });
    helpers::json_text(&response)
}

async fn load_analysis(json_path: &Path) -> Result<Value, ToolError> {
    let raw = tokio::fs::read_to_string(json_path).await.map_err(|err| {
        ToolError::system(format!("failed to read {}: {err}", json_path.display()))
    })?;
    let mut analysis: Value = serde_json::from_str(&raw).map_err(|err| {
        ToolError::system(format!("failed to parse {}: {err}", json_path.display()))
    })?;
    if let Value::Object(map) = &mut analysis {
        map.insert(
            "analysis_file".to_string(),
            Value::String(json_path.display().to_string()),
        );
        map.insert("existing_analysis".to_string(), Value::Bool(true));
    }
    Ok(analysis)
}

/// Saves a fresh analysis next to its screencast and tags the returned
/// entry with the file location.
///
/// The API may split one screencast into several analyses; those carry
/// a `fileSuffix` that lands in the saved file name. Transport fields
/// (`videoName`, `fileSuffix`) never reach the saved file. A failed
/// save is reported with an empty `analysis_file` instead of failing
/// the whole call.
async fn store_analysis(screencasts: &Path, analysis: Value) -> Value {
    let mut map = match analysis {
        Value::Object(map) => map,
        other => {
            tracing::warn!("unexpected analysis shape from the web API");
            return other;
        }
    };

    let screencast_name = map
        .get("screencastName")
        .and_then(Value::as_str)
        .or_else(|| map.get("videoName").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    let file_suffix = map
        .get("fileSuffix")
        .and_then(Value::as_str)
        .map(sanitize_suffix);
    let json_name = file_suffix.as_ref().map_or_else(
        || format!("{}.json", video_stem(&screencast_name)),
        |suffix| format!("{}_{suffix}.json", video_stem(&screencast_name)),
    );
    let json_path = screencasts.join(json_name);

    if file_suffix.is_some()
        && let Some(description) = map.remove("description")
    {
        map.insert("result".to_string(), description);
    }
    map.remove("videoName");
    map.remove("fileSuffix");
    if !screencast_name.is_empty() && !map.contains_key("screencastName") {
        map.insert("screencastName".to_string(), Value::String(screencast_name));
    }

    let analysis_file = match serde_json::to_string_pretty(&map) {
        Ok(body) => match tokio::fs::write(&json_path, body).await {
            Ok(()) => json_path.display().to_string(),
            Err(err) => {
                tracing::warn!(path = %json_path.display(), "failed to save analysis: {err}");
                String::new()
            }
        },
        Err(err) => {
            tracing::warn!("failed to render analysis: {err}");
            String::new()
        }
    };

    map.insert("analysis_file".to_string(), Value::String(analysis_file));
    map.insert("existing_analysis".to_string(), Value::Bool(false));
    Value::Object(map)
}

fn sanitize_suffix(raw: &str) -> String {
    raw.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' {
                ch
            } else {
                '-'
            }
        })
        .collect::<String>()
        .to_ascii_lowercase()
}

async fn run_generate_gif(
    _context: Arc<ToolContext>,
    params: GenerateGifParams,
) -> Result<CallToolResult, ToolError> {
    let workspace = workspace_root()?;
    let video = screencasts_dir(&workspace).join(&params.screencast_name);
    if !video.is_file() {
        return Err(ToolError::validation(format!(
            "Screencast file not found: {}",
            video.display()
        )));
    }

    let gifs = gifs_dir(&workspace);
    tokio::fs::create_dir_all(&gifs).await.map_err(|err| {
        ToolError::system(format!("failed to create {}: {err}", gifs.display()))
    })?;

    let info = probe_video(&video).await?;
    tracing::info!(
        width = info.width,
        height = info.height,
        fps = info.fps,
        "rendering GIF"
    );

    let gif_name = gif_file_name(&params.screencast_name, &params.start_time, &params.end_time);
    let gif = gifs.join(&gif_name);
    render_gif(&video, &gif, &params.start_time, &params.end_time, info).await?;

    let response = json!({
        "success": true,
        "message": "Successfully generated GIF",
        "gifName": gif_name,
        "nextSteps": ["Ask the user if they want to refine the GIF"],
    });
    helpers::json_text(&response)
}

async fn run_enhance_audio(
    context: Arc<ToolContext>,
    params: EnhanceAudioParams,
) -> Result<CallToolResult, ToolError> {
    let workspace = workspace_root()?;
    let screencasts = screencasts_dir(&workspace);

    let mut results = Vec::new();
    let mut temp_files: Vec<PathBuf> = Vec::new();

    for name in &params.screencast_names {
        let video = screencasts.join(name);
        if !video.is_file() {
            tracing::warn!(screencast = %name, "screencast not found, skipping");
            continue;
        }
        let entry = enhance_one(&context, &screencasts, name, &video, &mut temp_files)
            .await
            .map_or_else(
                |err| {
                    tracing::warn!(screencast = %name, "audio enhancement failed: {err}");
                    json!({
                        "screencastName": name,
                        "success": false,
                        "errors": [err.to_string()],
                    })
                },
                |enhanced_name| {
                    json!({
                        "screencastName": enhanced_name,
                        "success": true,
                        "errors": [],
                    })
                },
            );
        results.push(entry);
    }

    remove_temp_files(&temp_files).await;

    let all_ok = results
        .iter()
        .all(|entry| entry.get("success").and_then(Value::as_bool) == Some(true));
    let response = json!({
        "success": all_ok,
        "result": results,
        "nextSteps": [
            "Review the enhanced screencast files with improved speech quality",
            "Use the enhanced screencasts for content creation or analysis",
            "Compare the enhanced screencasts against the original recordings",
        ],
    });
    helpers::json_text(&response)
}

/// Runs the whole enhancement pipeline for one screencast and returns
/// the enhanced video file name.
///
/// Tracks up to five minutes are enhanced in one piece; longer tracks
/// are cut into chunks, enhanced one by one, and concatenated before
/// the remux. Every intermediate file lands in `temp_files` so the
/// caller can clean up after all videos are processed.
async fn enhance_one(
    context: &ToolContext,
    screencasts: &Path,
    name: &str,
    video: &Path,
    temp_files: &mut Vec<PathBuf>,
) -> Result<String, ToolError> {
    if !has_audio_stream(video).await? {
        return Err(ToolError::validation(format!(
            "Screencast file {name} does not contain an audio track"
        )));
    }

    let stem = video_stem(name);
    let audio = screencasts.join(format!("{stem}.mp3"));
    let enhanced_audio = screencasts.join(format!("{stem}_enhanced.mp3"));

    extract_audio(video, &audio).await?;
    temp_files.push(audio.clone());

    let duration = audio_duration_secs(&audio).await?;
    let spans = chunk_spans(duration);
    tracing::info!(screencast = %name, duration, chunks = spans.len(), "extracted audio track");

    if spans.len() <= 1 {
        enhance_track(context, &audio, &enhanced_audio).await?;
        temp_files.push(enhanced_audio.clone());
    } else {
        let mut enhanced_chunks = Vec::new();
        for (index, (start, end)) in spans.iter().enumerate() {
            let chunk = screencasts.join(format!("{stem}_chunk_{index}.mp3"));
            cut_audio_chunk(&audio, &chunk, *start, end - start).await?;
            temp_files.push(chunk.clone());

            let enhanced_chunk = screencasts.join(format!("{stem}_chunk_{index}_enhanced.mp3"));
            enhance_track(context, &chunk, &enhanced_chunk)
                .await
                .map_err(|err| {
                    ToolError::system(format!("Failed to enhance chunk {index}: {err}"))
                })?;
            temp_files.push(enhanced_chunk.clone());
            enhanced_chunks.push(enhanced_chunk);
        }

        let list_file = screencasts.join(format!("{stem}_concat.txt"));
        concat_audio(&enhanced_chunks, &list_file, &enhanced_audio).await?;
        temp_files.push(list_file);
        temp_files.push(enhanced_audio.clone());
    }

    let extension = name.rsplit_once('.').map_or("mp4", |(_, ext)| ext);
    let enhanced_name = format!("{stem}_enhanced.{extension}");
    let enhanced_video = screencasts.join(&enhanced_name);
    remux_audio(video, &enhanced_audio, &enhanced_video).await?;

    Ok(enhanced_name)
}

async fn enhance_track(
    context: &ToolContext,
    audio: &Path,
    enhanced: &Path,
) -> Result<(), ToolError> {
    let file_name = audio
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("audio.mp3");
    let bytes = tokio::fs::read(audio).await.map_err(|err| {
        ToolError::system(format!("failed to read {}: {err}", audio.display()))
    })?;

    let response = context.api.enhance_audio(file_name, bytes).await?;
    if !response.success {
        return Err(ToolError::api(
            format!(
                "Audio enhancement failed: {}",
                response
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string())
            ),
            None,
        ));
    }
    let Some(download_url) = response.download_url else {
        return Err(ToolError::api(
            "Audio enhancement response did not include a download URL",
            None,
        ));
    };
    if let Some(expiry) = &response.url_expires_in {
        tracing::debug!(expiry = %expiry, "enhanced audio download URL expires");
    }

    let enhanced_bytes = context.api.download(&download_url).await?;
    tokio::fs::write(enhanced, enhanced_bytes).await.map_err(|err| {
        ToolError::system(format!("failed to write {}: {err}", enhanced.display()))
    })?;
    Ok(())
}

async fn remove_temp_files(temp_files: &[PathBuf]) {
    for temp in temp_files {
        if let Err(err) = tokio::fs::remove_file(temp).await
            && err.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %temp.display(), "failed to remove temporary file: {err}");
        }
    }
}
