//! Audio output assembly using FFmpeg.
//!
//! Chunk MP3s are concatenated losslessly with FFmpeg's concat demuxer,
//! first into per-chapter files and then into the combined audiobook.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Concatenate multiple audio files into one.
///
/// Uses FFmpeg's concat demuxer for lossless concatenation of same-format
/// files; a single input is just copied.
pub fn concatenate_audio_files(audio_files: &[&Path], output_path: &Path) -> Result<()> {
    if audio_files.is_empty() {
        anyhow::bail!("no audio files provided");
    }

    if audio_files.len() == 1 {
        std::fs::copy(audio_files[0], output_path)?;
        return Ok(());
    }

    // Concat demuxer reads its inputs from a list file
    let temp_dir = TempDir::new()?;
    let list_file = temp_dir.path().join("concat_list.txt");

    let mut list_content = String::new();
    for path in audio_files {
        // Escape single quotes in path
        let path_str = path.to_string_lossy().replace('\'', "'\\''");
        list_content.push_str(&format!("file '{}'\n", path_str));
    }
    std::fs::write(&list_file, &list_content)?;

    let output = Command::new("ffmpeg")
        .args(["-y", "-f", "concat", "-safe", "0", "-i"])
        .arg(&list_file)
        .args(["-c", "copy"])
        .arg(output_path)
        .output()
        .context("failed to run ffmpeg concat")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ffmpeg concat failed: {}", stderr);
    }

    Ok(())
}

/// Check if FFmpeg is available on PATH.
pub fn is_ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Turn a chapter title into a safe file name fragment.
pub fn sanitize_title(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_was_separator = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_was_separator = false;
        } else if !prev_was_separator {
            result.push('_');
            prev_was_separator = true;
        }
    }

    let result = result.trim_matches('_');
    if result.is_empty() {
        "chapter".to_string()
    } else {
        result.chars().take(60).collect()
    }
}
