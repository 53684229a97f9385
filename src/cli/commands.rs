//! CLI Command Implementations
//!
//! Each editing command opens the input in a `WaveformEditor` driven by a
//! `HeadlessEngine`, performs the same gesture sequence a user would, and
//! writes the committed result.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use wavedit::config::{EditorConfig, MAX_SILENCE_SECS, MIN_SILENCE_SECS};
use wavedit::edit::merge::merge_segments;
use wavedit::editor::{format_time, WaveformEditor};
use wavedit::engine::buffer::{calculate_peak, calculate_rms, db_to_linear};
use wavedit::engine::wav::{self, WavDecoder};
use wavedit::error::{EditorError, Result};

use crate::cli::HeadlessEngine;

type CliEditor = WaveformEditor<HeadlessEngine>;

fn open_editor(path: &Path, config: &EditorConfig) -> Result<CliEditor> {
    let mut editor = WaveformEditor::new(HeadlessEngine::default(), config.clone());
    let bytes = fs::read(path)?;
    editor.open(&bytes, &WavDecoder)?;
    Ok(editor)
}

fn write_result(editor: &mut CliEditor, output: &Path) -> Result<()> {
    let bytes = editor.save()?;
    fs::write(output, &bytes)?;
    if let Some(current) = editor.current() {
        println!(
            "Wrote {} ({})",
            output.display(),
            format_time(current.duration_secs())
        );
    }
    Ok(())
}

fn select_range(editor: &mut CliEditor, start: f64, end: f64) -> Result<()> {
    if editor.select(start, end).is_some() {
        return Ok(());
    }
    let current = editor.current().ok_or(EditorError::NoAudioLoaded)?;
    Err(EditorError::InvalidRange {
        start: current.seconds_to_frame(start),
        end: current.seconds_to_frame(end),
        len: current.frame_count(),
    })
}

/// Hex-encoded SHA-256 of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Print format, duration, levels and checksum of a WAV file.
pub fn info(path: &Path) -> Result<()> {
    info!("Inspecting: {}", path.display());

    let bytes = fs::read(path)?;
    let buffer = wav::decode(&bytes)?;

    println!("File:        {}", path.display());
    println!("Channels:    {}", buffer.channel_count());
    println!("Sample rate: {} Hz", buffer.sample_rate());
    println!("Frames:      {}", buffer.frame_count());
    println!("Duration:    {}", format_time(buffer.duration_secs()));
    println!("Peak:        {:.2} dBFS", calculate_peak(&buffer));
    println!("RMS:         {:.2} dBFS", calculate_rms(&buffer));
    println!("SHA-256:     {}", sha256_hex(&bytes));

    Ok(())
}

/// Remove `[start, end)` seconds.
pub fn cut(path: &Path, start: f64, end: f64, output: &Path, config: &EditorConfig) -> Result<()> {
    info!("Cutting {:.3}s..{:.3}s from {}", start, end, path.display());

    let mut editor = open_editor(path, config)?;
    select_range(&mut editor, start, end)?;
    if !editor.cut()? {
        warn!("Selection covers no frames; writing input unchanged");
    }
    write_result(&mut editor, output)
}

/// Where a pasted clip goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PasteTarget {
    At(f64),
    Replace { start: f64, end: f64 },
}

/// Paste `clip` into `path` at a point or over a range.
pub fn paste(
    path: &Path,
    clip: &Path,
    target: PasteTarget,
    output: &Path,
    config: &EditorConfig,
) -> Result<()> {
    info!("Pasting {} into {}", clip.display(), path.display());

    // Copy the whole clip file, then open the target; the clipboard survives
    let mut editor = open_editor(clip, config)?;
    let clip_duration = editor.current().map(|b| b.duration_secs()).unwrap_or(0.0);
    select_range(&mut editor, 0.0, clip_duration)?;
    editor.copy()?;

    let bytes = fs::read(path)?;
    editor.open(&bytes, &WavDecoder)?;
    match target {
        PasteTarget::At(t) => editor.place_cursor(t),
        PasteTarget::Replace { start, end } => select_range(&mut editor, start, end)?,
    }
    editor.paste()?;
    write_result(&mut editor, output)
}

/// Scale a range, or the whole file, by a linear multiplier.
pub fn gain(
    path: &Path,
    multiplier: f32,
    range: Option<(f64, f64)>,
    output: &Path,
    config: &EditorConfig,
) -> Result<()> {
    let clamped = config.loudness.clamp(multiplier);
    if clamped != multiplier {
        warn!(
            "Multiplier {} outside {}..{}; using {}",
            multiplier, config.loudness.min, config.loudness.max, clamped
        );
    }
    info!("Applying x{:.2} to {}", clamped, path.display());

    let mut editor = open_editor(path, config)?;
    if let Some((start, end)) = range {
        select_range(&mut editor, start, end)?;
    }
    editor.adjust_volume(clamped)?;
    write_result(&mut editor, output)
}

/// Convert a `--db` argument to a linear multiplier
pub fn gain_from_db(db: f32) -> f32 {
    db_to_linear(db)
}

/// Insert silence at `at` seconds.
pub fn silence(
    path: &Path,
    at: f64,
    duration: Option<f64>,
    output: &Path,
    config: &EditorConfig,
) -> Result<()> {
    let mut editor = open_editor(path, config)?;
    if let Some(seconds) = duration {
        let applied = editor.set_silence_length(seconds);
        if applied != seconds {
            warn!(
                "Duration {}s outside {}..{}s; using {}s",
                seconds, MIN_SILENCE_SECS, MAX_SILENCE_SECS, applied
            );
        }
    }
    info!(
        "Inserting {:.2}s of silence at {:.3}s into {}",
        editor.silence_length(),
        at,
        path.display()
    );

    editor.place_cursor(at);
    editor.insert_silence()?;
    write_result(&mut editor, output)
}

/// Expand files and directories into an ordered list of WAV files
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| {
                    path.extension()
                        .map(|ext| ext.eq_ignore_ascii_case("wav"))
                        .unwrap_or(false)
                })
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Concatenate inputs in order, skipping segments that fail to decode.
pub fn merge(inputs: &[PathBuf], output: &Path, config: &EditorConfig) -> Result<()> {
    let files = collect_inputs(inputs)?;
    info!("Merging {} file(s)", files.len());

    let segments: Vec<Vec<u8>> = files
        .iter()
        .map(|path| {
            fs::read(path).unwrap_or_else(|e| {
                warn!("Could not read {}: {}", path.display(), e);
                Vec::new()
            })
        })
        .collect();

    let report = merge_segments(&WavDecoder, &segments, config.merge_fallback_sample_rate)?;
    for failure in &report.failures {
        println!(
            "Skipped {}: {}",
            files[failure.index].display(),
            failure.error.friendly_message()
        );
    }

    wav::write_wav_file(output, &report.buffer)?;
    println!(
        "Merged {} of {} file(s) into {} ({})",
        report.merged,
        files.len(),
        output.display(),
        format_time(report.buffer.duration_secs())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavedit::engine::buffer::SampleBuffer;
    use tempfile::TempDir;

    fn write_mono(dir: &TempDir, name: &str, samples: Vec<f32>) -> PathBuf {
        let path = dir.path().join(name);
        wav::write_wav_file(&path, &SampleBuffer::mono(samples, 10).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_cut_writes_shorter_file() {
        let dir = TempDir::new().unwrap();
        let input = write_mono(&dir, "in.wav", vec![0.5; 10]);
        let output = dir.path().join("out.wav");

        cut(&input, 0.2, 0.5, &output, &EditorConfig::default()).unwrap();
        assert_eq!(wav::read_wav_file(&output).unwrap().frame_count(), 7);
    }

    #[test]
    fn test_paste_replace_range() {
        let dir = TempDir::new().unwrap();
        let input = write_mono(&dir, "in.wav", vec![0.0; 10]);
        let clip = write_mono(&dir, "clip.wav", vec![0.5; 3]);
        let output = dir.path().join("out.wav");

        let target = PasteTarget::Replace { start: 0.2, end: 0.4 };
        paste(&input, &clip, target, &output, &EditorConfig::default()).unwrap();

        let result = wav::read_wav_file(&output).unwrap();
        assert_eq!(result.frame_count(), 11);
        assert!(result.channel(0)[2..5].iter().all(|s| *s > 0.49));
    }

    #[test]
    fn test_silence_uses_requested_length() {
        let dir = TempDir::new().unwrap();
        let input = write_mono(&dir, "in.wav", vec![0.5; 10]);
        let output = dir.path().join("out.wav");

        silence(&input, 0.5, Some(1.0), &output, &EditorConfig::default()).unwrap();
        let result = wav::read_wav_file(&output).unwrap();
        assert_eq!(result.frame_count(), 20);
        assert_eq!(result.channel(0)[5], 0.0);
    }

    #[test]
    fn test_merge_directory_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        write_mono(&dir, "01.wav", vec![0.5; 4]);
        write_mono(&dir, "02.wav", vec![-0.5; 6]);
        fs::write(dir.path().join("03.wav"), b"broken").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        let output = dir.path().join("merged").with_extension("out");

        merge(&[dir.path().to_path_buf()], &output, &EditorConfig::default()).unwrap();
        let result = wav::read_wav_file(&output).unwrap();
        assert_eq!(result.frame_count(), 10);
        assert!(result.channel(0)[0] > 0.0);
        assert!(result.channel(0)[9] < 0.0);
    }

    #[test]
    fn test_collect_inputs_keeps_explicit_files() {
        let files = collect_inputs(&[PathBuf::from("b.wav"), PathBuf::from("a.wav")]).unwrap();
        assert_eq!(files, vec![PathBuf::from("b.wav"), PathBuf::from("a.wav")]);
    }

    #[test]
    fn test_silence_duration_clamped() {
        let dir = TempDir::new().unwrap();
        let input = write_mono(&dir, "in.wav", vec![0.5; 10]);
        let output = dir.path().join("out.wav");

        silence(&input, 0.0, Some(0.01), &output, &EditorConfig::default()).unwrap();
        // 0.01s is raised to the 0.1s minimum, one frame at 10 Hz
        assert_eq!(wav::read_wav_file(&output).unwrap().frame_count(), 11);
    }
}
