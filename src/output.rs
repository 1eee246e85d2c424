//! Writes the aligned transcript and rendered subtitles to disk.
//!
//! Every target path is checked before the first byte is written, so a
//! refused overwrite leaves the output directory untouched.

use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{formats::SubtitleArtifact, model::Transcript, source};

/// One file to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Output directory and file-name stem derived from an input path.
/// Stdin has neither, so the caller must name an output directory.
pub fn output_location(input: &str, out_dir: Option<&Path>) -> Result<(PathBuf, String)> {
    if input == "-" {
        let dir = out_dir.ok_or_else(|| {
            anyhow!("output directory required when input is stdin (pass --out-dir)")
        })?;
        return Ok((dir.to_path_buf(), "stdin".to_string()));
    }

    let p = Path::new(input);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("bad input filename: {input}"))?;
    // Reading an aligned transcript back must not produce `x_translation_translation.json`.
    let stem = stem.strip_suffix("_translation").unwrap_or(stem);

    let dir = match out_dir {
        Some(d) => d.to_path_buf(),
        None => p.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
    };
    Ok((dir, stem.to_string()))
}

pub fn transcript_json(t: &Transcript) -> Result<String> {
    serde_json::to_string_pretty(t).context("failed serializing transcript as JSON")
}

/// Reads an aligned transcript written by [`transcript_json`].
pub fn parse_transcript_json(raw: &str) -> Result<Transcript> {
    let t: Transcript = serde_json::from_str(raw).context("not an aligned transcript")?;
    t.validate().context("aligned transcript failed validation")?;
    Ok(t)
}

/// Reads subtitle input: an aligned transcript, or else a raw
/// transcription. Only input that does not have the aligned shape falls
/// back; an aligned transcript that fails validation is an error.
pub fn read_subtitle_input(raw: &str) -> Result<Transcript> {
    match serde_json::from_str::<Transcript>(raw) {
        Ok(t) => {
            t.validate().context("aligned transcript failed validation")?;
            Ok(t)
        }
        Err(e) => {
            debug!(error = %e, "not an aligned transcript; reading as transcription");
            source::load_transcript(raw, &[]).context("failed reading transcription")
        }
    }
}

pub fn transcript_file(dir: &Path, stem: &str, t: &Transcript) -> Result<OutputFile> {
    Ok(OutputFile {
        path: dir.join(format!("{stem}_translation.json")),
        contents: transcript_json(t)?,
    })
}

pub fn subtitle_files(dir: &Path, stem: &str, artifacts: Vec<SubtitleArtifact>) -> Vec<OutputFile> {
    artifacts
        .into_iter()
        .map(|a| OutputFile {
            path: dir.join(a.file_name(stem)),
            contents: a.content,
        })
        .collect()
}

/// Writes every file, or none of them if any would overwrite an existing
/// file without `overwrite`.
pub fn write_all(files: &[OutputFile], overwrite: bool) -> Result<()> {
    if !overwrite {
        if let Some(existing) = files.iter().find(|f| f.path.exists()) {
            return Err(anyhow!(
                "refusing to overwrite existing file (pass --overwrite): {}",
                existing.path.display()
            ));
        }
    }

    for f in files {
        if let Some(parent) = f.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory: {}", parent.display()))?;
        }
        fs::write(&f.path, &f.contents)
            .with_context(|| format!("failed writing {}", f.path.display()))?;
        info!(path = %f.path.display(), bytes = f.contents.len(), "wrote output file");
    }
    Ok(())
}
