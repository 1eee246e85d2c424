use anyhow::{Context, Result, anyhow};
use serde_json::json;
use std::{fs, io::Read, path::Path, sync::Arc};
use tracing::{Instrument, debug, info, info_span};

use subtrans::{
    config::Config,
    formats::{self, SubtitleFormat, time::parse_time_to_ms},
    llm::OpenAiClient,
    model::Transcript,
    output::{self, OutputFile},
    resolve::resolve,
    source,
    translate::Orchestrator,
};

use crate::cli::{OutputArgs, ResolveCmd, SubtitlesCmd, TranslateCmd};

pub async fn run_translate(cmd: TranslateCmd, cfg: &Config) -> Result<()> {
    let span = info_span!("translate", input = cmd.input.as_str());
    async move {
        let targets = cfg.translation.descriptors(&cmd.languages);
        if targets.is_empty() {
            return Err(anyhow!("no target languages configured"));
        }
        info!(
            targets = ?targets.iter().map(|d| d.iso_code.as_str()).collect::<Vec<_>>(),
            "target languages"
        );

        let raw = read_input_to_string(&cmd.input)?;
        info!(bytes = raw.len(), "read input");

        let transcript = source::load_transcript(&raw, &targets)
            .with_context(|| format!("failed reading transcription: {}", cmd.input))?;
        log_transcript_summary(&transcript);
        if !cmd.no_subtitles {
            formats::check_timing(&transcript)
                .context("segments cannot be rendered as subtitles")?;
        }

        let client = OpenAiClient::from_config(&cfg.llm).context("failed creating LLM client")?;
        let orchestrator = Orchestrator::new(Arc::new(client), cfg.translation.registry());
        let aligned = orchestrator
            .run(transcript)
            .await
            .context("translation pipeline failed")?;

        let (dir, stem) = output::output_location(&cmd.input, cmd.output.out_dir.as_deref())?;
        let mut files = vec![output::transcript_file(&dir, &stem, &aligned)?];
        if !cmd.no_subtitles {
            files.extend(render_files(&aligned, &cmd.output, cfg, &dir, &stem)?);
        }
        output::write_all(&files, cmd.output.overwrite || cfg.output.overwrite)?;
        info!(files = files.len(), "done");
        Ok(())
    }
    .instrument(span)
    .await
}

pub fn run_subtitles(cmd: SubtitlesCmd, cfg: &Config) -> Result<()> {
    let span = info_span!("subtitles", input = cmd.input.as_str());
    let _g = span.enter();

    let raw = read_input_to_string(&cmd.input)?;
    let transcript = output::read_subtitle_input(&raw)
        .with_context(|| format!("failed reading transcript: {}", cmd.input))?;
    log_transcript_summary(&transcript);

    let (dir, stem) = output::output_location(&cmd.input, cmd.output.out_dir.as_deref())?;
    let files = render_files(&transcript, &cmd.output, cfg, &dir, &stem)?;
    output::write_all(&files, cmd.output.overwrite || cfg.output.overwrite)?;
    info!(files = files.len(), "done");
    Ok(())
}

pub fn run_resolve(cmd: ResolveCmd) -> Result<()> {
    let span = info_span!("resolve", input = cmd.input.as_str(), at = cmd.at.as_str());
    let _g = span.enter();

    let raw = read_input_to_string(&cmd.input)?;
    let transcript = output::parse_transcript_json(&raw)?;
    let at = parse_time_to_ms(&cmd.at)? as f64 / 1000.0;

    let active = resolve(&transcript, at).ok_or_else(|| anyhow!("transcript has no segments"))?;

    if cmd.json {
        let value = json!({
            "time": at,
            "segment_index": active.segment_index,
            "segment": {
                "start": active.segment.start,
                "end": active.segment.end,
                "text": active.segment.text,
            },
            "word": active.word,
            "matched_words": active.matched_words
                .iter()
                .map(|(l, m)| (l.iso_code().to_string(), json!(m)))
                .collect::<serde_json::Map<String, serde_json::Value>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let seg = active.segment;
    println!(
        "segment {} [{:.3}s - {:.3}s]: {}",
        active.segment_index, seg.start, seg.end, seg.text
    );
    match active.word {
        Some(w) => println!("word {}: {} [{:.3}s - {:.3}s]", w.index_in_segment, w.text, w.start, w.end),
        None => println!("word: -"),
    }
    for (language, m) in &active.matched_words {
        match &m.romanized {
            Some(r) => println!("{}: {} ({r})", language.iso_code(), m.translated_word_text),
            None => println!("{}: {}", language.iso_code(), m.translated_word_text),
        }
    }
    Ok(())
}

pub fn run_languages(cfg: &Config) -> Result<()> {
    for d in cfg.translation.registry().iter() {
        println!("{}\t{}\t{}", d.iso_code, d.name, d.romanization);
    }
    Ok(())
}

fn render_files(
    transcript: &Transcript,
    out: &OutputArgs,
    cfg: &Config,
    dir: &Path,
    stem: &str,
) -> Result<Vec<OutputFile>> {
    let formats: &[SubtitleFormat] = if out.formats.is_empty() {
        &cfg.output.formats
    } else {
        &out.formats
    };
    let artifacts = formats::synthesize(transcript, formats, &cfg.formats)
        .context("subtitle validation failed")?;
    Ok(output::subtitle_files(dir, stem, artifacts))
}

fn read_input_to_string(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed reading stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed reading input: {input}"))
    }
}

fn log_transcript_summary(t: &Transcript) {
    info!(
        segments = t.segments.len(),
        words = t.word_count(),
        duration_s = t.duration(),
        language = t.original_language.as_str(),
        translated = t.is_translated(),
        "transcript summary"
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        for (i, s) in t.segments.iter().take(20).enumerate() {
            debug!(
                idx = i,
                start = s.start,
                end = s.end,
                words = s.words.len(),
                chars = s.text.chars().count(),
                "segment sample"
            );
        }
    }
}
