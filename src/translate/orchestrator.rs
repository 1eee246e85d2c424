//! Runs the full-text, segment and word-alignment stages in order.
//!
//! Each stage builds all of its units up front, dispatches them together
//! and waits for every one to settle. Results are written into the
//! transcript only after the whole stage succeeded, so a failed run never
//! hands back a half-translated transcript.

use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use tracing::{Instrument, debug, info, info_span};

use crate::{
    error::PipelineError,
    language::{Language, LanguageDescriptor, LanguageRegistry},
    llm::{MatchedSegmentResponse, ResponseSchema, StructuredRequester, TranslatedTextResponse},
    model::{MatchedSegment, Segment, TranslatedText, Transcript, Translation},
    translate::{
        LanguageAddress, SegmentAddress, Stage,
        dispatch::{Dispatcher, TaskUnit, settle},
        matching::align_segment,
        prompts,
    },
};

type Targets = BTreeMap<Language, LanguageDescriptor>;

pub struct Orchestrator {
    dispatcher: Dispatcher,
    registry: LanguageRegistry,
    translated_text: Arc<ResponseSchema>,
    matched_segment: Arc<ResponseSchema>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn StructuredRequester>, registry: LanguageRegistry) -> Self {
        Self {
            dispatcher: Dispatcher::new(client),
            registry,
            translated_text: Arc::new(ResponseSchema::of::<TranslatedTextResponse>(
                "translated_text",
            )),
            matched_segment: Arc::new(ResponseSchema::of::<MatchedSegmentResponse>(
                "matched_segment",
            )),
        }
    }

    /// Translates and aligns `transcript` into every language it has a
    /// pending slot for.
    pub async fn run(&self, mut transcript: Transcript) -> Result<Transcript, PipelineError> {
        let targets = self.targets(&transcript);
        if targets.is_empty() {
            info!("no target languages, nothing to translate");
            return Ok(transcript);
        }
        info!(
            languages = targets.len(),
            segments = transcript.segments.len(),
            words = transcript.word_count(),
            "starting translation"
        );

        self.full_text_stage(&mut transcript, &targets)
            .instrument(info_span!("stage", stage = %Stage::FullText))
            .await?;
        self.segment_stage(&mut transcript, &targets)
            .instrument(info_span!("stage", stage = %Stage::Segment))
            .await?;
        self.word_alignment_stage(&mut transcript, &targets)
            .instrument(info_span!("stage", stage = %Stage::WordAlignment))
            .await?;

        info!("translation complete");
        Ok(transcript)
    }

    /// Descriptors for the transcript's target languages, carrying the
    /// romanization method recorded in each slot.
    fn targets(&self, transcript: &Transcript) -> Targets {
        transcript
            .translations
            .iter()
            .map(|(language, slot)| {
                let mut descriptor = self
                    .registry
                    .get(*language)
                    .cloned()
                    .unwrap_or_else(|| LanguageDescriptor::builtin(*language));
                descriptor.romanization = slot.romanization();
                (*language, descriptor)
            })
            .collect()
    }

    async fn full_text_stage(
        &self,
        transcript: &mut Transcript,
        targets: &Targets,
    ) -> Result<(), PipelineError> {
        let units: Vec<TaskUnit<LanguageAddress>> = targets
            .values()
            .map(|d| TaskUnit {
                address: LanguageAddress {
                    language: d.language,
                },
                system_prompt: prompts::full_text_prompt(
                    &transcript.original_language,
                    &transcript.text,
                    d,
                ),
                schema: Arc::clone(&self.translated_text),
            })
            .collect();
        let expected = units.len();
        info!(units = expected, "dispatching");

        let outcomes = self
            .dispatcher
            .dispatch::<_, TranslatedTextResponse>(units)
            .await;
        let values = settle(Stage::FullText, outcomes, expected)?;

        for (address, response) in values {
            let d = descriptor(targets, Stage::FullText, address.language, &address)?;
            let text = TranslatedText::new(
                d.language,
                d.romanization,
                &response.translated_text,
                response.romanized_text.as_deref(),
            );
            debug!(%address, chars = text.text.chars().count(), "full text translated");
            transcript
                .translations
                .insert(address.language, Translation::Resolved(text));
        }
        Ok(())
    }

    async fn segment_stage(
        &self,
        transcript: &mut Transcript,
        targets: &Targets,
    ) -> Result<(), PipelineError> {
        let total = transcript.segments.len();
        let mut units: Vec<TaskUnit<SegmentAddress>> = Vec::with_capacity(total * targets.len());
        for d in targets.values() {
            let full = transcript
                .translations
                .get(&d.language)
                .and_then(Translation::resolved)
                .ok_or_else(|| PipelineError::Precondition {
                    stage: Stage::Segment,
                    address: d.language.iso_code().to_string(),
                    reason: "full-text translation is still pending".to_string(),
                })?;
            for (index, segment) in transcript.segments.iter().enumerate() {
                units.push(TaskUnit {
                    address: SegmentAddress {
                        language: d.language,
                        segment_index: index,
                    },
                    system_prompt: prompts::segment_prompt(
                        &transcript.original_language,
                        &transcript.text,
                        full,
                        segment,
                        index,
                        total,
                        d,
                    ),
                    schema: Arc::clone(&self.translated_text),
                });
            }
        }
        let expected = units.len();
        info!(units = expected, "dispatching");

        let outcomes = self
            .dispatcher
            .dispatch::<_, TranslatedTextResponse>(units)
            .await;
        let values = settle(Stage::Segment, outcomes, expected)?;

        for (address, response) in values {
            let d = descriptor(targets, Stage::Segment, address.language, &address)?;
            let segment = segment_mut(transcript, Stage::Segment, &address)?;
            let text = TranslatedText::new(
                d.language,
                d.romanization,
                &response.translated_text,
                response.romanized_text.as_deref(),
            );
            segment
                .translations
                .insert(address.language, Translation::Resolved(text));
        }
        Ok(())
    }

    async fn word_alignment_stage(
        &self,
        transcript: &mut Transcript,
        targets: &Targets,
    ) -> Result<(), PipelineError> {
        let mut units: Vec<TaskUnit<SegmentAddress>> = Vec::new();
        let mut wordless: Vec<SegmentAddress> = Vec::new();
        for d in targets.values() {
            for (index, segment) in transcript.segments.iter().enumerate() {
                let address = SegmentAddress {
                    language: d.language,
                    segment_index: index,
                };
                let translation =
                    segment
                        .translated(d.language)
                        .ok_or_else(|| PipelineError::Precondition {
                            stage: Stage::WordAlignment,
                            address: address.to_string(),
                            reason: "segment translation is still pending".to_string(),
                        })?;
                if segment.words.is_empty() {
                    wordless.push(address);
                    continue;
                }
                let translated_words = translation.word_list();
                let romanized_words = if d.romanization.is_none() {
                    None
                } else {
                    translation.romanized_word_list()
                };
                units.push(TaskUnit {
                    address,
                    system_prompt: prompts::word_alignment_prompt(
                        segment,
                        translation,
                        &translated_words,
                        romanized_words.as_deref(),
                        d,
                    ),
                    schema: Arc::clone(&self.matched_segment),
                });
            }
        }
        let expected = units.len();
        info!(
            units = expected,
            skipped = wordless.len(),
            "dispatching"
        );

        let outcomes = self
            .dispatcher
            .dispatch::<_, MatchedSegmentResponse>(units)
            .await;
        let values = settle(Stage::WordAlignment, outcomes, expected)?;

        for (address, response) in values {
            let segment = segment_mut(transcript, Stage::WordAlignment, &address)?;
            let translation = segment.translated(address.language).ok_or_else(|| {
                PipelineError::Precondition {
                    stage: Stage::WordAlignment,
                    address: address.to_string(),
                    reason: "segment translation is still pending".to_string(),
                }
            })?;
            let aligned = align_segment(segment, translation, response);
            segment.alignments.insert(address.language, aligned);
        }
        for address in wordless {
            let segment = segment_mut(transcript, Stage::WordAlignment, &address)?;
            segment
                .alignments
                .insert(address.language, MatchedSegment::empty(address.language));
        }
        Ok(())
    }
}

fn descriptor<'a>(
    targets: &'a Targets,
    stage: Stage,
    language: Language,
    address: &impl Display,
) -> Result<&'a LanguageDescriptor, PipelineError> {
    targets
        .get(&language)
        .ok_or_else(|| PipelineError::Precondition {
            stage,
            address: address.to_string(),
            reason: "result for a language that was not requested".to_string(),
        })
}

fn segment_mut<'a>(
    transcript: &'a mut Transcript,
    stage: Stage,
    address: &SegmentAddress,
) -> Result<&'a mut Segment, PipelineError> {
    transcript
        .segments
        .get_mut(address.segment_index)
        .ok_or_else(|| PipelineError::Precondition {
            stage,
            address: address.to_string(),
            reason: "segment does not exist".to_string(),
        })
}
