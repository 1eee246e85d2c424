use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::{
    formats::SubtitleFormat,
    language::{Language, LanguageDescriptor, LanguageRegistry, RomanizationMethod},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub llm: LlmCfg,
    pub translation: TranslationCfg,
    pub formats: Formats,
    pub output: OutputCfg,
}

impl Config {
    pub fn load(path_opt: Option<&Path>) -> Result<Self> {
        let default_path = Path::new("config.toml");
        let path = if let Some(p) = path_opt {
            Some(p)
        } else if default_path.exists() {
            Some(default_path)
        } else {
            None
        };

        let Some(path) = path else {
            return Ok(Config::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading config file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed serializing config as TOML")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub format: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// OpenAI-compatible endpoint used for every translation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmCfg {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmCfg {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.2,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationCfg {
    pub targets: Vec<TargetCfg>,
}

impl Default for TranslationCfg {
    fn default() -> Self {
        Self {
            targets: [
                Language::English,
                Language::Spanish,
                Language::ChineseMandarinSimplified,
                Language::ArabicLevantine,
            ]
            .into_iter()
            .map(|language| TargetCfg {
                language,
                romanization: None,
            })
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetCfg {
    pub language: Language,
    /// Replaces the language's default romanization method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanization: Option<RomanizationMethod>,
}

impl TranslationCfg {
    /// Built-in registry with the configured romanization overrides applied.
    pub fn registry(&self) -> LanguageRegistry {
        self.targets
            .iter()
            .filter_map(|t| t.romanization.map(|r| (t.language, r)))
            .fold(LanguageRegistry::builtin(), |reg, (language, method)| {
                reg.with_romanization(language, method)
            })
    }

    /// Descriptors of the languages to translate into, in order and without
    /// repeats. A non-empty `only` replaces the configured list.
    pub fn descriptors(&self, only: &[Language]) -> Vec<LanguageDescriptor> {
        let registry = self.registry();
        let languages: Vec<Language> = if only.is_empty() {
            self.targets.iter().map(|t| t.language).collect()
        } else {
            only.to_vec()
        };
        let mut seen = Vec::with_capacity(languages.len());
        for language in languages {
            if !seen.contains(&language) {
                seen.push(language);
            }
        }
        seen.into_iter()
            .map(|l| {
                registry
                    .get(l)
                    .cloned()
                    .unwrap_or_else(|| LanguageDescriptor::builtin(l))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
    pub srt: SrtCfg,
    pub vtt: VttCfg,
    pub markdown: MarkdownCfg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SrtCfg {
    /// Move a cue starting at exactly zero to 10ms.
    pub nudge_zero_start: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_width: Option<usize>,
}

impl Default for SrtCfg {
    fn default() -> Self {
        Self {
            nudge_zero_start: true,
            wrap_width: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VttCfg {
    pub add_header: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_settings: Option<String>,
    /// `lr` or `rl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_text: Option<String>,
    pub enable_positioning: bool,
    /// Percentage or `auto`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_position: Option<String>,
    pub text_align: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_limit: Option<usize>,
}

impl Default for VttCfg {
    fn default() -> Self {
        Self {
            add_header: true,
            description: Some("subtrans generated captions".to_string()),
            region_settings: None,
            vertical_text: None,
            enable_positioning: false,
            line_position: None,
            text_align: "center".to_string(),
            wrap_limit: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownCfg {
    pub title: String,
}

impl Default for MarkdownCfg {
    fn default() -> Self {
        Self {
            title: "Transcript".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputCfg {
    pub formats: Vec<SubtitleFormat>,
    pub overwrite: bool,
}

impl Default for OutputCfg {
    fn default() -> Self {
        Self {
            formats: vec![SubtitleFormat::Srt, SubtitleFormat::Vtt, SubtitleFormat::Md],
            overwrite: false,
        }
    }
}

pub fn init_tracing(logging: &Logging, cli_override_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = cli_override_level.unwrap_or(logging.level.as_str());
    let filter = match cli_override_level {
        Some(l) => EnvFilter::try_new(l).with_context(|| format!("invalid log level: {l}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
    };

    if logging.format.eq_ignore_ascii_case("json") {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .event_format(fmt::format().json().with_span_list(true))
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .pretty()
            .init();
    }

    tracing::debug!(
        level = level,
        format = logging.format.as_str(),
        "logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = Config::default();
        let text = cfg.to_toml_pretty().unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.translation.targets.len(), cfg.translation.targets.len());
        assert_eq!(back.output.formats, cfg.output.formats);
        assert_eq!(back.formats.vtt.text_align, "center");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [llm]
            model = "local-model"

            [[translation.targets]]
            language = "arabic_levantine"
            romanization = "din_31635"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.llm.model, "local-model");
        assert_eq!(cfg.llm.api_key_env, "OPENAI_API_KEY");
        let targets = cfg.translation.descriptors(&[]);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].romanization, RomanizationMethod::Din31635);
    }

    #[test]
    fn cli_languages_replace_configured_targets_without_repeats() {
        let cfg = TranslationCfg::default();
        let targets = cfg.descriptors(&[Language::French, Language::Japanese, Language::French]);
        let languages: Vec<Language> = targets.iter().map(|d| d.language).collect();
        assert_eq!(languages, vec![Language::French, Language::Japanese]);
    }

    #[test]
    fn load_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subtrans.toml");
        fs::write(&path, "[output]\noverwrite = true\nformats = [\"srt\"]\n").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert!(cfg.output.overwrite);
        assert_eq!(cfg.output.formats, vec![SubtitleFormat::Srt]);
    }
}
