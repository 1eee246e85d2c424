//! Supported target languages and their descriptors.
//!
//! Languages form a closed set; everything language-specific (ISO code,
//! romanization, background notes, word splitting) is looked up by the
//! [`Language`] variant rather than by matching on names.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, text::strip_punctuation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Spanish,
    French,
    ChineseMandarinSimplified,
    ArabicLevantine,
    Japanese,
    Russian,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::ChineseMandarinSimplified,
        Language::ArabicLevantine,
        Language::Japanese,
        Language::Russian,
    ];

    pub fn iso_code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::ChineseMandarinSimplified => "zh",
            Language::ArabicLevantine => "ar",
            Language::Japanese => "ja",
            Language::Russian => "ru",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "ENGLISH",
            Language::Spanish => "SPANISH",
            Language::French => "FRENCH",
            Language::ChineseMandarinSimplified => "CHINESE_MANDARIN_SIMPLIFIED",
            Language::ArabicLevantine => "ARABIC_LEVANTINE",
            Language::Japanese => "JAPANESE",
            Language::Russian => "RUSSIAN",
        }
    }

    pub fn default_romanization(self) -> RomanizationMethod {
        match self {
            Language::English | Language::Spanish | Language::French => RomanizationMethod::None,
            Language::ChineseMandarinSimplified => RomanizationMethod::Pinyin,
            Language::ArabicLevantine => RomanizationMethod::AlaLc,
            Language::Japanese => RomanizationMethod::Hepburn,
            Language::Russian => RomanizationMethod::Iso9,
        }
    }

    /// Scripts written without spaces between words.
    pub fn is_unspaced(self) -> bool {
        matches!(
            self,
            Language::ChineseMandarinSimplified | Language::Japanese
        )
    }

    /// Splits translated text into the word list used for alignment.
    ///
    /// Unspaced scripts are split per character; everything else on
    /// whitespace. Punctuation is stripped and empty tokens dropped.
    pub fn split_words(self, text: &str) -> Vec<String> {
        if self.is_unspaced() {
            text.chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| strip_punctuation(&c.to_string()))
                .filter(|w| !w.is_empty())
                .collect()
        } else {
            text.split_whitespace()
                .map(strip_punctuation)
                .filter(|w| !w.is_empty())
                .collect()
        }
    }

    fn background(self) -> LanguageBackground {
        let (family, alphabet, sample) = match self {
            Language::English => (
                &["Indo-European", "Germanic", "West Germanic", "Anglo-Frisian"][..],
                "Latin alphabet (26 letters)",
                "The quick brown fox jumps over the lazy dog.",
            ),
            Language::Spanish => (
                &["Indo-European", "Italic", "Romance", "Ibero-Romance"][..],
                "Latin alphabet (27 letters, including ñ)",
                "El veloz murciélago hindú comía feliz cardillo y kiwi.",
            ),
            Language::French => (
                &["Indo-European", "Italic", "Romance", "Gallo-Romance"][..],
                "Latin alphabet with diacritics (é, è, ê, ç, …)",
                "Portez ce vieux whisky au juge blond qui fume.",
            ),
            Language::ChineseMandarinSimplified => (
                &["Sino-Tibetan", "Sinitic", "Mandarin"][..],
                "Simplified Chinese characters (logographic)",
                "敏捷的棕色狐狸跳过了懒狗。",
            ),
            Language::ArabicLevantine => (
                &["Afro-Asiatic", "Semitic", "Central Semitic", "Arabic", "Levantine"][..],
                "Arabic abjad, written right to left",
                "كيفك؟ شو الأخبار؟",
            ),
            Language::Japanese => (
                &["Japonic"][..],
                "Kanji with hiragana and katakana syllabaries",
                "いろはにほへと ちりぬるを",
            ),
            Language::Russian => (
                &["Indo-European", "Balto-Slavic", "Slavic", "East Slavic"][..],
                "Cyrillic alphabet (33 letters)",
                "Съешь же ещё этих мягких французских булок.",
            ),
        };
        LanguageBackground {
            family_tree: family.iter().map(|s| s.to_string()).collect(),
            alphabet: alphabet.to_string(),
            sample_text: sample.to_string(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    /// Accepts the ISO code, the snake-case identifier, or the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace([' ', '-'], "_");
        Language::ALL
            .into_iter()
            .find(|l| {
                needle == l.iso_code()
                    || needle == l.name().to_lowercase()
                    || plain_name(*l) == needle
            })
            .ok_or_else(|| ValidationError::UnknownLanguage(s.to_string()))
    }
}

/// Short names transcription engines tend to report ("english", "chinese").
fn plain_name(language: Language) -> &'static str {
    match language {
        Language::English => "english",
        Language::Spanish => "spanish",
        Language::French => "french",
        Language::ChineseMandarinSimplified => "chinese",
        Language::ArabicLevantine => "arabic",
        Language::Japanese => "japanese",
        Language::Russian => "russian",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RomanizationMethod {
    None,
    Pinyin,
    AlaLc,
    #[serde(rename = "din_31635")]
    Din31635,
    Hepburn,
    #[serde(rename = "iso_9")]
    Iso9,
    Ipa,
}

impl RomanizationMethod {
    pub fn is_none(self) -> bool {
        self == RomanizationMethod::None
    }

    pub fn id(self) -> &'static str {
        match self {
            RomanizationMethod::None => "none",
            RomanizationMethod::Pinyin => "pinyin",
            RomanizationMethod::AlaLc => "ala_lc",
            RomanizationMethod::Din31635 => "din_31635",
            RomanizationMethod::Hepburn => "hepburn",
            RomanizationMethod::Iso9 => "iso_9",
            RomanizationMethod::Ipa => "ipa",
        }
    }

    pub fn instructions(self) -> &'static str {
        match self {
            RomanizationMethod::None => {
                "NONE - Do not apply any romanization method. Retain the original script."
            }
            RomanizationMethod::Pinyin => {
                "PINYIN - Convert Simplified Chinese to Pinyin with tone marks, one syllable group per word."
            }
            RomanizationMethod::AlaLc => {
                "ALA-LC - Use the ALA-LC romanization for Arabic with full UTF-8 diacritics."
            }
            RomanizationMethod::Din31635 => {
                "DIN-31635 - Apply the DIN 31635 standard for Arabic with full UTF-8 diacritics."
            }
            RomanizationMethod::Hepburn => {
                "HEPBURN - Romanize Japanese using modified Hepburn with macrons for long vowels."
            }
            RomanizationMethod::Iso9 => {
                "ISO 9 - Transliterate Cyrillic using ISO 9 (one Latin letter per Cyrillic letter)."
            }
            RomanizationMethod::Ipa => {
                "IPA - Transcribe the text in the International Phonetic Alphabet."
            }
        }
    }
}

impl fmt::Display for RomanizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RomanizationMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace(['-', ' '], "_");
        let method = match needle.as_str() {
            "none" | "" => RomanizationMethod::None,
            "pinyin" => RomanizationMethod::Pinyin,
            "ala_lc" => RomanizationMethod::AlaLc,
            "din_31635" | "din31635" => RomanizationMethod::Din31635,
            "hepburn" => RomanizationMethod::Hepburn,
            "iso_9" | "iso9" => RomanizationMethod::Iso9,
            "ipa" => RomanizationMethod::Ipa,
            _ => return Err(ValidationError::UnknownRomanization(s.to_string())),
        };
        Ok(method)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageBackground {
    pub family_tree: Vec<String>,
    pub alphabet: String,
    pub sample_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    pub language: Language,
    pub name: String,
    pub iso_code: String,
    pub romanization: RomanizationMethod,
    pub background: LanguageBackground,
}

impl LanguageDescriptor {
    pub fn builtin(language: Language) -> Self {
        Self {
            language,
            name: language.name().to_string(),
            iso_code: language.iso_code().to_string(),
            romanization: language.default_romanization(),
            background: language.background(),
        }
    }

    /// Plain-text block describing the language, embedded into prompts.
    pub fn prompt_block(&self) -> String {
        format!(
            "language_name: {}\nlanguage_code: {}\nromanization_method: {}\nfamily_tree: {}\nalphabet: {}\nsample_text: {}",
            self.name,
            self.iso_code,
            self.romanization.instructions(),
            self.background.family_tree.join(" > "),
            self.background.alphabet,
            self.background.sample_text,
        )
    }
}

/// Lookup table of descriptors keyed by [`Language`].
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    descriptors: BTreeMap<Language, LanguageDescriptor>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageRegistry {
    pub fn builtin() -> Self {
        let descriptors = Language::ALL
            .into_iter()
            .map(|l| (l, LanguageDescriptor::builtin(l)))
            .collect();
        Self { descriptors }
    }

    pub fn with_romanization(mut self, language: Language, method: RomanizationMethod) -> Self {
        self.descriptors
            .entry(language)
            .or_insert_with(|| LanguageDescriptor::builtin(language))
            .romanization = method;
        self
    }

    pub fn get(&self, language: Language) -> Option<&LanguageDescriptor> {
        self.descriptors.get(&language)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageDescriptor> {
        self.descriptors.values()
    }
}
