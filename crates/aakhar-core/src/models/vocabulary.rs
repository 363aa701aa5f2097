use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder used in datasets and on cards for a missing translation.
pub const NOT_AVAILABLE: &str = "N/A";

/// Languages carried by a vocabulary entry besides English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Hindi,
    Garhwali,
    Kumaoni,
    Jaunsari,
}

impl Language {
    /// Translation rows shown on a flashcard after English, in order.
    pub const ALL: [Language; 4] = [
        Language::Hindi,
        Language::Garhwali,
        Language::Kumaoni,
        Language::Jaunsari,
    ];

    /// Languages a quiz can test.
    pub const QUIZ_TARGETS: [Language; 3] =
        [Language::Garhwali, Language::Kumaoni, Language::Jaunsari];

    pub fn name(&self) -> &'static str {
        match self {
            Language::Hindi => "Hindi",
            Language::Garhwali => "Garhwali",
            Language::Kumaoni => "Kumaoni",
            Language::Jaunsari => "Jaunsari",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown language: {0}")]
pub struct LanguageParseError(pub String);

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LanguageParseError(s.to_string()))
    }
}

/// Extra leading row on special decks (numbers, alphabet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation<'a> {
    Number(&'a str),
    Letter(&'a str),
}

impl Annotation<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Annotation::Number(_) => "Number",
            Annotation::Letter(_) => "Letter",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Annotation::Number(v) | Annotation::Letter(v) => v,
        }
    }
}

/// One row of a category dataset (`assets/data/{id}.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    #[serde(rename = "English")]
    pub english: String,
    #[serde(rename = "Hindi", default, deserialize_with = "deserialize_text", skip_serializing_if = "Option::is_none")]
    pub hindi: Option<String>,
    #[serde(rename = "Garhwali", default, deserialize_with = "deserialize_text", skip_serializing_if = "Option::is_none")]
    pub garhwali: Option<String>,
    #[serde(rename = "Kumaoni", default, deserialize_with = "deserialize_text", skip_serializing_if = "Option::is_none")]
    pub kumaoni: Option<String>,
    #[serde(rename = "Jaunsari", default, deserialize_with = "deserialize_text", skip_serializing_if = "Option::is_none")]
    pub jaunsari: Option<String>,
    #[serde(rename = "Number", default, deserialize_with = "deserialize_text", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "Letter", default, deserialize_with = "deserialize_text", skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
}

impl VocabularyEntry {
    pub fn new(english: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            hindi: None,
            garhwali: None,
            kumaoni: None,
            jaunsari: None,
            number: None,
            letter: None,
        }
    }

    /// Builder-style setter, mostly for fixtures.
    pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
        let slot = match language {
            Language::Hindi => &mut self.hindi,
            Language::Garhwali => &mut self.garhwali,
            Language::Kumaoni => &mut self.kumaoni,
            Language::Jaunsari => &mut self.jaunsari,
        };
        *slot = Some(text.into());
        self
    }

    /// Raw translation as stored, which may be the literal "N/A".
    pub fn translation(&self, language: Language) -> Option<&str> {
        match language {
            Language::Hindi => self.hindi.as_deref(),
            Language::Garhwali => self.garhwali.as_deref(),
            Language::Kumaoni => self.kumaoni.as_deref(),
            Language::Jaunsari => self.jaunsari.as_deref(),
        }
    }

    /// Translation usable as a quiz answer: present, non-empty and not "N/A".
    pub fn answer_for(&self, language: Language) -> Option<&str> {
        self.translation(language)
            .filter(|t| !t.trim().is_empty() && *t != NOT_AVAILABLE)
    }

    /// Text for a card row, falling back to "N/A".
    pub fn display_text(&self, language: Language) -> &str {
        self.translation(language).unwrap_or(NOT_AVAILABLE)
    }

    /// `Number` wins over `Letter`; datasets never carry both.
    pub fn annotation(&self) -> Option<Annotation<'_>> {
        if let Some(ref number) = self.number {
            Some(Annotation::Number(number))
        } else {
            self.letter.as_deref().map(Annotation::Letter)
        }
    }
}

/// Spreadsheet exports sometimes emit numbers (e.g. `"Number": 3`) and blanks
/// as `""` or `null`. Blanks become `None`, numbers become their string form.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct TextVisitor;

    impl<'de> de::Visitor<'de> for TextVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or null")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            if v.trim().is_empty() {
                Ok(None)
            } else {
                Ok(Some(v.to_string()))
            }
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}
