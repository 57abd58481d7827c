//! Working-language handling for content and language-scoped settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not a valid language code")]
pub struct LanguageError(String);

/// A lowercase language code such as `en`, `nl` or `zh-cn`.
///
/// The working language scopes categories, meta slugs and the
/// language-suffixed settings keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct Language(String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Suffix a settings key with this language (`rss_title` → `rss_title_nl`).
    pub fn suffix_key(&self, key: &str) -> String {
        format!("{key}_{}", self.0)
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim();
        let valid_shape = (2..=8).contains(&code.len())
            && code
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch == '-')
            && !code.starts_with('-')
            && !code.ends_with('-');
        if valid_shape {
            Ok(Language(code.to_string()))
        } else {
            Err(LanguageError(value.to_string()))
        }
    }
}

impl TryFrom<String> for Language {
    type Error = LanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_regioned_codes() {
        assert_eq!("en".parse::<Language>().unwrap().as_str(), "en");
        assert_eq!("zh-cn".parse::<Language>().unwrap().as_str(), "zh-cn");
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!("".parse::<Language>().is_err());
        assert!("EN".parse::<Language>().is_err());
        assert!("e".parse::<Language>().is_err());
        assert!("-en".parse::<Language>().is_err());
        assert!("en_US".parse::<Language>().is_err());
    }

    #[test]
    fn suffixes_settings_keys() {
        let language: Language = "nl".parse().unwrap();
        assert_eq!(language.suffix_key("rss_title"), "rss_title_nl");
    }
}
