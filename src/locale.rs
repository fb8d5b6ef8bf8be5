//! Locales and locale-variant field lookup.
//!
//! Every locale has its own directory of documents. Documents read under the default
//! locale use the primary metadata fields (`title`, `tags`, ...). Documents read under any
//! other locale use the twin fields suffixed with that locale's code (`title_zh`, `tags_zh`, ...).

use std::{fmt, path::Component, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// Locale used when a configuration does not name one
pub const DEFAULT_LOCALE: &str = "en";

/// A locale code, such as `en` or `zh`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

/// Which field of a locale-variant pair an active locale reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldVariant {
    /// The unsuffixed field, read under the default locale
    Primary,
    /// The locale-suffixed twin, read under every other locale
    Twin,
}

/// Error returned when parsing a blank locale code
#[derive(Debug, thiserror::Error)]
#[error("locale code is empty")]
pub struct EmptyLocale;

impl Locale {
    /// Create a locale from its code, trimming surrounding whitespace
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_owned())
    }

    /// Get the locale code
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Key of the twin field for `field` under this locale, e.g. `title_zh`
    #[must_use]
    pub fn twin_key(&self, field: &str) -> String {
        format!("{field}_{}", self.0)
    }

    /// Whether the code can safely name a directory directly under the content root
    #[must_use]
    pub fn is_directory_name(&self) -> bool {
        let mut components = Path::new(&self.0).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && !self.0.starts_with('.')
    }
}

impl FieldVariant {
    /// Variant read by `locale` when `default` is the default locale
    #[must_use]
    pub fn for_locale(locale: &Locale, default: &Locale) -> Self {
        if locale == default {
            Self::Primary
        } else {
            Self::Twin
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LOCALE.to_owned())
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = EmptyLocale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let locale = Self::new(value);
        if locale.0.is_empty() {
            return Err(EmptyLocale);
        }
        Ok(locale)
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
