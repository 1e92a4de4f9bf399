//! Localized placeholder for messages that cannot be shown.

use serde::{Deserialize, Serialize};

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Spanish
    Es,
    /// French
    Fr,
    /// German
    De,
    /// Portuguese
    Pt,
}

impl Locale {
    /// Parse a BCP 47 language tag such as `es-MX` or `pt_BR`.
    ///
    /// Only the primary language subtag is considered. Unknown languages fall
    /// back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        match primary.as_str() {
            "es" => Self::Es,
            "fr" => Self::Fr,
            "de" => Self::De,
            "pt" => Self::Pt,
            _ => Self::En,
        }
    }

    /// Text shown in place of a message that could not be decrypted.
    ///
    /// The same string is used for every failure cause.
    pub fn undecryptable_placeholder(self) -> &'static str {
        match self {
            Self::En => "Unable to decrypt this message",
            Self::Es => "No se pudo descifrar este mensaje",
            Self::Fr => "Impossible de déchiffrer ce message",
            Self::De => "Diese Nachricht kann nicht entschlüsselt werden",
            Self::Pt => "Não foi possível descriptografar esta mensagem",
        }
    }
}
