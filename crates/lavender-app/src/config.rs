//! Chat screen configuration.

use std::time::Duration;

use lavender_client::Locale;

/// Settings for a [`ChatDecryptor`](crate::ChatDecryptor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatConfig {
    /// Language of the undecryptable placeholder
    pub locale: Locale,
    /// Upper bound on a single reveal. `None` leaves it to the directory
    /// client's own network timeout.
    pub fetch_timeout: Option<Duration>,
    /// Messages decrypting at once; further submissions are refused
    pub max_in_flight: usize,
}

impl ChatConfig {
    /// Default configuration for `locale`.
    pub fn for_locale(locale: Locale) -> Self {
        Self { locale, ..Self::default() }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { locale: Locale::default(), fetch_timeout: None, max_in_flight: 256 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_rely_on_client_timeout() {
        let config = ChatConfig::default();
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.fetch_timeout, None);
        assert!(config.max_in_flight > 0);
    }

    #[test]
    fn for_locale_keeps_other_defaults() {
        let config = ChatConfig::for_locale(Locale::Fr);
        assert_eq!(config, ChatConfig { locale: Locale::Fr, ..ChatConfig::default() });
    }
}
