//! Device settings consulted by the signing flows

use serde::{Deserialize, Serialize};

/// Default maximum navigation history depth
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// Device settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show the "dangerous operation" warning before hash signing
    pub dire_warnings: bool,

    /// Whether a BIP-39 passphrase may (or must) be added to a key source
    pub passphrase: PassphrasePolicy,

    /// Maximum navigation history depth
    pub max_history: usize,

    /// Density of the signature QR frames
    pub qr_density: QrDensity,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dire_warnings: true,
            passphrase: PassphrasePolicy::Enabled,
            max_history: DEFAULT_MAX_HISTORY,
            qr_density: QrDensity::Medium,
        }
    }
}

/// Passphrase setting
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PassphrasePolicy {
    /// Passphrase is optional
    #[default]
    Enabled,
    /// Passphrase entry is never offered
    Disabled,
    /// Every key source must carry a passphrase
    Required,
}

impl PassphrasePolicy {
    pub fn allows_passphrase(self) -> bool {
        !matches!(self, PassphrasePolicy::Disabled)
    }

    pub fn requires_passphrase(self) -> bool {
        matches!(self, PassphrasePolicy::Required)
    }
}

/// QR code density
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QrDensity {
    Low,
    #[default]
    Medium,
    High,
}

impl QrDensity {
    /// Maximum payload characters per QR frame
    pub fn frame_capacity(self) -> usize {
        match self {
            QrDensity::Low => 40,
            QrDensity::Medium => 65,
            QrDensity::High => 130,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.dire_warnings);
        assert_eq!(settings.passphrase, PassphrasePolicy::Enabled);
        assert_eq!(settings.max_history, DEFAULT_MAX_HISTORY);
        assert_eq!(settings.qr_density, QrDensity::Medium);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = toml::from_str("dire_warnings = false").unwrap();
        assert!(!settings.dire_warnings);
        assert_eq!(settings.passphrase, PassphrasePolicy::Enabled);
    }

    #[test]
    fn test_passphrase_policy_parsing() {
        let settings: Settings = toml::from_str("passphrase = \"required\"").unwrap();
        assert!(settings.passphrase.requires_passphrase());
        assert!(settings.passphrase.allows_passphrase());
        assert!(!PassphrasePolicy::Disabled.allows_passphrase());
        assert!(toml::from_str::<Settings>("passphrase = \"sometimes\"").is_err());
    }

    #[test]
    fn test_qr_density_capacity_grows() {
        assert!(QrDensity::Low.frame_capacity() < QrDensity::Medium.frame_capacity());
        assert!(QrDensity::Medium.frame_capacity() < QrDensity::High.frame_capacity());
    }
}
