//! Device and display metadata recorded with each snapshot.
//!
//! These are plain value objects copied to and from the wire form. The only
//! behavior beyond field copies is locale handling: snapshots captured before
//! the locale was recorded get the process default locale on load.

use std::fmt;

use crate::types::HierarchyError;
use crate::wire::{DeviceStateMessage, DisplayInfoMessage, MetricsMessage};

/// Locale used when the operating system does not report one.
const FALLBACK_LOCALE: &str = "en-US";

/// A locale held as a normalized BCP 47 language tag (e.g. `en-US`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    tag: String,
}

impl Locale {
    /// Parses a language tag. Underscore separators are accepted and normalized.
    ///
    /// Case is canonicalized: the language is lower case and a two-letter
    /// region upper case (`EN-us` becomes `en-US`).
    pub fn from_language_tag(tag: &str) -> Self {
        let normalized = tag.trim().replace('_', "-");
        let tag = normalized
            .split('-')
            .enumerate()
            .map(|(index, part)| match index {
                0 => part.to_ascii_lowercase(),
                1 if part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()) => {
                    part.to_ascii_uppercase()
                }
                _ => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join("-");
        Locale { tag }
    }

    /// Builds a locale from the legacy `language[-region[-variant]]` string form.
    ///
    /// # Errors
    ///
    /// Returns `HierarchyError::MalformedInput` for empty strings or more than three parts.
    pub fn from_legacy_string(value: &str) -> Result<Self, HierarchyError> {
        let normalized = value.replace('_', "-");
        let parts: Vec<&str> = normalized.split('-').collect();
        if normalized.is_empty() || parts.len() > 3 {
            return Err(HierarchyError::MalformedInput(format!(
                "Unsupported locale string: {}",
                value
            )));
        }
        Ok(Locale::from_language_tag(&normalized))
    }

    /// The process default locale, as reported by the operating system.
    pub fn system_default() -> Self {
        let tag = sys_locale::get_locale().unwrap_or_else(|| FALLBACK_LOCALE.to_string());
        Locale::from_language_tag(&tag)
    }

    pub fn language_tag(&self) -> &str {
        &self.tag
    }

    pub fn language(&self) -> &str {
        self.tag.split('-').next().unwrap_or_default()
    }

    pub fn region(&self) -> Option<&str> {
        self.tag.split('-').nth(1).filter(|part| !part.is_empty())
    }

    pub fn variant(&self) -> Option<&str> {
        self.tag.split('-').nth(2).filter(|part| !part.is_empty())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// Pixel metrics of a display.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub density: f32,
    pub scaled_density: f32,
    pub x_dpi: f32,
    pub y_dpi: f32,
    pub density_dpi: i32,
    pub height_pixels: i32,
    pub width_pixels: i32,
}

impl Metrics {
    /// Converts a pixel length to density-independent pixels.
    ///
    /// A zero density (unknown) leaves the value unscaled.
    pub fn px_to_dp(&self, px: i64) -> f32 {
        if self.density > 0.0 {
            px as f32 / self.density
        } else {
            px as f32
        }
    }

    pub fn from_message(message: &MetricsMessage) -> Self {
        Metrics {
            density: message.density,
            scaled_density: message.scaled_density,
            x_dpi: message.x_dpi,
            y_dpi: message.y_dpi,
            density_dpi: message.density_dpi,
            height_pixels: message.height_pixels,
            width_pixels: message.width_pixels,
        }
    }

    pub fn to_message(&self) -> MetricsMessage {
        MetricsMessage {
            density: self.density,
            scaled_density: self.scaled_density,
            x_dpi: self.x_dpi,
            y_dpi: self.y_dpi,
            density_dpi: self.density_dpi,
            height_pixels: self.height_pixels,
            width_pixels: self.width_pixels,
        }
    }
}

/// Metrics of the default display.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayInfo {
    /// Metrics excluding system decorations (status and navigation bars)
    pub metrics_without_decoration: Metrics,
    /// Full physical metrics, when captured
    pub real_metrics: Option<Metrics>,
}

impl DisplayInfo {
    pub fn from_message(message: &DisplayInfoMessage) -> Self {
        DisplayInfo {
            metrics_without_decoration: Metrics::from_message(&message.metrics_without_decoration),
            real_metrics: message.real_metrics.as_ref().map(Metrics::from_message),
        }
    }

    pub fn to_message(&self) -> DisplayInfoMessage {
        DisplayInfoMessage {
            metrics_without_decoration: self.metrics_without_decoration.to_message(),
            real_metrics: self.real_metrics.as_ref().map(Metrics::to_message),
        }
    }
}

/// State of the capturing device at snapshot time.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    sdk_version: i32,
    locale: Locale,
    default_display_info: DisplayInfo,
}

impl DeviceState {
    pub fn new(sdk_version: i32, locale: Locale, default_display_info: DisplayInfo) -> Self {
        DeviceState {
            sdk_version,
            locale,
            default_display_info,
        }
    }

    pub fn sdk_version(&self) -> i32 {
        self.sdk_version
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn default_display_info(&self) -> &DisplayInfo {
        &self.default_display_info
    }

    /// Missing or empty locales resolve to `Locale::system_default()`.
    pub fn from_message(message: &DeviceStateMessage) -> Self {
        let locale = match message.locale.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => Locale::from_language_tag(tag),
            _ => {
                let locale = Locale::system_default();
                log::debug!("Snapshot has no locale, using default {}", locale);
                locale
            }
        };

        DeviceState {
            sdk_version: message.sdk_version,
            locale,
            default_display_info: DisplayInfo::from_message(&message.default_display_info),
        }
    }

    pub fn to_message(&self) -> DeviceStateMessage {
        DeviceStateMessage {
            sdk_version: self.sdk_version,
            locale: Some(self.locale.language_tag().to_string()),
            default_display_info: self.default_display_info.to_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_locale_uses_system_default() {
        let message: DeviceStateMessage =
            serde_json::from_str(r#"{"sdk_version": 28}"#).unwrap();
        let state = DeviceState::from_message(&message);

        assert_eq!(state.locale(), &Locale::system_default());
        assert!(!state.locale().language_tag().is_empty());
        assert_eq!(state.sdk_version(), 28);
    }

    #[test]
    fn test_empty_locale_uses_system_default() {
        let message = DeviceStateMessage {
            locale: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            DeviceState::from_message(&message).locale(),
            &Locale::system_default()
        );
    }

    #[test]
    fn test_recorded_locale_is_kept() {
        let message = DeviceStateMessage {
            sdk_version: 30,
            locale: Some("ja-JP".to_string()),
            ..Default::default()
        };
        let state = DeviceState::from_message(&message);

        assert_eq!(state.locale().language(), "ja");
        assert_eq!(state.locale().region(), Some("JP"));
        assert_eq!(state.to_message().locale.as_deref(), Some("ja-JP"));
    }

    #[test]
    fn test_language_tag_case_is_canonical() {
        let locale = Locale::from_language_tag("EN-us");
        assert_eq!(locale.language_tag(), "en-US");
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.region(), Some("US"));

        assert_eq!(Locale::from_language_tag("es-419").language_tag(), "es-419");
        assert_eq!(Locale::from_language_tag("DE_de_POSIX").language_tag(), "de-DE-POSIX");
    }

    #[test]
    fn test_legacy_locale_strings() {
        let locale = Locale::from_legacy_string("en_US").unwrap();
        assert_eq!(locale.language_tag(), "en-US");

        let locale = Locale::from_legacy_string("de-DE-1901").unwrap();
        assert_eq!(locale.variant(), Some("1901"));

        assert!(Locale::from_legacy_string("a-b-c-d").is_err());
        assert!(Locale::from_legacy_string("").is_err());
    }

    #[test]
    fn test_display_info_roundtrip() {
        let info = DisplayInfo {
            metrics_without_decoration: Metrics {
                density: 2.625,
                scaled_density: 2.625,
                x_dpi: 420.0,
                y_dpi: 420.0,
                density_dpi: 420,
                height_pixels: 2028,
                width_pixels: 1080,
            },
            real_metrics: None,
        };

        assert_eq!(DisplayInfo::from_message(&info.to_message()), info);
    }

    #[test]
    fn test_px_to_dp() {
        let metrics = Metrics {
            density: 2.0,
            ..Default::default()
        };
        assert_eq!(metrics.px_to_dp(96), 48.0);
        assert_eq!(Metrics::default().px_to_dp(10), 10.0);
    }
}
