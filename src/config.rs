use crate::ir::PersonId;
use crate::layout::LayoutError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

const CARD_WIDTH: f32 = 220.0;
const CARD_HEIGHT: f32 = 250.0;
const SPOUSE_GUTTER: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutProfile {
    /// 40px between siblings, 80px between generations.
    #[default]
    Compact,
    /// 90px between siblings, 150px between generations.
    Spacious,
}

impl LayoutProfile {
    fn gaps(self) -> (f32, f32) {
        match self {
            Self::Compact => (40.0, 80.0),
            Self::Spacious => (90.0, 150.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeLocale {
    #[default]
    En,
    Ru,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub root_id: Option<PersonId>,
    pub card_width: f32,
    pub card_height: f32,
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    pub spouse_gutter: f32,
    pub fail_on_unknown_ids: bool,
    pub locale: BadgeLocale,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::compact()
    }
}

impl LayoutOptions {
    pub fn compact() -> Self {
        Self::for_profile(LayoutProfile::Compact)
    }

    pub fn spacious() -> Self {
        Self::for_profile(LayoutProfile::Spacious)
    }

    pub fn for_profile(profile: LayoutProfile) -> Self {
        let (horizontal_gap, vertical_gap) = profile.gaps();
        Self {
            root_id: None,
            card_width: CARD_WIDTH,
            card_height: CARD_HEIGHT,
            horizontal_gap,
            vertical_gap,
            spouse_gutter: SPOUSE_GUTTER,
            fail_on_unknown_ids: true,
            locale: BadgeLocale::En,
        }
    }

    /// Swaps in a profile's gaps and keeps every other option.
    pub fn set_profile(&mut self, profile: LayoutProfile) {
        let (horizontal_gap, vertical_gap) = profile.gaps();
        self.horizontal_gap = horizontal_gap;
        self.vertical_gap = vertical_gap;
    }

    pub fn with_root(mut self, root_id: PersonId) -> Self {
        self.root_id = Some(root_id);
        self
    }

    pub fn lenient(mut self) -> Self {
        self.fail_on_unknown_ids = false;
        self
    }

    /// Distance between two generations' top edges.
    pub fn row_height(&self) -> f32 {
        self.card_height + self.vertical_gap
    }

    /// Horizontal distance between the two cards of a couple.
    pub fn mate_offset(&self) -> f32 {
        self.card_width + self.spouse_gutter
    }

    pub fn couple_width(&self) -> f32 {
        2.0 * self.card_width + self.spouse_gutter
    }

    pub(crate) fn validate(&self) -> Result<PersonId, LayoutError> {
        let root_id = self.root_id.ok_or(LayoutError::MissingRootId)?;
        // Cards are emitted on whole pixels; fractional card extents would
        // let floored neighbours intersect.
        let checks = [
            ("cardWidth", self.card_width, true, true),
            ("cardHeight", self.card_height, true, true),
            ("horizontalGap", self.horizontal_gap, false, false),
            ("verticalGap", self.vertical_gap, false, false),
            ("spouseGutter", self.spouse_gutter, false, true),
        ];
        for (name, value, positive, whole) in checks {
            let ok = value.is_finite()
                && if positive { value > 0.0 } else { value >= 0.0 }
                && (!whole || value.fract() == 0.0);
            if !ok {
                return Err(LayoutError::InvalidOption { name, value });
            }
        }
        Ok(root_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub profile: LayoutProfile,
    pub layout: LayoutOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    profile: Option<LayoutProfile>,
    layout: Option<LayoutOptionsFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOptionsFile {
    root_id: Option<PersonId>,
    card_width: Option<f32>,
    card_height: Option<f32>,
    horizontal_gap: Option<f32>,
    vertical_gap: Option<f32>,
    spouse_gutter: Option<f32>,
    fail_on_unknown_ids: Option<bool>,
    locale: Option<BadgeLocale>,
}

impl LayoutOptionsFile {
    fn apply(self, options: &mut LayoutOptions) {
        if let Some(v) = self.root_id {
            options.root_id = Some(v);
        }
        if let Some(v) = self.card_width {
            options.card_width = v;
        }
        if let Some(v) = self.card_height {
            options.card_height = v;
        }
        if let Some(v) = self.horizontal_gap {
            options.horizontal_gap = v;
        }
        if let Some(v) = self.vertical_gap {
            options.vertical_gap = v;
        }
        if let Some(v) = self.spouse_gutter {
            options.spouse_gutter = v;
        }
        if let Some(v) = self.fail_on_unknown_ids {
            options.fail_on_unknown_ids = v;
        }
        if let Some(v) = self.locale {
            options.locale = v;
        }
    }
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let profile = parsed.profile.unwrap_or_default();
    let mut layout = LayoutOptions::for_profile(profile);
    if let Some(overrides) = parsed.layout {
        overrides.apply(&mut layout);
    }
    Ok(Config { profile, layout })
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_pin_gaps() {
        let compact = LayoutOptions::compact();
        assert_eq!(compact.horizontal_gap, 40.0);
        assert_eq!(compact.vertical_gap, 80.0);
        let spacious = LayoutOptions::spacious();
        assert_eq!(spacious.horizontal_gap, 90.0);
        assert_eq!(spacious.vertical_gap, 150.0);
        assert_eq!(spacious.card_width, 220.0);
        assert_eq!(spacious.spouse_gutter, 30.0);
        assert!(spacious.fail_on_unknown_ids);
    }

    #[test]
    fn config_overrides_profile() {
        let config = parse_config(
            r#"{"profile":"spacious","layout":{"rootId":3,"spouseGutter":12,"locale":"ru"}}"#,
        )
        .unwrap();
        assert_eq!(config.profile, LayoutProfile::Spacious);
        assert_eq!(config.layout.root_id, Some(3));
        assert_eq!(config.layout.spouse_gutter, 12.0);
        assert_eq!(config.layout.horizontal_gap, 90.0);
        assert_eq!(config.layout.locale, BadgeLocale::Ru);
    }

    #[test]
    fn profile_switch_keeps_card_sizes() {
        let mut options = LayoutOptions::compact();
        options.card_width = 180.0;
        options.set_profile(LayoutProfile::Spacious);
        assert_eq!(options.card_width, 180.0);
        assert_eq!(options.horizontal_gap, 90.0);
        assert_eq!(options.vertical_gap, 150.0);
    }

    #[test]
    fn missing_root_is_reported() {
        let err = LayoutOptions::default().validate().unwrap_err();
        assert_eq!(err, LayoutError::MissingRootId);
    }

    #[test]
    fn rejects_non_finite_dimensions() {
        let mut options = LayoutOptions::default().with_root(1);
        options.horizontal_gap = f32::NAN;
        assert!(matches!(
            options.validate(),
            Err(LayoutError::InvalidOption { name: "horizontalGap", .. })
        ));
        options.horizontal_gap = 10.0;
        options.card_width = 0.0;
        assert!(matches!(
            options.validate(),
            Err(LayoutError::InvalidOption { name: "cardWidth", .. })
        ));
    }

    #[test]
    fn card_sizes_must_be_whole_pixels() {
        let mut options = LayoutOptions::default().with_root(1);
        options.card_width = 220.5;
        assert_eq!(
            options.validate(),
            Err(LayoutError::InvalidOption {
                name: "cardWidth",
                value: 220.5
            })
        );
        options.card_width = 220.0;
        options.spouse_gutter = 12.25;
        assert!(matches!(
            options.validate(),
            Err(LayoutError::InvalidOption { name: "spouseGutter", .. })
        ));
        options.spouse_gutter = 12.0;
        options.horizontal_gap = 0.3;
        options.vertical_gap = 7.5;
        assert_eq!(options.validate(), Ok(1));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: LayoutOptions =
            serde_json::from_str(r#"{"rootId":1,"failOnUnknownIds":false}"#).unwrap();
        assert_eq!(options.root_id, Some(1));
        assert!(!options.fail_on_unknown_ids);
        assert_eq!(options.card_height, 250.0);
    }
}
