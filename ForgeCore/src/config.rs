//! Import options (persisted as TOML or JSON)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::skeleton::Tolerance;

fn default_bone_size() -> f32 {
    0.1
}

fn default_position_epsilon() -> f32 {
    0.0001
}

fn default_angle_epsilon() -> f32 {
    0.1_f32.to_radians()
}

/// Options controlling how an import is assembled and how bones are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Length of every resolved bone, head to tail
    #[serde(default = "default_bone_size")]
    pub bone_size: f32,

    /// Coordinates closer than this to zero snap to exactly zero; also the
    /// per-axis tolerance when comparing bone heads
    #[serde(default = "default_position_epsilon")]
    pub position_epsilon: f32,

    /// Radians. Rolls closer than this to zero snap to exactly zero; also the
    /// angular tolerance when comparing bone axes
    #[serde(default = "default_angle_epsilon")]
    pub angle_epsilon: f32,

    /// Keep endpoint bones instead of dropping them
    #[serde(default)]
    pub import_endpoints: bool,

    /// Assemble every LOD rather than only the most detailed one
    #[serde(default)]
    pub also_import_lods: bool,

    /// Force every mesh to take its weight sets from this payload table
    #[serde(default)]
    pub weight_table_override: Option<usize>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            bone_size: default_bone_size(),
            position_epsilon: default_position_epsilon(),
            angle_epsilon: default_angle_epsilon(),
            import_endpoints: false,
            also_import_lods: false,
            weight_table_override: None,
        }
    }
}

impl ImportOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bone_size(mut self, bone_size: f32) -> Self {
        self.bone_size = bone_size;
        self
    }

    #[must_use]
    pub fn with_position_epsilon(mut self, epsilon: f32) -> Self {
        self.position_epsilon = epsilon;
        self
    }

    /// Angle epsilon in radians.
    #[must_use]
    pub fn with_angle_epsilon(mut self, epsilon: f32) -> Self {
        self.angle_epsilon = epsilon;
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self) -> Self {
        self.import_endpoints = true;
        self
    }

    #[must_use]
    pub fn with_all_lods(mut self) -> Self {
        self.also_import_lods = true;
        self
    }

    #[must_use]
    pub fn with_weight_table_override(mut self, table: usize) -> Self {
        self.weight_table_override = Some(table);
        self
    }

    /// Comparison tolerance built from the two epsilons.
    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.position_epsilon, self.angle_epsilon)
    }

    /// Reject values the geometry engine cannot work with.
    ///
    /// # Errors
    /// [`Error::InvalidOption`] for a non-positive bone size, a negative or
    /// non-finite epsilon, or a bone size that position snapping would
    /// collapse to zero length.
    pub fn validate(&self) -> Result<()> {
        if !(self.bone_size.is_finite() && self.bone_size > 0.0) {
            return Err(Error::InvalidOption {
                option: "bone_size",
                message: format!("must be positive, got {}", self.bone_size),
            });
        }
        for (option, value) in [
            ("position_epsilon", self.position_epsilon),
            ("angle_epsilon", self.angle_epsilon),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidOption {
                    option,
                    message: format!("must be zero or positive, got {value}"),
                });
            }
        }
        if self.bone_size <= self.position_epsilon {
            return Err(Error::InvalidOption {
                option: "bone_size",
                message: format!(
                    "must exceed position_epsilon ({}), got {}",
                    self.position_epsilon, self.bone_size
                ),
            });
        }
        Ok(())
    }

    /// Parse and validate options from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    /// [`Error::ConfigParse`] for malformed TOML, [`Error::InvalidOption`]
    /// for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse and validate options from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    /// [`Error::JsonError`] for malformed JSON, [`Error::InvalidOption`]
    /// for out-of-range values.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file.
    ///
    /// # Errors
    /// IO errors reading the file, plus everything [`ImportOptions::from_toml_str`] reports.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// # Errors
    /// [`Error::ConfigSerialize`] if the options cannot be written.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = ImportOptions::default();
        assert_eq!(options.bone_size, 0.1);
        assert_eq!(options.position_epsilon, 0.0001);
        assert!((options.angle_epsilon.to_degrees() - 0.1).abs() < 1e-6);
        assert!(!options.import_endpoints);
        assert!(!options.also_import_lods);
        assert_eq!(options.weight_table_override, None);
        options.validate().unwrap();
    }

    #[test]
    fn test_toml_roundtrip() {
        let options = ImportOptions::new()
            .with_bone_size(0.25)
            .with_endpoints()
            .with_weight_table_override(2);
        let toml_str = options.to_toml_string().unwrap();
        let parsed = ImportOptions::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed = ImportOptions::from_toml_str("also_import_lods = true\n").unwrap();
        assert_eq!(parsed, ImportOptions::new().with_all_lods());
    }

    #[test]
    fn test_json() {
        let parsed =
            ImportOptions::from_json_str(r#"{"bone_size": 0.5, "weight_table_override": 1}"#)
                .unwrap();
        assert_eq!(parsed.bone_size, 0.5);
        assert_eq!(parsed.weight_table_override, Some(1));
        assert_eq!(parsed.position_epsilon, 0.0001);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ImportOptions::from_toml_str("bone_size = 0.0"),
            Err(Error::InvalidOption { option: "bone_size", .. })
        ));
        assert!(matches!(
            ImportOptions::new().with_angle_epsilon(-1.0).validate(),
            Err(Error::InvalidOption { option: "angle_epsilon", .. })
        ));
        assert!(matches!(
            ImportOptions::from_toml_str("bone_size = \"big\""),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_rejects_bone_size_within_snapping() {
        assert!(matches!(
            ImportOptions::new().with_bone_size(0.00005).validate(),
            Err(Error::InvalidOption { option: "bone_size", .. })
        ));
        assert!(matches!(
            ImportOptions::new().with_bone_size(0.0001).validate(),
            Err(Error::InvalidOption { option: "bone_size", .. })
        ));
        ImportOptions::new().with_bone_size(0.001).validate().unwrap();
    }
}
