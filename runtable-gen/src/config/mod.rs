//! Configuration management for the generator
use std::path::Path;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use runtable::config::value_bits_for;
use runtable::config::DEFAULT_FIELD_BITS;
use runtable::config::MAX_CODE_POINT;
use runtable::CodecConfig;
use serde::Deserialize;

pub use crate::config::error::GenConfigError;

mod error;

/// Trait for validating configuration values.
trait Validatable {
    /// Validate the configuration values.
    fn validate(&self, cfg: &Settings) -> Result<(), ConfigError>;
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Field layout and domain of generated tables.
    pub codec: CodecSettings,
}

/// Field layout and domain of generated tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodecSettings {
    /// Total width of a field in bits.
    pub field_bits: u8,
    /// Largest code point covered by a table.
    pub domain_max: u32,
    /// Bits reserved for the value index. Derived from the number of
    /// distinct values when unset.
    #[serde(default)]
    pub value_bits: Option<u8>,
}

impl Validatable for CodecSettings {
    fn validate(&self, _: &Settings) -> Result<(), ConfigError> {
        // Without an explicit width, one value bit is the narrowest layout
        // the input can end up with.
        let value_bits = self.value_bits.unwrap_or(1);
        if let Err(err) = CodecConfig::try_new(value_bits, self.field_bits, self.domain_max) {
            return Err(ConfigError::Message(GenConfigError::from(err).to_string()));
        }

        Ok(())
    }
}

impl CodecSettings {
    /// Returns the codec configuration for a table with `value_count`
    /// distinct values.
    pub fn codec_config(&self, value_count: usize) -> Result<CodecConfig, GenConfigError> {
        let value_bits = self.value_bits.unwrap_or_else(|| value_bits_for(value_count));
        let config = CodecConfig::try_new(value_bits, self.field_bits, self.domain_max)?;

        if value_count > 0 && (value_count - 1) as u64 > config.max_value_index() as u64 {
            return Err(GenConfigError::ValueBitsTooNarrow { value_bits, value_count });
        }

        Ok(config)
    }
}

impl Settings {
    /// Loads the defaults, then the optional file, then environment
    /// variables.
    ///
    /// Environment variables are prefixed with `RUNTABLE_` and nested fields
    /// are separated with double underscores, so `codec.domain_max` is read
    /// from `RUNTABLE_CODEC__DOMAIN_MAX`.
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix("RUNTABLE")
            .separator("__")
            .try_parsing(true)
            .prefix_separator("_");

        let mut cfg_builder = Config::builder();
        cfg_builder = cfg_builder.set_default("codec.field_bits", DEFAULT_FIELD_BITS as u64)?;
        cfg_builder = cfg_builder.set_default("codec.domain_max", MAX_CODE_POINT as u64)?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(env);

        let cfg = cfg_builder.build()?;

        let settings: Settings = cfg.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Perform validation on the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.codec.validate(self)?;

        Ok(())
    }
}
