//! Persisted configuration for the encoder usermod.
//!
//! The host keeps one JSON object for the whole firmware. This usermod owns a
//! nested object under [`CONFIG_KEY`]:
//!
//! ```json
//! { "Rotary-Encoder": { "enabled": true, "DT-pin": 4, "CLK-pin": 5 } }
//! ```

use alloc::string::String;
use serde::Serialize;
use serde_json::{Map, Value};

/// Name of the nested configuration object.
pub const CONFIG_KEY: &str = "Rotary-Encoder";

/// Key of the enabled flag.
pub const ENABLED_KEY: &str = "enabled";

/// Key of the DT (channel A) pin.
pub const DT_PIN_KEY: &str = "DT-pin";

/// Key of the CLK (channel B) pin.
pub const CLK_PIN_KEY: &str = "CLK-pin";

/// Serialized form of the usermod's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Whether the encoder is polled.
    pub enabled: bool,

    /// Channel A pin, -1 when unassigned.
    #[serde(rename = "DT-pin")]
    pub dt_pin: i8,

    /// Channel B pin, -1 when unassigned.
    #[serde(rename = "CLK-pin")]
    pub clk_pin: i8,
}

/// Outcome of reading the nested object out of the host configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigLoad {
    /// The host configuration has no object for this usermod.
    Missing,

    /// Values read, with missing or malformed fields taken from the defaults.
    Found {
        /// Merged configuration
        config: EncoderConfig,
        /// Whether the `enabled` key was present
        has_enabled: bool,
    },
}

impl EncoderConfig {
    /// Writes this config into `root` under [`CONFIG_KEY`], replacing any
    /// previous object.
    pub fn write_to(&self, root: &mut Map<String, Value>) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(self)?;
        root.insert(String::from(CONFIG_KEY), value);
        Ok(())
    }

    /// Reads the nested object from `root`, falling back to `self` field by
    /// field.
    ///
    /// A field keeps its current value if it is missing, has the wrong type,
    /// or (for pins) does not fit in an `i8`.
    pub fn read_from(&self, root: &Map<String, Value>) -> ConfigLoad {
        let Some(top) = root.get(CONFIG_KEY).and_then(Value::as_object) else {
            return ConfigLoad::Missing;
        };

        let enabled = top.get(ENABLED_KEY);
        let config = EncoderConfig {
            enabled: enabled.and_then(Value::as_bool).unwrap_or(self.enabled),
            dt_pin: read_pin(top, DT_PIN_KEY).unwrap_or(self.dt_pin),
            clk_pin: read_pin(top, CLK_PIN_KEY).unwrap_or(self.clk_pin),
        };

        ConfigLoad::Found {
            config,
            has_enabled: enabled.is_some_and(|value| !value.is_null()),
        }
    }
}

fn read_pin(top: &Map<String, Value>, key: &str) -> Option<i8> {
    top.get(key)
        .and_then(Value::as_i64)
        .and_then(|pin| i8::try_from(pin).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DEFAULTS: EncoderConfig = EncoderConfig {
        enabled: true,
        dt_pin: 4,
        clk_pin: 5,
    };

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn writes_nested_object_with_host_key_names() {
        let mut root = Map::new();
        DEFAULTS.write_to(&mut root).unwrap();

        assert_eq!(
            Value::Object(root),
            json!({ "Rotary-Encoder": { "enabled": true, "DT-pin": 4, "CLK-pin": 5 } })
        );
    }

    #[test]
    fn missing_object_is_reported() {
        let root = object(json!({ "Other-Mod": { "enabled": false } }));
        assert_eq!(DEFAULTS.read_from(&root), ConfigLoad::Missing);
    }

    #[test]
    fn absent_fields_keep_defaults() {
        let root = object(json!({ "Rotary-Encoder": { "DT-pin": 12 } }));

        assert_eq!(
            DEFAULTS.read_from(&root),
            ConfigLoad::Found {
                config: EncoderConfig {
                    enabled: true,
                    dt_pin: 12,
                    clk_pin: 5
                },
                has_enabled: false,
            }
        );
    }

    #[test]
    fn malformed_fields_keep_defaults() {
        let root = object(json!({
            "Rotary-Encoder": { "enabled": "yes", "DT-pin": 300, "CLK-pin": "14" }
        }));

        match DEFAULTS.read_from(&root) {
            ConfigLoad::Found {
                config,
                has_enabled,
            } => {
                assert_eq!(config, DEFAULTS);
                assert!(has_enabled);
            }
            ConfigLoad::Missing => panic!("object should be found"),
        }
    }

    #[test]
    fn negative_pins_are_read_as_unassigned() {
        let root = object(json!({
            "Rotary-Encoder": { "enabled": false, "DT-pin": -1, "CLK-pin": -1 }
        }));

        assert_eq!(
            DEFAULTS.read_from(&root),
            ConfigLoad::Found {
                config: EncoderConfig {
                    enabled: false,
                    dt_pin: -1,
                    clk_pin: -1
                },
                has_enabled: true,
            }
        );
    }
}
