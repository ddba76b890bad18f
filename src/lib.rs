#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`RotaryEncoderBrightness`**: Usermod that polls a two-pin encoder and steps the master brightness
//! - **`QuadratureDecoder`**: Falling-edge-on-A decoder, channel B level gives the direction
//! - **`Usermod`**: Callback interface the host dispatches to (setup, loop, config, JSON hooks)
//! - **`UsermodManager`**: Host-side registry forwarding each hook to every usermod in order
//! - **`Host`**: Trait bundle to implement for your firmware (`PinManager`, `Gpio`, `Lamp`, clock, display)
//! - **`PinRegistry`**: Reference pin ownership table with all-or-nothing batch allocation
//! - **`EncoderConfig`**: Persisted settings under the `"Rotary-Encoder"` config object
//!
//! All host state is reached through the `Host` trait, so the usermod can be
//! exercised against a mock host on a desktop.

extern crate alloc;

mod fmt;

pub mod time;
pub mod types;
pub mod host;
pub mod pins;
pub mod decoder;
pub mod config;
pub mod usermod;
pub mod encoder;
pub mod manager;

pub use config::{CONFIG_KEY, ConfigLoad, EncoderConfig};
pub use decoder::QuadratureDecoder;
pub use encoder::{
    DEFAULT_CLK_PIN, DEFAULT_DT_PIN, DEFAULT_INPUT_MODE, POLL_INTERVAL_MS, RotaryEncoderBrightness,
    STEP_SIZE,
};
pub use host::{Display, Gpio, Host, Lamp, PinManager};
pub use manager::{ManagerError, UsermodManager};
pub use pins::{PinError, PinRegistry};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{
    BRIGHTNESS_MAX, BRIGHTNESS_MIN, CallMode, Direction, InputMode, Level, PIN_UNASSIGNED,
    PinOwner, PinRequest, UsermodId,
};
pub use usermod::{JsonObject, Usermod};
