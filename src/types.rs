//! Core types shared between the encoder usermod and its host.

/// Pin number used to mark a pin as unassigned.
pub const PIN_UNASSIGNED: i8 = -1;

/// Lower bound of the shared brightness value.
pub const BRIGHTNESS_MIN: u8 = 0;

/// Upper bound of the shared brightness value.
pub const BRIGHTNESS_MAX: u8 = 255;

/// Digital level sampled from a GPIO input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Pin reads low.
    Low,
    /// Pin reads high.
    High,
}

impl Level {
    /// Returns true if the level is high.
    #[inline]
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Returns true if the level is low.
    #[inline]
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// Electrical configuration for an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    /// Floating input, external bias required.
    Floating,

    /// Input with internal pull-up.
    #[default]
    PullUp,

    /// Input with internal pull-down.
    PullDown,
}

/// Rotation direction decoded from the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise, brightness goes up.
    Increase,
    /// Counter-clockwise, brightness goes down.
    Decrease,
}

impl Direction {
    /// Applies one step in this direction to `value`, saturating at the
    /// brightness bounds.
    #[inline]
    pub fn apply(self, value: u8, step: u8) -> u8 {
        match self {
            Direction::Increase => value.saturating_add(step),
            Direction::Decrease => value.saturating_sub(step),
        }
    }
}

/// Origin of a state change reported to the host.
///
/// The host uses this to decide which interfaces (UDP sync, websockets,
/// persistence) should hear about the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CallMode {
    Init = 0,
    DirectChange = 1,
    Button = 2,
    Notification = 3,
    Nightlight = 4,
    NoNotify = 5,
    FxChanged = 6,
    Hue = 7,
    PresetCycle = 8,
    Alexa = 10,
    WsSend = 11,
    ButtonPreset = 12,
}

/// Identifier of a usermod type within the host's plugin registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsermodId(pub u16);

impl UsermodId {
    /// Usermod that did not pick an id.
    pub const UNSPECIFIED: UsermodId = UsermodId(1);

    /// Rotary encoder brightness control.
    pub const ROTARY_ENC_BRI: UsermodId = UsermodId(17);
}

/// Owner tag recorded against each allocated pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinOwner {
    /// Pins used by the host itself (LED outputs, buttons, relays).
    System(u8),

    /// Pins used by a usermod, tagged with its id.
    Usermod(UsermodId),
}

impl From<UsermodId> for PinOwner {
    fn from(id: UsermodId) -> Self {
        PinOwner::Usermod(id)
    }
}

/// One entry of a batch pin allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinRequest {
    /// Pin number, negative means unassigned.
    pub pin: i8,

    /// Whether the pin is used as an output.
    pub is_output: bool,
}

impl PinRequest {
    /// Creates an input pin request.
    #[inline]
    pub const fn input(pin: i8) -> Self {
        Self {
            pin,
            is_output: false,
        }
    }

    /// Creates an output pin request.
    #[inline]
    pub const fn output(pin: i8) -> Self {
        Self {
            pin,
            is_output: true,
        }
    }
}
