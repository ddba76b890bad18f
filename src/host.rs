//! Host collaborator traits.
//!
//! A usermod never talks to hardware or global state directly. Everything it
//! needs from the firmware (pin ownership, GPIO, the shared brightness value,
//! the clock and an optional display) is reached through these traits, so the
//! same usermod runs against real firmware or a test mock.

use crate::time::{TimeInstant, TimeSource};
use crate::types::{CallMode, InputMode, Level, PinOwner, PinRequest};

/// Pin ownership registry shared by every usermod on the host.
pub trait PinManager {
    /// Allocates all `pins` to `owner`, or none of them.
    ///
    /// Returns false if any pin is invalid or already owned.
    fn allocate_multiple_pins(&mut self, pins: &[PinRequest], owner: PinOwner) -> bool;

    /// Releases `pin` if it is owned by `owner`.
    ///
    /// Returns false if the pin was not owned by `owner`.
    fn deallocate_pin(&mut self, pin: i8, owner: PinOwner) -> bool;
}

/// GPIO input primitives.
pub trait Gpio {
    /// Configures `pin` as a digital input with the given bias.
    fn pin_mode(&mut self, pin: u8, mode: InputMode);

    /// Samples the current level of `pin`.
    fn digital_read(&self, pin: u8) -> Level;
}

/// The host's shared lamp state.
pub trait Lamp {
    /// Current master brightness.
    fn brightness(&self) -> u8;

    /// Overwrites the master brightness.
    fn set_brightness(&mut self, brightness: u8);

    /// Tells the host that visible state changed so it can push the change to
    /// LEDs, persistence and network interfaces.
    fn announce_state_change(&mut self, origin: CallMode);
}

/// An attached display that may be asleep.
pub trait Display {
    /// Wakes the display if it is asleep.
    ///
    /// Returns true if the display was asleep and is now waking up.
    fn wake_display(&mut self) -> bool;
}

/// Everything a usermod can reach on the host.
pub trait Host: PinManager + Gpio + Lamp {
    /// Instant type of the host clock.
    type Instant: TimeInstant;

    /// Clock implementation.
    type Clock: TimeSource<Self::Instant>;

    /// Returns the host's monotonic clock.
    fn clock(&self) -> &Self::Clock;

    /// Returns the attached display, if the firmware has one.
    fn display(&mut self) -> Option<&mut dyn Display> {
        None
    }
}
