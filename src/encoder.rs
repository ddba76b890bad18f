//! Rotary encoder brightness usermod.
//!
//! Provides [`RotaryEncoderBrightness`], which polls a two-pin quadrature
//! encoder and steps the host's master brightness up or down by
//! [`STEP_SIZE`] per detent.

use crate::config::{CONFIG_KEY, ConfigLoad, EncoderConfig};
use crate::decoder::QuadratureDecoder;
use crate::host::Host;
use crate::pins::PinError;
use crate::time::{TimeInstant, TimeSource, has_elapsed};
use crate::types::{CallMode, Direction, InputMode, Level, PIN_UNASSIGNED, PinOwner, PinRequest, UsermodId};
use crate::usermod::{JsonObject, Usermod};

/// Default DT (channel A) pin.
pub const DEFAULT_DT_PIN: i8 = 4;

/// Default CLK (channel B) pin.
pub const DEFAULT_CLK_PIN: i8 = 5;

/// Default bias for both encoder inputs.
pub const DEFAULT_INPUT_MODE: InputMode = InputMode::PullUp;

/// Brightness change per detent.
pub const STEP_SIZE: u8 = 10;

/// Minimum time between two encoder samples (500 Hz).
pub const POLL_INTERVAL_MS: u64 = 2;

/// Pins currently owned, converted from non-negative `i8` pin numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActivePins {
    dt: u8,
    clk: u8,
}

/// Polls a rotary encoder and maps rotation to brightness steps.
///
/// Pins start at [`DEFAULT_DT_PIN`]/[`DEFAULT_CLK_PIN`] and may be replaced by
/// the first [`read_from_config`](Usermod::read_from_config) before setup.
/// Later config reloads with a different pin pair release the owned pins and
/// run setup again.
///
/// If the host refuses the pins, both are set to [`PIN_UNASSIGNED`] and the
/// usermod disables itself until a config reload supplies usable pins.
///
/// # Type Parameters
/// * `I` - Instant type of the host clock
#[derive(Debug, Clone)]
pub struct RotaryEncoderBrightness<I: TimeInstant> {
    dt_pin: i8,
    clk_pin: i8,
    input_mode: InputMode,
    enabled: bool,
    initialized: bool,
    active: Option<ActivePins>,
    decoder: QuadratureDecoder,
    last_poll: Option<I>,
}

impl<I: TimeInstant> RotaryEncoderBrightness<I> {
    /// Owner tag used for every pin this usermod allocates.
    pub const OWNER: PinOwner = PinOwner::Usermod(UsermodId::ROTARY_ENC_BRI);

    /// Creates an enabled usermod on the default pins.
    pub fn new() -> Self {
        Self {
            dt_pin: DEFAULT_DT_PIN,
            clk_pin: DEFAULT_CLK_PIN,
            input_mode: DEFAULT_INPUT_MODE,
            enabled: true,
            initialized: false,
            active: None,
            decoder: QuadratureDecoder::new(),
            last_poll: None,
        }
    }

    /// Overrides the boot-time pin pair.
    pub fn with_pins(mut self, dt_pin: i8, clk_pin: i8) -> Self {
        self.dt_pin = dt_pin;
        self.clk_pin = clk_pin;
        self
    }

    /// Overrides the input bias applied to both pins.
    pub fn with_input_mode(mut self, input_mode: InputMode) -> Self {
        self.input_mode = input_mode;
        self
    }

    /// Allocates the pins and configures them as inputs.
    ///
    /// Pins still owned from an earlier setup are released first. On
    /// allocation failure the usermod ends up disabled with both pins
    /// unassigned.
    pub fn initialize<H: Host<Instant = I>>(&mut self, host: &mut H) {
        info!("{}: init", CONFIG_KEY);
        self.release_pins(host);

        let active = match self.allocate_pins(host) {
            Ok(active) => active,
            Err(err) => {
                warn!("{}: pin allocation failed: {}", CONFIG_KEY, err);
                self.dt_pin = PIN_UNASSIGNED;
                self.clk_pin = PIN_UNASSIGNED;
                self.enabled = false;
                return;
            }
        };

        host.pin_mode(active.dt, self.input_mode);
        host.pin_mode(active.clk, self.input_mode);

        self.active = Some(active);
        self.last_poll = Some(host.clock().now());
        self.initialized = true;
    }

    /// Samples the encoder if the poll interval has passed.
    ///
    /// Does nothing while disabled or before a successful setup.
    pub fn poll<H: Host<Instant = I>>(&mut self, host: &mut H) {
        if !self.enabled {
            return;
        }
        let (Some(active), Some(last_poll)) = (self.active, self.last_poll) else {
            return;
        };

        let now = host.clock().now();
        if !has_elapsed(now, last_poll, POLL_INTERVAL_MS) {
            return;
        }

        let a = host.digital_read(active.dt);
        let b = host.digital_read(active.clk);
        let direction = self.decoder.update(a, b);
        self.last_poll = Some(now);

        if let Some(direction) = direction {
            trace!("{}: step", CONFIG_KEY);
            self.change_brightness(host, direction);
        }
    }

    /// Steps the host brightness once in `direction`, saturating at 0 and 255.
    ///
    /// If an attached display was asleep, the step only wakes it and the
    /// brightness is left alone.
    pub fn change_brightness<H: Host<Instant = I>>(&self, host: &mut H, direction: Direction) {
        if let Some(display) = host.display()
            && display.wake_display()
        {
            return;
        }

        let brightness = direction.apply(host.brightness(), STEP_SIZE);
        host.set_brightness(brightness);
        host.announce_state_change(CallMode::Button);
    }

    /// Returns the settings as they would be persisted.
    pub fn config(&self) -> EncoderConfig {
        EncoderConfig {
            enabled: self.enabled,
            dt_pin: self.dt_pin,
            clk_pin: self.clk_pin,
        }
    }

    /// Returns true if the encoder is polled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true once setup has succeeded at least once.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns true while the usermod owns its pins.
    pub fn owns_pins(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the (DT, CLK) pin pair.
    pub fn pins(&self) -> (i8, i8) {
        (self.dt_pin, self.clk_pin)
    }

    /// Returns the input bias used for both pins.
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Channel A level stored by the last sample.
    pub fn previous_a(&self) -> Level {
        self.decoder.previous_a()
    }

    /// Time of the last sample, or of setup if nothing was sampled yet.
    pub fn last_poll(&self) -> Option<I> {
        self.last_poll
    }

    fn allocate_pins<H: Host<Instant = I>>(&self, host: &mut H) -> Result<ActivePins, PinError> {
        let dt = u8::try_from(self.dt_pin).map_err(|_| PinError::InvalidPin(self.dt_pin))?;
        let clk = u8::try_from(self.clk_pin).map_err(|_| PinError::InvalidPin(self.clk_pin))?;

        let requests = [PinRequest::input(self.dt_pin), PinRequest::input(self.clk_pin)];
        if !host.allocate_multiple_pins(&requests, Self::OWNER) {
            return Err(PinError::Refused);
        }

        Ok(ActivePins { dt, clk })
    }

    fn release_pins<H: Host<Instant = I>>(&mut self, host: &mut H) {
        if let Some(active) = self.active.take() {
            debug!("{}: releasing pins {} and {}", CONFIG_KEY, active.dt, active.clk);
            host.deallocate_pin(active.dt as i8, Self::OWNER);
            host.deallocate_pin(active.clk as i8, Self::OWNER);
        }
    }
}

impl<I: TimeInstant> Default for RotaryEncoderBrightness<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> Usermod<H> for RotaryEncoderBrightness<H::Instant> {
    fn setup(&mut self, host: &mut H) {
        self.initialize(host);
    }

    fn run(&mut self, host: &mut H) {
        self.poll(host);
    }

    fn add_to_config(&self, root: &mut JsonObject) {
        match self.config().write_to(root) {
            Ok(()) => debug!("{}: config saved", CONFIG_KEY),
            Err(_) => warn!("{}: config could not be serialized", CONFIG_KEY),
        }
    }

    fn read_from_config(&mut self, host: &mut H, root: &JsonObject) -> bool {
        let (config, has_enabled) = match self.config().read_from(root) {
            ConfigLoad::Missing => {
                info!("{}: no config found, using defaults", CONFIG_KEY);
                return false;
            }
            ConfigLoad::Found {
                config,
                has_enabled,
            } => (config, has_enabled),
        };

        self.enabled = config.enabled;

        if !self.initialized {
            self.dt_pin = config.dt_pin;
            self.clk_pin = config.clk_pin;
            info!("{}: config loaded", CONFIG_KEY);
            return has_enabled;
        }

        info!("{}: config reloaded", CONFIG_KEY);
        if (self.dt_pin, self.clk_pin) != (config.dt_pin, config.clk_pin) {
            self.release_pins(host);
            self.dt_pin = config.dt_pin;
            self.clk_pin = config.clk_pin;

            if self.dt_pin < 0 || self.clk_pin < 0 {
                self.enabled = false;
                return has_enabled;
            }
            self.initialize(host);
        }

        has_enabled
    }

    fn id(&self) -> UsermodId {
        UsermodId::ROTARY_ENC_BRI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeDuration;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct TestDuration(u64);

    impl TimeDuration for TestDuration {
        fn as_millis(&self) -> u64 {
            self.0
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct TestInstant(u64);

    impl TimeInstant for TestInstant {
        type Duration = TestDuration;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            TestDuration(self.0 - earlier.0)
        }
    }

    #[test]
    fn defaults_match_boot_configuration() {
        let encoder = RotaryEncoderBrightness::<TestInstant>::new();

        assert_eq!(encoder.pins(), (DEFAULT_DT_PIN, DEFAULT_CLK_PIN));
        assert_eq!(encoder.input_mode(), InputMode::PullUp);
        assert!(encoder.is_enabled());
        assert!(!encoder.is_initialized());
        assert!(!encoder.owns_pins());
        assert_eq!(encoder.last_poll(), None);
    }

    #[test]
    fn builder_overrides_pins_and_mode() {
        let encoder = RotaryEncoderBrightness::<TestInstant>::new()
            .with_pins(12, 14)
            .with_input_mode(InputMode::Floating);

        assert_eq!(encoder.pins(), (12, 14));
        assert_eq!(encoder.input_mode(), InputMode::Floating);
        assert_eq!(
            encoder.config(),
            EncoderConfig {
                enabled: true,
                dt_pin: 12,
                clk_pin: 14
            }
        );
    }
}
