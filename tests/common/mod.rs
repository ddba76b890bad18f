//! Shared test infrastructure for encoder-brightness integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use encoder_brightness::{
    CallMode, Display, Gpio, Host, InputMode, Lamp, Level, PinManager, PinOwner, PinRegistry,
    PinRequest, TimeDuration, TimeInstant, TimeSource,
};

pub const MAX_PINS: usize = 40;

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Display
// ============================================================================

/// Display that reports waking once after being put to sleep
pub struct MockDisplay {
    pub asleep: bool,
    pub wake_count: usize,
}

impl MockDisplay {
    pub fn asleep() -> Self {
        Self {
            asleep: true,
            wake_count: 0,
        }
    }

    pub fn awake() -> Self {
        Self {
            asleep: false,
            wake_count: 0,
        }
    }
}

impl Display for MockDisplay {
    fn wake_display(&mut self) -> bool {
        if self.asleep {
            self.asleep = false;
            self.wake_count += 1;
            true
        } else {
            false
        }
    }
}

// ============================================================================
// Mock Host
// ============================================================================

/// Host with a real pin registry, scripted pin levels and recorded notifications
pub struct MockHost {
    pub clock: MockTimeSource,
    pub registry: PinRegistry<MAX_PINS>,
    pub levels: [Level; MAX_PINS],
    pub pin_modes: heapless::Vec<(u8, InputMode), 16>,
    pub allocations: heapless::Vec<(heapless::Vec<i8, 4>, PinOwner), 16>,
    pub deallocations: heapless::Vec<(i8, PinOwner), 16>,
    pub brightness: u8,
    pub announcements: heapless::Vec<CallMode, 64>,
    pub reads: core::cell::Cell<usize>,
    pub display: Option<MockDisplay>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            clock: MockTimeSource::new(),
            registry: PinRegistry::new(),
            levels: [Level::High; MAX_PINS],
            pin_modes: heapless::Vec::new(),
            allocations: heapless::Vec::new(),
            deallocations: heapless::Vec::new(),
            brightness: 128,
            announcements: heapless::Vec::new(),
            reads: core::cell::Cell::new(0),
            display: None,
        }
    }

    pub fn with_display(mut self, display: MockDisplay) -> Self {
        self.display = Some(display);
        self
    }

    /// Sets the level that the next reads of `pin` will see
    pub fn set_level(&mut self, pin: u8, level: Level) {
        self.levels[pin as usize] = level;
    }

    /// Sets both encoder channel levels
    pub fn set_channels(&mut self, dt: u8, clk: u8, a: Level, b: Level) {
        self.set_level(dt, a);
        self.set_level(clk, b);
    }

    pub fn advance(&self, millis: u64) {
        self.clock.advance(millis);
    }

    pub fn read_count(&self) -> usize {
        self.reads.get()
    }
}

impl PinManager for MockHost {
    fn allocate_multiple_pins(&mut self, pins: &[PinRequest], owner: PinOwner) -> bool {
        let requested: heapless::Vec<i8, 4> = pins.iter().map(|request| request.pin).collect();
        let _ = self.allocations.push((requested, owner));
        self.registry.allocate_multiple_pins(pins, owner)
    }

    fn deallocate_pin(&mut self, pin: i8, owner: PinOwner) -> bool {
        let _ = self.deallocations.push((pin, owner));
        self.registry.deallocate_pin(pin, owner)
    }
}

impl Gpio for MockHost {
    fn pin_mode(&mut self, pin: u8, mode: InputMode) {
        let _ = self.pin_modes.push((pin, mode));
    }

    fn digital_read(&self, pin: u8) -> Level {
        self.reads.set(self.reads.get() + 1);
        self.levels[pin as usize]
    }
}

impl Lamp for MockHost {
    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn announce_state_change(&mut self, origin: CallMode) {
        let _ = self.announcements.push(origin);
    }
}

impl Host for MockHost {
    type Instant = TestInstant;
    type Clock = MockTimeSource;

    fn clock(&self) -> &Self::Clock {
        &self.clock
    }

    fn display(&mut self) -> Option<&mut dyn Display> {
        self.display
            .as_mut()
            .map(|display| display as &mut dyn Display)
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Builds a JSON object from a `json!` literal
pub fn object(value: serde_json::Value) -> encoder_brightness::JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
