//! Reference pin ownership registry.

use crate::host::PinManager;
use crate::types::{PinOwner, PinRequest};

/// Errors that can occur while allocating pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number is negative or beyond the registry's capacity.
    InvalidPin(i8),

    /// Pin is already owned by another owner.
    AlreadyAllocated {
        /// The requested pin
        pin: i8,
        /// Who holds it
        owner: PinOwner,
    },

    /// Pin is not owned by the owner that tried to release it.
    NotOwned(i8),

    /// The host's pin manager refused the allocation.
    Refused,

    /// More pins requested than the registry can hold.
    TooManyPins {
        /// Number of pins in the request
        requested: usize,
        /// Registry capacity
        capacity: usize,
    },
}

impl core::fmt::Display for PinError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PinError::InvalidPin(pin) => write!(f, "pin {} is not a valid GPIO", pin),
            PinError::AlreadyAllocated { pin, owner } => {
                write!(f, "pin {} is already allocated to {:?}", pin, owner)
            }
            PinError::NotOwned(pin) => write!(f, "pin {} is not owned by the caller", pin),
            PinError::Refused => write!(f, "pin manager refused the allocation"),
            PinError::TooManyPins {
                requested,
                capacity,
            } => write!(
                f,
                "{} pins requested, registry holds at most {}",
                requested, capacity
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PinError {}

#[derive(Debug, Clone, Copy)]
struct PinSlot {
    owner: PinOwner,
    is_output: bool,
}

/// In-memory pin ownership table for hosts with up to `MAX_PINS` GPIOs.
///
/// Batch allocations are all-or-nothing, and a pin can only be released by
/// the owner it was allocated to.
pub struct PinRegistry<const MAX_PINS: usize> {
    slots: [Option<PinSlot>; MAX_PINS],
}

impl<const MAX_PINS: usize> PinRegistry<MAX_PINS> {
    /// Creates a registry with every pin free.
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_PINS],
        }
    }

    /// Marks pins as reserved up front, e.g. flash or strapping pins.
    ///
    /// # Errors
    /// * `TooManyPins` - More pins listed than the registry can hold
    /// * Any error of [`try_allocate`](Self::try_allocate)
    pub fn reserve(&mut self, pins: &[i8], owner: PinOwner) -> Result<(), PinError> {
        let mut requests: heapless::Vec<PinRequest, MAX_PINS> = heapless::Vec::new();
        for &pin in pins {
            requests
                .push(PinRequest::input(pin))
                .map_err(|_| PinError::TooManyPins {
                    requested: pins.len(),
                    capacity: MAX_PINS,
                })?;
        }
        self.try_allocate(&requests, owner)
    }

    /// Allocates every requested pin to `owner`, or none of them.
    pub fn try_allocate(&mut self, pins: &[PinRequest], owner: PinOwner) -> Result<(), PinError> {
        for (i, request) in pins.iter().enumerate() {
            let idx = self.index(request.pin)?;
            if let Some(slot) = self.slots[idx] {
                return Err(PinError::AlreadyAllocated {
                    pin: request.pin,
                    owner: slot.owner,
                });
            }
            // Same pin listed twice in one batch
            if pins[..i].iter().any(|earlier| earlier.pin == request.pin) {
                return Err(PinError::AlreadyAllocated {
                    pin: request.pin,
                    owner,
                });
            }
        }

        for request in pins {
            let idx = self.index(request.pin)?;
            self.slots[idx] = Some(PinSlot {
                owner,
                is_output: request.is_output,
            });
        }
        Ok(())
    }

    /// Releases `pin` if it is owned by `owner`.
    pub fn try_release(&mut self, pin: i8, owner: PinOwner) -> Result<(), PinError> {
        let idx = self.index(pin)?;
        match self.slots[idx] {
            Some(slot) if slot.owner == owner => {
                self.slots[idx] = None;
                Ok(())
            }
            _ => Err(PinError::NotOwned(pin)),
        }
    }

    /// Returns the owner of `pin`, if it is allocated.
    pub fn owner(&self, pin: i8) -> Option<PinOwner> {
        let idx = self.index(pin).ok()?;
        self.slots[idx].map(|slot| slot.owner)
    }

    /// Returns true if `pin` is allocated as an output.
    pub fn is_output(&self, pin: i8) -> bool {
        self.index(pin)
            .ok()
            .and_then(|idx| self.slots[idx])
            .is_some_and(|slot| slot.is_output)
    }

    /// Returns true if `pin` is free to allocate.
    pub fn is_free(&self, pin: i8) -> bool {
        self.index(pin).is_ok_and(|idx| self.slots[idx].is_none())
    }

    /// Number of allocated pins.
    pub fn allocated_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn index(&self, pin: i8) -> Result<usize, PinError> {
        usize::try_from(pin)
            .ok()
            .filter(|&idx| idx < MAX_PINS)
            .ok_or(PinError::InvalidPin(pin))
    }
}

impl<const MAX_PINS: usize> Default for PinRegistry<MAX_PINS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MAX_PINS: usize> PinManager for PinRegistry<MAX_PINS> {
    fn allocate_multiple_pins(&mut self, pins: &[PinRequest], owner: PinOwner) -> bool {
        match self.try_allocate(pins, owner) {
            Ok(()) => true,
            Err(err) => {
                debug!("pin allocation refused: {}", err);
                false
            }
        }
    }

    fn deallocate_pin(&mut self, pin: i8, owner: PinOwner) -> bool {
        self.try_release(pin, owner).is_ok()
    }
}
