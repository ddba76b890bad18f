//! Host-side dispatch of usermod hooks.

use crate::host::Host;
use crate::types::UsermodId;
use crate::usermod::{JsonObject, Usermod};

/// Errors that can occur while registering usermods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ManagerError {
    /// The manager is full and cannot accept more usermods.
    ManagerFull,

    /// A usermod with this id is already registered.
    DuplicateId(UsermodId),
}

impl core::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ManagerError::ManagerFull => {
                write!(f, "usermod manager is full, cannot add more usermods")
            }
            ManagerError::DuplicateId(id) => {
                write!(f, "usermod ID {} is already registered", id.0)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ManagerError {}

/// Registry of usermods installed in the host.
///
/// Each hook is forwarded to every registered usermod in registration order.
/// Usermods are borrowed, so they can live in statics or on the stack of the
/// firmware's main function.
///
/// # Type Parameters
/// * `'a` - Lifetime of the usermod borrows
/// * `H` - Host implementation type
/// * `MAX_USERMODS` - Maximum number of usermods this manager can hold
pub struct UsermodManager<'a, H: Host, const MAX_USERMODS: usize> {
    usermods: heapless::Vec<&'a mut dyn Usermod<H>, MAX_USERMODS>,
}

impl<'a, H: Host, const MAX_USERMODS: usize> UsermodManager<'a, H, MAX_USERMODS> {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self {
            usermods: heapless::Vec::new(),
        }
    }

    /// Registers a usermod.
    ///
    /// # Errors
    /// * `DuplicateId` - A usermod with the same id is registered. Usermods
    ///   reporting [`UsermodId::UNSPECIFIED`] are never considered duplicates.
    /// * `ManagerFull` - `MAX_USERMODS` usermods are already registered
    pub fn add(&mut self, usermod: &'a mut dyn Usermod<H>) -> Result<(), ManagerError> {
        let id = usermod.id();
        if id != UsermodId::UNSPECIFIED && self.contains(id) {
            return Err(ManagerError::DuplicateId(id));
        }

        self.usermods
            .push(usermod)
            .map_err(|_| ManagerError::ManagerFull)
    }

    /// Runs `setup` on every usermod.
    pub fn setup(&mut self, host: &mut H) {
        for usermod in self.usermods.iter_mut() {
            usermod.setup(host);
        }
    }

    /// Runs `connected` on every usermod.
    pub fn connected(&mut self, host: &mut H) {
        for usermod in self.usermods.iter_mut() {
            usermod.connected(host);
        }
    }

    /// Runs one main-loop pass over every usermod.
    pub fn run(&mut self, host: &mut H) {
        for usermod in self.usermods.iter_mut() {
            usermod.run(host);
        }
    }

    /// Collects JSON API info entries.
    pub fn add_to_json_info(&self, root: &mut JsonObject) {
        for usermod in self.usermods.iter() {
            usermod.add_to_json_info(root);
        }
    }

    /// Collects JSON API state entries.
    pub fn add_to_json_state(&self, root: &mut JsonObject) {
        for usermod in self.usermods.iter() {
            usermod.add_to_json_state(root);
        }
    }

    /// Forwards state received on the JSON API.
    pub fn read_from_json_state(&mut self, host: &mut H, root: &JsonObject) {
        for usermod in self.usermods.iter_mut() {
            usermod.read_from_json_state(host, root);
        }
    }

    /// Collects persistent settings from every usermod.
    pub fn add_to_config(&self, root: &mut JsonObject) {
        for usermod in self.usermods.iter() {
            usermod.add_to_config(root);
        }
    }

    /// Loads persistent settings into every usermod.
    ///
    /// Every usermod is visited even after one reports incomplete config.
    /// Returns true only if all of them reported complete config, which tells
    /// the host to rewrite the file with the missing fields.
    pub fn read_from_config(&mut self, host: &mut H, root: &JsonObject) -> bool {
        let mut all_complete = true;
        for usermod in self.usermods.iter_mut() {
            all_complete &= usermod.read_from_config(host, root);
        }
        all_complete
    }

    /// Returns the usermod registered with `id`.
    pub fn lookup(&self, id: UsermodId) -> Option<&(dyn Usermod<H> + 'a)> {
        self.usermods
            .iter()
            .find(|usermod| usermod.id() == id)
            .map(|usermod| &**usermod)
    }

    /// Returns true if a usermod with `id` is registered.
    pub fn contains(&self, id: UsermodId) -> bool {
        self.usermods.iter().any(|usermod| usermod.id() == id)
    }

    /// Returns the number of registered usermods.
    pub fn len(&self) -> usize {
        self.usermods.len()
    }

    /// Returns true if no usermods are registered.
    pub fn is_empty(&self) -> bool {
        self.usermods.is_empty()
    }
}

impl<H: Host, const MAX_USERMODS: usize> Default for UsermodManager<'_, H, MAX_USERMODS> {
    fn default() -> Self {
        Self::new()
    }
}
