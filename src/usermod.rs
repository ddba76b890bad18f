//! The plugin interface the host dispatches to.

use crate::host::Host;
use crate::types::UsermodId;
use alloc::string::String;
use serde_json::{Map, Value};

/// JSON object handed to usermod hooks.
pub type JsonObject = Map<String, Value>;

/// Callbacks a usermod implements to run inside the host.
///
/// The host calls [`setup`](Usermod::setup) once at boot after
/// [`read_from_config`](Usermod::read_from_config), then
/// [`run`](Usermod::run) repeatedly from its main loop. Every hook must
/// return quickly: the host is cooperative and a blocking usermod stalls the
/// LEDs and the network stack.
pub trait Usermod<H: Host> {
    /// Called once at boot. The network is not up yet.
    fn setup(&mut self, host: &mut H);

    /// Called every time the network (re)connects.
    fn connected(&mut self, _host: &mut H) {}

    /// Called continuously from the host's main loop.
    fn run(&mut self, host: &mut H);

    /// Adds entries to the info object of the JSON API.
    fn add_to_json_info(&self, _root: &mut JsonObject) {}

    /// Adds entries to the state object of the JSON API.
    fn add_to_json_state(&self, _root: &mut JsonObject) {}

    /// Receives state sent by JSON API clients.
    fn read_from_json_state(&mut self, _host: &mut H, _root: &JsonObject) {}

    /// Stores persistent settings into the host configuration.
    fn add_to_config(&self, _root: &mut JsonObject) {}

    /// Loads persistent settings from the host configuration.
    ///
    /// Called before `setup` at boot and again whenever settings are saved.
    /// Returns true if the stored configuration is complete for this version
    /// of the usermod, false if it was missing or written by an older one.
    fn read_from_config(&mut self, _host: &mut H, _root: &JsonObject) -> bool {
        true
    }

    /// Identity of this usermod type.
    fn id(&self) -> UsermodId {
        UsermodId::UNSPECIFIED
    }
}
