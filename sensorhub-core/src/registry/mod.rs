//! Endpoint registry
//!
//! Fixed-size table of endpoints, filled at startup and never shrunk.
//! Lookup is a linear scan; the table holds a few dozen entries at most.

mod endpoint;

pub use endpoint::{Schedule, SensorEndpoint, Source};

use heapless::Vec;

use crate::config::{EndpointName, MAX_ENDPOINTS};
use crate::error::SchedulerError;

/// Index of a registered endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EndpointHandle(u8);

impl EndpointHandle {
    /// Position in the registry table
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Table of all endpoints on the board
pub struct Registry<'a> {
    endpoints: Vec<SensorEndpoint<'a>, MAX_ENDPOINTS>,
}

impl<'a> Registry<'a> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            endpoints: Vec::new(),
        }
    }

    /// Register a source under a unique name
    pub fn register(
        &mut self,
        name: &str,
        source: Source<'a>,
    ) -> Result<EndpointHandle, SchedulerError> {
        if self.lookup(name).is_some() {
            return Err(SchedulerError::DuplicateName);
        }

        let mut stored = EndpointName::new();
        stored
            .push_str(name)
            .map_err(|_| SchedulerError::NameTooLong)?;

        let handle = EndpointHandle(self.endpoints.len() as u8);
        self.endpoints
            .push(SensorEndpoint::new(stored, source))
            .map_err(|_| SchedulerError::RegistryFull)?;

        let endpoint = &self.endpoints[handle.index()];
        if endpoint.is_ready() {
            log::info!("registered endpoint {}", name);
        } else {
            log::warn!("registered endpoint {} (device not ready)", name);
        }
        Ok(handle)
    }

    /// Find an endpoint by name
    pub fn lookup(&self, name: &str) -> Option<EndpointHandle> {
        self.endpoints
            .iter()
            .position(|ep| ep.name() == name)
            .map(|i| EndpointHandle(i as u8))
    }

    /// Endpoint behind a handle
    pub fn get(&self, handle: EndpointHandle) -> Option<&SensorEndpoint<'a>> {
        self.endpoints.get(handle.index())
    }

    /// All endpoints with their handles, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (EndpointHandle, &SensorEndpoint<'a>)> {
        self.endpoints
            .iter()
            .enumerate()
            .map(|(i, ep)| (EndpointHandle(i as u8), ep))
    }

    /// Number of registered endpoints
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl Default for Registry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{DigitalInput, SensorError};

    struct Line;

    impl DigitalInput for Line {
        fn read_state(&self) -> Result<bool, SensorError> {
            Ok(false)
        }
    }

    static LINE: Line = Line;

    #[test]
    fn test_register_and_lookup() {
        let mut reg = Registry::new();
        let a = reg.register("button0", Source::Digital(&LINE)).unwrap();
        let b = reg.register("button1", Source::Digital(&LINE)).unwrap();
        assert_ne!(a, b);
        assert_eq!(reg.lookup("button1"), Some(b));
        assert_eq!(reg.lookup("nope"), None);
        assert_eq!(reg.get(a).unwrap().name(), "button0");
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_duplicate_name() {
        let mut reg = Registry::new();
        reg.register("button0", Source::Digital(&LINE)).unwrap();
        assert_eq!(
            reg.register("button0", Source::Digital(&LINE)).err(),
            Some(SchedulerError::DuplicateName)
        );
    }

    #[test]
    fn test_name_too_long() {
        let mut reg = Registry::new();
        assert_eq!(
            reg.register("a-very-long-endpoint-name", Source::Digital(&LINE))
                .err(),
            Some(SchedulerError::NameTooLong)
        );
    }

    #[test]
    fn test_registry_full() {
        let mut reg = Registry::new();
        let names = [
            "e0", "e1", "e2", "e3", "e4", "e5", "e6", "e7", "e8", "e9", "e10", "e11", "e12",
            "e13", "e14", "e15",
        ];
        for name in names {
            reg.register(name, Source::Digital(&LINE)).unwrap();
        }
        assert_eq!(
            reg.register("e16", Source::Digital(&LINE)).err(),
            Some(SchedulerError::RegistryFull)
        );
    }
}
