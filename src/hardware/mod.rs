//! Hardware abstraction layer for the host location subsystem
//!
//! The satellite-fix adapter only consumes fixes; acquiring them is the
//! host's job. Hosts implement [`LocationProvider`] over their platform API.

pub mod location;
pub mod mock;

pub use location::{FixSource, LocationProvider, NoLocationProvider, FALLBACK_SOURCES};
pub use mock::MockLocationProvider;
