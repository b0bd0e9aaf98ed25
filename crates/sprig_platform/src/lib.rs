//! Sprig Rendering Hosts
//!
//! Concrete implementations of the `sprig_core` [`Host`](sprig_core::Host)
//! seam. The only host shipped here is [`HeadlessHost`], an in-memory
//! element tree for unit tests, integration tests, and CI; a real surface
//! (a DOM bridge, a terminal) plugs in at the same seam without touching
//! the runtime.

pub mod headless;

pub use headless::{ElementKey, HeadlessHost, SharedHeadlessHost};
