//! Sprig Core Runtime
//!
//! This crate provides the component runtime the Sprig widget library is
//! built on:
//!
//! - **State Store**: flat key/value component state with immutable-replace
//!   updates and changed/old/new diffing
//! - **Notification Dispatcher**: immediate and deferred observer tiers
//!   around a fixed-position render step, plus an independent named-event
//!   channel
//! - **Lifecycle Binding**: the mount/update/teardown fragment bound to one
//!   rendered output, behind the [`Host`] rendering seam
//!
//! # Example
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use sprig_core::{state, Component, ComponentOptions, ObserveOptions};
//! # fn demo<H: sprig_core::Host>(host: Rc<RefCell<H>>, fragment: impl FnOnce(&mut H, &sprig_core::StateMap, &sprig_core::WeakComponent<H>) -> Box<dyn sprig_core::Fragment<H>>) -> sprig_core::Result<()> {
//! let component = Component::new(
//!     host,
//!     ComponentOptions::new().data(state! { "value": "a" }),
//!     fragment,
//! )?;
//!
//! component.observe(
//!     "value",
//!     |_, new, old| println!("value: {old:?} -> {new}"),
//!     ObserveOptions::new().defer(true),
//! )?;
//!
//! component.set(state! { "value": "b" })?;
//! # Ok(())
//! # }
//! ```

pub mod component;
pub mod error;
pub mod events;
pub mod fragment;
pub mod host;
pub mod observe;
pub mod state;

pub use component::{
    Component, ComponentOptions, ObserveOptions, Subscription, WeakComponent, TEARDOWN_EVENT,
};
pub use error::{LifecycleError, Result};
pub use fragment::Fragment;
pub use host::{AttrValue, EventData, EventKind, Host, HostEvent, Listener, ListenerId};
pub use state::{truthy, StateMap, Value};
