//! Sprig Widget Library
//!
//! Leaf UI components built on the `sprig_core` component runtime. Each
//! widget is a `create` constructor that seeds component state and builds
//! the widget's lifecycle binding; everything else (`get`/`set`,
//! `observe`, `on`/`fire`, `mount`/`teardown`) is the runtime's uniform
//! surface.

pub mod checkbox;
pub mod input;
