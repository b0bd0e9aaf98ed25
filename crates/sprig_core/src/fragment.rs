//! Lifecycle binding
//!
//! A fragment is the mount/update/teardown triple bound to one piece of
//! concrete rendered output. A widget builds its fragment exactly once per
//! component instance, against the initial state: the element and its
//! native listeners exist from construction, before `mount` attaches them
//! to a host insertion point.

use crate::error::Result;
use crate::host::Host;
use crate::state::StateMap;

/// The mount/update/teardown triple over a rendered output
pub trait Fragment<H: Host> {
    /// Insert the rendered output into `target`, immediately before
    /// `anchor` if given, else appended
    fn mount(
        &mut self,
        host: &mut H,
        target: &H::Element,
        anchor: Option<&H::Element>,
    ) -> Result<()>;

    /// Refresh the output from state
    ///
    /// `changed` is the partial that triggered the update; every derived
    /// attribute is recomputed from `state` unconditionally. Cheap, because
    /// state is flat and the output is a single leaf element.
    fn update(&mut self, host: &mut H, changed: &StateMap, state: &StateMap);

    /// Remove the listeners this binding installed; when `detach`, also
    /// remove the output from its host
    ///
    /// Must tolerate a host that was already emptied externally: removal is
    /// attempted only through the binding's own element handle.
    fn teardown(&mut self, host: &mut H, detach: bool);
}
