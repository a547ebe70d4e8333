//! Enter and exit effects for bound list nodes.

use alloc::boxed::Box;
use alloc::rc::Rc;

/// Called once an exit effect has finished.
pub type ExitCallback = Box<dyn FnOnce()>;

/// Visual transition applied when a node enters or leaves a bound list.
///
/// Effects only change how a node looks. The logical list is updated before
/// any effect starts, so a new reconciliation may run while effects from an
/// earlier one are still in flight.
pub trait Effect<N> {
    /// Starts the transition of a node that was just inserted.
    fn enter(&self, node: &N);

    /// Starts the transition of a node that is leaving, then calls `done`.
    ///
    /// `done` detaches the node. It may run after the node was already
    /// detached by a rebuild, which is tolerated.
    fn exit(&self, node: &N, done: ExitCallback);
}

/// No transition; nodes appear and disappear immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEffect;

impl<N> Effect<N> for NoEffect {
    fn enter(&self, _node: &N) {}

    fn exit(&self, _node: &N, done: ExitCallback) {
        done();
    }
}

impl<N, E: Effect<N> + ?Sized> Effect<N> for Rc<E> {
    fn enter(&self, node: &N) {
        (**self).enter(node)
    }

    fn exit(&self, node: &N, done: ExitCallback) {
        (**self).exit(node, done)
    }
}
