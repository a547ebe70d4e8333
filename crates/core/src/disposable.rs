//! Subscription release handles.
//!
//! A [`Disposable`] is the capability to stop exactly one subscription.
//! Disposing is idempotent: the second and later calls do nothing.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

/// A capability to release a subscription.
pub trait Disposable {
    /// Releases the subscription. Calling this more than once has no effect.
    fn dispose(&self);
}

impl<D: Disposable + ?Sized> Disposable for Box<D> {
    fn dispose(&self) {
        (**self).dispose()
    }
}

impl<D: Disposable + ?Sized> Disposable for alloc::rc::Rc<D> {
    fn dispose(&self) {
        (**self).dispose()
    }
}

/// A disposable backed by a one-shot closure.
pub struct DisposeFn {
    release: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl DisposeFn {
    /// Creates a disposable that runs `release` on the first `dispose()`.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            release: RefCell::new(Some(Box::new(release))),
        }
    }

    /// Returns true once the closure has run.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.release.borrow().is_none()
    }
}

impl Disposable for DisposeFn {
    fn dispose(&self) {
        let release = self.release.borrow_mut().take();
        if let Some(release) = release {
            release();
        }
    }
}

/// A group of disposables released together.
#[derive(Default)]
pub struct CompositeDisposable {
    members: RefCell<Vec<Box<dyn Disposable>>>,
    disposed: Cell<bool>,
}

impl CompositeDisposable {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member. Members added after the group was disposed are
    /// disposed immediately.
    pub fn add<D: Disposable + 'static>(&self, member: D) {
        if self.disposed.get() {
            member.dispose();
        } else {
            self.members.borrow_mut().push(Box::new(member));
        }
    }

    /// Returns the number of members still held.
    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    /// Returns true if the group holds no members.
    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }
}

impl Disposable for CompositeDisposable {
    fn dispose(&self) {
        self.disposed.set(true);
        let members = core::mem::take(&mut *self.members.borrow_mut());
        for member in members {
            member.dispose();
        }
    }
}
