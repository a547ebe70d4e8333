//! Frame scheduling for deferred properties.
//!
//! A [`FrameScheduler`] runs callbacks at the next rendering frame. Each
//! thread has one installed scheduler, replaceable with [`set_scheduler`].
//! When none is installed, the default is a [`FrameQueue`] that callers
//! advance with [`run_frame`]. With the `wasm` feature on `wasm32` the
//! default is [`AnimationFrameScheduler`] instead.

use crate::property::{Property, ReadOnlyProperty};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use tracing::trace;

/// A callback waiting for the next frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Runs callbacks at the next rendering frame.
pub trait FrameScheduler {
    /// Queues `callback` for the next frame.
    fn request_frame(&self, callback: FrameCallback);
}

/// Manually advanced frame queue.
///
/// Callbacks requested while a frame is running are kept for the next one.
#[derive(Default)]
pub struct FrameQueue {
    pending: RefCell<Vec<FrameCallback>>,
}

impl FrameQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every callback queued before this call and returns how many ran.
    pub fn run_frame(&self) -> usize {
        let batch = core::mem::take(&mut *self.pending.borrow_mut());
        let count = batch.len();
        for callback in batch {
            callback();
        }
        trace!(count, "frame ran");
        count
    }

    /// Returns the number of queued callbacks.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push(callback);
    }
}

/// Schedules callbacks with the browser's `requestAnimationFrame`.
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationFrameScheduler;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let Some(window) = web_sys::window() else {
            tracing::warn!("no window available, running frame callback immediately");
            callback();
            return;
        };
        request_or_run(callback, |frame| {
            let closure = Closure::once_into_js(move || frame());
            window
                .request_animation_frame(closure.unchecked_ref::<js_sys::Function>())
                .map(|_| ())
        });
    }
}

/// Hands `callback` to `request`, running it at once if the request fails.
///
/// The callback runs at most once either way.
#[cfg_attr(not(all(feature = "wasm", target_arch = "wasm32")), allow(dead_code))]
fn request_or_run<E, R>(callback: FrameCallback, request: R)
where
    E: core::fmt::Debug,
    R: FnOnce(FrameCallback) -> Result<(), E>,
{
    let slot = Rc::new(Cell::new(Some(callback)));
    let scheduled = Rc::clone(&slot);
    let result = request(Box::new(move || {
        if let Some(callback) = scheduled.take() {
            callback();
        }
    }));
    if let Err(err) = result {
        tracing::warn!(?err, "frame request failed, running frame callback immediately");
        if let Some(callback) = slot.take() {
            callback();
        }
    }
}

std::thread_local! {
    static DEFAULT_QUEUE: Rc<FrameQueue> = Rc::new(FrameQueue::new());
    static INSTALLED: RefCell<Option<Rc<dyn FrameScheduler>>> = const { RefCell::new(None) };
}

/// Installs the scheduler used by `deferred()` on this thread.
pub fn set_scheduler(scheduler: Rc<dyn FrameScheduler>) {
    INSTALLED.with(|installed| *installed.borrow_mut() = Some(scheduler));
}

/// Returns this thread's scheduler.
pub fn scheduler() -> Rc<dyn FrameScheduler> {
    if let Some(installed) = INSTALLED.with(|installed| installed.borrow().clone()) {
        return installed;
    }
    default_scheduler()
}

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
fn default_scheduler() -> Rc<dyn FrameScheduler> {
    Rc::new(AnimationFrameScheduler)
}

#[cfg(not(all(feature = "wasm", target_arch = "wasm32")))]
fn default_scheduler() -> Rc<dyn FrameScheduler> {
    DEFAULT_QUEUE.with(|queue| Rc::clone(queue) as Rc<dyn FrameScheduler>)
}

/// Advances this thread's default [`FrameQueue`] by one frame.
pub fn run_frame() -> usize {
    DEFAULT_QUEUE.with(|queue| queue.run_frame())
}

struct Deferred<T> {
    latest: RefCell<Option<T>>,
    scheduled: Cell<bool>,
}

/// Follows `source` one frame late, delivering only the latest value.
///
/// Values emitted between two frames are coalesced: when the frame runs the
/// result receives whatever `source` emitted last.
pub fn deferred_on<P>(source: &P, scheduler: Rc<dyn FrameScheduler>) -> Property<P::Value>
where
    P: ReadOnlyProperty,
{
    let result = Property::new(source.get());
    let state = Rc::new(Deferred {
        latest: RefCell::new(None),
        scheduled: Cell::new(false),
    });
    let target = result.clone();
    let primed = Cell::new(false);

    source.on_next(move |value| {
        if !primed.replace(true) {
            return;
        }
        *state.latest.borrow_mut() = Some(value.clone());
        if state.scheduled.replace(true) {
            return;
        }
        trace!("deferred update scheduled");
        let state = Rc::clone(&state);
        let target = target.clone();
        scheduler.request_frame(Box::new(move || {
            state.scheduled.set(false);
            let latest = state.latest.borrow_mut().take();
            if let Some(value) = latest {
                target.set(value);
            }
        }));
    });

    result
}
