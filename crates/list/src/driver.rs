//! Binding an observable sequence to rendered nodes.
//!
//! A [`BoundList`] is an [`OperableList`] whose edits are mirrored onto nodes
//! in a [`NodeContainer`]: `add` renders and inserts a node, `remove_at` runs
//! the exit effect and detaches the node afterwards, `move_item` repositions
//! (or recreates) it. [`bind_list`] subscribes a bound list to a property and
//! reconciles it on every emission.
//!
//! The logical list is updated synchronously. Exit effects may keep a node
//! attached for a while after it left the logical list, so nodes are tracked
//! by handle rather than by their position in the container.

use crate::effect::Effect;
use crate::operable::{InMemoryOperableList, OperableList};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use tracing::{debug, trace, warn};
use weft_core::{Disposable, Result};
use weft_reactive::{PropertyValue, ReadOnlyProperty, Subscription};

/// A container of rendered nodes, addressed by node handle.
pub trait NodeContainer {
    /// Node handle. Clones refer to the same node.
    type Node: Clone + 'static;

    /// Inserts `node` before `anchor`, or at the end of the list region when
    /// `anchor` is `None`.
    fn insert_before(&self, node: &Self::Node, anchor: Option<&Self::Node>);

    /// Moves an attached `node` before `anchor` (or to the end).
    fn reposition(&self, node: &Self::Node, anchor: Option<&Self::Node>) {
        self.insert_before(node, anchor);
    }

    /// Detaches `node`. Fails with [`weft_core::Error::Detached`] when it is
    /// not attached.
    fn detach(&self, node: &Self::Node) -> Result<()>;

    /// Returns whether `node` is currently attached.
    fn is_attached(&self, node: &Self::Node) -> bool;
}

/// How a bound list realizes `move_item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveMode {
    /// Keep the node and reposition it.
    #[default]
    Reposition,
    /// Remove the node with its exit effect and render a new one.
    Recreate,
}

/// Bound list settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverConfig {
    pub move_mode: MoveMode,
}

impl DriverConfig {
    /// Creates a config with the given move mode.
    pub fn with_move_mode(move_mode: MoveMode) -> Self {
        Self { move_mode }
    }
}

/// Renders the node for an item at an index.
pub type RenderFn<T, N> = Rc<dyn Fn(usize, &T) -> N>;

/// An [`OperableList`] mirrored onto a [`NodeContainer`].
pub struct BoundList<T, C: NodeContainer> {
    items: InMemoryOperableList<T>,
    nodes: Vec<C::Node>,
    container: Rc<C>,
    effect: Rc<dyn Effect<C::Node>>,
    render: RenderFn<T, C::Node>,
    config: DriverConfig,
}

impl<T, C> BoundList<T, C>
where
    T: PartialEq,
    C: NodeContainer + 'static,
{
    /// Creates an empty bound list.
    pub fn new(
        container: Rc<C>,
        effect: Rc<dyn Effect<C::Node>>,
        render: RenderFn<T, C::Node>,
        config: DriverConfig,
    ) -> Self {
        Self {
            items: InMemoryOperableList::default(),
            nodes: Vec::new(),
            container,
            effect,
            render,
            config,
        }
    }

    /// Renders `items` at the end of the container without enter effects.
    pub fn populate(&mut self, items: Vec<T>) {
        for item in &items {
            let node = (self.render)(self.nodes.len(), item);
            self.container.insert_before(&node, None);
            self.nodes.push(node);
        }
        let mut all = core::mem::take(&mut self.items).into_inner();
        all.extend(items);
        self.items = InMemoryOperableList::new(all);
    }

    /// Detaches every live node immediately, without exit effects.
    pub fn detach_all(&mut self) {
        for node in self.nodes.drain(..) {
            detach_if_attached(&*self.container, &node);
        }
        self.items = InMemoryOperableList::default();
    }

    /// Returns the logical items.
    #[inline]
    pub fn items(&self) -> &[T] {
        self.items.items()
    }

    /// Returns the live node of each logical item, in order.
    #[inline]
    pub fn nodes(&self) -> &[C::Node] {
        &self.nodes
    }

    /// Returns how many edits were applied since the last rebuild.
    #[inline]
    pub fn modification_count(&self) -> usize {
        self.items.modification_count()
    }
}

impl<T, C> OperableList<T> for BoundList<T, C>
where
    T: PartialEq,
    C: NodeContainer + 'static,
{
    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    fn get(&self, index: usize) -> &T {
        self.items.get(index)
    }

    fn add(&mut self, index: usize, item: T) {
        let node = (self.render)(index, &item);
        self.container.insert_before(&node, self.nodes.get(index));
        self.effect.enter(&node);
        self.nodes.insert(index, node);
        self.items.add(index, item);
    }

    fn remove_at(&mut self, index: usize) -> T {
        let node = self.nodes.remove(index);
        let container = Rc::clone(&self.container);
        let exiting = node.clone();
        self.effect.exit(
            &node,
            alloc::boxed::Box::new(move || detach_if_attached(&*container, &exiting)),
        );
        self.items.remove_at(index)
    }

    fn move_item(&mut self, from: usize, to: usize) {
        match self.config.move_mode {
            MoveMode::Reposition => {
                let node = self.nodes.remove(from);
                self.container.reposition(&node, self.nodes.get(to));
                self.nodes.insert(to, node);
                self.items.move_item(from, to);
            }
            MoveMode::Recreate => {
                let item = self.remove_at(from);
                self.add(to, item);
            }
        }
    }
}

/// Detaches `node` unless something already did.
pub(crate) fn detach_if_attached<C: NodeContainer + ?Sized>(container: &C, node: &C::Node) {
    if !container.is_attached(node) {
        warn!("node was already detached when its removal completed");
        return;
    }
    if let Err(err) = container.detach(node) {
        warn!(%err, "failed to detach node");
    }
}

/// A property value usable as the source of a bound list.
///
/// `None` means "no list": the bound list is torn down and rebuilt from
/// scratch when a list appears again.
pub trait ItemSequence: PropertyValue {
    type Item: PartialEq + Clone + 'static;

    fn items(&self) -> Option<&[Self::Item]>;
}

impl<T: PropertyValue> ItemSequence for Vec<T> {
    type Item = T;

    fn items(&self) -> Option<&[T]> {
        Some(self)
    }
}

impl<T: PropertyValue> ItemSequence for Option<Vec<T>> {
    type Item = T;

    fn items(&self) -> Option<&[T]> {
        self.as_deref()
    }
}

struct ListDriver<T, C: NodeContainer> {
    container: Rc<C>,
    effect: Rc<dyn Effect<C::Node>>,
    render: RenderFn<T, C::Node>,
    config: DriverConfig,
    bound: RefCell<Option<BoundList<T, C>>>,
    pending: RefCell<Option<Option<Vec<T>>>>,
    busy: Cell<bool>,
}

impl<T, C> ListDriver<T, C>
where
    T: PartialEq + Clone + 'static,
    C: NodeContainer + 'static,
{
    /// Applies `next`, queueing it if an update is already running.
    fn receive(&self, next: Option<Vec<T>>) {
        *self.pending.borrow_mut() = Some(next);
        if self.busy.replace(true) {
            trace!("list update queued behind the one in progress");
            return;
        }
        loop {
            let next = self.pending.borrow_mut().take();
            match next {
                Some(next) => self.apply(next),
                None => break,
            }
        }
        self.busy.set(false);
    }

    fn apply(&self, next: Option<Vec<T>>) {
        // Out of the cell while user code runs, so accessors never hit a borrow.
        let current = self.bound.borrow_mut().take();
        let updated = match (next, current) {
            (None, Some(mut list)) => {
                debug!(len = list.len(), "bound list torn down");
                list.detach_all();
                None
            }
            (None, None) => None,
            (Some(items), Some(mut list)) => {
                list.reconcile_to(&items);
                Some(list)
            }
            (Some(items), None) => {
                debug!(len = items.len(), "bound list rebuilt");
                let mut list = BoundList::new(
                    Rc::clone(&self.container),
                    Rc::clone(&self.effect),
                    Rc::clone(&self.render),
                    self.config,
                );
                list.populate(items);
                Some(list)
            }
        };
        *self.bound.borrow_mut() = updated;
    }
}

/// A live binding created by [`bind_list`].
///
/// Dropping the binding leaves it active; call [`dispose`](Disposable::dispose)
/// to stop following the source. Rendered nodes stay where they are.
///
/// While an update is being applied (from `render` or an effect), the
/// accessors report no list.
pub struct ListBinding<T, C: NodeContainer> {
    driver: Rc<ListDriver<T, C>>,
    subscription: Subscription,
}

impl<T, C> ListBinding<T, C>
where
    T: PartialEq + Clone + 'static,
    C: NodeContainer + 'static,
{
    /// Returns the logical items, or `None` while the source holds no list.
    pub fn items(&self) -> Option<Vec<T>> {
        self.driver
            .bound
            .borrow()
            .as_ref()
            .map(|list| list.items().to_vec())
    }

    /// Returns the live nodes, in logical order.
    pub fn nodes(&self) -> Vec<C::Node> {
        self.driver
            .bound
            .borrow()
            .as_ref()
            .map(|list| list.nodes().to_vec())
            .unwrap_or_default()
    }

    /// Returns the edits applied since the last rebuild.
    pub fn modification_count(&self) -> usize {
        self.driver
            .bound
            .borrow()
            .as_ref()
            .map_or(0, BoundList::modification_count)
    }
}

impl<T, C: NodeContainer> Disposable for ListBinding<T, C> {
    fn dispose(&self) {
        self.subscription.dispose();
    }
}

/// Keeps the nodes in `container` in sync with the sequence in `source`.
///
/// Each emission is reconciled against the current bound list. A switch
/// between `None` and a list tears the bound list down or rebuilds it, and a
/// rebuild renders nodes without enter effects. `render` receives the index
/// the item is inserted at.
pub fn bind_list<P, C, E, R>(
    source: &P,
    container: Rc<C>,
    effect: E,
    config: DriverConfig,
    render: R,
) -> ListBinding<<P::Value as ItemSequence>::Item, C>
where
    P: ReadOnlyProperty,
    P::Value: ItemSequence,
    C: NodeContainer + 'static,
    E: Effect<C::Node> + 'static,
    R: Fn(usize, &<P::Value as ItemSequence>::Item) -> C::Node + 'static,
{
    let driver = Rc::new(ListDriver {
        container,
        effect: Rc::new(effect),
        render: Rc::new(render),
        config,
        bound: RefCell::new(None),
        pending: RefCell::new(None),
        busy: Cell::new(false),
    });

    let listener = Rc::clone(&driver);
    let subscription = source.on_next(move |value: &P::Value| {
        listener.receive(value.items().map(<[_]>::to_vec));
    });

    ListBinding {
        driver,
        subscription,
    }
}
