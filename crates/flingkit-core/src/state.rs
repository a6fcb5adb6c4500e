//! Observable values.
//!
//! A [`MutableState`] is the single writer-side handle for an animated or
//! gesture-driven quantity; [`State`] is the read-only view handed to
//! renderers. Readers either poll ([`State::get`] plus [`State::version`])
//! once per frame or [`subscribe`](State::subscribe) to every change.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

/// Decides whether a write counts as a change.
pub trait MutationPolicy<T>: 'static {
    fn equivalent(&self, a: &T, b: &T) -> bool;
}

/// Writes of an equal value are ignored.
pub struct StructuralEqualityPolicy;

impl<T: PartialEq> MutationPolicy<T> for StructuralEqualityPolicy {
    fn equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Every write notifies, even when the value is unchanged.
pub struct NeverEqual;

impl<T> MutationPolicy<T> for NeverEqual {
    fn equivalent(&self, _a: &T, _b: &T) -> bool {
        false
    }
}

type Listener<T> = Rc<dyn Fn(&T)>;

struct StateCell<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    policy: Box<dyn MutationPolicy<T>>,
    listeners: RefCell<SmallVec<[(u64, Listener<T>); 2]>>,
    next_listener_id: Cell<u64>,
}

trait ListenerSet {
    fn remove_listener(&self, id: u64);
}

impl<T> ListenerSet for StateCell<T> {
    fn remove_listener(&self, id: u64) {
        self.listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }
}

fn add_listener<T: Clone + 'static>(
    cell: &Rc<StateCell<T>>,
    listener: impl Fn(&T) + 'static,
) -> Subscription {
    let id = cell.next_listener_id.get();
    cell.next_listener_id.set(id + 1);
    cell.listeners.borrow_mut().push((id, Rc::new(listener)));
    let owner: Weak<dyn ListenerSet> = Rc::downgrade(cell) as Weak<dyn ListenerSet>;
    Subscription {
        owner,
        id: Some(id),
    }
}

impl<T: Clone + 'static> StateCell<T> {
    fn notify(&self) {
        // Snapshot both the listeners and the value so callbacks are free to
        // write back into this state or (un)subscribe.
        let listeners: SmallVec<[Listener<T>; 2]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        if listeners.is_empty() {
            return;
        }
        let value = self.value.borrow().clone();
        for listener in listeners {
            listener(&value);
        }
    }
}

/// Writable observable value.
pub struct MutableState<T> {
    cell: Rc<StateCell<T>>,
}

impl<T: Clone + 'static> MutableState<T> {
    pub fn new(value: T) -> Self
    where
        T: PartialEq,
    {
        Self::with_policy(value, StructuralEqualityPolicy)
    }

    pub fn with_policy(value: T, policy: impl MutationPolicy<T>) -> Self {
        Self {
            cell: Rc::new(StateCell {
                value: RefCell::new(value),
                version: Cell::new(0),
                policy: Box::new(policy),
                listeners: RefCell::new(SmallVec::new()),
                next_listener_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }

    pub fn value(&self) -> T {
        self.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.value.borrow())
    }

    /// Stores `value` and notifies listeners. Returns `false` when the policy
    /// considered the write a no-op.
    pub fn set_value(&self, value: T) -> bool {
        {
            let mut current = self.cell.value.borrow_mut();
            if self.cell.policy.equivalent(&current, &value) {
                return false;
            }
            *current = value;
        }
        self.cell.version.set(self.cell.version.get() + 1);
        self.cell.notify();
        true
    }

    pub fn set(&self, value: T) {
        self.set_value(value);
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut next = self.get();
        let result = f(&mut next);
        self.set_value(next);
        result
    }

    /// Incremented on every effective write.
    pub fn version(&self) -> u64 {
        self.cell.version.get()
    }

    pub fn as_state(&self) -> State<T> {
        State {
            cell: Rc::clone(&self.cell),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        add_listener(&self.cell, listener)
    }
}

impl<T> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableState")
            .field("value", &*self.cell.value.borrow())
            .field("version", &self.cell.version.get())
            .finish()
    }
}

/// Read-only view of a [`MutableState`].
pub struct State<T> {
    cell: Rc<StateCell<T>>,
}

impl<T: Clone + 'static> State<T> {
    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }

    pub fn value(&self) -> T {
        self.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.value.borrow())
    }

    pub fn version(&self) -> u64 {
        self.cell.version.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        add_listener(&self.cell, listener)
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State")
            .field(&*self.cell.value.borrow())
            .finish()
    }
}

/// Keeps a listener attached; dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    owner: Weak<dyn ListenerSet>,
    id: Option<u64>,
}

impl Subscription {
    /// Leaves the listener attached for the lifetime of the state.
    pub fn detach(mut self) {
        self.id = None;
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let (Some(id), Some(owner)) = (self.id.take(), self.owner.upgrade()) {
            owner.remove_listener(id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
