//! Core runtime for flingkit.
//!
//! Provides the pieces every animated gesture needs regardless of which
//! widget toolkit hosts it:
//! - a single-threaded [`Runtime`] whose frame callbacks are drained by the host,
//! - a [`FrameClock`] handing out cancellable [`FrameCallbackRegistration`]s,
//! - observable [`MutableState`] / [`State`] values a renderer can subscribe to
//!   or poll once per frame.
//!
//! Everything here is `Rc` based and intentionally `!Send`; all mutation happens
//! on the thread that owns the runtime.

mod frame_clock;
pub mod platform;
mod runtime;
mod state;

pub use frame_clock::{FrameCallbackRegistration, FrameClock, NextFrame};
pub use platform::{Clock, RuntimeScheduler};
pub use runtime::{DefaultScheduler, FrameCallbackId, Runtime, RuntimeHandle};
pub use state::{
    MutableState, MutationPolicy, NeverEqual, State, StructuralEqualityPolicy, Subscription,
};

/// Creates a [`MutableState`] that only notifies when the value actually changes.
pub fn mutable_state_of<T: Clone + PartialEq + 'static>(value: T) -> MutableState<T> {
    MutableState::new(value)
}

pub mod prelude {
    pub use crate::{
        mutable_state_of, FrameClock, MutableState, Runtime, RuntimeHandle, State, Subscription,
    };
}
