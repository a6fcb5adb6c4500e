//! Platform abstraction traits for runtime services.
//!
//! The host decides when frames happen and what "now" means. These traits
//! let the runtime request frames and read time without depending on any
//! particular windowing system or `std::time`.

/// Schedules frames for the runtime.
///
/// Called whenever an animation registers a frame callback. Implementations
/// typically flip a flag or wake an event loop; they must be safe to share
/// across threads because hosts often wake from a different thread.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host deliver a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for pointer sampling and frame pacing.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}
