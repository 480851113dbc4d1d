//! Blocking time abstraction.

/// Coarse blocking delay provider.
///
/// Implementations may busy-wait on a cycle count or sleep on a tick
/// counter; the engine only relies on the call returning after roughly
/// `ms` milliseconds.
pub trait Clock {
    /// Blocks for approximately `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}
