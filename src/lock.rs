//! IsolateLock - RAII tracking of the isolate a thread is currently working in.
//!
//! The lock itself is a `v8::Locker`, which also enters the isolate. This guard
//! sits on top of it and makes the locked region observable (for plugin bodies
//! and native callbacks) until it is dropped, including on early returns and
//! panics.

use std::cell::Cell;
use v8;

thread_local! {
    /// Isolate locked on this thread (if any).
    static CURRENT_ISOLATE: Cell<Option<*const v8::Isolate>> = const { Cell::new(None) };
}

/// RAII guard held around registration, context creation and evaluation.
///
/// Create this AFTER acquiring a `v8::Locker`:
///
/// ```ignore
/// let mut locker = v8::Locker::new(&mut isolate);
/// let _lock = IsolateLock::acquire(&mut locker);
/// ```
///
/// Nested guards are allowed: dropping the inner guard restores the outer one.
pub struct IsolateLock {
    isolate: *const v8::Isolate,
    previous: Option<*const v8::Isolate>,
}

impl IsolateLock {
    /// Mark `isolate` as locked by the current thread until the guard is dropped.
    ///
    /// The isolate must already be locked via `v8::Locker`.
    pub fn acquire(isolate: &mut v8::Isolate) -> Self {
        let isolate_ptr = isolate as *const v8::Isolate;
        let previous = CURRENT_ISOLATE.with(|c| c.replace(Some(isolate_ptr)));

        tracing::trace!(
            nested = previous.is_some(),
            "Isolate lock acquired: {:p}",
            isolate_ptr
        );

        Self {
            isolate: isolate_ptr,
            previous,
        }
    }

    /// Whether any isolate is locked on this thread.
    pub fn is_held() -> bool {
        CURRENT_ISOLATE.with(|c| c.get().is_some())
    }

    /// Whether `isolate` is the one locked on this thread.
    pub fn is_held_for(isolate: &v8::Isolate) -> bool {
        let ptr = isolate as *const v8::Isolate;
        CURRENT_ISOLATE.with(|c| c.get() == Some(ptr))
    }
}

impl Drop for IsolateLock {
    fn drop(&mut self) {
        CURRENT_ISOLATE.with(|c| c.set(self.previous));
        tracing::trace!("Isolate lock released: {:p}", self.isolate);
    }
}
