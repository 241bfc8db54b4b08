//! Kernel-wide telemetry counters.
//!
//! Plain relaxed atomics, following the teacher's own telemetry convention
//! (`core-events`'s `CHANNEL_SEND_FAILURES` and siblings) rather than pulling
//! in a metrics crate for three counters. The kernel is otherwise stateless
//! per spec.md §4.1 ("Each predicate... A diagnostic counter records the
//! fallback rate"); these are that counter, plus call counts so the rate is
//! computable.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-kernel-instance predicate call/fallback counters.
#[derive(Debug, Default)]
pub struct KernelStats {
    orient_calls: AtomicU64,
    orient_fallbacks: AtomicU64,
    in_circle_calls: AtomicU64,
    in_circle_fallbacks: AtomicU64,
}

impl KernelStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_orient(&self, used_fallback: bool) {
        self.orient_calls.fetch_add(1, Ordering::Relaxed);
        if used_fallback {
            self.orient_fallbacks.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(target: "tin_kernel", "orient() extended-precision fallback");
        }
    }

    pub(crate) fn record_in_circle(&self, used_fallback: bool) {
        self.in_circle_calls.fetch_add(1, Ordering::Relaxed);
        if used_fallback {
            self.in_circle_fallbacks.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(target: "tin_kernel", "in_circle() extended-precision fallback");
        }
    }

    pub fn orient_calls(&self) -> u64 {
        self.orient_calls.load(Ordering::Relaxed)
    }

    pub fn orient_fallback_rate(&self) -> f64 {
        ratio(
            self.orient_fallbacks.load(Ordering::Relaxed),
            self.orient_calls.load(Ordering::Relaxed),
        )
    }

    pub fn in_circle_calls(&self) -> u64 {
        self.in_circle_calls.load(Ordering::Relaxed)
    }

    pub fn in_circle_fallback_rate(&self) -> f64 {
        ratio(
            self.in_circle_fallbacks.load(Ordering::Relaxed),
            self.in_circle_calls.load(Ordering::Relaxed),
        )
    }
}

fn ratio(n: u64, d: u64) -> f64 {
    if d == 0 { 0.0 } else { n as f64 / d as f64 }
}
