//! Access serializer: the concurrency boundary. No two operations with
//! overlapping address spans may interleave, which closes the check-then-act
//! race in the write-once guard and the two-phase range commit. Disjoint
//! spans proceed concurrently. A `SpanLock` removes its span and wakes
//! waiters on drop, so release happens on every exit path.
use std::sync::{Condvar, Mutex, MutexGuard};

use smallvec::SmallVec;

use super::span::AddrSpan;

type HeldSpans = SmallVec<[AddrSpan; 4]>;

pub struct AccessSerializer {
    held: Mutex<HeldSpans>,
    released: Condvar,
}

impl AccessSerializer {
    pub fn new() -> Self {
        Self {
            held: Mutex::new(SmallVec::new()),
            released: Condvar::new(),
        }
    }

    /// Block until no held span overlaps `span`, then hold it until the
    /// returned lock drops.
    pub fn acquire(&self, span: AddrSpan) -> SpanLock<'_> {
        let mut held = self.lock_held();
        while held.iter().any(|h| h.overlaps(&span)) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(|err| err.into_inner());
        }
        held.push(span);
        SpanLock {
            serializer: self,
            span,
        }
    }

    fn release(&self, span: AddrSpan) {
        let mut held = self.lock_held();
        if let Some(pos) = held.iter().position(|h| *h == span) {
            held.swap_remove(pos);
        }
        self.released.notify_all();
    }

    fn lock_held(&self) -> MutexGuard<'_, HeldSpans> {
        self.held.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Default for AccessSerializer {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SpanLock<'a> {
    serializer: &'a AccessSerializer,
    span: AddrSpan,
}

impl SpanLock<'_> {
    #[inline(always)]
    pub fn span(&self) -> AddrSpan {
        self.span
    }
}

impl Drop for SpanLock<'_> {
    fn drop(&mut self) {
        self.serializer.release(self.span);
    }
}
