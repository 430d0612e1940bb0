//! Shared output buffer with atomic slot reservation.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::types::Measurement;

/// A fixed-capacity measurement buffer that concurrent partition workers fill
/// through reserved, disjoint slot ranges.
///
/// The cursor is the only cross-partition shared state of the whole kernel
/// pass. Reservation uses a relaxed fetch-add: uniqueness of the returned
/// ranges is all the algorithm needs, and the caller joins every worker
/// before reading the buffer back.
pub(crate) struct MeasurementSink<'a> {
    slots: &'a [UnsafeCell<Measurement>],
    cursor: AtomicUsize,
}

// SAFETY: slots are only written through `write`, whose contract restricts
// every caller to indices inside a range it obtained from `reserve`; distinct
// `reserve` calls return disjoint ranges.
unsafe impl Sync for MeasurementSink<'_> {}

impl<'a> MeasurementSink<'a> {
    pub(crate) fn new(buf: &'a mut [Measurement]) -> Self {
        // SAFETY: `UnsafeCell<Measurement>` has the same layout as
        // `Measurement`, and the exclusive borrow of `buf` is held by the
        // sink for its whole lifetime.
        let slots =
            unsafe { &*(buf as *mut [Measurement] as *const [UnsafeCell<Measurement>]) };
        Self {
            slots,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Reserve `count` consecutive output slots, returning the base index.
    pub(crate) fn reserve(&self, count: usize) -> usize {
        let base = self.cursor.fetch_add(count, Ordering::Relaxed);
        debug_assert!(
            base + count <= self.slots.len(),
            "output reservation exceeds the one-measurement-per-cell bound"
        );
        base
    }

    /// Write one measurement into a reserved slot.
    ///
    /// # Safety
    ///
    /// `slot` must lie within a range the caller obtained from [`reserve`],
    /// and no slot may be written more than once.
    ///
    /// [`reserve`]: MeasurementSink::reserve
    pub(crate) unsafe fn write(&self, slot: usize, measurement: Measurement) {
        // Slice indexing keeps even a violated reservation bound from
        // touching memory outside the buffer.
        unsafe { *self.slots[slot].get() = measurement };
    }

    /// Number of slots handed out so far.
    pub(crate) fn written(&self) -> usize {
        self.cursor.load(Ordering::Relaxed).min(self.slots.len())
    }
}
