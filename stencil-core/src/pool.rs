use core::cell::Cell;
use core::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::Buffer;

/// Number of segments in a pool.
const NUM_SEGMENTS: usize = 16;

/// Idle buffers kept per segment unless configured otherwise.
const DEFAULT_MAX_IDLE: usize = 64;

static THREAD_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    /// Segment this thread acquires from and releases to.
    static SEGMENT_INDEX: Cell<usize> = Cell::new(
        THREAD_ID_COUNTER.fetch_add(1, Ordering::Relaxed) % NUM_SEGMENTS
    );
}

/// A free list of [`Buffer`]s shared between threads.
///
/// The pool is split into segments, each behind its own lock; every thread
/// sticks to one segment, so threads that encode concurrently rarely contend.
/// Buffers carry no size class: whichever idle buffer a segment holds is
/// handed out.
///
/// ```
/// use stencil_core::BufferPool;
///
/// let pool = BufferPool::new();
/// let mut buf = pool.acquire();
/// buf.push_str("[1,2,3]");
/// pool.release(buf);
///
/// let buf = pool.acquire();
/// assert!(buf.is_empty());
/// ```
pub struct BufferPool {
    segments: [Mutex<Vec<Buffer>>; NUM_SEGMENTS],
    max_idle: usize,
}

impl BufferPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    /// Creates an empty pool that keeps at most `max_idle` idle buffers per
    /// segment. Buffers released beyond that are dropped.
    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            segments: core::array::from_fn(|_| Mutex::new(Vec::new())),
            max_idle,
        }
    }

    #[inline]
    fn segment(&self) -> &Mutex<Vec<Buffer>> {
        &self.segments[SEGMENT_INDEX.with(Cell::get)]
    }

    /// Takes an idle buffer, or allocates a new one if none is available.
    ///
    /// The buffer is always empty.
    #[inline]
    pub fn acquire(&self) -> Buffer {
        self.segment().lock().pop().unwrap_or_default()
    }

    /// Takes an idle buffer able to hold at least `capacity` bytes.
    ///
    /// An idle buffer that is too small is grown rather than replaced.
    pub fn acquire_with_capacity(&self, capacity: usize) -> Buffer {
        match self.segment().lock().pop() {
            Some(mut buf) => {
                buf.reserve(capacity);
                buf
            }
            None => Buffer::with_capacity(capacity),
        }
    }

    /// Returns a buffer to the pool.
    ///
    /// The buffer is reset first, so the next [`acquire`](Self::acquire) sees
    /// it empty.
    #[inline]
    pub fn release(&self, mut buf: Buffer) {
        buf.reset();
        let mut idle = self.segment().lock();
        if idle.len() < self.max_idle {
            idle.push(buf);
        }
    }

    /// Runs `f` with a pooled buffer and releases it afterwards.
    pub fn with_buffer<R>(&self, f: impl FnOnce(&mut Buffer) -> R) -> R {
        let mut buf = self.acquire();
        let result = f(&mut buf);
        self.release(buf);
        result
    }

    /// Total number of idle buffers across all segments.
    pub fn idle(&self) -> usize {
        self.segments.iter().map(|segment| segment.lock().len()).sum()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle())
            .field("max_idle", &self.max_idle)
            .finish()
    }
}
