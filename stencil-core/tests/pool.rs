use std::thread;

use stencil_core::{Buffer, BufferPool};
use stencil_testhelpers::test;

#[test]
fn acquire_allocates_when_empty() {
    let pool = BufferPool::new();
    assert_eq!(pool.idle(), 0);
    let buf = pool.acquire();
    assert!(buf.is_empty());
    pool.release(buf);
    assert_eq!(pool.idle(), 1);
}

#[test]
fn capacity_hint_grows_reused_buffers() {
    let pool = BufferPool::new();
    pool.release(Buffer::with_capacity(8));
    let buf = pool.acquire_with_capacity(1024);
    assert!(buf.capacity() >= 1024);
    assert_eq!(pool.idle(), 0);
}

#[test]
fn released_buffers_are_reset() {
    let pool = BufferPool::new();
    let mut buf = pool.acquire();
    buf.push_str("{\"stale\":true}");
    pool.release(buf);
    let again = pool.acquire();
    assert!(again.is_empty());
    assert!(again.capacity() > 0);
}

#[test]
fn idle_buffers_are_capped() {
    let pool = BufferPool::with_max_idle(2);
    for _ in 0..5 {
        pool.release(Buffer::new());
    }
    assert_eq!(pool.idle(), 2);
}

#[test]
fn with_buffer_returns_the_closure_result() {
    let pool = BufferPool::new();
    let len = pool.with_buffer(|buf| {
        buf.push_str("[]");
        buf.len()
    });
    assert_eq!(len, 2);
    assert_eq!(pool.idle(), 1);
}

#[test]
fn shared_between_threads() {
    let pool = BufferPool::new();
    thread::scope(|s| {
        for t in 0..4 {
            let pool = &pool;
            s.spawn(move || {
                for i in 0..100 {
                    pool.with_buffer(|buf| {
                        assert!(buf.is_empty());
                        buf.push_str(&format!("{t}:{i}"));
                    });
                }
            });
        }
    });
    assert!(pool.idle() <= 4);
}
