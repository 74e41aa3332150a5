use std::collections::HashMap;
use std::thread;

use stencil_core::record;
use stencil_json::{BufferPool, Config, Encoder};
use stencil_testhelpers::test;

record! {
    struct Event {
        seq: u64 => "seq",
        kind: &'static str => "kind",
        attrs: HashMap<String, i32> => "attrs",
    }
}

fn event(seq: u64) -> Event {
    Event {
        seq,
        kind: "tick",
        attrs: HashMap::from([
            ("b".to_string(), -1),
            ("a".to_string(), seq as i32),
            ("c".to_string(), 0),
        ]),
    }
}

#[test]
fn one_encoder_many_threads() {
    let encoder = Encoder::<Event>::record(Config::new().sort_map_keys(true))?;
    let pool = BufferPool::new();

    thread::scope(|s| {
        for t in 0..8u64 {
            let encoder = &encoder;
            let pool = &pool;
            s.spawn(move || {
                for i in 0..200u64 {
                    let seq = t * 1000 + i;
                    let expected =
                        format!(r#"{{"seq":{seq},"kind":"tick","attrs":{{"a":{seq},"b":-1,"c":0}}}}"#);
                    pool.with_buffer(|buf| {
                        encoder.encode(&event(seq), buf);
                        assert_eq!(buf.as_bytes(), expected.as_bytes());
                    });
                }
            });
        }
    });

    assert!(pool.idle() >= 1);
    assert!(pool.idle() <= 8);
}

#[test]
fn released_buffers_come_back_empty() {
    let encoder = Encoder::<Event>::record(Config::default())?;
    let pool = BufferPool::with_max_idle(1);

    let mut buf = pool.acquire_with_capacity(256);
    encoder.encode(&event(1), &mut buf);
    assert!(!buf.is_empty());
    let capacity = buf.capacity();
    pool.release(buf);

    let buf = pool.acquire();
    assert!(buf.is_empty());
    assert!(buf.capacity() >= capacity);
}
