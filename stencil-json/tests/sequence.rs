use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use stencil_core::record;
use stencil_json::{
    Buffer, CompileErrorKind, Config, Encoder, EscapedString, compile_sequence_encoder,
};
use stencil_testhelpers::test;

record! {
    struct Item {
        id: u32 => "id",
        tags: Option<Vec<String>> => "tags",
    }
}

fn encode<T: stencil_json::Shaped>(value: &T) -> String {
    let encoder = Encoder::<T>::sequence(Config::default()).unwrap();
    encoder.to_string(value).unwrap()
}

#[test]
fn numbers_are_comma_separated() {
    assert_eq!(encode(&vec![1i32, -2, 3]), "[1,-2,3]");
    assert_eq!(encode(&vec![0.5f64, f64::INFINITY]), "[0.5,null]");
    assert_eq!(encode(&vec![true, false]), "[true,false]");
}

#[test]
fn empty_sequences_are_brackets() {
    assert_eq!(encode(&Vec::<u8>::new()), "[]");
    assert_eq!(encode(&Vec::<String>::new()), "[]");
    assert_eq!(encode(&Vec::<Item>::new()), "[]");
}

#[test]
fn text_elements_are_quoted() {
    assert_eq!(
        encode(&vec!["a".to_string(), "b c".to_string()]),
        r#"["a","b c"]"#
    );
    let words: &'static [&'static str] = &["x", "y"];
    assert_eq!(encode(&words), r#"["x","y"]"#);
    assert_eq!(encode(&vec!['a', 'é']), r#"["a","é"]"#);
}

#[test]
fn escaped_strings_escape_every_element() {
    let lines = vec![
        EscapedString::from("one\ttwo"),
        EscapedString::from("\"three\""),
    ];
    let json = encode(&lines);
    assert_eq!(json, r#"["one\ttwo","\"three\""]"#);
    let parsed: Vec<String> = serde_json::from_str(&json)?;
    assert_eq!(parsed, ["one\ttwo", "\"three\""]);
}

#[test]
fn nullable_elements() {
    assert_eq!(encode(&vec![Some(1u8), None, Some(3)]), "[1,null,3]");
    assert_eq!(
        encode(&vec![None, Some("s".to_string())]),
        r#"[null,"s"]"#
    );
    assert_eq!(encode(&vec![Option::<Vec<u8>>::None, Some(vec![])]), "[null,[]]");
}

#[test]
fn record_elements_use_their_plan() {
    let items = vec![
        Item {
            id: 1,
            tags: Some(vec!["new".to_string()]),
        },
        Item { id: 2, tags: None },
        Item {
            id: 3,
            tags: Some(vec![]),
        },
    ];
    insta::assert_snapshot!(
        encode(&items),
        @r#"[{"id":1,"tags":["new"]},{"id":2,"tags":null},{"id":3,"tags":[]}]"#
    );
}

#[test]
fn nested_and_pointer_elements() {
    assert_eq!(encode(&vec![vec![1u8], vec![], vec![2, 3]]), "[[1],[],[2,3]]");
    assert_eq!(encode(&vec![Box::new(4i16), Box::new(5)]), "[4,5]");
    assert_eq!(encode(&vec![Rc::new("rc".to_string())]), r#"["rc"]"#);
    assert_eq!(
        encode(&vec![Arc::new(Item { id: 8, tags: None })]),
        r#"[{"id":8,"tags":null}]"#
    );
}

#[test]
fn other_sequence_containers() {
    let mut deque = VecDeque::new();
    deque.push_back(2u64);
    deque.push_front(1);
    assert_eq!(encode(&deque), "[1,2]");
    assert_eq!(encode(&[7u16, 8, 9]), "[7,8,9]");
    assert_eq!(encode(&[[1u8, 2], [3, 4]]), "[[1,2],[3,4]]");
    assert_eq!(encode(&[Some(1u8), None]), "[1,null]");
}

#[test]
fn sequence_encoder_is_reusable() {
    let encoder = compile_sequence_encoder::<Vec<u32>>(Config::default())?;
    let mut buf = Buffer::with_capacity(64);
    for n in 0..3u32 {
        buf.reset();
        let values: Vec<u32> = (0..n).collect();
        encoder.encode(&values, &mut buf);
        let parsed: Vec<u32> = serde_json::from_slice(buf.as_bytes())?;
        assert_eq!(parsed, values);
    }
}

#[test]
fn non_sequences_are_rejected() {
    let err = Encoder::<Item>::sequence(Config::default()).unwrap_err();
    assert!(matches!(
        err.kind,
        CompileErrorKind::ShapeMismatch {
            expected: "sequence",
            ..
        }
    ));
    assert!(err.path.is_empty());
}
