use stencil_core::record;
use stencil_json::{Buffer, Config, Encoder, compile_record_encoder};
use stencil_testhelpers::test;

record! {
    struct Person {
        name: String => "name",
        age: u32 => "age",
    }
}

record! {
    struct Holder {
        struct_ptr: Option<Box<Person>> => "structPtr",
    }
}

record! {
    struct Node {
        value: i32 => "value",
        next: Option<Box<Node>> => "next",
        children: Vec<Node> => "children",
    }
}

record! {
    struct Mixed {
        flag: bool => "flag",
        small: i8 => "small",
        wide: u128 => "wide",
        size: usize => "size",
        ratio: f64 => "ratio",
        tiny: f32 => "tiny",
        initial: char => "initial",
        label: &'static str => "label",
        note: Option<String> => "note",
        hidden: u64,
        also_hidden: u64 => "",
    }
}

record! {
    struct Grid {
        origin: [i32; 3] => "origin",
        empty: [u8; 0] => "empty",
        names: [&'static str; 2] => "names",
        pairs: [[u8; 2]; 2] => "pairs",
    }
}

record! {
    struct Pair {
        left: Person => "left",
        right: Person => "right",
    }
}

fn person(name: &str, age: u32) -> Person {
    Person {
        name: name.to_string(),
        age,
    }
}

#[test]
fn encodes_fields_in_declaration_order() {
    let encoder = compile_record_encoder::<Person>(Config::default())?;
    let mut buf = Buffer::new();
    encoder.encode(&person("Mr Payload", 33), &mut buf);
    assert_eq!(buf.as_str()?, r#"{"name":"Mr Payload","age":33}"#);
}

#[test]
fn absent_nullable_record_is_null() {
    let encoder = Encoder::<Holder>::record(Config::default())?;
    let absent = Holder { struct_ptr: None };
    assert_eq!(encoder.to_string(&absent)?, r#"{"structPtr":null}"#);

    let present = Holder {
        struct_ptr: Some(Box::new(person("Ada", 36))),
    };
    assert_eq!(
        encoder.to_string(&present)?,
        r#"{"structPtr":{"name":"Ada","age":36}}"#
    );
}

#[test]
fn recursive_records_share_one_plan() {
    let encoder = Encoder::<Node>::record(Config::default())?;
    assert_eq!(encoder.plan_len(), 1);

    let tree = Node {
        value: 1,
        next: Some(Box::new(Node {
            value: 2,
            next: None,
            children: vec![],
        })),
        children: vec![Node {
            value: 3,
            next: None,
            children: vec![],
        }],
    };
    insta::assert_snapshot!(
        encoder.to_string(&tree)?,
        @r#"{"value":1,"next":{"value":2,"next":null,"children":[]},"children":[{"value":3,"next":null,"children":[]}]}"#
    );
}

#[test]
fn repeated_record_type_is_compiled_once() {
    let encoder = Encoder::<Pair>::record(Config::default())?;
    assert_eq!(encoder.plan_len(), 2);
    let pair = Pair {
        left: person("a", 1),
        right: person("b", 2),
    };
    assert_eq!(
        encoder.to_string(&pair)?,
        r#"{"left":{"name":"a","age":1},"right":{"name":"b","age":2}}"#
    );
}

#[test]
fn scalars_and_skipped_fields() {
    let encoder = Encoder::<Mixed>::record(Config::default())?;
    let value = Mixed {
        flag: true,
        small: -8,
        wide: u128::MAX,
        size: 42,
        ratio: 0.25,
        tiny: f32::NAN,
        initial: 'Z',
        label: "lbl",
        note: None,
        hidden: 1,
        also_hidden: 2,
    };
    insta::assert_snapshot!(
        encoder.to_string(&value)?,
        @r#"{"flag":true,"small":-8,"wide":340282366920938463463374607431768211455,"size":42,"ratio":0.25,"tiny":null,"initial":"Z","label":"lbl","note":null}"#
    );

    let value = Mixed {
        flag: false,
        note: Some("here".to_string()),
        ..value
    };
    let json = encoder.to_string(&value)?;
    assert!(json.starts_with(r#"{"flag":false,"#));
    assert!(json.ends_with(r#""note":"here"}"#));
}

#[test]
fn static_text_is_merged_between_values() {
    let encoder = Encoder::<Person>::record(Config::default())?;
    // `{"name":"`, name, `","age":`, age, `}`
    assert_eq!(encoder.step_count(), 5);
}

#[test]
fn fixed_arrays_of_scalars_are_unrolled() {
    let encoder = Encoder::<Grid>::record(Config::default())?;
    let grid = Grid {
        origin: [1, -2, 3],
        empty: [],
        names: ["x", "y"],
        pairs: [[1, 2], [3, 4]],
    };
    assert_eq!(
        encoder.to_string(&grid)?,
        r#"{"origin":[1,-2,3],"empty":[],"names":["x","y"],"pairs":[[1,2],[3,4]]}"#
    );
}

#[test]
fn output_is_valid_json() {
    let encoder = Encoder::<Node>::record(Config::default())?;
    let tree = Node {
        value: -7,
        next: None,
        children: vec![],
    };
    let json = encoder.to_vec(&tree);
    let parsed: serde_json::Value = serde_json::from_slice(&json)?;
    assert_eq!(
        parsed,
        serde_json::json!({ "value": -7, "next": null, "children": [] })
    );
}

#[test]
fn compiling_twice_gives_identical_output() {
    let first = Encoder::<Pair>::record(Config::default())?;
    let second = Encoder::<Pair>::record(Config::default())?;
    let pair = Pair {
        left: person("same", 9),
        right: person("output", 10),
    };
    assert_eq!(first.to_vec(&pair), second.to_vec(&pair));
}

#[test]
fn encode_appends_to_existing_content() {
    let encoder = Encoder::<Person>::record(Config::default())?;
    let mut buf = Buffer::new();
    buf.push(b'[');
    encoder.encode(&person("a", 1), &mut buf);
    buf.push(b',');
    encoder.encode(&person("b", 2), &mut buf);
    buf.push(b']');
    assert_eq!(
        buf.as_str()?,
        r#"[{"name":"a","age":1},{"name":"b","age":2}]"#
    );
}

#[test]
fn writes_to_io_sinks() {
    let encoder = Encoder::<Person>::record(Config::default())?;
    let mut sink = Vec::new();
    encoder.encode_to_writer(&person("io", 5), &mut sink)?;
    assert_eq!(sink, br#"{"name":"io","age":5}"#);
}

#[test]
fn scalar_roots_need_the_generic_constructor() {
    let encoder = Encoder::<Option<u8>>::new(Config::default())?;
    assert_eq!(encoder.to_string(&Some(7))?, "7");
    assert_eq!(encoder.to_string(&None)?, "null");
    assert_eq!(encoder.plan_len(), 0);
}
