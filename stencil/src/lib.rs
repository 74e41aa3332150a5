#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub use stencil_core::*;

pub use stencil_json::{
    CompileError, CompileErrorKind, Config, Encoder, compile_encoder, compile_mapping_encoder,
    compile_record_encoder, compile_sequence_encoder,
};
