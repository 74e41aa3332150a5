use core::fmt;
use core::marker::PhantomData;
use std::io;
use std::string::FromUtf8Error;

use stencil_core::{Buffer, Def, PtrConst, Shape, Shaped};

use crate::compile::Compiler;
use crate::config::Config;
use crate::error::CompileError;
use crate::plan::Program;

/// A JSON encoder for values of type `T`, compiled once from `T`'s shape.
///
/// Compiling resolves every field, element and key of the shape into a plan.
/// Encoding only replays that plan, so it cannot fail and does not allocate
/// beyond the growth of the output buffer (and whatever `Display` or
/// `EncodeJson` impls reached through field options allocate themselves).
///
/// Encoders are immutable and `Send + Sync`; one instance can serve any
/// number of threads, each writing to its own [`Buffer`].
///
/// ```
/// use std::collections::BTreeMap;
/// use stencil_json::{Buffer, Config, Encoder};
///
/// let encoder = Encoder::<BTreeMap<String, Vec<u32>>>::mapping(Config::default()).unwrap();
/// let mut map = BTreeMap::new();
/// map.insert("odd".to_string(), vec![1, 3]);
/// map.insert("even".to_string(), vec![]);
///
/// let mut buf = Buffer::new();
/// encoder.encode(&map, &mut buf);
/// assert_eq!(buf.as_str().unwrap(), r#"{"even":[],"odd":[1,3]}"#);
/// ```
pub struct Encoder<T: Shaped> {
    config: Config,
    program: Program,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Shaped> Encoder<T> {
    /// Compiles an encoder for a record type.
    pub fn record(config: Config) -> Result<Self, CompileError> {
        match T::SHAPE.def {
            Def::Struct(_) => Self::compile(config, "record"),
            _ => Err(CompileError::shape_mismatch("record", T::SHAPE)),
        }
    }

    /// Compiles an encoder for a list or fixed-size array type.
    pub fn sequence(config: Config) -> Result<Self, CompileError> {
        match T::SHAPE.def {
            Def::List(_) | Def::Array(_) => Self::compile(config, "sequence"),
            _ => Err(CompileError::shape_mismatch("sequence", T::SHAPE)),
        }
    }

    /// Compiles an encoder for a map type.
    pub fn mapping(config: Config) -> Result<Self, CompileError> {
        match T::SHAPE.def {
            Def::Map(_) => Self::compile(config, "mapping"),
            _ => Err(CompileError::shape_mismatch("mapping", T::SHAPE)),
        }
    }

    /// Compiles an encoder for any encodable type, including scalars and
    /// options at the root.
    pub fn new(config: Config) -> Result<Self, CompileError> {
        Self::compile(config, "value")
    }

    fn compile(config: Config, what: &'static str) -> Result<Self, CompileError> {
        let program = Compiler::new(config).compile(T::SHAPE)?;
        let encoder = Self {
            config,
            program,
            _marker: PhantomData,
        };
        debug!(
            "compiled {} encoder for `{}`: {} record plans, {} steps, {:?}",
            what,
            T::SHAPE.type_name(),
            encoder.plan_len(),
            encoder.step_count(),
            config
        );
        #[cfg(not(feature = "tracing"))]
        let _ = what;
        Ok(encoder)
    }

    /// Appends the JSON encoding of `value` to `out`.
    #[inline]
    pub fn encode(&self, value: &T, out: &mut Buffer) {
        // SAFETY: the program was compiled from `T::SHAPE`, and `value` is a
        // live `T` for the duration of the call.
        unsafe { self.program.execute(PtrConst::new(value), out) }
    }

    /// Encodes `value` into a new byte vector.
    pub fn to_vec(&self, value: &T) -> Vec<u8> {
        let mut out = Buffer::new();
        self.encode(value, &mut out);
        out.into_vec()
    }

    /// Encodes `value` into a new string.
    ///
    /// Fails only if a `raw` field contained bytes that are not UTF-8.
    pub fn to_string(&self, value: &T) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.to_vec(value))
    }

    /// Encodes `value` and writes the result to `writer`.
    pub fn encode_to_writer<W: io::Write + ?Sized>(
        &self,
        value: &T,
        writer: &mut W,
    ) -> io::Result<()> {
        let mut out = Buffer::new();
        self.encode(value, &mut out);
        out.write_to(writer)
    }

    /// The shape this encoder was compiled from.
    pub fn shape(&self) -> &'static Shape {
        T::SHAPE
    }

    /// The configuration this encoder was compiled with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Number of record plans: one per distinct record type reachable from `T`.
    pub fn plan_len(&self) -> usize {
        self.program.plans.len()
    }

    /// Number of top-level steps across all record plans.
    ///
    /// Adjacent static text is merged, so a record whose fields are all
    /// scalars has one step per field plus one more than the number of fields
    /// for the text around them.
    pub fn step_count(&self) -> usize {
        self.program.plans.iter().map(|plan| plan.steps.len()).sum()
    }
}

impl<T: Shaped> fmt::Debug for Encoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("type", &T::SHAPE.type_name())
            .field("config", &self.config)
            .field("plans", &self.plan_len())
            .field("steps", &self.step_count())
            .finish()
    }
}

/// Compiles an encoder for the record type `T`.
///
/// Fails if `T` is not a record, or if any tagged field, directly or through
/// nested types, has no JSON representation.
pub fn compile_record_encoder<T: Shaped>(config: Config) -> Result<Encoder<T>, CompileError> {
    Encoder::record(config)
}

/// Compiles an encoder for the list or array type `T`.
pub fn compile_sequence_encoder<T: Shaped>(config: Config) -> Result<Encoder<T>, CompileError> {
    Encoder::sequence(config)
}

/// Compiles an encoder for the map type `T`.
pub fn compile_mapping_encoder<T: Shaped>(config: Config) -> Result<Encoder<T>, CompileError> {
    Encoder::mapping(config)
}

/// Compiles an encoder for any encodable type `T`.
pub fn compile_encoder<T: Shaped>(config: Config) -> Result<Encoder<T>, CompileError> {
    Encoder::new(config)
}
