/// Options fixed when an encoder is compiled.
///
/// Encoders compiled from the same type under different configurations are
/// independent; callers that need both keep both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Config {
    sort_map_keys: bool,
}

impl Config {
    /// Default configuration: maps are written in iteration order.
    pub const fn new() -> Self {
        Self {
            sort_map_keys: false,
        }
    }

    /// Write map entries sorted by the bytes of their rendered keys.
    ///
    /// Sorting makes output reproducible at the cost of a second pass over
    /// each map and scratch space in the buffer.
    pub const fn sort_map_keys(mut self, on: bool) -> Self {
        self.sort_map_keys = on;
        self
    }

    /// Whether map keys are sorted.
    pub const fn sorts_map_keys(&self) -> bool {
        self.sort_map_keys
    }
}
