/// Parser configuration
///
/// Configured once before a parse begins and never mutated during one.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Emit a depth-indented trace line for each grammar production attempted
    pub trace: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable production tracing
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
