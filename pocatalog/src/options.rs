//! Options controlling how a PO file is parsed.

/// Parse behavior options for the pocatalog loading APIs.
///
/// Every option has an explicit default; nothing is read from process-wide
/// state. The same options value is shared, read-only, by every worker of a
/// parallel parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Emit debug-level parse tracing (consumers decide where it goes).
    pub debug: bool,
    /// Parse entry blocks across parallel workers.
    pub parallel: bool,
    /// Divisor applied to the batch count when many workers are available,
    /// to limit context-switch overhead.
    pub batch_division: usize,
    /// Drop obsolete (`#~`) entries instead of storing them.
    pub ignore_obsolete: bool,
    /// Stop at the first invalid entry instead of collecting diagnostics.
    pub abort_on_invalid: bool,
    /// Print collected diagnostics to stderr after a keep-going parse.
    pub print_diagnostics: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            debug: false,
            parallel: false,
            batch_division: 2,
            ignore_obsolete: false,
            abort_on_invalid: true,
            print_diagnostics: true,
        }
    }
}

impl ParseOptions {
    /// Creates default parse options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables/disables debug tracing.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enables/disables parallel block parsing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the batch-count division factor.
    pub fn with_batch_division(mut self, batch_division: usize) -> Self {
        self.batch_division = batch_division;
        self
    }

    /// Enables/disables dropping of obsolete entries.
    pub fn with_ignore_obsolete(mut self, ignore_obsolete: bool) -> Self {
        self.ignore_obsolete = ignore_obsolete;
        self
    }

    /// Enables/disables abort-on-first-invalid-entry.
    pub fn with_abort_on_invalid(mut self, abort_on_invalid: bool) -> Self {
        self.abort_on_invalid = abort_on_invalid;
        self
    }

    /// Enables/disables stderr diagnostic printing.
    pub fn with_print_diagnostics(mut self, print_diagnostics: bool) -> Self {
        self.print_diagnostics = print_diagnostics;
        self
    }
}
