use log::LevelFilter;

/// Settings passed into every query.
///
/// ```rust
/// use hornlog::SolverConfig;
/// use log::LevelFilter;
///
/// let config = SolverConfig::default()
///     .with_verbosity(LevelFilter::Trace)
///     .with_max_depth(64);
/// assert_eq!(config.max_depth, Some(64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Most detailed solver log level to emit; `Trace` logs every resolution step
    pub verbosity: LevelFilter,
    /// Deepest rule nesting explored; deeper branches fail
    pub max_depth: Option<usize>,
    /// Clause activations allowed before the search is abandoned
    pub max_activations: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            verbosity: LevelFilter::Off,
            max_depth: None,
            max_activations: None,
        }
    }
}

impl SolverConfig {
    /// Sets the solver log level
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: LevelFilter) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Limits the rule nesting depth
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Limits the number of clause activations
    #[must_use]
    pub fn with_max_activations(mut self, max_activations: u64) -> Self {
        self.max_activations = Some(max_activations);
        self
    }

    pub(crate) fn traces(&self) -> bool {
        self.verbosity >= LevelFilter::Trace
    }

    pub(crate) fn debugs(&self) -> bool {
        self.verbosity >= LevelFilter::Debug
    }
}
