/// A callable mapping from a typed input to a typed output.
///
/// Everything a solver evaluates is a `Model`: a closed-form function such as
/// a paraboloid, or a whole coupled analysis that converges its disciplines
/// before returning. Solvers never see the internals, only `call`.
///
/// Calls take `&self`. A model that keeps state between calls (for example a
/// warm-start guess) manages it internally.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Evaluates the model at `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] when the model cannot produce an output for
    /// this input.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// The input a model was called with and the output it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> Snapshot<I, O> {
    /// Pairs an input with the output it produced.
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}
