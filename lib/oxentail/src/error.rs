/// An error raised while computing the entailment closure.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EntailmentError {
    /// The fixpoint was not reached within [`EngineConfig::max_rounds`]
    /// rounds.
    ///
    /// With a finite store and insert-only rules a fixpoint always exists,
    /// so hitting the limit on realistic data points at a misconfigured
    /// bound or a custom rule gone wrong.
    ///
    /// [`EngineConfig::max_rounds`]: crate::EngineConfig::max_rounds
    #[error("entailment did not reach a fixpoint within {limit} rounds")]
    RoundLimitExceeded { limit: usize },
    /// Evaluating a rule body failed.
    #[error(transparent)]
    Evaluation(#[from] sparmatch::QueryEvaluationError),
}
