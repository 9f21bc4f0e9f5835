use std::fmt;

/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// `2*3 = 6`
    EvaluateConstants,

    /// `0+a = a`
    /// `a+0 = a`
    AddZero,

    /// `0*a = 0`
    /// `a*0 = 0`
    MultiplyZero,

    /// `1*a = a`
    /// `a*1 = a`
    MultiplyOne,

    /// `a+a = 2a`
    /// `a-a = 0`
    /// etc.
    CombineLikeTerms,

    /// `a*a = a^2`
    /// `a*a*a = a^3`
    /// etc.
    CombineLikeFactors,

    /// `a^0 = 1`
    PowerZero,

    /// `0^a = 0`
    PowerZeroLeft,

    /// `1^a = 1`
    PowerOneLeft,

    /// `a^1 = a`
    PowerOne,

    /// `a^(-n) = 1/a^n`
    NegativeExponent,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Step::EvaluateConstants => "evaluate constants",
            Step::AddZero => "a + 0 = a",
            Step::MultiplyZero => "a*0 = 0",
            Step::MultiplyOne => "a*1 = a",
            Step::CombineLikeTerms => "combine like terms",
            Step::CombineLikeFactors => "combine like factors",
            Step::PowerZero => "a^0 = 1",
            Step::PowerZeroLeft => "0^a = 0",
            Step::PowerOneLeft => "1^a = 1",
            Step::PowerOne => "a^1 = a",
            Step::NegativeExponent => "a^(-n) = 1/a^n",
        })
    }
}
