//! Operand decoding: quote stripping and sentinel classification.

use crate::model::OperandToken;

/// Marks a vector that does not apply to this engine.
pub const FORCED_SKIP_SENTINEL: &str = "#";
/// Marks an expected value the oracle leaves unconstrained.
pub const UNCONSTRAINED_SENTINEL: &str = "?";

/// Decode one raw field. No numeric parsing happens here.
#[must_use]
pub fn decode(raw: &str) -> OperandToken {
    let value = strip_quotes(raw);
    match value {
        FORCED_SKIP_SENTINEL => OperandToken::ForcedSkip,
        UNCONSTRAINED_SENTINEL => OperandToken::Unconstrained,
        literal => OperandToken::Literal(literal.to_string()),
    }
}

/// Remove one matching pair of surrounding `'` or `"` quotes.
#[must_use]
pub fn strip_quotes(raw: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}
