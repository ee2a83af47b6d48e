use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Converts an `i64` to `f64`, accepting the precision loss above `2^53`.
///
/// Arithmetic promotion in a beginner language prefers producing a slightly
/// rounded decimal over refusing the operation, so unlike the index helpers
/// below this conversion never fails.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn i64_to_f64_lossy(value: i64) -> f64 {
    value as f64
}

/// Truncates an `f64` toward zero into an `i64`.
///
/// Used by the `int(...)` builtin. The value must be finite and fit in the
/// `i64` range after truncation.
///
/// ## Errors
/// Returns `RuntimeError::TypeError` for non-finite or out-of-range values.
///
/// ## Example
/// ```
/// use plaintalk::util::num::f64_to_i64_trunc;
///
/// assert_eq!(f64_to_i64_trunc(2.9, 1).unwrap(), 2);
/// assert_eq!(f64_to_i64_trunc(-2.9, 1).unwrap(), -2);
/// assert!(f64_to_i64_trunc(f64::INFINITY, 1).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_trunc(value: f64, line: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::TypeError { details: format!("I can't turn {value} into a whole number"),
                                             line });
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return Err(RuntimeError::TypeError { details: "that number is too large to be a whole number".to_string(),
                                             line });
    }
    Ok(truncated as i64)
}

/// Resolves a possibly negative index against a sequence of length `len`.
///
/// Negative indices count from the end, so `-1` is the last element. Indices
/// that fall outside the sequence produce `RuntimeError::IndexOutOfBounds`.
///
/// ## Errors
/// Returns `RuntimeError::IndexOutOfBounds` if the index does not name an
/// element.
///
/// ## Example
/// ```
/// use plaintalk::util::num::resolve_index;
///
/// assert_eq!(resolve_index(0, 3, 1).unwrap(), 0);
/// assert_eq!(resolve_index(-1, 3, 1).unwrap(), 2);
/// assert!(resolve_index(3, 3, 1).is_err());
/// ```
pub fn resolve_index(index: i64, len: usize, line: usize) -> EvalResult<usize> {
    let len_i64 = i64::try_from(len).unwrap_or(i64::MAX);
    let adjusted = if index < 0 { index + len_i64 } else { index };

    usize::try_from(adjusted).ok()
                             .filter(|i| *i < len)
                             .ok_or(RuntimeError::IndexOutOfBounds { index, len, line })
}

/// Resolves a possibly negative slice bound against a sequence of length
/// `len`, clamping out-of-range bounds instead of failing.
///
/// Mirrors the clamping behavior of slices in mainstream scripting languages:
/// `a[0:100]` of a three-element list is the whole list.
#[must_use]
pub fn resolve_slice_bound(bound: i64, len: usize) -> usize {
    let len_i64 = i64::try_from(len).unwrap_or(i64::MAX);
    let adjusted = if bound < 0 { bound + len_i64 } else { bound };

    usize::try_from(adjusted.clamp(0, len_i64)).unwrap_or(len)
}
