//! Utility macros used across the header grammars.

/// Returns early with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// The grammars use it for checks where the first violation aborts the whole parse.
///
/// # Arguments
///
/// * `$predicate` - A boolean expression that should evaluate to true
/// * `$error` - The error value to return if the predicate is false
///
/// # Example
///
/// ```ignore
/// ensure!(text.len() <= MAX_HEADER_VALUE_BYTES, HeaderError::too_large(text.len(), MAX_HEADER_VALUE_BYTES));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
