/// Numeric conversion helpers.
///
/// This module provides safe functions for converting between integer and
/// floating-point types, plus index arithmetic for list and text access.
/// All fallible functions return a `Result` carrying a `RuntimeError` with the
/// source line of the statement that required the conversion.
pub mod num;
