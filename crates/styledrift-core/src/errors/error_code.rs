//! Stable machine-readable error codes.

/// Every error enum implements this so front ends (CLI, bindings, JSON
/// reports) can surface a code that does not depend on message wording.
pub trait DriftErrorCode {
    /// Returns the code string (e.g., "INVALID_STRIDE").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_WINDOW_SIZE: &str = "INVALID_WINDOW_SIZE";
pub const INVALID_STRIDE: &str = "INVALID_STRIDE";
pub const INVALID_COMPARISON_MODE: &str = "INVALID_COMPARISON_MODE";
pub const INVALID_LAG: &str = "INVALID_LAG";
pub const INVALID_WORD_COUNT: &str = "INVALID_WORD_COUNT";
pub const WINDOW_OUT_OF_RANGE: &str = "WINDOW_OUT_OF_RANGE";
