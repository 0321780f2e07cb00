//! Result type alias for Sitepack
//!
//! This module provides a convenient Result type alias that uses SitepackError
//! as the error type.

use super::errors::SitepackError;

/// Result type alias for Sitepack operations
///
/// # Examples
///
/// ```
/// use sitepack::domain::result::Result;
/// use sitepack::domain::errors::SitepackError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SitepackError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SitepackError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::SitepackError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(SitepackError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
