use crate::envelope::ApiError;

/// Utilities for safe resource handling and record-ID validation.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Validates a `SurrealDB` record ID string against a specific table.
    ///
    /// Prevents ID spoofing, where a caller hands an ID from a different
    /// table to an endpoint (e.g. a `subscription:...` ID to a shift route).
    ///
    /// # Arguments
    /// * `id` - The ID to verify (e.g. "shift:123" or just "123")
    /// * `expected_table` - The table the ID must belong to (e.g. "shift")
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] if the ID names a different table.
    pub fn verify<I, T>(id: I, expected_table: T) -> Result<String, ApiError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let id_ref = id.as_ref();
        let table_ref = expected_table.as_ref();

        if let Some((table, _)) = id_ref.split_once(':') {
            if table != table_ref {
                return Err(ApiError::Validation(format!(
                    "Record ID table mismatch: expected '{table_ref}', got '{table}'"
                )));
            }
            Ok(id_ref.to_owned())
        } else {
            // Bare random part: prefix with the expected table.
            Ok(format!("{table_ref}:{id_ref}"))
        }
    }

    /// Like [`ResourceGuard::verify`], but returns the bare record key for
    /// use with `type::thing(...)` bindings.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] if the ID names a different table.
    pub fn key<I, T>(id: I, expected_table: T) -> Result<String, ApiError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let full = Self::verify(id, expected_table)?;
        match full.split_once(':') {
            Some((_, key)) => Ok(key.to_owned()),
            None => Ok(full),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_verification() {
        assert_eq!(ResourceGuard::verify("shift:123", "shift").unwrap(), "shift:123");
        assert_eq!(ResourceGuard::verify("123", "shift").unwrap(), "shift:123");
        assert!(ResourceGuard::verify("subscription:abc", "shift").is_err());
    }

    #[test]
    fn bare_keys() {
        assert_eq!(ResourceGuard::key("shift:123", "shift").unwrap(), "123");
        assert_eq!(ResourceGuard::key("123", "shift").unwrap(), "123");
        assert!(ResourceGuard::key("account:9", "shift").is_err());
    }
}
