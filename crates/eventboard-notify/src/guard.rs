//! Presence check for the push public key

/// Whether push notifications are configured
///
/// True iff a key is present and non-empty. No cryptographic validation is
/// done; whitespace-only keys count as present.
///
/// # Examples
///
/// ```
/// use eventboard_notify::is_configured;
///
/// assert!(is_configured(Some("abc123")));
/// assert!(!is_configured(Some("")));
/// assert!(!is_configured(None));
/// ```
pub fn is_configured(key: Option<&str>) -> bool {
    key.is_some_and(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_cases() {
        assert!(!is_configured(Some("")));
        assert!(!is_configured(None));
        assert!(is_configured(Some("abc123")));
    }

    #[test]
    fn test_whitespace_counts_as_present() {
        assert!(is_configured(Some(" ")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any non-empty string is configured
        #[test]
        fn test_non_empty_is_configured(key in ".+") {
            prop_assert!(is_configured(Some(&key)));
        }
    }
}
