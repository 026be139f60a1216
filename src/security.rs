use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks.
/// Used when matching a submitted OTP against the stored pending code.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("483920", "483920"));
        assert!(!constant_time_compare("483920", "483921"));
        assert!(!constant_time_compare("483920", "48392"));
        assert!(!constant_time_compare("", "483920"));
    }
}
