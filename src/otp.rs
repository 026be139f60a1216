//! Time-step OTP generation and verification.
//!
//! Codes are six digits, derived from a process-wide shared secret and a
//! 300-second time bucket (RFC 6238 with SHA-1). Verification accepts the
//! current bucket plus one step of skew on either side, absorbing clock and
//! network drift between issuance and submission.

use anyhow::{anyhow, Result};
use chrono::Utc;
use totp_rs::{Algorithm, TOTP};

/// Code length in digits.
pub const DIGITS: usize = 6;

/// Width of one time bucket in seconds. Also the code's lifetime.
pub const STEP_SECONDS: u64 = 300;

/// Accepted skew on verification, in steps on either side of "now".
pub const SKEW_STEPS: u8 = 1;

/// Deterministic code generator bound to the shared secret.
///
/// Pure: both operations are functions of the secret and a timestamp, with
/// no side effects. The secret is injected at construction; nothing here
/// reads the environment.
pub struct OtpGenerator {
    totp: TOTP,
}

impl OtpGenerator {
    /// Build a generator from the shared secret.
    ///
    /// # Errors
    /// Fails if the secret is shorter than 128 bits, which RFC 6238 forbids.
    pub fn new(secret: &str) -> Result<Self> {
        let totp = TOTP::new(
            Algorithm::SHA1,
            DIGITS,
            SKEW_STEPS,
            STEP_SECONDS,
            secret.as_bytes().to_vec(),
        )
        .map_err(|e| anyhow!("OTP secret rejected (must be at least 16 bytes): {:?}", e))?;

        Ok(Self { totp })
    }

    /// Generate the code for the bucket containing `time` (unix seconds).
    pub fn generate_at(&self, time: u64) -> String {
        self.totp.generate(time)
    }

    /// Generate the code for the current bucket.
    pub fn generate_now(&self) -> String {
        self.generate_at(unix_now())
    }

    /// Check a submitted code against the bucket containing `time` and its
    /// immediate neighbors. Malformed input is simply a non-match.
    pub fn verify_at(&self, code: &str, time: u64) -> bool {
        self.totp.check(code, time)
    }

    /// Check a submitted code against the current bucket ± skew.
    pub fn verify_now(&self, code: &str) -> bool {
        self.verify_at(code, unix_now())
    }
}

fn unix_now() -> u64 {
    // Guarded cast: timestamps are far from 1970 in either direction.
    Utc::now().timestamp().max(0) as u64
}
