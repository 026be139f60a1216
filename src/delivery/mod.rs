//! OTP delivery channels.
//!
//! Two interchangeable senders share one capability: render a localized
//! message carrying the code and hand it to an external transport. Neither
//! channel persists anything or validates codes; a transport failure
//! surfaces as [`DeliveryError`] so the caller knows the code was never
//! issued.

mod email;
mod sms;

pub use email::EmailChannel;
pub use sms::SmsChannel;

use thiserror::Error;

/// The medium an OTP travels over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    /// Wire name, as persisted in `otp_type` and returned as `otpType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

/// A message could not be handed to the external transport.
#[derive(Debug, Error)]
#[error("{channel} delivery failed: {reason}")]
pub struct DeliveryError {
    pub channel: &'static str,
    pub reason: String,
}

impl DeliveryError {
    pub(crate) fn new(channel: Channel, reason: impl Into<String>) -> Self {
        Self {
            channel: channel.as_str(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_wire_names() {
        assert_eq!(Channel::Email.as_str(), "email");
        assert_eq!(Channel::Sms.as_str(), "sms");
    }

    #[test]
    fn test_delivery_error_display() {
        let err = DeliveryError::new(Channel::Sms, "connection refused");
        assert_eq!(err.to_string(), "sms delivery failed: connection refused");
    }
}
