//! ASCII response formatting.
//!
//! Responses mirror their command keyword: `$HCI` answers `!HCI …`, `#BZR`
//! answers `>BZR`, and every failure is the single `?` token. All responses
//! end in CRLF. The writer reports overflow explicitly — a truncated response
//! would be indistinguishable from a good one on the wire, so running out of
//! buffer is an error, never a silent cut.

use core::fmt::Write as _;

use thiserror_no_std::Error;

/// Response buffer capacity. The longest response is `!HCI` with four
/// 24-byte fields; 128 leaves headroom for `!ADC` on an 8-channel board.
pub const RESPONSE_CAPACITY: usize = 128;

/// A formatted response ready for the tx queue.
pub type ResponseBytes = heapless::Vec<u8, RESPONSE_CAPACITY>;

/// Response formatting failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// The response did not fit in [`RESPONSE_CAPACITY`] bytes.
    #[error("response buffer overflow")]
    Overflow,
    /// The command keyword had no `$`/`#` prefix to map to a reply token.
    #[error("keyword has no reply prefix")]
    BadKeyword,
}

/// Incremental response builder.
pub struct ResponseWriter {
    buf: ResponseBytes,
}

impl ResponseWriter {
    /// Ack reply for a set command: `#BZR` → `>BZR`.
    pub fn ack(keyword: &str) -> Result<Self, ResponseError> {
        Self::with_token(b'>', keyword)
    }

    /// Value reply for a query command: `$HCI` → `!HCI`.
    pub fn query(keyword: &str) -> Result<Self, ResponseError> {
        Self::with_token(b'!', keyword)
    }

    fn with_token(lead: u8, keyword: &str) -> Result<Self, ResponseError> {
        let body = keyword
            .strip_prefix(&['$', '#'][..])
            .ok_or(ResponseError::BadKeyword)?;
        let mut writer = Self {
            buf: heapless::Vec::new(),
        };
        writer.push_byte(lead)?;
        writer.push_bytes(body.as_bytes())?;
        Ok(writer)
    }

    /// The unknown-command / parse-failure response: `?` CRLF.
    #[must_use]
    pub fn error_token() -> ResponseBytes {
        let mut buf = ResponseBytes::new();
        // Capacity is far above 3 bytes; these cannot fail.
        buf.push(b'?').ok();
        buf.push(b'\r').ok();
        buf.push(b'\n').ok();
        buf
    }

    /// Append a space-separated string field.
    pub fn field_str(&mut self, value: &str) -> Result<(), ResponseError> {
        self.push_byte(b' ')?;
        self.push_bytes(value.as_bytes())
    }

    /// Append a space-separated unsigned field.
    pub fn field_u32(&mut self, value: u32) -> Result<(), ResponseError> {
        let mut digits: heapless::String<10> = heapless::String::new();
        write!(digits, "{value}").map_err(|_| ResponseError::Overflow)?;
        self.field_str(&digits)
    }

    /// Append the `?` placeholder for a field whose peripheral read failed.
    pub fn field_failed(&mut self) -> Result<(), ResponseError> {
        self.field_str("?")
    }

    /// Terminate with CRLF and hand over the bytes.
    pub fn finish(mut self) -> Result<ResponseBytes, ResponseError> {
        self.push_bytes(b"\r\n")?;
        Ok(self.buf)
    }

    fn push_byte(&mut self, byte: u8) -> Result<(), ResponseError> {
        self.buf.push(byte).map_err(|_| ResponseError::Overflow)
    }

    fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), ResponseError> {
        self.buf
            .extend_from_slice(bytes)
            .map_err(|_| ResponseError::Overflow)
    }
}

/// Status line for the escape-toggle dialect: `PWR OFF ON\r\n`.
pub fn toggle_status(label: &str, asserted: bool) -> Result<ResponseBytes, ResponseError> {
    let mut buf = ResponseBytes::new();
    buf.extend_from_slice(label.as_bytes())
        .map_err(|_| ResponseError::Overflow)?;
    let state: &[u8] = if asserted { b" ON\r\n" } else { b" OFF\r\n" };
    buf.extend_from_slice(state)
        .map_err(|_| ResponseError::Overflow)?;
    Ok(buf)
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Tests use expect() for readable assertions
mod tests {
    use super::*;

    #[test]
    fn ack_maps_hash_to_gt() {
        let w = ResponseWriter::ack("#BZR").expect("valid keyword");
        assert_eq!(&w.finish().expect("fits")[..], b">BZR\r\n");
    }

    #[test]
    fn query_maps_dollar_to_bang_with_fields() {
        let mut w = ResponseWriter::query("$HCI").expect("valid keyword");
        w.field_str("KT-956-0225-00").expect("fits");
        w.field_str("B").expect("fits");
        assert_eq!(&w.finish().expect("fits")[..], b"!HCI KT-956-0225-00 B\r\n");
    }

    #[test]
    fn numeric_and_failed_fields() {
        let mut w = ResponseWriter::query("$ADC").expect("valid keyword");
        w.field_u32(3312).expect("fits");
        w.field_failed().expect("fits");
        assert_eq!(&w.finish().expect("fits")[..], b"!ADC 3312 ?\r\n");
    }

    #[test]
    fn error_token_is_question_crlf() {
        assert_eq!(&ResponseWriter::error_token()[..], b"?\r\n");
    }

    #[test]
    fn keyword_without_prefix_rejected() {
        assert_eq!(
            ResponseWriter::ack("BZR").map(|_| ()),
            Err(ResponseError::BadKeyword)
        );
    }

    #[test]
    fn overflow_is_reported_not_truncated() {
        let mut w = ResponseWriter::query("$HCI").expect("valid keyword");
        let mut result = Ok(());
        for _ in 0..RESPONSE_CAPACITY {
            result = w.field_str("0123456789");
            if result.is_err() {
                break;
            }
        }
        assert_eq!(result, Err(ResponseError::Overflow));
    }

    #[test]
    fn toggle_status_lines() {
        assert_eq!(
            &toggle_status("PWR OFF", true).expect("fits")[..],
            b"PWR OFF ON\r\n"
        );
        assert_eq!(
            &toggle_status("PWR OFF", false).expect("fits")[..],
            b"PWR OFF OFF\r\n"
        );
    }
}
