use crate::RespEncode;

/// This type is a CRLF-terminated string that represents a signed, base-10, 64-bit integer.
///
/// Format:
///     :[<+|->]<value>\r\n
///
/// - The colon (:) as the first byte.
/// - An optional plus (+) or minus (-) as the sign.
/// - One or more decimal digits (0..9) as the integer's unsigned, base-10 value.
/// - The CRLF terminator.
impl RespEncode for i64 {
    fn encode(self) -> Vec<u8> {
        format!(":{}\r\n", self).into_bytes()
    }
}
