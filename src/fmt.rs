//! Formatting utilities.

/// Hexadecimal conversion.
pub mod hex {
    use crate::Result;

    /// Encodes the given buffer as a hexadecimal number.
    ///
    /// The output uses uppercase digits, two per octet.
    pub fn encode<B: AsRef<[u8]>>(buffer: B) -> String {
        let buffer = buffer.as_ref();
        let mut s = String::with_capacity(buffer.len() * 2);
        for b in buffer {
            s.push(char::from_digit((b >> 4) as u32, 16)
                   .expect("nibble in range").to_ascii_uppercase());
            s.push(char::from_digit((b & 0xf) as u32, 16)
                   .expect("nibble in range").to_ascii_uppercase());
        }
        s
    }

    /// Decodes the given hexadecimal number.
    ///
    /// Whitespace is ignored, the digits may use either case.
    pub fn decode<H: AsRef<str>>(hex: H) -> Result<Vec<u8>> {
        let mut nibbles = Vec::with_capacity(hex.as_ref().len());
        for c in hex.as_ref().chars() {
            if c.is_whitespace() {
                continue;
            }
            nibbles.push(c.to_digit(16).ok_or_else(|| {
                crate::Error::InvalidArgument(
                    format!("Invalid hexadecimal digit: {}", c))
            })? as u8);
        }

        if nibbles.len() % 2 != 0 {
            return Err(crate::Error::InvalidArgument(
                "Odd number of nibbles".into()).into());
        }

        Ok(nibbles.chunks(2).map(|pair| pair[0] << 4 | pair[1]).collect())
    }

}
