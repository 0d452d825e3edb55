//! User ID packets.
//!
//! A user id identifies the holder of a key, conventionally as an
//! [RFC 2822] mail address.  See [Section 5.11 of RFC 4880].
//!
//! [RFC 2822]: https://tools.ietf.org/html/rfc2822
//! [Section 5.11 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.11

use std::fmt;
use std::io::Write;

use crate::Result;
use crate::parse::Reader;
use crate::serialize::Serialize;

/// Holds a user id packet.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UserID {
    value: Vec<u8>,
}

impl UserID {
    /// Returns the user id's raw value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub(crate) fn parse(r: &mut Reader) -> Result<Self> {
        Ok(UserID { value: r.rest().to_vec() })
    }
}

impl From<&str> for UserID {
    fn from(s: &str) -> Self {
        UserID { value: s.as_bytes().to_vec() }
    }
}

impl From<Vec<u8>> for UserID {
    fn from(value: Vec<u8>) -> Self {
        UserID { value }
    }
}

impl fmt::Debug for UserID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("UserID")
            .field(&String::from_utf8_lossy(&self.value))
            .finish()
    }
}

impl Serialize for UserID {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        o.write_all(&self.value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let uid: UserID = "Alice Lovelace <alice@example.org>".into();
        let buf = uid.to_vec().unwrap();
        assert_eq!(UserID::parse(&mut Reader::new(&buf)).unwrap(), uid);
    }
}
