//! Signature subpackets.
//!
//! The signature subpackets as defined in [Section 5.2.3.1 of RFC
//! 4880].  The hashed area is covered by the signature, the unhashed
//! area is advisory.
//!
//! [Section 5.2.3.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.3.1

use crate::KeyID;

/// The subpacket types this crate interprets.
///
/// All other types survive in raw form inside the area.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[non_exhaustive]
pub enum SubpacketTag {
    /// The time the signature was made.
    SignatureCreationTime,
    /// The key id of the key that issued the signature.
    Issuer,
    /// Uninterpreted subpacket type.
    Unknown(u8),
}

impl From<u8> for SubpacketTag {
    fn from(u: u8) -> Self {
        match u {
            2 => SubpacketTag::SignatureCreationTime,
            16 => SubpacketTag::Issuer,
            u => SubpacketTag::Unknown(u),
        }
    }
}

impl From<SubpacketTag> for u8 {
    fn from(t: SubpacketTag) -> Self {
        match t {
            SubpacketTag::SignatureCreationTime => 2,
            SubpacketTag::Issuer => 16,
            SubpacketTag::Unknown(u) => u,
        }
    }
}

/// A subpacket area.
///
/// The area is kept in its raw serialized form so that signatures
/// made by other implementations verify bit for bit; subpackets are
/// decoded on lookup.
#[derive(Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct SubpacketArea {
    data: Vec<u8>,
}

impl SubpacketArea {
    /// Returns an empty subpacket area.
    pub fn empty() -> Self {
        Default::default()
    }

    pub(crate) fn from_bytes(data: Vec<u8>) -> Self {
        SubpacketArea { data }
    }

    /// Returns the area's raw, serialized representation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the subpackets in the area, as (tag, body) pairs.
    ///
    /// The critical bit is stripped from the tags.  Scanning stops
    /// at the first malformed subpacket.
    pub fn iter(&self) -> impl Iterator<Item = (SubpacketTag, &[u8])> {
        let mut subpackets = Vec::new();
        let mut rest = &self.data[..];
        loop {
            // One, two, or five octet subpacket length; it includes
            // the type octet.
            let (len, tail) = match rest {
                [l, tail @ ..] if *l < 192 =>
                    (*l as usize, tail),
                [l0, l1, tail @ ..] if *l0 < 255 =>
                    ((*l0 as usize - 192) * 256 + *l1 as usize + 192, tail),
                [255, l0, l1, l2, l3, tail @ ..] =>
                    (u32::from_be_bytes([*l0, *l1, *l2, *l3]) as usize, tail),
                _ => break,
            };
            if len == 0 || tail.len() < len {
                break;
            }

            let (body, tail) = tail.split_at(len);
            subpackets.push(
                (SubpacketTag::from(body[0] & 0x7f), &body[1..]));
            rest = tail;
        }
        subpackets.into_iter()
    }

    /// Returns the body of the first subpacket with the given tag,
    /// if any.
    pub fn lookup(&self, tag: SubpacketTag) -> Option<&[u8]> {
        self.iter().find(|(t, _)| *t == tag).map(|(_, body)| body)
    }

    /// Returns the signature's creation time, if the area has one.
    pub fn signature_creation_time(&self) -> Option<u32> {
        match self.lookup(SubpacketTag::SignatureCreationTime)? {
            &[a, b, c, d] => Some(u32::from_be_bytes([a, b, c, d])),
            _ => None,
        }
    }

    /// Returns the issuer key id, if the area has one.
    pub fn issuer(&self) -> Option<KeyID> {
        let body = self.lookup(SubpacketTag::Issuer)?;
        if body.len() != 8 {
            return None;
        }
        let mut raw = [0; 8];
        raw.copy_from_slice(body);
        Some(KeyID::from_bytes(raw))
    }

    /// Appends a subpacket to the area.
    pub fn add(&mut self, tag: SubpacketTag, body: &[u8]) {
        let len = body.len() + 1;
        if len < 192 {
            self.data.push(len as u8);
        } else if len < 16320 {
            let v = len - 192;
            self.data.push((v / 256 + 192) as u8);
            self.data.push((v % 256) as u8);
        } else {
            self.data.push(255);
            self.data.extend_from_slice(&(len as u32).to_be_bytes());
        }
        self.data.push(tag.into());
        self.data.extend_from_slice(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup() {
        let mut area = SubpacketArea::empty();
        area.add(SubpacketTag::SignatureCreationTime,
                 &1219723547u32.to_be_bytes());
        area.add(SubpacketTag::Issuer, &[1, 2, 3, 4, 5, 6, 7, 8]);
        area.add(SubpacketTag::Unknown(33), b"opaque");

        assert_eq!(area.signature_creation_time(), Some(1219723547));
        assert_eq!(area.issuer(),
                   Some(KeyID::from_bytes([1, 2, 3, 4, 5, 6, 7, 8])));
        assert_eq!(area.lookup(SubpacketTag::Unknown(33)),
                   Some(&b"opaque"[..]));
        assert_eq!(area.lookup(SubpacketTag::Unknown(34)), None);
        assert_eq!(area.iter().count(), 3);
    }

    #[test]
    fn critical_bit_is_ignored_on_lookup() {
        // Critical issuer subpacket, encoded by hand.
        let area = SubpacketArea::from_bytes(
            vec![9, 16 | 0x80, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(area.issuer(),
                   Some(KeyID::from_bytes([1, 2, 3, 4, 5, 6, 7, 8])));
    }

    #[test]
    fn long_subpacket_roundtrips() {
        let mut area = SubpacketArea::empty();
        let body = vec![0x5a; 1000];
        area.add(SubpacketTag::Unknown(100), &body);
        assert_eq!(area.lookup(SubpacketTag::Unknown(100)), Some(&body[..]));
    }

    #[test]
    fn malformed_area_stops_scanning() {
        let area = SubpacketArea::from_bytes(vec![200]);
        assert_eq!(area.iter().count(), 0);
    }
}
