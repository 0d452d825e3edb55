//! Literal data packets.
//!
//! A literal data packet holds the raw message body.  See [Section
//! 5.9 of RFC 4880].
//!
//! [Section 5.9 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.9

use std::io::Write;

use crate::Error;
use crate::Result;
use crate::parse::Reader;
use crate::serialize::{Serialize, write_be_u32};
use crate::types::DataFormat;

/// Holds a literal data packet.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Literal {
    /// Format of the data.
    format: DataFormat,
    /// Optional file name, at most 255 bytes.
    filename: Vec<u8>,
    /// Creation time of the file, or 0.
    date: u32,
    /// The data.
    body: Vec<u8>,
}

impl Literal {
    /// Creates an empty literal data packet of the given format.
    pub fn new(format: DataFormat) -> Self {
        Literal {
            format,
            filename: Vec::new(),
            date: 0,
            body: Vec::new(),
        }
    }

    /// Sets the literal's body.
    pub fn set_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Sets the file name, which must fit its one-octet length.
    pub fn set_filename(mut self, filename: &[u8]) -> Result<Self> {
        if filename.len() > 255 {
            return Err(Error::InvalidArgument(
                format!("File name too long: {} bytes", filename.len()))
                       .into());
        }
        self.filename = filename.to_vec();
        Ok(self)
    }

    /// Sets the file's modification date.
    pub fn set_date(mut self, date: u32) -> Self {
        self.date = date;
        self
    }

    /// Returns the data's format.
    pub fn format(&self) -> DataFormat {
        self.format
    }

    /// Returns the file name, if any.
    pub fn filename(&self) -> Option<&[u8]> {
        if self.filename.is_empty() {
            None
        } else {
            Some(&self.filename)
        }
    }

    /// Returns the file's modification date, if any.
    pub fn date(&self) -> Option<u32> {
        if self.date == 0 {
            None
        } else {
            Some(self.date)
        }
    }

    /// Returns the data.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn parse(r: &mut Reader) -> Result<Self> {
        let format: DataFormat = r.u8()?.into();
        let filename_len = r.u8()? as usize;
        let filename = r.take(filename_len)?.to_vec();
        let date = r.u32()?;
        let body = r.rest().to_vec();

        Ok(Literal { format, filename, date, body })
    }
}

impl Serialize for Literal {
    fn serialize(&self, o: &mut dyn Write) -> Result<()> {
        o.write_all(&[self.format.into(), self.filename.len() as u8])?;
        o.write_all(&self.filename)?;
        write_be_u32(o, self.date)?;
        o.write_all(&self.body)?;
        Ok(())
    }
}
