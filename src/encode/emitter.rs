//! Sequential big-endian output.
//!
//! All multi-byte fields of the format are big-endian regardless of host byte
//! order. Fixed-layout records go through [`Emitter::write_record`], which
//! serializes a `binrw` record in big-endian mode.

use std::io::{Cursor, Write};

use binrw::{BinWrite, Endian};

use crate::error::Result;

pub struct Emitter<W: Write> {
    writer: W,
    written: u64,
    scratch: Vec<u8>,
}

impl<W: Write> Emitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            scratch: Vec::with_capacity(32),
        }
    }

    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    /// Write a 16-bit value, high byte first.
    pub fn write_word(&mut self, value: u16) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_record<T>(&mut self, record: &T) -> Result<()>
    where
        T: for<'a> BinWrite<Args<'a> = ()>,
    {
        let mut cursor = Cursor::new(std::mem::take(&mut self.scratch));
        cursor.get_mut().clear();
        record.write_options(&mut cursor, Endian::Big, ())?;
        let bytes = cursor.into_inner();
        let result = self.write_bytes(&bytes);
        self.scratch = bytes;
        result
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).map_err(binrw::Error::Io)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    /// Number of bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(binrw::Error::Io)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
