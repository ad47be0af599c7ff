//! Byte sink for container encoding.
//!
//! The class-file format is byte-oriented and big-endian throughout (JVMS 4.1):
//! structures are a flat concatenation of their fields, with no padding,
//! alignment or separators.

use std::io::Write;

/// Growable byte buffer that encoders write into.
///
/// Der Writer besitzt keinen externen Sink: fertige Bytes werden mit
/// [`drain_to`](Self::drain_to) an einen vom Aufrufer verwalteten
/// `io::Write` weitergereicht. Flush und Close bleiben Sache des Aufrufers.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
    /// Bytes die bereits per `drain_to` abgegeben wurden.
    drained: usize,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            drained: 0,
        }
    }

    /// Writes a single byte.
    #[inline(always)]
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Writes a byte slice verbatim.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Returns the total number of bytes written so far, including drained ones.
    pub fn position(&self) -> usize {
        self.drained + self.buf.len()
    }

    /// Gibt die aktuelle Buffer-Größe in Bytes zurück (ohne bereits gedrainte Bytes).
    pub fn buf_len(&self) -> usize {
        self.buf.len()
    }

    /// Returns the buffered bytes that have not been drained yet.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Schreibt alle gepufferten Bytes in den Writer und entfernt sie aus dem Buffer.
    ///
    /// [`position`](Self::position) zählt gedrainte Bytes weiter mit.
    pub fn drain_to(&mut self, writer: &mut impl Write) -> std::io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        writer.write_all(&self.buf)?;
        self.drained += self.buf.len();
        self.buf.clear();
        Ok(())
    }

    /// Finalises the writer and returns the buffered bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}
