//! Newline-delimited JSON framing.
//!
//! The producer side writes one serialized value plus `\n` per event. The
//! reader is the consumer-side contract: it accepts arbitrary byte chunks —
//! a line may arrive split across any number of chunks — buffers the
//! incomplete tail, and yields each value exactly once, in order, no matter
//! where the chunk boundaries fall.

#[cfg(test)]
use std::marker::PhantomData;

use bytes::Bytes;
#[cfg(test)]
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes one event as an NDJSON line.
pub fn event_line<T: Serialize>(event: &T) -> Result<Bytes, serde_json::Error> {
    let mut line = serde_json::to_vec(event)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}

/// Incremental NDJSON reader over a byte stream. The server only produces
/// lines; this is the consumer-side contract, compiled with the tests that
/// hold it to chunk-boundary independence.
#[cfg(test)]
#[derive(Default)]
pub struct NdjsonReader<T> {
    buf: Vec<u8>,
    _marker: PhantomData<T>,
}

#[cfg(test)]
impl<T: DeserializeOwned> NdjsonReader<T> {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Feeds one chunk, returning every value completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<T>, serde_json::Error> {
        self.buf.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = &line[..line.len() - 1];
            if !line.iter().all(u8::is_ascii_whitespace) {
                out.push(serde_json::from_slice(line)?);
            }
        }
        Ok(out)
    }

    /// Ends the stream, decoding a trailing line that never got its newline.
    pub fn finish(self) -> Result<Option<T>, serde_json::Error> {
        if self.buf.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&self.buf).map(Some)
    }
}
