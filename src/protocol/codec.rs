//! JSON framing over byte streams.
//!
//! # Responsibilities
//! - Encode one envelope as a compact JSON object terminated by `\n`
//! - Decode a whitespace-agnostic stream of JSON values incrementally
//! - Bound the size of a single frame
//!
//! # Design Decisions
//! - Values are located with serde_json's stream deserializer; a value split
//!   across reads is completed by reading more input
//! - After a syntax error or an oversized frame the decoder skips exactly one
//!   frame: up to the bracket that closes it, or up to the next line that
//!   opens a new value, whichever comes first. Newlines alone never delimit
//!   a frame, so a malformed value spread over several lines is still one
//!   error and a valid value following it on the same line is kept
//! - A well-formed value of the wrong shape is consumed whole

use std::io;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Default upper bound for a single decoded frame.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 1024 * 1024;

const READ_CHUNK_BYTES: usize = 8 * 1024;

/// Errors produced while decoding a frame.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The underlying reader failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended in the middle of a JSON value.
    #[error("stream ended inside a JSON value ({buffered} bytes buffered)")]
    Truncated { buffered: usize },

    /// The input is not valid JSON.
    #[error("malformed JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The input is valid JSON but not the expected envelope.
    #[error("unexpected JSON shape: {0}")]
    Shape(#[source] serde_json::Error),

    /// A single frame grew beyond the configured limit.
    #[error("frame exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

impl DecodeError {
    /// True for errors caused by the content of one frame rather than the
    /// stream itself; the decoder can keep reading after these.
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            DecodeError::Syntax(_) | DecodeError::Shape(_) | DecodeError::TooLarge { .. }
        )
    }
}

/// Serialize a value as one compact JSON object followed by a newline.
pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write one envelope and flush it.
pub async fn write_envelope<W, T>(writer: &mut W, value: &T) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let bytes = encode(value)?;
    writer.write_all(&bytes).await?;
    writer.flush().await
}

/// Incremental decoder for a stream of JSON values.
#[derive(Debug)]
pub struct FrameDecoder<R> {
    reader: R,
    buffer: Vec<u8>,
    max_frame_bytes: usize,
    skipping: Option<FrameSkipper>,
    eof: bool,
}

impl<R: AsyncRead + Unpin> FrameDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_limit(reader, DEFAULT_MAX_FRAME_BYTES)
    }

    pub fn with_limit(reader: R, max_frame_bytes: usize) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            max_frame_bytes,
            skipping: None,
            eof: false,
        }
    }

    /// Decode the next value.
    ///
    /// Returns `Ok(None)` once the stream has ended and only whitespace
    /// remained after the last value.
    pub async fn next<T: DeserializeOwned>(&mut self) -> Result<Option<T>, DecodeError> {
        loop {
            if let Some(value) = self.try_decode()? {
                return Ok(Some(value));
            }

            if self.buffer.len() > self.max_frame_bytes {
                self.skip_frame();
                return Err(DecodeError::TooLarge {
                    limit: self.max_frame_bytes,
                });
            }

            if self.eof {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let buffered = self.buffer.len();
                self.buffer.clear();
                return Err(DecodeError::Truncated { buffered });
            }

            self.fill().await?;
        }
    }

    fn try_decode<T: DeserializeOwned>(&mut self) -> Result<Option<T>, DecodeError> {
        let leading = self
            .buffer
            .iter()
            .take_while(|byte| is_json_whitespace(**byte))
            .count();
        self.buffer.drain(..leading);
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let (parsed, consumed) = {
            let mut values = serde_json::Deserializer::from_slice(&self.buffer).into_iter::<Value>();
            let parsed = values.next();
            (parsed, values.byte_offset())
        };

        match parsed {
            None => Ok(None),
            Some(Err(error)) if error.is_eof() => Ok(None),
            Some(Err(error)) => {
                self.skip_frame();
                Err(DecodeError::Syntax(error))
            }
            Some(Ok(value)) => {
                self.buffer.drain(..consumed);
                if consumed > self.max_frame_bytes {
                    return Err(DecodeError::TooLarge {
                        limit: self.max_frame_bytes,
                    });
                }
                serde_json::from_value(value)
                    .map(Some)
                    .map_err(DecodeError::Shape)
            }
        }
    }

    /// Drop the frame at the head of the buffer. If it is not closed yet,
    /// the rest of it is skipped as it arrives.
    fn skip_frame(&mut self) {
        let mut skipper = FrameSkipper::default();
        match skipper.scan(&self.buffer) {
            Some(end) => {
                self.buffer.drain(..end);
            }
            None => {
                self.buffer.clear();
                self.skipping = Some(skipper);
            }
        }
    }

    async fn fill(&mut self) -> Result<(), DecodeError> {
        let mut chunk = [0_u8; READ_CHUNK_BYTES];
        let read = loop {
            match self.reader.read(&mut chunk).await {
                Ok(read) => break read,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(DecodeError::Io(error)),
            }
        };

        if read == 0 {
            self.eof = true;
            return Ok(());
        }

        let mut bytes = &chunk[..read];
        if let Some(skipper) = self.skipping.as_mut() {
            match skipper.scan(bytes) {
                Some(end) => {
                    self.skipping = None;
                    bytes = &bytes[end..];
                }
                None => return Ok(()),
            }
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }
}

fn is_json_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Finds where a malformed frame ends.
///
/// A frame opened by `{` or `[` ends at its matching close. Any other frame
/// ends where the next value opens. In both cases a `{` or `[` that is the
/// first non-whitespace byte of a line starts a new frame, so an unclosed
/// value cannot swallow the requests after it. Brackets inside strings are
/// ignored; a raw newline ends a string since JSON strings cannot hold one.
#[derive(Debug, Default)]
struct FrameSkipper {
    started: bool,
    depth: usize,
    in_string: bool,
    escaped: bool,
    line_start: bool,
}

impl FrameSkipper {
    /// Feed the next bytes of the frame. Returns the offset in `bytes` where
    /// the following frame begins, or `None` if all of `bytes` belongs to
    /// the frame being skipped.
    fn scan(&mut self, bytes: &[u8]) -> Option<usize> {
        for (index, &byte) in bytes.iter().enumerate() {
            if self.in_string {
                match byte {
                    _ if self.escaped => self.escaped = false,
                    b'\\' => self.escaped = true,
                    b'"' | b'\n' => self.in_string = false,
                    _ => {}
                }
                self.line_start = byte == b'\n';
                continue;
            }

            if !self.started {
                if is_json_whitespace(byte) {
                    continue;
                }
                self.started = true;
                if matches!(byte, b'{' | b'[') {
                    self.depth = 1;
                    continue;
                }
            }

            match byte {
                b'{' | b'[' if self.depth == 0 || self.line_start => return Some(index),
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' if self.depth == 1 => return Some(index + 1),
                b'}' | b']' => self.depth = self.depth.saturating_sub(1),
                b'"' => self.in_string = true,
                _ => {}
            }
            self.line_start = byte == b'\n' || (self.line_start && is_json_whitespace(byte));
        }
        None
    }
}
