//! Eval-wrapper loop: feed delimited input items to an installed wrapper.
//!
//! Input is read in fixed-size blocks and split on the delimiter as it
//! streams in, so the loop works on unbounded input. Delimiters may be
//! several bytes long and may straddle block boundaries.

use std::io::{self, Read};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::types::EvalWrapper;

/// Delimiter used when the start message carries none (or an empty one).
pub const DEFAULT_DELIMITER: &str = "\n";

const READ_BLOCK: usize = 8192;

/// Feed every non-empty item of `reader` to `wrapper`, in input order.
///
/// A trailing item without a final delimiter is still delivered. The first
/// wrapper error stops the loop. Returns the number of items delivered.
pub fn run_eval_loop<R: Read>(
    reader: R,
    wrapper: &mut EvalWrapper,
    delimiter: Option<&str>,
) -> Result<usize> {
    let delimiter = match delimiter {
        Some(delim) if !delim.is_empty() => delim,
        _ => DEFAULT_DELIMITER,
    };
    debug!(wrapper = wrapper.name(), delimiter = ?delimiter, "starting eval-wrapper loop");

    let mut delivered = 0usize;
    for item in DelimitedItems::new(reader, delimiter.as_bytes()) {
        let item = item.context("read eval-wrapper input")?;
        if item.is_empty() {
            continue;
        }
        let text = String::from_utf8_lossy(&item);
        wrapper
            .call(&text)
            .with_context(|| {
                format!(
                    "eval wrapper '{}' failed on item {}",
                    wrapper.name(),
                    delivered + 1
                )
            })?;
        delivered += 1;
    }

    debug!(delivered, "eval-wrapper input exhausted");
    Ok(delivered)
}

/// Iterator over the delimiter-separated items of a byte stream.
pub struct DelimitedItems<R> {
    reader: R,
    delimiter: Vec<u8>,
    buf: Vec<u8>,
    // Bytes of `buf` already known not to start a delimiter.
    scanned: usize,
    eof: bool,
}

impl<R: Read> DelimitedItems<R> {
    /// An empty `delimiter` falls back to [`DEFAULT_DELIMITER`].
    pub fn new(reader: R, delimiter: &[u8]) -> Self {
        let delimiter = if delimiter.is_empty() {
            DEFAULT_DELIMITER.as_bytes().to_vec()
        } else {
            delimiter.to_vec()
        };
        Self {
            reader,
            delimiter,
            buf: Vec::new(),
            scanned: 0,
            eof: false,
        }
    }

    fn next_item(&mut self) -> io::Result<Option<Vec<u8>>> {
        loop {
            if let Some(pos) = find(&self.buf[self.scanned..], &self.delimiter) {
                let end = self.scanned + pos;
                let item = self.buf[..end].to_vec();
                self.buf.drain(..end + self.delimiter.len());
                self.scanned = 0;
                return Ok(Some(item));
            }
            // A delimiter may still begin in the last `len - 1` bytes.
            self.scanned = self.buf.len().saturating_sub(self.delimiter.len() - 1);

            if self.eof {
                self.scanned = 0;
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(std::mem::take(&mut self.buf)));
            }

            let mut block = [0u8; READ_BLOCK];
            match self.reader.read(&mut block) {
                Ok(0) => self.eof = true,
                Ok(n) => self.buf.extend_from_slice(&block[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}

impl<R: Read> Iterator for DelimitedItems<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item().transpose()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
