//! Line splitting for the serial stream.

use tracing::debug;

use crate::core::MAX_SENTENCE_LEN;

/// Reassembles newline-terminated lines from arbitrary read chunks.
///
/// Partial lines are kept across calls. A trailing `\r` is stripped. Lines
/// longer than the limit are dropped whole, up to and including their
/// terminating newline.
#[derive(Debug)]
pub struct LineAssembler {
    pending: Vec<u8>,
    max_len: usize,
    discarding: bool,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    /// Assembler with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(MAX_SENTENCE_LEN)
    }

    /// Assembler with a custom line limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            pending: Vec::with_capacity(max_len.min(256)),
            max_len,
            discarding: false,
        }
    }

    /// Bytes buffered for the current partial line.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Feed a chunk and collect every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for segment in chunk.split_inclusive(|&b| b == b'\n') {
            let complete = segment.last() == Some(&b'\n');
            let body = if complete {
                &segment[..segment.len() - 1]
            } else {
                segment
            };

            if !self.discarding {
                if self.pending.len() + body.len() > self.max_len {
                    debug!(limit = self.max_len, "serial line too long, discarding");
                    self.pending.clear();
                    self.discarding = true;
                } else {
                    self.pending.extend_from_slice(body);
                }
            }

            if complete {
                if !self.discarding {
                    let mut line = std::mem::take(&mut self.pending);
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                    lines.push(String::from_utf8_lossy(&line).into_owned());
                }
                self.discarding = false;
            }
        }
        lines
    }
}
