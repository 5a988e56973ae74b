use crate::{HEAD, KIND_COMMAND, KIND_MEASUREMENT, REPLY_LEN};

/// Reassembles reply frames from a byte stream.
///
/// Bytes before a `0xAA` header are dropped, as is a header that is not
/// followed by a known reply kind. Checksums are left to [`crate::Frame::decode`].
#[derive(Debug, Default)]
pub struct FrameReader {
    buffer: [u8; REPLY_LEN],
    len: usize,
}

impl FrameReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one byte, returning a complete frame once ten bytes line up.
    pub fn push(&mut self, byte: u8) -> Option<[u8; REPLY_LEN]> {
        match self.len {
            0 if byte != HEAD => return None,
            1 if byte != KIND_MEASUREMENT && byte != KIND_COMMAND => {
                // a repeated header may be the real start of the frame
                self.len = usize::from(byte == HEAD);
                return None;
            }
            _ => {}
        }

        self.buffer[self.len] = byte;
        self.len += 1;

        if self.len == REPLY_LEN {
            self.len = 0;
            Some(self.buffer)
        } else {
            None
        }
    }

    /// Drops a partially received frame.
    pub fn reset(&mut self) {
        self.len = 0;
    }
}
