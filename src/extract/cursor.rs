//! Bounds-checked cursor over an untrusted byte buffer.
//!
//! Every multi-byte read checks the remaining length first and reports
//! exhaustion through `Option`, so walkers cannot index past the end of a
//! truncated or hostile buffer.

#[derive(Debug)]
pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Move to an absolute position. Fails past the end of the buffer.
    pub fn seek(&mut self, pos: usize) -> bool {
        if pos > self.data.len() {
            return false;
        }
        self.pos = pos;
        true
    }

    /// Advance by `n` bytes. Fails past the end of the buffer.
    pub fn skip(&mut self, n: usize) -> bool {
        match self.pos.checked_add(n) {
            Some(next) => self.seek(next),
            None => false,
        }
    }

    pub fn read_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.remaining() < n {
            return None;
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.read_bytes(N).and_then(|bytes| bytes.try_into().ok())
    }

    pub fn read_u32_be(&mut self) -> Option<u32> {
        self.read_array::<4>().map(u32::from_be_bytes)
    }

    pub fn read_u32_le(&mut self) -> Option<u32> {
        self.read_array::<4>().map(u32::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_and_exhaustion() {
        let data = [0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x00, 0x00, 0xFF];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u32_be(), Some(1));
        assert_eq!(cursor.read_u32_le(), Some(2));
        assert_eq!(cursor.remaining(), 1);
        // One byte left; a 4-byte read must fail without advancing.
        assert_eq!(cursor.read_u32_be(), None);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_seek_and_skip_bounds() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data);
        assert!(cursor.seek(8));
        assert!(!cursor.seek(9));
        assert!(cursor.seek(4));
        assert!(cursor.skip(4));
        assert!(!cursor.skip(1));
        assert!(!cursor.skip(usize::MAX));
    }
}
