use tracing::debug;

/// A circular byte store that grows when a write does not fit.
///
/// Unread bytes live in `[read, write)`, wrapping at the end of the storage.
/// `read == write` is ambiguous, `full` tells "completely full" from "empty".
#[derive(Debug)]
pub struct RingBuffer {
    buf: Box<[u8]>,
    read: usize,
    write: usize,
    full: bool,
    default_capacity: usize,
}

impl RingBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RingBuffer {
            buf: vec![0; capacity].into_boxed_slice(),
            read: 0,
            write: 0,
            full: false,
            default_capacity: capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        if self.full {
            self.capacity()
        } else if self.write >= self.read {
            self.write - self.read
        } else {
            self.capacity() - self.read + self.write
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.full && self.read == self.write
    }

    pub fn has_remaining(&self) -> bool {
        !self.is_empty()
    }

    /// Appends `data`, growing the storage first if it does not fit.
    pub fn write(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let free = self.capacity() - self.len();
        if free < data.len() {
            self.grow(self.len() + data.len());
        }

        let capacity = self.capacity();
        let first = data.len().min(capacity - self.write);
        self.buf[self.write..self.write + first].copy_from_slice(&data[..first]);
        let rest = data.len() - first;
        self.buf[..rest].copy_from_slice(&data[first..]);

        self.write = (self.write + data.len()) % capacity;
        self.full = self.write == self.read;
    }

    /// Returns the next unread byte, or `None` when everything has been read.
    pub fn read_byte(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let b = self.buf[self.read];
        self.read = (self.read + 1) % self.capacity();
        self.full = false;
        Some(b)
    }

    /// Consumes up to `max` unread bytes that are contiguous in storage.
    ///
    /// A run that wraps around is returned in two calls. An empty slice means
    /// nothing is left to read (or `max` is zero).
    pub fn read_chunk(&mut self, max: usize) -> &[u8] {
        if self.is_empty() || max == 0 {
            return &[];
        }
        let end = if self.read < self.write {
            self.write
        } else {
            self.capacity()
        };
        let start = self.read;
        let n = max.min(end - start);
        self.read = (start + n) % self.capacity();
        self.full = false;
        &self.buf[start..start + n]
    }

    /// Shrinks an overgrown, drained buffer back to its default capacity.
    /// Returns whether the storage was replaced.
    pub fn reclaim(&mut self) -> bool {
        if self.capacity() <= self.default_capacity || !self.is_empty() {
            return false;
        }
        debug!(
            from = self.capacity(),
            to = self.default_capacity,
            "reclaiming ring buffer"
        );
        *self = RingBuffer::with_capacity(self.default_capacity);
        true
    }

    // Relinearizes unread bytes at offset 0 of a new storage of `capacity` bytes.
    fn grow(&mut self, capacity: usize) {
        debug!(from = self.capacity(), to = capacity, "growing ring buffer");
        let len = self.len();
        let mut buf = vec![0; capacity].into_boxed_slice();
        let (head, tail) = self.unread();
        buf[..head.len()].copy_from_slice(head);
        buf[head.len()..len].copy_from_slice(tail);

        self.buf = buf;
        self.read = 0;
        self.write = len % capacity;
        self.full = len == capacity;
    }

    fn unread(&self) -> (&[u8], &[u8]) {
        if self.is_empty() {
            (&[], &[])
        } else if self.read < self.write {
            (&self.buf[self.read..self.write], &[])
        } else {
            (&self.buf[self.read..], &self.buf[..self.write])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(ring: &mut RingBuffer) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(b) = ring.read_byte() {
            out.push(b);
        }
        out
    }

    #[test]
    fn test_read_write() {
        let mut ring = RingBuffer::with_capacity(8);
        assert!(ring.is_empty());
        assert_eq!(ring.read_byte(), None);

        ring.write(b"abc");
        assert_eq!(ring.len(), 3);
        assert!(ring.has_remaining());
        assert_eq!(read_all(&mut ring), b"abc");
        assert!(!ring.has_remaining());
    }

    #[test]
    fn test_wraparound() {
        let mut ring = RingBuffer::with_capacity(8);
        ring.write(b"123456");
        assert_eq!(ring.read_byte(), Some(b'1'));
        assert_eq!(ring.read_byte(), Some(b'2'));
        assert_eq!(ring.read_byte(), Some(b'3'));
        assert_eq!(ring.read_byte(), Some(b'4'));

        // write cursor wraps past the end, read cursor is now ahead of it
        ring.write(b"abcd");
        assert_eq!(ring.capacity(), 8);
        assert_eq!(ring.len(), 6);
        assert_eq!(read_all(&mut ring), b"56abcd");
    }

    #[test]
    fn test_exactly_full() {
        let mut ring = RingBuffer::with_capacity(4);
        ring.write(b"ab");
        ring.write(b"cd");
        assert_eq!(ring.capacity(), 4);
        assert_eq!(ring.len(), 4);
        assert!(ring.has_remaining());
        assert_eq!(read_all(&mut ring), b"abcd");
        assert!(ring.is_empty());
    }

    #[test]
    fn test_grow_relinearizes_wrapped_content() {
        let mut ring = RingBuffer::with_capacity(4);
        ring.write(b"abc");
        assert_eq!(ring.read_byte(), Some(b'a'));
        ring.write(b"de"); // wraps: storage is "e b c d"
        assert_eq!(ring.len(), 4);

        ring.write(b"fgh");
        assert_eq!(ring.capacity(), 7);
        assert_eq!(ring.len(), 7);
        assert_eq!(read_all(&mut ring), b"bcdefgh");
    }

    #[test]
    fn test_grow_from_empty() {
        let mut ring = RingBuffer::with_capacity(2);
        ring.write(b"hello");
        assert_eq!(ring.capacity(), 5);
        assert_eq!(read_all(&mut ring), b"hello");
    }

    #[test]
    fn test_read_chunk() {
        let mut ring = RingBuffer::with_capacity(6);
        ring.write(b"abcd");
        assert_eq!(ring.read_chunk(3), b"abc");
        ring.write(b"efg"); // "g" wraps to the front

        assert_eq!(ring.read_chunk(10), b"def");
        assert_eq!(ring.read_chunk(10), b"g");
        assert_eq!(ring.read_chunk(10), b"");
        assert_eq!(ring.read_chunk(0), b"");
    }

    #[test]
    fn test_reclaim() {
        let mut ring = RingBuffer::with_capacity(4);
        // not grown
        assert!(!ring.reclaim());

        ring.write(b"0123456789");
        assert_eq!(ring.capacity(), 10);
        // grown but still holding data
        assert!(!ring.reclaim());
        assert_eq!(ring.capacity(), 10);

        assert_eq!(read_all(&mut ring).len(), 10);
        assert!(ring.reclaim());
        assert_eq!(ring.capacity(), 4);
        assert!(ring.is_empty());

        ring.write(b"ok");
        assert_eq!(read_all(&mut ring), b"ok");
    }
}
