//! Little-endian primitive reader with position tracking.

use std::io::{self, Read};

use crate::error::{IoError, IoResult};

/// Upper bound on speculative pre-allocation from an untrusted count.
const MAX_PREALLOC: usize = 1 << 16;

pub(crate) struct BinaryReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> BinaryReader<R> {
    pub(crate) const fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    fn fill<const N: usize>(&mut self) -> IoResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf).map_err(|e| self.eof(e))?;
        self.position += N as u64;
        Ok(buf)
    }

    fn eof(&self, err: io::Error) -> IoError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            IoError::UnexpectedEof {
                position: self.position,
            }
        } else {
            IoError::Io(err)
        }
    }

    pub(crate) fn u8(&mut self) -> IoResult<u8> {
        Ok(self.fill::<1>()?[0])
    }

    pub(crate) fn u32(&mut self) -> IoResult<u32> {
        self.fill().map(u32::from_le_bytes)
    }

    pub(crate) fn i32(&mut self) -> IoResult<i32> {
        self.fill().map(i32::from_le_bytes)
    }

    pub(crate) fn u64(&mut self) -> IoResult<u64> {
        self.fill().map(u64::from_le_bytes)
    }

    pub(crate) fn f64(&mut self) -> IoResult<f64> {
        self.fill().map(f64::from_le_bytes)
    }

    pub(crate) fn f64_array<const N: usize>(&mut self) -> IoResult<[f64; N]> {
        let mut out = [0.0; N];
        for v in &mut out {
            *v = self.f64()?;
        }
        Ok(out)
    }

    /// Element count, converted to `usize`.
    pub(crate) fn count(&mut self) -> IoResult<usize> {
        let raw = self.u64()?;
        usize::try_from(raw)
            .map_err(|_| IoError::invalid_content(format!("element count {raw} is too large")))
    }

    /// NUL-terminated UTF-8 string.
    pub(crate) fn c_string(&mut self) -> IoResult<String> {
        let mut bytes = Vec::new();
        loop {
            match self.u8()? {
                0 => break,
                b => bytes.push(b),
            }
        }
        String::from_utf8(bytes)
            .map_err(|e| IoError::invalid_content(format!("name is not valid UTF-8: {e}")))
    }

    /// Skip `count` records of `width` bytes each.
    pub(crate) fn skip(&mut self, count: u64, width: u64) -> IoResult<()> {
        let total = count
            .checked_mul(width)
            .ok_or_else(|| IoError::invalid_content("skip length overflows"))?;
        let copied = io::copy(&mut (&mut self.inner).take(total), &mut io::sink())?;
        self.position += copied;
        if copied < total {
            return Err(IoError::UnexpectedEof {
                position: self.position,
            });
        }
        Ok(())
    }
}

pub(crate) fn capacity_hint(count: usize) -> usize {
    count.min(MAX_PREALLOC)
}
