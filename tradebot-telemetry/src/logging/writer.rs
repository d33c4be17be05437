//! Writer that masks secrets in formatted log lines.

use crate::masking::SensitiveDataMasker;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Wraps a [`MakeWriter`] so every line passes through a
/// [`SensitiveDataMasker`] before it is written.
#[derive(Debug, Clone)]
pub struct MaskingMakeWriter<M> {
    inner: M,
    masker: Arc<SensitiveDataMasker>,
}

impl<M> MaskingMakeWriter<M> {
    /// Wraps `inner`.
    pub fn new(inner: M, masker: Arc<SensitiveDataMasker>) -> Self {
        Self { inner, masker }
    }
}

impl<'a, M> MakeWriter<'a> for MaskingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = MaskingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        MaskingWriter {
            inner: self.inner.make_writer(),
            masker: Arc::clone(&self.masker),
        }
    }
}

/// Writer produced by [`MaskingMakeWriter`].
pub struct MaskingWriter<W> {
    inner: W,
    masker: Arc<SensitiveDataMasker>,
}

impl<W: Write> Write for MaskingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match std::str::from_utf8(buf) {
            Ok(text) => self
                .inner
                .write_all(self.masker.mask_string(text).as_bytes())?,
            Err(_) => self.inner.write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lines_are_masked() {
        let buf = SharedBuf::default();
        let sink = buf.clone();
        let make = MaskingMakeWriter::new(move || sink.clone(), Arc::new(SensitiveDataMasker::new()));

        let line = b"DEBUG api_key=abcdefghijklmnop1234567890123456 symbol=BTCUSDT\n";
        let written = make.make_writer().write(line).unwrap();

        assert_eq!(written, line.len());
        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out, "DEBUG api_key=abc***456 symbol=BTCUSDT\n");
    }

    #[test]
    fn test_non_utf8_passes_through() {
        let buf = SharedBuf::default();
        let sink = buf.clone();
        let make = MaskingMakeWriter::new(move || sink.clone(), Arc::new(SensitiveDataMasker::new()));

        make.make_writer().write_all(&[0xff, 0xfe]).unwrap();
        assert_eq!(*buf.0.lock().unwrap(), vec![0xff, 0xfe]);
    }
}
