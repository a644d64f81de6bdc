//! Line-oriented reading of child process output streams.
//!
//! [`LineReader`] splits an async byte stream into text lines as they arrive,
//! so output can be forwarded line by line without buffering the whole stream.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Lazily yields complete lines from an async byte stream.
///
/// Lines are split on `\n`; a preceding `\r` is dropped so CRLF output reads
/// the same as LF output. A trailing segment without a terminator is yielded
/// as the final line. Invalid UTF-8 is replaced rather than rejected.
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            buf: Vec::new(),
        }
    }

    /// Read the next line, or `None` once the stream is exhausted.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        let read = self.inner.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Drive `stream` to completion, handing every line to `on_line`.
///
/// A missing stream (`None`) is treated as empty.
pub async fn for_each_line<R, F>(stream: Option<R>, mut on_line: F) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(String),
{
    let Some(stream) = stream else {
        return Ok(());
    };

    let mut lines = LineReader::new(stream);
    while let Some(line) = lines.next_line().await? {
        on_line(line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
