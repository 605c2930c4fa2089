use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Async line reader over raw upload bytes.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`; the terminator is not part of the
/// line, and a terminator right before end-of-stream does not start another
/// line. Invalid UTF-8 is replaced with U+FFFD and a byte-order mark in front
/// of the first line is dropped.
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
    line_number: usize,
    // Last line ended in `\r`; a `\n` right after it belongs to that line.
    skip_lf: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            buf: Vec::new(),
            line_number: 0,
            skip_lf: false,
        }
    }

    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        let mut started = false;

        loop {
            let available = self.inner.fill_buf().await?;
            if available.is_empty() {
                if !started {
                    return Ok(None);
                }
                break;
            }

            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    self.inner.consume(1);
                    continue;
                }
            }
            started = true;

            match available.iter().position(|b| *b == b'\n' || *b == b'\r') {
                Some(end) => {
                    self.skip_lf = available[end] == b'\r';
                    self.buf.extend_from_slice(&available[..end]);
                    self.inner.consume(end + 1);
                    break;
                }
                None => {
                    let taken = available.len();
                    self.buf.extend_from_slice(available);
                    self.inner.consume(taken);
                }
            }
        }

        self.line_number += 1;
        let line = String::from_utf8_lossy(&self.buf);
        let line = if self.line_number == 1 {
            line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&*line).to_string()
        } else {
            line.into_owned()
        };

        Ok(Some(line))
    }

    /// 1-based number of the line last returned, 0 before the first.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    async fn collect<R: AsyncRead + Unpin>(input: R) -> Vec<String> {
        let mut reader = LineReader::new(input);
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().await.unwrap() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_splits_on_lf_and_crlf() {
        assert_eq!(collect(&b"a\nb\r\nc"[..]).await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_lone_cr_ends_a_line() {
        assert_eq!(collect(&b"a\rb\rc"[..]).await, vec!["a", "b", "c"]);
        assert_eq!(collect(&b"a\r\rb"[..]).await, vec!["a", "", "b"]);
        assert_eq!(collect(&b"a\r\n\rb\n"[..]).await, vec!["a", "", "b"]);
    }

    #[tokio::test]
    async fn test_crlf_split_across_reads_is_one_terminator() {
        let reader = Builder::new().read(b"a\r").read(b"\nb").build();
        assert_eq!(collect(reader).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_line_split_across_reads_is_joined() {
        let reader = Builder::new().read(b"ab").read(b"c\td\n").build();
        assert_eq!(collect(reader).await, vec!["abc\td"]);
    }

    #[tokio::test]
    async fn test_final_terminator_adds_no_line() {
        assert_eq!(collect(&b"a\nb\n"[..]).await, vec!["a", "b"]);
        assert_eq!(collect(&b"a\r\n"[..]).await, vec!["a"]);
        assert_eq!(collect(&b"a\r"[..]).await, vec!["a"]);
    }

    #[tokio::test]
    async fn test_blank_lines_are_kept() {
        assert_eq!(collect(&b"\na\n\n"[..]).await, vec!["", "a", ""]);
    }

    #[tokio::test]
    async fn test_empty_stream_has_no_lines() {
        assert!(collect(&b""[..]).await.is_empty());
    }

    #[tokio::test]
    async fn test_strips_byte_order_mark_on_first_line_only() {
        let input = "\u{feff}a\tb\n\u{feff}c".as_bytes();
        assert_eq!(collect(input).await, vec!["a\tb", "\u{feff}c"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        assert_eq!(collect(&b"caf\xe9\tx"[..]).await, vec!["caf\u{fffd}\tx"]);
    }

    #[tokio::test]
    async fn test_tracks_line_numbers() {
        let mut reader = LineReader::new(&b"a\nb"[..]);
        assert_eq!(reader.line_number(), 0);
        reader.next_line().await.unwrap();
        reader.next_line().await.unwrap();
        assert_eq!(reader.line_number(), 2);
        assert!(reader.next_line().await.unwrap().is_none());
        assert_eq!(reader.line_number(), 2);
    }
}
