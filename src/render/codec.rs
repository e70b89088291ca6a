//! Render bridge wire codec
//!
//! Messages use HTTP-style headers followed by a JSON body:
//! ```text
//! Content-Length: <byte-length>\r\n
//! \r\n
//! <JSON body>
//! ```

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::common::Error;

/// Upper bound on a single message body
const MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// Read one message from the stream
///
/// Parses the Content-Length header and reads the JSON body
pub async fn read_message<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<String, Error> {
    let mut content_length: Option<usize> = None;

    loop {
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).await.map_err(map_eof)?;

        if bytes_read == 0 {
            return Err(Error::RendererCrashed);
        }

        // Empty line ends the headers
        if line == "\r\n" || line == "\n" {
            break;
        }

        let line = line.trim();
        if let Some(value) = line.strip_prefix("Content-Length:") {
            content_length = Some(value.trim().parse().map_err(|_| {
                Error::RendererProtocol(format!("Invalid Content-Length: {}", value.trim()))
            })?);
        }
    }

    let len = content_length
        .ok_or_else(|| Error::RendererProtocol("Missing Content-Length header".to_string()))?;

    if len > MAX_MESSAGE_BYTES {
        return Err(Error::RendererProtocol(format!(
            "Content-Length too large: {} bytes",
            len
        )));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(map_eof)?;

    String::from_utf8(body).map_err(|e| Error::RendererProtocol(format!("Invalid UTF-8: {}", e)))
}

/// Write one message to the stream
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> Result<(), Error> {
    let header = format!("Content-Length: {}\r\n\r\n", json.len());

    writer.write_all(header.as_bytes()).await?;
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}

fn map_eof(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::RendererCrashed
    } else {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_read_message_with_extra_headers() {
        let data = b"Content-Length: 13\r\nContent-Type: application/json\r\n\r\n{\"test\":true}";
        let mut reader = BufReader::new(Cursor::new(data.to_vec()));

        let result = read_message(&mut reader).await.unwrap();
        assert_eq!(result, "{\"test\":true}");
    }

    #[tokio::test]
    async fn test_truncated_body_means_bridge_crashed() {
        let data = b"Content-Length: 40\r\n\r\n{\"test\":";
        let mut reader = BufReader::new(Cursor::new(data.to_vec()));

        assert!(matches!(read_message(&mut reader).await, Err(Error::RendererCrashed)));
    }

    #[tokio::test]
    async fn test_missing_length_header() {
        let data = b"Content-Type: application/json\r\n\r\n{}";
        let mut reader = BufReader::new(Cursor::new(data.to_vec()));

        assert!(matches!(read_message(&mut reader).await, Err(Error::RendererProtocol(_))));
    }

    #[tokio::test]
    async fn test_write_message() {
        let mut output = Vec::new();
        write_message(&mut output, "{\"seq\":1}").await.unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "Content-Length: 9\r\n\r\n{\"seq\":1}");
    }
}
