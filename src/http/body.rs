//! Response body module
//!
//! Every response shares one boxed body type so in-memory pages and
//! streamed files can go through the same handler and decorator.

use futures_util::stream;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Body type of every response the server produces
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Read size for streamed files
const CHUNK_SIZE: usize = 64 * 1024;

/// Body holding `data` in memory
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body streaming `file` in chunks of at most [`CHUNK_SIZE`] bytes
pub fn file_stream(file: File) -> ResponseBody {
    StreamBody::new(stream::try_unfold(file, read_chunk)).boxed_unsync()
}

async fn read_chunk(mut file: File) -> io::Result<Option<(Frame<Bytes>, File)>> {
    let mut buf = vec![0; CHUNK_SIZE];
    let n = file.read(&mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    buf.truncate(n);
    Ok(Some((Frame::data(Bytes::from(buf)), file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_stream_spans_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.wasm");
        let content: Vec<u8> = (0..CHUNK_SIZE * 2 + 17)
            .map(|i| u8::try_from(i % 251).unwrap())
            .collect();
        std::fs::write(&path, &content).unwrap();

        let file = File::open(&path).await.unwrap();
        let mut body = file_stream(file);

        let mut frames = 0;
        let mut received = Vec::new();
        while let Some(frame) = body.frame().await {
            let data = frame.unwrap().into_data().unwrap();
            assert!(data.len() <= CHUNK_SIZE);
            received.extend_from_slice(&data);
            frames += 1;
        }
        assert!(frames >= 3);
        assert_eq!(received, content);
    }

    #[tokio::test]
    async fn test_full_and_empty() {
        let body = full("hello").collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");
        assert!(empty().collect().await.unwrap().to_bytes().is_empty());
    }
}
