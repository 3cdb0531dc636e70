//! One-shot HTTP/1.1 server that streams a chunked body without `Content-Length`.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the server does once the response headers are written.
#[derive(Debug, Clone)]
pub enum ChunkedBody {
    /// Sends every chunk, then the terminating zero-length chunk.
    Complete(Vec<Vec<u8>>),
    /// Sends nothing more and holds the connection open.
    Stall,
}

/// Starts the server and returns the URL of its `/page` path.
///
/// The server answers a single request. Write errors are ignored because
/// the client may drop the connection mid-body.
pub async fn start_chunked_server(body: ChunkedBody) -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            let _ = respond(stream, body).await;
        }
    });

    Ok(format!("http://{addr}/page"))
}

async fn respond(mut stream: TcpStream, body: ChunkedBody) -> std::io::Result<()> {
    read_request_head(&mut stream).await?;

    stream
        .write_all(
            b"HTTP/1.1 200 OK\r\n\
              Content-Type: text/html; charset=utf-8\r\n\
              Transfer-Encoding: chunked\r\n\
              Connection: close\r\n\r\n",
        )
        .await?;
    stream.flush().await?;

    match body {
        ChunkedBody::Complete(chunks) => {
            for chunk in chunks {
                stream
                    .write_all(format!("{:x}\r\n", chunk.len()).as_bytes())
                    .await?;
                stream.write_all(&chunk).await?;
                stream.write_all(b"\r\n").await?;
                stream.flush().await?;
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            stream.write_all(b"0\r\n\r\n").await?;
            stream.flush().await?;
        }
        ChunkedBody::Stall => {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    }
    Ok(())
}

async fn read_request_head(stream: &mut TcpStream) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0_u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let read = stream.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        head.extend_from_slice(&buf[..read]);
    }
    Ok(())
}
