// Connection handling module
// Reads complete requests off a stream, answers them and honors keep-alive

use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use rawhttp::config::Config;
use rawhttp::http::scan::HEAD_DELIMITER;
use rawhttp::logger::{self, AccessLogEntry};
use rawhttp::{Request, Response};

use super::handler;

/// Largest request head accepted before answering 431
const MAX_HEAD_SIZE: usize = 16 * 1024;

const READ_CHUNK: usize = 4096;

/// Result of reading one request off the stream
#[derive(Debug, PartialEq, Eq)]
enum ReadOutcome {
    /// Complete request: head, blank line and `Content-Length` body bytes
    Message(Vec<u8>),
    /// Peer closed the connection
    Closed,
    /// Head grew past `MAX_HEAD_SIZE`
    HeadTooLarge,
    /// Declared body exceeds `http.max_body_size`
    BodyTooLarge,
    /// `Content-Length` is not a number
    InvalidLength,
}

/// Serve requests on one connection until it closes or stops being keep-alive
pub async fn serve<S>(mut stream: S, peer_addr: SocketAddr, config: &Config) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let read_timeout = Duration::from_secs(config.http.read_timeout);
    let mut buf = Vec::with_capacity(READ_CHUNK);

    loop {
        let read = tokio::time::timeout(
            read_timeout,
            read_message(&mut stream, &mut buf, config.http.max_body_size),
        )
        .await;

        let canned_status = match read {
            Err(_) => {
                // Idle keep-alive connections just go away
                if buf.is_empty() {
                    return Ok(());
                }
                408
            }
            Ok(outcome) => match outcome? {
                ReadOutcome::Message(raw) => {
                    let response = respond(&raw, peer_addr, config);
                    stream.write_all(&response.serialize()).await?;
                    if !response.keep_alive() {
                        return stream.shutdown().await;
                    }
                    continue;
                }
                ReadOutcome::Closed => return Ok(()),
                ReadOutcome::HeadTooLarge => 431,
                ReadOutcome::BodyTooLarge => 413,
                ReadOutcome::InvalidLength => 400,
            },
        };

        // The stream position is unknown after these, so the connection ends
        let mut response = Response::canned(canned_status)
            .unwrap_or_else(|_| Response::with_config(&config.http));
        response.close_connection();
        logger::log_warning(&format!(
            "[Request] {peer_addr}: answered {canned_status} {}",
            response.reason()
        ));
        stream.write_all(&response.serialize()).await?;
        return stream.shutdown().await;
    }
}

/// Parse one raw request and produce the response for it
fn respond(raw: &[u8], peer_addr: SocketAddr, config: &Config) -> Response {
    let started = Instant::now();

    let request = match Request::from_bytes(raw) {
        Ok(request) => request,
        Err(err) => {
            logger::log_bad_request(&peer_addr, &err);
            return Response::error_for(&err);
        }
    };

    let response = handler::handle(&request, &config.http).unwrap_or_else(|err| {
        logger::log_error(&format!("Handler failed for {}: {err}", request.line()));
        Response::error_for(&err)
    });

    if config.logging.access_log {
        let mut entry =
            AccessLogEntry::from_exchange(peer_addr.ip().to_string(), &request, &response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &config.logging.access_log_format);
    }

    response
}

/// Read until one complete request is buffered, then take it out of `buf`
///
/// Bytes past the end of the request stay in `buf` for the next call.
async fn read_message<S>(stream: &mut S, buf: &mut Vec<u8>, max_body: u64) -> io::Result<ReadOutcome>
where
    S: AsyncRead + Unpin,
{
    let mut chunk = [0u8; READ_CHUNK];

    let head_end = loop {
        if let Some(pos) = find_head_end(buf) {
            break pos;
        }
        if buf.len() > MAX_HEAD_SIZE {
            return Ok(ReadOutcome::HeadTooLarge);
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(ReadOutcome::Closed);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let Some(body_len) = content_length(&buf[..head_end]) else {
        return Ok(ReadOutcome::InvalidLength);
    };
    if body_len > max_body {
        return Ok(ReadOutcome::BodyTooLarge);
    }
    let Ok(body_len) = usize::try_from(body_len) else {
        return Ok(ReadOutcome::BodyTooLarge);
    };

    let total = head_end + HEAD_DELIMITER.len() + body_len;
    while buf.len() < total {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(ReadOutcome::Closed);
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(ReadOutcome::Message(buf.drain(..total).collect()))
}

/// Offset of the blank line ending the head
fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_DELIMITER.len())
        .position(|w| w == HEAD_DELIMITER.as_bytes())
}

/// Declared body length; a missing header means no body
fn content_length(head: &[u8]) -> Option<u64> {
    let head = String::from_utf8_lossy(head);
    let value = head.lines().skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-length")
            .then(|| value.trim().to_string())
    });
    match value {
        Some(value) => value.parse().ok(),
        None => Some(0),
    }
}
