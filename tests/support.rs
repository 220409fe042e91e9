use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP stub that accepts every request.
///
/// Returns `Ok(None)` when no listener can be bound, so callers can skip
/// instead of failing on machines without networking.
///
/// # Errors
///
/// Returns an error if the listener cannot be configured.
pub fn spawn_http_server_or_skip() -> Result<Option<(SocketAddr, ServerHandle)>, String> {
    spawn_server("HTTP/1.1 200 OK", "OK")
}

/// Spawn a stub that answers every request with a server error.
///
/// # Errors
///
/// Returns an error if the listener cannot be configured.
pub fn spawn_error_server_or_skip() -> Result<Option<(SocketAddr, ServerHandle)>, String> {
    spawn_server("HTTP/1.1 500 Internal Server Error", "NO")
}

fn spawn_server(
    status_line: &'static str,
    body: &'static str,
) -> Result<Option<(SocketAddr, ServerHandle)>, String> {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0") else {
        return Ok(None);
    };
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream, status_line, body));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok(Some((
        addr,
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    )))
}

/// Reads the whole request (headers plus Content-Length body) before
/// responding, so concurrent uploads never see the connection close
/// mid-write.
fn handle_client(mut stream: TcpStream, status_line: &'static str, body: &'static str) {
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        match stream.read(&mut chunk) {
            Ok(0) => return,
            Ok(read) => {
                buffer.extend_from_slice(chunk.get(..read).unwrap_or(&[]));
                if let Some(position) = find_blank_line(&buffer) {
                    break position;
                }
                if buffer.len() > 65_536 {
                    return;
                }
            }
            Err(_) => return,
        }
    };

    let body_start = header_end.saturating_add(4);
    let expected = content_length(&buffer, header_end);
    let mut received = buffer.len().saturating_sub(body_start);
    while received < expected {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => received = received.saturating_add(read),
            Err(_) => break,
        }
    }

    let response = format!(
        "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn find_blank_line(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

fn content_length(buffer: &[u8], header_end: usize) -> usize {
    let headers = String::from_utf8_lossy(buffer.get(..header_end).unwrap_or(&[]));
    for line in headers.lines() {
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            return value.trim().parse().unwrap_or(0);
        }
    }
    0
}

/// Run the `dfsbench` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_dfsbench<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = dfsbench_bin()?;
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .map_err(|err| format!("run dfsbench failed: {}", err))
}

fn dfsbench_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_dfsbench").map_or_else(
        || Err("CARGO_BIN_EXE_dfsbench missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
