// Single-use local listener that captures the OAuth authorization code
//
// The listener runs on its own thread and hands the code to the waiting
// flow through a one-slot channel. Requests reporting an `error` (or a
// foreign `state`) get an error page and the flow keeps waiting; there is
// no timeout.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use url::Url;
use crate::error::MoverError;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

const PAGE_TITLE: &str = "Google Task Mover";

/// What a single callback request amounted to
#[derive(Debug, PartialEq, Eq)]
enum CallbackRequest {
    Code(String),
    Rejected,
}

/// Bound, not yet serving, callback listener
pub struct CallbackServer {
    listener: TcpListener,
    state: String,
}

impl CallbackServer {
    /// Bind the listener. `state` must come back unchanged on the callback.
    pub fn bind(addr: impl ToSocketAddrs, state: impl Into<String>) -> Result<Self, MoverError> {
        let listener = TcpListener::bind(addr)
            .map_err(|e| MoverError::Callback(format!("unable to bind callback listener: {}", e)))?;
        Ok(Self {
            listener,
            state: state.into(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, MoverError> {
        self.listener
            .local_addr()
            .map_err(|e| MoverError::Callback(e.to_string()))
    }

    /// Start serving on a background thread
    pub fn spawn(self) -> PendingCode {
        let (tx, rx) = mpsc::sync_channel(1);
        let handle = thread::spawn(move || self.serve(tx));
        PendingCode { rx, handle }
    }

    fn serve(self, tx: SyncSender<String>) {
        if let Ok(addr) = self.listener.local_addr() {
            log::info!("Callback listener waiting on {}", addr);
        }
        for stream in self.listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    log::warn!("Callback listener stopped: {}", e);
                    return;
                }
            };
            match handle_request(&mut stream, &self.state) {
                Ok(CallbackRequest::Code(code)) => {
                    let _ = tx.send(code);
                    break;
                }
                Ok(CallbackRequest::Rejected) => {}
                Err(e) => log::warn!("Dropped callback request: {}", e),
            }
        }
        log::info!("Callback listener closed");
    }
}

/// Authorization code that will arrive from the browser
pub struct PendingCode {
    rx: Receiver<String>,
    handle: JoinHandle<()>,
}

impl PendingCode {
    /// Block until the code arrives, then tear the listener down
    pub fn wait(self) -> Result<String, MoverError> {
        let code = self.rx.recv().map_err(|_| {
            MoverError::Callback("listener stopped before an authorization code arrived".to_string())
        })?;
        let _ = self.handle.join();
        Ok(code)
    }
}

fn handle_request(stream: &mut TcpStream, expected_state: &str) -> std::io::Result<CallbackRequest> {
    stream.set_read_timeout(Some(READ_TIMEOUT))?;

    let request_line = {
        let mut reader = BufReader::new(&*stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line)?;
        loop {
            let mut header = String::new();
            if reader.read_line(&mut header)? == 0 || header.trim_end().is_empty() {
                break;
            }
        }
        request_line
    };

    let target = request_line.split_whitespace().nth(1).unwrap_or("/");
    let url = match Url::parse("http://localhost").and_then(|base| base.join(target)) {
        Ok(url) => url,
        Err(_) => {
            respond(stream, 400, &error_page("malformed request"))?;
            return Ok(CallbackRequest::Rejected);
        }
    };

    if url.path() != "/" {
        respond(stream, 404, "<h1>Not Found</h1>")?;
        return Ok(CallbackRequest::Rejected);
    }

    let mut code = None;
    let mut error = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error.filter(|e| !e.is_empty()) {
        log::warn!("Authorization server reported an error: {}", error);
        respond(stream, 200, &error_page(&error))?;
        return Ok(CallbackRequest::Rejected);
    }

    match code.filter(|c| !c.is_empty()) {
        Some(code) => {
            if state.as_deref() != Some(expected_state) {
                log::warn!("Callback carried an unexpected state value");
                respond(stream, 400, &error_page("state mismatch, please restart the authorization"))?;
                return Ok(CallbackRequest::Rejected);
            }
            respond(stream, 200, &success_page())?;
            Ok(CallbackRequest::Code(code))
        }
        None => {
            respond(stream, 400, &error_page("missing authorization code"))?;
            Ok(CallbackRequest::Rejected)
        }
    }
}

fn respond(stream: &mut TcpStream, status: u16, body: &str) -> std::io::Result<()> {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes())?;
    stream.flush()
}

fn success_page() -> String {
    format!(
        "<h1>{}</h1>\n<p>Received the code from Google. You can close this window.</p>",
        PAGE_TITLE
    )
}

fn error_page(message: &str) -> String {
    format!(
        "<h1>{}</h1>\n<p>There was an error completing the OAuth workflow: {}</p>",
        PAGE_TITLE,
        escape_html(message)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
