#![allow(dead_code)]

use stagehand::{BoxError, Middleware, Socket, Value, testing::Journal};

// ============================================================================
// Test Middleware
// ============================================================================

/// A middleware that records `label` and passes the socket through.
pub fn record(label: &'static str, journal: &Journal) -> Middleware<Socket> {
    let journal = journal.clone();
    Middleware::new(label, move |socket: Socket| {
        let journal = journal.clone();
        async move {
            journal.record(label);
            Ok::<_, BoxError>(socket)
        }
    })
}

/// A middleware that assigns `key = value`.
pub fn assign(label: &'static str, key: &'static str, value: Value) -> Middleware<Socket> {
    Middleware::new(label, move |socket: Socket| {
        let value = value.clone();
        async move { Ok::<_, BoxError>(socket.assign(key, value)) }
    })
}

/// A middleware that redirects to `to`.
pub fn redirect(label: &'static str, to: &'static str) -> Middleware<Socket> {
    Middleware::new(label, move |socket: Socket| async move {
        Ok::<_, BoxError>(socket.redirect(to))
    })
}

// ============================================================================
// Test Handlers
// ============================================================================

/// A handler that stores its input under `input` and bumps `calls`.
pub async fn echo(socket: Socket, input: Value) -> Result<Socket, BoxError> {
    let calls = socket.get("calls").and_then(Value::as_int).unwrap_or(0);
    Ok(socket.assign("input", input).assign("calls", calls + 1))
}

/// A socket for `action` that has already been through entry and resume.
pub fn mounted(action: &str) -> Socket {
    use stagehand::Session;

    let mut socket = Socket::for_action(action);
    socket.mark_mounted();
    socket
}
