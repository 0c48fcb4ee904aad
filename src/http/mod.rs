//! HTTP protocol implementation.
//!
//! This module implements the request pipeline of a one-request-per-connection
//! HTTP/1.0 and HTTP/1.1 static server.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine driving the pipeline
//! - **`parser`**: Splits the incoming header block into lines
//! - **`validator`**: Accepts or rejects a captured header block
//! - **`request`**: Raw and parsed request representations
//! - **`response`**: Response representation and the status builders
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: Html/Image classification by file extension
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingHeaders  │ ← Read lines until a blank line or EOF
//!        └──────┬───────────┘
//!               │ Header block captured (timeout → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │     Parsed       │ ← Validate
//!        └──────┬───────────┘
//!               ├─ Malformed → Serving (400)
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← Resolve path, check redirects
//!        └──────┬───────────┘
//!               │ 200 / 301 / 404
//!               ▼
//!        ┌──────────────────┐
//!        │     Serving      │ ← Write response
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use statik::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! let listener = TcpListener::bind("127.0.0.1:6789").await?;
//! loop {
//!     let (socket, peer) = listener.accept().await?;
//!     let site = site.clone();
//!     tokio::spawn(async move {
//!         if let Err(e) = Connection::new(socket, peer, site).run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     });
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod validator;
pub mod writer;
