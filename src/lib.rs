//! HTTP/1.1 server that parses requests straight off TCP byte streams.
//!
//! - [`http`]: header table, incremental request parser, stream reader and
//!   response writer
//! - [`handler`]: the [`Handler`](handler::Handler) trait and the demo handler
//! - [`net`]: accept loop, request inspector and UDP line sender

pub mod cli;
pub mod config;
pub mod handler;
pub mod http;
pub mod logging;
pub mod net;
