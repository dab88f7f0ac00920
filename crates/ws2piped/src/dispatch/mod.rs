//! Message dispatch for gateway clients.
//!
//! This module turns each inbound WebSocket text message into exactly one
//! response message. The connection handler reads frames from the transport,
//! the router decodes and validates them into a `Command`, applies the
//! command to the shared pipe session, and the response envelope is sent back
//! on the same connection.
//!
//! ## Protocol
//!
//! Clients open a pipe, talk to it, and close it again:
//!
//! ```json
//! {"messageType":"GATEWAY_MESSAGE","command":"CONNECT","pipeName":"/run/device.pipe"}
//! {"messageType":"PIPE_MESSAGE","message":"status"}
//! {"messageType":"GATEWAY_MESSAGE","command":"DISCONNECT"}
//! ```
//!
//! Every message is answered with a `status` and either a `response` or an
//! `error`:
//!
//! ```json
//! {"status":"OK","response":""}
//! {"status":"OK","response":"device ready"}
//! {"status":"ERROR","error":"NO PIPE CONNECTION"}
//! ```
//!
//! A pipe that answers a write with nothing yields the response text `OK`.

mod errors;
mod handler;
mod request;
mod response;
mod router;

pub use self::errors::DispatchError;
pub(crate) use self::handler::GatewayConnectionHandler;
pub use self::request::{Command, InboundMessage};
pub use self::response::{Response, Status};
pub use self::router::{EMPTY_DRAIN_RESPONSE, MessageRouter};
