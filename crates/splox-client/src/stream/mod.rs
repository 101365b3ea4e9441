//! Server-sent event listening.
//!
//! Bytes from a `text/event-stream` response are split into lines, `data:`
//! payloads are classified into [`StreamEvent`]s, and [`EventStream`] exposes
//! them one at a time.
mod cursor;
mod event;
mod parser;

pub use cursor::EventStream;
pub use event::{ChatEventKind, EventFields, EventPayload, KEEPALIVE, StreamEvent};
pub(crate) use parser::EventParser;
