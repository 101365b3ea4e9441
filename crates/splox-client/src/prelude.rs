//! Common imports for typical client usage.
pub use crate::models::{
    ExecutionStatus, ExecutionTreeResponse, RunParams, RunResponse, SendEventParams,
};
pub use crate::{
    ChatEventKind, Client, ClientConfig, EventStream, SploxError, StreamEvent, WaitScope,
};
