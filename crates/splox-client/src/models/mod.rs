//! Request and response types for the REST API.
//!
//! Every response struct decodes leniently: missing fields fall back to their
//! defaults so that partial payloads (for example inside stream events) still
//! produce a value.
mod billing;
mod chat;
mod execution;
mod memory;
mod workflow;

pub use billing::*;
pub use chat::*;
pub use execution::*;
pub use memory::*;
pub use workflow::*;

use serde::{Deserialize, Deserializer, Serialize};

/// Free-form JSON object.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Cursor pagination block shared by list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Decodes JSON `null` as the field's default instead of failing the whole
/// payload.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
