//! Typed service handles. Each one shares the client's transport.
mod billing;
mod chats;
mod events;
mod memory;
mod workflows;

pub use billing::Billing;
pub use chats::Chats;
pub use events::Events;
pub use memory::Memory;
pub use workflows::Workflows;

use crate::errors::SploxError;

/// Path segments must be non-empty and must not escape their segment.
pub(crate) fn validate_id(field: &str, value: &str) -> Result<(), SploxError> {
    if value.trim().is_empty() {
        return Err(SploxError::Validation(format!("{field} must not be empty")));
    }
    if value.contains('/') {
        return Err(SploxError::Validation(format!(
            "{field} must not contain '/', got {value}"
        )));
    }
    Ok(())
}
