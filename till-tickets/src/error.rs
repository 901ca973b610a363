use thiserror::Error;

use crate::html::PresentError;

/// Ticket pipeline error
#[derive(Debug, Error)]
pub enum TicketError {
    /// The payload carried no items; nothing is sent anywhere
    #[error("ticket has no items")]
    EmptyTicket,
    /// Both the device path and the fallback surface failed
    #[error("fallback presentation failed: {0}")]
    Presentation(#[from] PresentError),
}

pub type TicketResult<T> = Result<T, TicketError>;
