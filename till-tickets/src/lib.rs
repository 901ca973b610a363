//! # till-tickets
//!
//! Ticket layouts and print orchestration for the till.
//!
//! ## Scope
//!
//! This crate decides WHAT to print:
//! - Ticket payload types (customer receipt, kitchen ticket)
//! - Layout rendering into printer operations
//! - HTML fallback document and print surface
//! - The print pipeline (device first, fallback second)
//!
//! Device mechanics (HOW to print) live in `till-printer`.
//!
//! ## Example
//!
//! ```ignore
//! use till_printer::PrinterCapabilities;
//! use till_tickets::TicketPrinter;
//!
//! let mut printer = TicketPrinter::usb(PrinterCapabilities::default());
//! let outcome = printer.print_ticket(&payload)?;
//! ```

mod error;
mod html;
mod money;
mod print;
mod renderer;
mod types;

// Re-exports
pub use error::{TicketError, TicketResult};
pub use html::{BrowserSurface, FallbackDocument, PresentError, PrintSurface};
pub use money::{CURRENCY, format_money};
pub use print::{PrintOutcome, TicketPrinter};
pub use renderer::TicketRenderer;
pub use types::{
    BusinessInfo, OrderInfo, PaymentInfo, PaymentType, TicketItem, TicketKind, TicketPayload,
    TicketTotals,
};
