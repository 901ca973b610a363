//! # till-printer
//!
//! Receipt printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS operation encoding
//! - Code-page text width/padding helpers
//! - USB bulk transport (discovery, connect, send, disconnect)
//! - Logo raster processing (optional)
//!
//! Business logic (WHAT to print) stays in the ticket crate: receipt and
//! kitchen-ticket layouts, the HTML fallback document, and the orchestrator
//! live in `till-tickets`.
//!
//! ## Example
//!
//! ```ignore
//! use till_printer::{
//!     Alignment, CommandEncoder, CutMode, FirstAvailable, Operation,
//!     PrinterCapabilities, UsbTransport,
//! };
//!
//! let caps = PrinterCapabilities::default();
//! let encoder = CommandEncoder::new(caps.encoding);
//!
//! let mut transport = UsbTransport::new();
//! transport.connect(&FirstAvailable)?;
//! for op in [
//!     Operation::Init,
//!     Operation::Align(Alignment::Center),
//!     Operation::Text("THE COPPER KETTLE".into()),
//!     Operation::Feed(3),
//!     Operation::Cut(CutMode::Full),
//! ] {
//!     transport.send(&encoder.encode(&op))?;
//! }
//! transport.disconnect();
//! ```

mod capabilities;
mod command;
mod encoding;
mod error;
mod usb;

#[cfg(feature = "image")]
mod logo;

// Re-exports
pub use capabilities::PrinterCapabilities;
pub use command::{Alignment, CommandEncoder, CutMode, Operation};
pub use encoding::{encode_text, pad_text, text_width, truncate_text};
pub use error::{TransportError, TransportResult};
pub use usb::{
    DeviceDescriptor, DeviceHandle, DeviceSelector, FirstAvailable, Transport, UsbTransport,
    looks_like_printer,
};

#[cfg(feature = "image")]
pub use logo::process_logo;
