//! Print orchestration
//!
//! [`TicketPrinter::print_ticket`] is the single entry point: render the
//! payload, try the attached device first, and fall back to the browser
//! document when the device is absent or fails partway through.

use till_printer::{CommandEncoder, PrinterCapabilities, Transport, UsbTransport};
use tracing::{info, instrument, warn};

use crate::error::{TicketError, TicketResult};
use crate::html::{BrowserSurface, FallbackDocument, PrintSurface};
use crate::renderer::TicketRenderer;
use crate::types::TicketPayload;

/// Which path produced the ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    /// Every command reached the device
    DevicePrinted,
    /// The fallback document was handed to the print surface
    FallbackPrinted,
}

/// Ticket printing pipeline over one transport and one fallback surface
pub struct TicketPrinter<T: Transport, S: PrintSurface> {
    transport: T,
    surface: S,
    renderer: TicketRenderer,
    encoder: CommandEncoder,
}

impl TicketPrinter<UsbTransport, BrowserSurface> {
    /// Pipeline wired to the local USB bus and the platform browser
    pub fn usb(caps: PrinterCapabilities) -> Self {
        Self::new(caps, UsbTransport::new(), BrowserSurface)
    }
}

impl<T: Transport, S: PrintSurface> TicketPrinter<T, S> {
    pub fn new(caps: PrinterCapabilities, transport: T, surface: S) -> Self {
        Self {
            transport,
            surface,
            renderer: TicketRenderer::new(caps),
            encoder: CommandEncoder::new(caps.encoding),
        }
    }

    /// Access the transport for connection management
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Print one ticket, preferring the device path
    ///
    /// A payload with no items is rejected before any I/O. A device failure
    /// partway through a ticket stops the device path at the failed command
    /// and re-renders the whole payload on the fallback surface; a surface
    /// failure after that is terminal.
    #[instrument(skip(self, ticket), fields(kind = ?ticket.kind, items = ticket.items.len()))]
    pub fn print_ticket(&mut self, ticket: &TicketPayload) -> TicketResult<PrintOutcome> {
        if ticket.items.is_empty() {
            return Err(TicketError::EmptyTicket);
        }

        if self.transport.is_connected() {
            match self.send_to_device(ticket) {
                Ok(()) => {
                    info!("ticket printed on device");
                    return Ok(PrintOutcome::DevicePrinted);
                }
                Err(e) => {
                    warn!(error = %e, "device print failed, falling back to document");
                }
            }
        }

        let document = FallbackDocument::render(ticket);
        self.surface.present(&document)?;
        info!("ticket printed via fallback document");
        Ok(PrintOutcome::FallbackPrinted)
    }

    fn send_to_device(&mut self, ticket: &TicketPayload) -> till_printer::TransportResult<()> {
        for op in self.renderer.render(ticket) {
            let bytes = self.encoder.encode(&op);
            self.transport.send(&bytes)?;
        }
        Ok(())
    }
}
