//! Fallback document rendering and presentation
//!
//! When no device is attached (or the device path fails mid-ticket) the same
//! payload becomes a self-contained printable HTML document. Rendering is
//! pure; [`PrintSurface::present`] is the only side-effecting step and hands
//! the document to the host's native print flow.
//!
//! Layout mirrors the device renderer — same money formatting, same payment
//! branching — so both paths produce visually equivalent tickets.

use std::io::Write;
use std::process::Command;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::money::format_money;
use crate::types::{PaymentType, TicketKind, TicketPayload};

/// Presentation error
///
/// Terminal for the whole print request: once the device path has already
/// failed, a blocked surface means the ticket cannot be produced at all.
#[derive(Debug, Error)]
pub enum PresentError {
    /// The host refused to open the print surface; the environment must
    /// allow opening documents (no pop-up/viewer blocking)
    #[error("print surface blocked, allow opening documents to print: {0}")]
    Blocked(String),
}

/// Escape text for embedding in markup
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Owned-buffer markup builder
///
/// All document generation flows through this one mutable buffer, which
/// keeps the fallback document testable without any presentation side
/// effects.
struct HtmlBuilder {
    buf: String,
}

impl HtmlBuilder {
    fn new() -> Self {
        Self {
            buf: String::with_capacity(4096),
        }
    }

    /// Append trusted markup verbatim
    fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Append an element with escaped text content
    fn elem(&mut self, tag: &str, text: &str) -> &mut Self {
        self.raw(&format!("<{tag}>{}</{tag}>", escape(text)))
    }

    /// Append a label/value row
    fn row(&mut self, label: &str, value: &str) -> &mut Self {
        self.raw("<tr><td class=\"label\">")
            .raw(&escape(label))
            .raw("</td><td class=\"value\">")
            .raw(&escape(value))
            .raw("</td></tr>")
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// Pure renderer for the fallback document
pub struct FallbackDocument;

impl FallbackDocument {
    /// Render a payload into a self-contained printable document
    pub fn render(ticket: &TicketPayload) -> String {
        let mut b = HtmlBuilder::new();

        b.raw("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
        b.elem("title", &ticket.business.name);
        b.raw(
            "<style>\
             body{font-family:monospace;width:300px;margin:0 auto;}\
             h1{font-size:1.2em;text-align:center;}\
             .business{text-align:center;}\
             .footer{text-align:center;margin-top:1em;}\
             table{width:100%;border-collapse:collapse;}\
             td,th{padding:1px 2px;}\
             .value,.money{text-align:right;}\
             .items{border-top:1px dashed #000;border-bottom:1px dashed #000;}\
             .note{padding-left:1.5em;font-weight:bold;}\
             </style>",
        );
        b.raw("</head><body>");

        Self::render_header(&mut b, ticket);
        match ticket.kind {
            TicketKind::CustomerReceipt => Self::render_customer_items(&mut b, ticket),
            TicketKind::KitchenTicket => Self::render_kitchen_items(&mut b, ticket),
        }
        if ticket.kind == TicketKind::CustomerReceipt {
            Self::render_totals_and_payment(&mut b, ticket);
        }
        Self::render_footer(&mut b, ticket);

        // Drive the native print dialog once the surface reports loaded,
        // then release the surface.
        b.raw(
            "<script>window.addEventListener('load',function(){\
             window.print();window.close();});</script>",
        );
        b.raw("</body></html>");
        b.finish()
    }

    fn render_header(b: &mut HtmlBuilder, ticket: &TicketPayload) {
        b.raw("<div class=\"business\">");
        if let Some(logo) = &ticket.business.logo_url {
            b.raw(&format!("<img src=\"{}\" alt=\"\">", escape(logo)));
        }
        b.elem("h1", &ticket.business.name.to_uppercase());
        b.elem("div", &ticket.business.phone);
        b.elem("div", &ticket.business.address);
        b.raw("</div>");

        b.raw("<table class=\"meta\">");
        b.row("Date:", &ticket.order.date);
        b.row("Time:", &ticket.order.time);
        b.row("Customer:", &ticket.order.customer_name);
        b.row("Order:", &ticket.order.order_type);
        b.raw("</table>");

        if let Some(note) = &ticket.order.note {
            b.elem("div", &format!("Note: {note}"));
        }
        if ticket.kind == TicketKind::KitchenTicket
            && let Some(note) = &ticket.order.kitchen_note
        {
            b.raw("<div class=\"note\">").raw(&escape(note)).raw("</div>");
        }
    }

    fn render_customer_items(b: &mut HtmlBuilder, ticket: &TicketPayload) {
        b.raw("<table class=\"items\"><thead><tr>");
        b.elem("th", "QTY");
        b.elem("th", "ITEM");
        b.elem("th", "PRICE");
        b.elem("th", "TOTAL");
        b.raw("</tr></thead><tbody>");
        for item in &ticket.items {
            b.raw("<tr>");
            b.elem("td", &item.quantity.to_string());
            b.elem("td", &item.title);
            b.raw(&format!(
                "<td class=\"money\">{}</td>",
                escape(&format_money(item.unit_price))
            ));
            b.raw(&format!(
                "<td class=\"money\">{}</td>",
                escape(&format_money(item.total))
            ));
            b.raw("</tr>");
        }
        b.raw("</tbody></table>");
    }

    fn render_kitchen_items(b: &mut HtmlBuilder, ticket: &TicketPayload) {
        b.raw("<table class=\"items\"><tbody>");
        for item in &ticket.items {
            b.raw("<tr>");
            b.elem("td", &item.title);
            b.raw(&format!("<td class=\"value\">x{}</td>", item.quantity));
            b.raw("</tr>");
            if let Some(note) = &item.kitchen_note
                && !note.is_empty()
            {
                b.raw("<tr><td colspan=\"2\" class=\"note\">* ")
                    .raw(&escape(note))
                    .raw("</td></tr>");
            }
        }
        b.raw("</tbody></table>");
    }

    fn render_totals_and_payment(b: &mut HtmlBuilder, ticket: &TicketPayload) {
        b.raw("<table class=\"totals\">");
        if let Some(totals) = &ticket.totals {
            b.row("Subtotal:", &format_money(totals.subtotal));
            b.raw("<tr><td class=\"label\"><strong>Total:</strong></td>");
            b.raw(&format!(
                "<td class=\"value\"><strong>{}</strong></td></tr>",
                escape(&format_money(totals.total))
            ));
        }

        if let Some(payment) = &ticket.payment {
            b.row("Payment:", &payment.payment_type.label());
            match &payment.payment_type {
                PaymentType::Cash => {
                    if let Some(received) = payment.cash_received
                        && received > rust_decimal::Decimal::ZERO
                    {
                        b.row("Cash Received:", &format_money(received));
                    }
                    if let Some(change) = payment.change
                        && change > rust_decimal::Decimal::ZERO
                    {
                        b.row("Change:", &format_money(change));
                    }
                }
                PaymentType::Split => {
                    b.row("Cash:", &format_money(payment.cash_received.unwrap_or_default()));
                    b.row("Card:", &format_money(payment.card_amount.unwrap_or_default()));
                }
                PaymentType::Card | PaymentType::Other(_) => {}
            }
        }
        b.raw("</table>");
    }

    fn render_footer(b: &mut HtmlBuilder, ticket: &TicketPayload) {
        b.raw("<div class=\"footer\">")
            .raw(&escape(&ticket.business.footer_text.to_uppercase()))
            .raw("</div>");
    }
}

/// The native print flow
///
/// The one seam with presentation side effects; the orchestrator is tested
/// against a recording stub.
pub trait PrintSurface {
    /// Open a display surface with the document and trigger printing
    fn present(&self, document: &str) -> Result<(), PresentError>;
}

/// Presents the document through the platform's default opener
///
/// Writes the document to a temp file and launches the associated viewer,
/// whose load-time script drives the print dialog.
pub struct BrowserSurface;

impl BrowserSurface {
    fn opener(path: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        }
        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", path]);
            cmd
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

impl PrintSurface for BrowserSurface {
    #[instrument(skip(self, document), fields(len = document.len()))]
    fn present(&self, document: &str) -> Result<(), PresentError> {
        let mut file = tempfile::Builder::new()
            .prefix("ticket-")
            .suffix(".html")
            .tempfile()
            .map_err(|e| PresentError::Blocked(e.to_string()))?;
        file.write_all(document.as_bytes())
            .map_err(|e| PresentError::Blocked(e.to_string()))?;

        // The external viewer loads the file after we return; leave it on
        // disk for the OS temp cleaner.
        let (_, path) = file
            .keep()
            .map_err(|e| PresentError::Blocked(e.to_string()))?;
        let path = path.to_string_lossy().into_owned();

        match Self::opener(&path).spawn() {
            Ok(_) => {
                info!(path = %path, "fallback document handed to viewer");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "could not open print surface");
                Err(PresentError::Blocked(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        BusinessInfo, OrderInfo, PaymentInfo, TicketItem, TicketTotals,
    };
    use rust_decimal_macros::dec;

    fn customer_receipt() -> TicketPayload {
        TicketPayload {
            kind: TicketKind::CustomerReceipt,
            business: BusinessInfo {
                name: "The Copper Kettle".into(),
                phone: "020 7946 0102".into(),
                address: "14 Market Row, London".into(),
                footer_text: "Thank you for dining with us".into(),
                logo_url: None,
            },
            order: OrderInfo {
                date: "30/08/2026".into(),
                time: "19:42".into(),
                customer_name: "Walk-in".into(),
                order_type: "Dine In".into(),
                note: None,
                kitchen_note: None,
            },
            items: vec![
                TicketItem {
                    title: "Fish & Chips".into(),
                    quantity: 2,
                    unit_price: dec!(3.00),
                    total: dec!(6.00),
                    kitchen_note: None,
                },
                TicketItem {
                    title: "Ribeye Steak".into(),
                    quantity: 1,
                    unit_price: dec!(10.00),
                    total: dec!(10.00),
                    kitchen_note: None,
                },
            ],
            totals: Some(TicketTotals {
                subtotal: dec!(16.00),
                total: dec!(16.00),
            }),
            payment: Some(PaymentInfo {
                payment_type: PaymentType::Cash,
                cash_received: Some(dec!(20.00)),
                change: Some(dec!(4.00)),
                card_amount: None,
            }),
        }
    }

    #[test]
    fn test_customer_document_contents() {
        let doc = FallbackDocument::render(&customer_receipt());

        assert!(doc.contains("Fish &amp; Chips"));
        assert!(doc.contains("£6.00"));
        assert!(doc.contains("Ribeye Steak"));
        assert!(doc.contains("£10.00"));
        assert!(doc.contains("Subtotal:"));
        assert!(doc.contains("£16.00"));
        assert!(doc.contains("Cash Received:"));
        assert!(doc.contains("£20.00"));
        assert!(doc.contains("Change:"));
        assert!(doc.contains("£4.00"));
        assert!(doc.contains("THE COPPER KETTLE"));
        assert!(doc.contains("window.print()"));
    }

    #[test]
    fn test_split_payment_document() {
        let mut ticket = customer_receipt();
        ticket.payment = Some(PaymentInfo {
            payment_type: PaymentType::Split,
            cash_received: Some(dec!(10.00)),
            change: None,
            card_amount: Some(dec!(6.00)),
        });

        let doc = FallbackDocument::render(&ticket);
        assert!(doc.contains("Cash:"));
        assert!(doc.contains("£10.00"));
        assert!(doc.contains("Card:"));
        assert!(doc.contains("£6.00"));
        assert!(!doc.contains("Change:"));
    }

    #[test]
    fn test_kitchen_document_has_no_money() {
        let mut ticket = customer_receipt();
        ticket.kind = TicketKind::KitchenTicket;
        ticket.totals = None;
        ticket.payment = None;
        ticket.items.truncate(1);
        ticket.items[0].kitchen_note = Some("no vinegar".into());

        let doc = FallbackDocument::render(&ticket);
        assert!(doc.contains("Fish &amp; Chips"));
        assert!(doc.contains("x2"));
        assert!(doc.contains("* no vinegar"));
        assert!(!doc.contains('£'));
    }

    #[test]
    fn test_render_is_pure() {
        let ticket = customer_receipt();
        assert_eq!(FallbackDocument::render(&ticket), FallbackDocument::render(&ticket));
    }

    #[test]
    fn test_markup_is_escaped() {
        let mut ticket = customer_receipt();
        ticket.items[0].title = "Fish <script>\"&\"</script>".into();
        let doc = FallbackDocument::render(&ticket);
        assert!(!doc.contains("Fish <script>"));
        assert!(doc.contains("Fish &lt;script&gt;"));
    }

    #[test]
    fn test_missing_logo_omits_img() {
        let doc = FallbackDocument::render(&customer_receipt());
        assert!(!doc.contains("<img"));
    }
}
