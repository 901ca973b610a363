//! Ticket renderer
//!
//! Deterministic translation of a [`TicketPayload`] into the operation
//! sequence a thermal printer consumes. Two layouts: the priced customer
//! receipt and the money-free kitchen ticket.

use till_printer::{Alignment, CutMode, Operation, PrinterCapabilities, pad_text, text_width};

use crate::money::format_money;
use crate::types::{PaymentInfo, PaymentType, TicketItem, TicketKind, TicketPayload};

/// Item-table column widths for the customer receipt
///
/// qty + title + price + total plus three separating spaces fill the line.
const QTY_WIDTH: usize = 3;
const PRICE_WIDTH: usize = 8;
const TOTAL_WIDTH: usize = 10;

/// Renders ticket payloads into printer operations
pub struct TicketRenderer {
    caps: PrinterCapabilities,
}

impl TicketRenderer {
    pub fn new(caps: PrinterCapabilities) -> Self {
        Self { caps }
    }

    /// Render a payload to an ordered operation sequence
    pub fn render(&self, ticket: &TicketPayload) -> Vec<Operation> {
        let mut ops = Vec::new();
        ops.push(Operation::Init);

        self.render_header(&mut ops, ticket);

        ops.push(self.divider());
        match ticket.kind {
            TicketKind::CustomerReceipt => self.render_customer_items(&mut ops, &ticket.items),
            TicketKind::KitchenTicket => self.render_kitchen_items(&mut ops, &ticket.items),
        }
        ops.push(self.divider());

        if ticket.kind == TicketKind::CustomerReceipt {
            self.render_totals(&mut ops, ticket);
            if let Some(payment) = &ticket.payment {
                self.render_payment(&mut ops, payment);
            }
        }

        self.render_footer(&mut ops, ticket);
        ops
    }

    /// Business block and order metadata
    fn render_header(&self, ops: &mut Vec<Operation>, ticket: &TicketPayload) {
        #[cfg(feature = "image")]
        if let Some(path) = &ticket.business.logo_url
            && let Some(raster) = till_printer::process_logo(path)
        {
            ops.push(Operation::Raster(raster));
        }

        ops.push(Operation::Align(Alignment::Center));
        ops.push(Operation::Bold(true));
        ops.push(Operation::DoubleSize(true));
        ops.push(Operation::Text(ticket.business.name.to_uppercase()));
        ops.push(Operation::DoubleSize(false));
        ops.push(Operation::Bold(false));
        ops.push(Operation::Text(ticket.business.phone.clone()));
        ops.push(Operation::Text(ticket.business.address.clone()));

        ops.push(Operation::Align(Alignment::Left));
        ops.push(self.line_lr("Date:", &ticket.order.date));
        ops.push(self.line_lr("Time:", &ticket.order.time));
        ops.push(self.line_lr("Customer:", &ticket.order.customer_name));
        ops.push(self.line_lr("Order:", &ticket.order.order_type));

        if let Some(note) = &ticket.order.note {
            ops.push(Operation::Text(format!("Note: {note}")));
        }
        if ticket.kind == TicketKind::KitchenTicket
            && let Some(note) = &ticket.order.kitchen_note
        {
            ops.push(Operation::Bold(true));
            ops.push(Operation::Text(format!("Kitchen: {note}")));
            ops.push(Operation::Bold(false));
        }
    }

    /// Priced item table: qty, title, unit price, line total
    ///
    /// The line total column prints the upstream-computed `total` verbatim so
    /// item-level discounts survive to paper.
    fn render_customer_items(&self, ops: &mut Vec<Operation>, items: &[TicketItem]) {
        let enc = self.caps.encoding;
        let title_width = self
            .caps
            .chars_per_line
            .saturating_sub(QTY_WIDTH + PRICE_WIDTH + TOTAL_WIDTH + 3);

        ops.push(Operation::Text(format!(
            "{} {} {} {}",
            pad_text(enc, "QTY", QTY_WIDTH, true),
            pad_text(enc, "ITEM", title_width, false),
            pad_text(enc, "PRICE", PRICE_WIDTH, true),
            pad_text(enc, "TOTAL", TOTAL_WIDTH, true),
        )));

        for item in items {
            ops.push(Operation::Text(format!(
                "{} {} {} {}",
                pad_text(enc, &item.quantity.to_string(), QTY_WIDTH, true),
                pad_text(enc, &item.title, title_width, false),
                pad_text(enc, &format_money(item.unit_price), PRICE_WIDTH, true),
                pad_text(enc, &format_money(item.total), TOTAL_WIDTH, true),
            )));
        }
    }

    /// Kitchen lines: title and quantity large, notes indented, no money
    fn render_kitchen_items(&self, ops: &mut Vec<Operation>, items: &[TicketItem]) {
        for item in items {
            ops.push(Operation::DoubleSize(true));
            ops.push(Operation::Text(format!("{} x{}", item.title, item.quantity)));
            ops.push(Operation::DoubleSize(false));

            if let Some(note) = &item.kitchen_note
                && !note.is_empty()
            {
                ops.push(Operation::Bold(true));
                ops.push(Operation::Text(format!("   * {note}")));
                ops.push(Operation::Bold(false));
            }
        }
    }

    /// Subtotal and emphasized total, rendered as supplied
    fn render_totals(&self, ops: &mut Vec<Operation>, ticket: &TicketPayload) {
        if let Some(totals) = &ticket.totals {
            ops.push(self.line_lr("Subtotal:", &format_money(totals.subtotal)));
            ops.push(Operation::Bold(true));
            ops.push(self.line_lr("Total:", &format_money(totals.total)));
            ops.push(Operation::Bold(false));
        }
    }

    /// Payment block; content depends on the payment type
    fn render_payment(&self, ops: &mut Vec<Operation>, payment: &PaymentInfo) {
        ops.push(self.line_lr("Payment:", &payment.payment_type.label()));
        match &payment.payment_type {
            PaymentType::Cash => {
                if let Some(received) = payment.cash_received
                    && received > rust_decimal::Decimal::ZERO
                {
                    ops.push(self.line_lr("Cash Received:", &format_money(received)));
                }
                if let Some(change) = payment.change
                    && change > rust_decimal::Decimal::ZERO
                {
                    ops.push(self.line_lr("Change:", &format_money(change)));
                }
            }
            PaymentType::Split => {
                let cash = payment.cash_received.unwrap_or_default();
                let card = payment.card_amount.unwrap_or_default();
                ops.push(self.line_lr("Cash:", &format_money(cash)));
                ops.push(self.line_lr("Card:", &format_money(card)));
            }
            // The type label alone; an unknown type prints the literal
            // string it came with rather than masquerading as cash
            PaymentType::Card | PaymentType::Other(_) => {}
        }
    }

    fn render_footer(&self, ops: &mut Vec<Operation>, ticket: &TicketPayload) {
        ops.push(Operation::Feed(1));
        ops.push(Operation::Align(Alignment::Center));
        ops.push(Operation::Text(ticket.business.footer_text.to_uppercase()));
        ops.push(Operation::Feed(3));
        ops.push(Operation::Cut(CutMode::Full));
    }

    /// Two-column row: label left, value right-aligned to the line width
    ///
    /// When the pair does not fit, both strings stay intact with a single
    /// separating space; there is never a negative-width pad.
    fn line_lr(&self, left: &str, right: &str) -> Operation {
        let width = self.caps.chars_per_line;
        let lw = text_width(self.caps.encoding, left);
        let rw = text_width(self.caps.encoding, right);

        let line = if lw + rw >= width {
            format!("{left} {right}")
        } else {
            format!("{left}{}{right}", " ".repeat(width - lw - rw))
        };
        Operation::Text(line)
    }

    fn divider(&self) -> Operation {
        Operation::Text("-".repeat(self.caps.chars_per_line))
    }
}
