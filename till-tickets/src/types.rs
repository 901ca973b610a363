//! Ticket payload types
//!
//! The host application assembles a [`TicketPayload`] from already-persisted
//! order data (items, prices, payment metadata, business profile) and hands
//! it across this boundary; nothing here fetches data itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which layout a print request uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketKind {
    /// Customer-facing priced receipt
    CustomerReceipt,
    /// Item/quantity-only ticket for food preparation staff
    KitchenTicket,
}

/// Business profile fields printed on every ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub footer_text: String,
    /// Path to a printable logo image, when the business has one
    pub logo_url: Option<String>,
}

/// Order metadata, preformatted by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInfo {
    pub date: String,
    pub time: String,
    pub customer_name: String,
    pub order_type: String,
    pub note: Option<String>,
    pub kitchen_note: Option<String>,
}

/// One ordered line on the ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketItem {
    pub title: String,
    /// Always ≥ 1 on a valid ticket
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Line total as computed upstream (discounts applied there); rendered
    /// verbatim, never recomputed
    pub total: Decimal,
    pub kitchen_note: Option<String>,
}

/// Receipt totals, as supplied
///
/// `total` is not required to algebraically follow from `subtotal`; whatever
/// upstream discounting produced is printed as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketTotals {
    pub subtotal: Decimal,
    pub total: Decimal,
}

/// How the order was paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    Cash,
    Card,
    Split,
    /// Anything else the upstream suite records; printed as given, never
    /// defaulted to Cash
    Other(String),
}

impl PaymentType {
    /// Upper-cased label for printing
    pub fn label(&self) -> String {
        match self {
            PaymentType::Cash => "CASH".to_string(),
            PaymentType::Card => "CARD".to_string(),
            PaymentType::Split => "SPLIT".to_string(),
            PaymentType::Other(s) => s.to_uppercase(),
        }
    }
}

/// Payment block data; fields irrelevant to `payment_type` are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub payment_type: PaymentType,
    pub cash_received: Option<Decimal>,
    pub change: Option<Decimal>,
    pub card_amount: Option<Decimal>,
}

/// The immutable input to one print operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketPayload {
    pub kind: TicketKind,
    pub business: BusinessInfo,
    pub order: OrderInfo,
    /// Never empty on a valid print request; rejected before formatting
    pub items: Vec<TicketItem>,
    /// Present only for customer receipts
    pub totals: Option<TicketTotals>,
    /// Customer receipts only
    pub payment: Option<PaymentInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_type_labels() {
        assert_eq!(PaymentType::Cash.label(), "CASH");
        assert_eq!(PaymentType::Split.label(), "SPLIT");
        assert_eq!(PaymentType::Other("store credit".into()).label(), "STORE CREDIT");
    }

    #[test]
    fn test_payload_from_host_json() {
        // The shape the host hands across the boundary
        let payload: TicketPayload = serde_json::from_value(serde_json::json!({
            "kind": "CustomerReceipt",
            "business": {
                "name": "The Copper Kettle",
                "phone": "020 7946 0102",
                "address": "14 Market Row, London",
                "footer_text": "Thank you for dining with us",
                "logo_url": null
            },
            "order": {
                "date": "30/08/2026",
                "time": "19:42",
                "customer_name": "Walk-in",
                "order_type": "Dine In",
                "note": null,
                "kitchen_note": null
            },
            "items": [
                {"title": "Fish & Chips", "quantity": 2, "unit_price": "8.50", "total": "17.00", "kitchen_note": null}
            ],
            "totals": {"subtotal": "17.00", "total": "17.00"},
            "payment": {"payment_type": "Cash", "cash_received": "20.00", "change": "3.00", "card_amount": null}
        }))
        .expect("payload should deserialize");

        assert_eq!(payload.kind, TicketKind::CustomerReceipt);
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].total, dec!(17.00));
        let payment = payload.payment.expect("payment block present");
        assert_eq!(payment.payment_type, PaymentType::Cash);
        assert_eq!(payment.change, Some(dec!(3.00)));
    }
}
