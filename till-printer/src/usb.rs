//! USB transport for receipt printers
//!
//! Owns the connection lifecycle to a single printer over a bulk-transfer
//! USB interface: candidate discovery, caller-mediated selection, interface
//! claiming, and outbound transfers.
//!
//! State machine: Disconnected → (connect) → Connected → (disconnect).
//! A failed send is surfaced to the caller but does not change state; the
//! caller decides whether to retry, disconnect, or fall back.

use rusb::{Context, Direction, TransferType, UsbContext};
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::error::{TransportError, TransportResult};

/// Vendor ids of known receipt-printer chipsets
///
/// Devices outside this list are still offered when their product string
/// looks like a printer (cheap thermal printers reuse generic controller
/// chips under arbitrary vendor ids).
const PRINTER_VENDOR_IDS: &[u16] = &[
    0x04b8, // Epson
    0x0519, // Star Micronics
    0x1504, // Bixolon
    0x1d90, // Citizen
    0x0dd4, // Custom Engineering
    0x0416, // Winbond (POS-58 family)
    0x0fe6, // ICS Advent (generic thermal clones)
    0x6868, // Zjiang
];

/// Product-name heuristic for devices not on the vendor allow-list
pub fn looks_like_printer(product: &str) -> bool {
    let p = product.to_lowercase();
    p.contains("printer") || p.contains("pos") || p.contains("thermal")
}

/// Advertised identity of a candidate or connected device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub vendor_id: u16,
    pub product_id: u16,
    pub product: Option<String>,
    pub manufacturer: Option<String>,
}

/// The user-facing device choice
///
/// `connect` offers the allow-listed candidates to the selector; returning
/// `None` cancels the connect. UI hosts implement this with a picker dialog,
/// headless hosts with [`FirstAvailable`] or a closure.
pub trait DeviceSelector {
    fn select(&self, candidates: &[DeviceDescriptor]) -> Option<usize>;
}

impl<F> DeviceSelector for F
where
    F: Fn(&[DeviceDescriptor]) -> Option<usize>,
{
    fn select(&self, candidates: &[DeviceDescriptor]) -> Option<usize> {
        self(candidates)
    }
}

/// Selector that picks the first offered candidate
pub struct FirstAvailable;

impl DeviceSelector for FirstAvailable {
    fn select(&self, candidates: &[DeviceDescriptor]) -> Option<usize> {
        if candidates.is_empty() { None } else { Some(0) }
    }
}

/// An opened, interface-claimed device
///
/// At most one lives per transport; created by a successful `connect`,
/// destroyed by `disconnect` or drop.
pub struct DeviceHandle {
    descriptor: DeviceDescriptor,
    device: rusb::Device<Context>,
    handle: rusb::DeviceHandle<Context>,
}

impl DeviceHandle {
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// First outbound bulk endpoint on the active configuration
    fn bulk_out_endpoint(&self) -> Option<u8> {
        let config = self.device.active_config_descriptor().ok()?;
        for interface in config.interfaces() {
            for descriptor in interface.descriptors() {
                for endpoint in descriptor.endpoint_descriptors() {
                    if let (TransferType::Bulk, Direction::Out) =
                        (endpoint.transfer_type(), endpoint.direction())
                    {
                        return Some(endpoint.address());
                    }
                }
            }
        }
        None
    }
}

/// Trait for byte transports
///
/// The seam between ticket logic and hardware; the orchestrator only needs
/// these two operations.
pub trait Transport {
    /// Whether a device handle is currently held
    fn is_connected(&self) -> bool;

    /// Transfer one buffer to the device
    fn send(&mut self, bytes: &[u8]) -> TransportResult<()>;
}

/// USB transport instance owning one optional device handle
///
/// Connection state is explicit and instance-owned; callers hold and pass
/// the transport rather than relying on module-level state.
pub struct UsbTransport {
    context: Option<Context>,
    handle: Option<DeviceHandle>,
}

impl UsbTransport {
    /// Create a transport
    ///
    /// A host without a usable USB stack still yields a transport: candidate
    /// listing is empty and `connect` reports `Unsupported`.
    pub fn new() -> Self {
        let context = match Context::new() {
            Ok(context) => Some(context),
            Err(e) => {
                warn!(error = %e, "USB context unavailable, transport disabled");
                None
            }
        };
        Self {
            context,
            handle: None,
        }
    }

    #[cfg(test)]
    fn without_context() -> Self {
        Self {
            context: None,
            handle: None,
        }
    }

    /// Identity of the connected device, if any
    pub fn current_device(&self) -> Option<&DeviceDescriptor> {
        self.handle.as_ref().map(DeviceHandle::descriptor)
    }

    /// List candidate printers the host already lets us open
    ///
    /// Filters by the vendor allow-list or the product-name heuristic.
    /// Never errors: enumeration problems yield an empty list.
    #[instrument(skip(self))]
    pub fn list_candidates(&self) -> Vec<DeviceDescriptor> {
        self.candidates()
            .into_iter()
            .map(|(_, descriptor)| descriptor)
            .collect()
    }

    fn candidates(&self) -> Vec<(rusb::Device<Context>, DeviceDescriptor)> {
        let Some(context) = &self.context else {
            return Vec::new();
        };
        let devices = match context.devices() {
            Ok(devices) => devices,
            Err(e) => {
                warn!(error = %e, "device enumeration failed");
                return Vec::new();
            }
        };

        let mut found = Vec::new();
        for device in devices.iter() {
            let Ok(desc) = device.device_descriptor() else {
                continue;
            };
            // Only devices the host already grants access to are candidates;
            // anything else would need a permission change first.
            let Ok(handle) = device.open() else {
                continue;
            };
            let product = handle.read_product_string_ascii(&desc).ok();
            let manufacturer = handle.read_manufacturer_string_ascii(&desc).ok();

            let by_vendor = PRINTER_VENDOR_IDS.contains(&desc.vendor_id());
            let by_name = product.as_deref().is_some_and(looks_like_printer);
            if !by_vendor && !by_name {
                continue;
            }

            info!(
                vendor_id = format_args!("{:04x}", desc.vendor_id()),
                product_id = format_args!("{:04x}", desc.product_id()),
                product = product.as_deref().unwrap_or("?"),
                "found printer candidate"
            );
            found.push((
                device,
                DeviceDescriptor {
                    vendor_id: desc.vendor_id(),
                    product_id: desc.product_id(),
                    product,
                    manufacturer,
                },
            ));
        }
        found
    }

    /// Connect to a printer chosen by the selector
    ///
    /// Opens the chosen device, selects its first configuration if none is
    /// active, detaches an attached kernel driver, and claims interface 0.
    /// Success transitions the transport to Connected.
    #[instrument(skip(self, selector))]
    pub fn connect(&mut self, selector: &dyn DeviceSelector) -> TransportResult<&DeviceDescriptor> {
        if self.context.is_none() {
            return Err(TransportError::Unsupported);
        }

        let mut candidates = self.candidates();
        let descriptors: Vec<DeviceDescriptor> = candidates
            .iter()
            .map(|(_, descriptor)| descriptor.clone())
            .collect();

        let index = selector
            .select(&descriptors)
            .filter(|i| *i < candidates.len())
            .ok_or(TransportError::UserCancelled)?;
        let (device, descriptor) = candidates.swap_remove(index);

        let mut handle = device.open().map_err(TransportError::OpenFailed)?;

        // Select the first configuration when none is reported active
        if handle.active_configuration().map(|c| c == 0).unwrap_or(true) {
            let config = device
                .config_descriptor(0)
                .map_err(TransportError::OpenFailed)?;
            handle
                .set_active_configuration(config.number())
                .map_err(TransportError::OpenFailed)?;
        }

        if let Ok(true) = handle.kernel_driver_active(0) {
            handle
                .detach_kernel_driver(0)
                .map_err(TransportError::OpenFailed)?;
        }
        handle
            .claim_interface(0)
            .map_err(TransportError::OpenFailed)?;

        info!(
            vendor_id = format_args!("{:04x}", descriptor.vendor_id),
            product_id = format_args!("{:04x}", descriptor.product_id),
            product = descriptor.product.as_deref().unwrap_or("?"),
            "connected to printer"
        );

        let connected = self.handle.insert(DeviceHandle {
            descriptor,
            device,
            handle,
        });
        Ok(&connected.descriptor)
    }

    /// Transfer a buffer through the device's bulk-out endpoint
    ///
    /// A failed transfer is surfaced immediately and never retried; the
    /// handle stays Connected so the caller can decide what to do next.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn send(&mut self, bytes: &[u8]) -> TransportResult<()> {
        let device = self.handle.as_ref().ok_or(TransportError::NotConnected)?;
        let endpoint = device
            .bulk_out_endpoint()
            .ok_or(TransportError::NoEndpoint)?;

        // Zero timeout blocks until the transfer completes (libusb
        // semantics); callers needing bounded latency wrap the call.
        device
            .handle
            .write_bulk(endpoint, bytes, Duration::ZERO)
            .map_err(TransportError::TransferFailed)?;
        Ok(())
    }

    /// Close the device handle and return to Disconnected
    ///
    /// Close-time errors are logged and swallowed: there is nothing
    /// actionable in them and they must not mask an already-completed print.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self) {
        if let Some(device) = self.handle.take() {
            if let Err(e) = device.handle.release_interface(0) {
                warn!(error = %e, "interface release failed during disconnect");
            }
            info!("disconnected from printer");
        }
    }
}

impl Default for UsbTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UsbTransport {
    fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    fn send(&mut self, bytes: &[u8]) -> TransportResult<()> {
        UsbTransport::send(self, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_heuristic() {
        assert!(looks_like_printer("TM-T88VI Receipt Printer"));
        assert!(looks_like_printer("Generic POS58 device"));
        assert!(looks_like_printer("THERMAL-80"));
        assert!(!looks_like_printer("USB Mass Storage"));
        assert!(!looks_like_printer("Webcam C920"));
    }

    #[test]
    fn test_vendor_allow_list_covers_epson() {
        assert!(PRINTER_VENDOR_IDS.contains(&0x04b8));
    }

    #[test]
    fn test_no_usb_stack_lists_nothing() {
        let transport = UsbTransport::without_context();
        assert!(transport.list_candidates().is_empty());
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_no_usb_stack_connect_is_unsupported() {
        let mut transport = UsbTransport::without_context();
        let result = transport.connect(&FirstAvailable);
        assert!(matches!(result, Err(TransportError::Unsupported)));
    }

    #[test]
    fn test_send_without_handle_is_not_connected() {
        let mut transport = UsbTransport::without_context();
        let result = transport.send(&[0x1B, 0x40]);
        assert!(matches!(result, Err(TransportError::NotConnected)));
    }

    #[test]
    fn test_disconnect_without_handle_is_a_noop() {
        let mut transport = UsbTransport::without_context();
        transport.disconnect();
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_first_available_selector() {
        let candidate = DeviceDescriptor {
            vendor_id: 0x04b8,
            product_id: 0x0e15,
            product: Some("TM-T88VI".into()),
            manufacturer: Some("EPSON".into()),
        };
        assert_eq!(FirstAvailable.select(&[candidate]), Some(0));
        assert_eq!(FirstAvailable.select(&[]), None);
    }

    #[test]
    fn test_closure_selector_cancels() {
        let selector = |_: &[DeviceDescriptor]| None;
        assert_eq!(selector.select(&[]), None);
    }
}
