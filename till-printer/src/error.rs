//! Error types for the printer library

use thiserror::Error;

/// Transport error types
///
/// Connection errors (`Unsupported`, `UserCancelled`, `OpenFailed`) can only
/// come out of [`connect`](crate::UsbTransport::connect); the remaining
/// variants come out of [`send`](crate::UsbTransport::send). A failed send
/// leaves the transport connected — state only changes through `connect` and
/// `disconnect`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The host has no usable USB stack
    #[error("USB transport is not supported on this host")]
    Unsupported,

    /// The device selector declined to pick a candidate
    #[error("no device was selected")]
    UserCancelled,

    /// Opening, configuring or claiming the device failed
    #[error("failed to open device: {0}")]
    OpenFailed(#[source] rusb::Error),

    /// Send was called while no device handle is held
    #[error("not connected to a printer")]
    NotConnected,

    /// The active interface has no outbound bulk endpoint
    #[error("device has no bulk-out endpoint")]
    NoEndpoint,

    /// The bulk transfer itself failed
    #[error("bulk transfer failed: {0}")]
    TransferFailed(#[source] rusb::Error),
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
