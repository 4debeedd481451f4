//! Request and response shapes for callers of the orchestrator.
//!
//! Whatever front end delivers a scan request (HTTP form, CLI flags) hands a
//! `ScanRequest` in and gets a `ScanResponse` or an `ErrorResponse` back.

use crate::error::{ScanError, ScanResult};
use crate::scanner::{Coordinator, PortRecord, ScanKind, ScanMode, ScanReport};
use crate::types::AddressSpec;
use serde::{Deserialize, Serialize};

/// Message attached to every successful response.
pub const SCAN_COMPLETE: &str = "Scan complete";

/// An incoming scan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Single IPv4 address or CIDR block.
    pub address: String,
    /// `all`, `specified` or `quick`.
    pub mode: String,
    /// Port list for `specified`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl ScanRequest {
    /// Validate into a typed address spec and scan mode.
    pub fn validate(&self) -> ScanResult<(AddressSpec, ScanMode)> {
        let spec = AddressSpec::parse(&self.address)?;
        let kind: ScanKind = self.mode.parse()?;
        let mode = ScanMode::from_parts(kind, self.port.as_deref())?;
        Ok((spec, mode))
    }
}

/// A successful scan response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResponse {
    pub message: String,
    pub results: Vec<PortRecord>,
}

impl From<ScanReport> for ScanResponse {
    fn from(report: ScanReport) -> Self {
        Self {
            message: SCAN_COMPLETE.to_string(),
            results: report.records,
        }
    }
}

/// A rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
}

impl From<&ScanError> for ErrorResponse {
    fn from(err: &ScanError) -> Self {
        let status = match err {
            ScanError::InvalidConfig(_) => 500,
            _ => 400,
        };
        Self {
            status,
            error: err.to_string(),
        }
    }
}

/// Validate and run a request end to end.
pub async fn handle_scan(
    coordinator: &Coordinator,
    request: &ScanRequest,
) -> Result<ScanResponse, ErrorResponse> {
    let run = async {
        let (spec, mode) = request.validate()?;
        coordinator.run(&spec, &mode).await
    };

    match run.await {
        Ok(report) => Ok(report.into()),
        Err(e) => Err(ErrorResponse::from(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(address: &str, mode: &str, port: Option<&str>) -> ScanRequest {
        ScanRequest {
            address: address.to_string(),
            mode: mode.to_string(),
            port: port.map(str::to_string),
        }
    }

    #[test]
    fn test_request_deserialize_without_port() {
        let req: ScanRequest =
            serde_json::from_str(r#"{"address": "10.0.0.0/30", "mode": "quick"}"#).unwrap();
        assert_eq!(req, request("10.0.0.0/30", "quick", None));
        let (spec, mode) = req.validate().unwrap();
        assert_eq!(spec.host_count(), 4);
        assert_eq!(mode, ScanMode::Quick);
    }

    #[test]
    fn test_invalid_requests_are_client_errors() {
        for req in [
            request("999.1.1.1", "all", None),
            request("10.0.0.1", "stealth", None),
            request("10.0.0.1", "specified", Some("80-")),
        ] {
            let err = req.validate().unwrap_err();
            assert_eq!(ErrorResponse::from(&err).status, 400);
        }
    }

    #[test]
    fn test_error_body_shape() {
        let err = request("1.2.3", "all", None).validate().unwrap_err();
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": "invalid address or CIDR block: 1.2.3"})
        );
    }
}
