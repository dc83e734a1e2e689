use crate::constants::{MAX_TRACKING_NUMBER_LEN, MIN_TRACKING_NUMBER_LEN};
use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported carriers, serialized by their uppercase code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Carrier {
    #[serde(rename = "DHL")]
    Dhl,
    #[serde(rename = "FEDEX")]
    Fedex,
    #[serde(rename = "UPS")]
    Ups,
    #[serde(rename = "USPS")]
    Usps,
}

impl Carrier {
    pub fn code(&self) -> &'static str {
        match self {
            Carrier::Dhl => "DHL",
            Carrier::Fedex => "FEDEX",
            Carrier::Ups => "UPS",
            Carrier::Usps => "USPS",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Carrier {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DHL" => Ok(Carrier::Dhl),
            "FEDEX" => Ok(Carrier::Fedex),
            "UPS" => Ok(Carrier::Ups),
            "USPS" => Ok(Carrier::Usps),
            _ => Err(TrackerError::InvalidCarrier(s.to_string())),
        }
    }
}

/// Strip everything outside `[0-9a-zA-Z]` and enforce the length bounds on what remains.
pub fn sanitize_tracking_number(raw: &str) -> Result<String> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if cleaned.len() < MIN_TRACKING_NUMBER_LEN || cleaned.len() > MAX_TRACKING_NUMBER_LEN {
        return Err(TrackerError::InvalidTrackingNumber);
    }
    Ok(cleaned)
}

/// One status event in a shipment's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingUpdate {
    /// RFC 3339 when the source date parsed, otherwise the source text verbatim
    #[serde(rename = "dateTime")]
    pub timestamp: String,
    pub location: String,
    pub status: String,
}

/// Everything known about one tracking number after a single lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingResult {
    #[serde(rename = "trackingNum")]
    pub tracking_number: String,
    pub carrier: Carrier,
    pub delivered: bool,
    #[serde(
        rename = "deliveryDateTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<TrackingUpdate>,
}

/// Fields the page itself yields, before the caller attaches number and carrier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub delivered: bool,
    pub delivery_timestamp: Option<String>,
    pub updates: Vec<TrackingUpdate>,
}

impl ExtractedPage {
    pub fn into_result(self, tracking_number: String, carrier: Carrier) -> TrackingResult {
        TrackingResult {
            tracking_number,
            carrier,
            delivered: self.delivered,
            delivery_timestamp: self.delivery_timestamp,
            updates: self.updates,
        }
    }
}

/// Serialization used for the final result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Binary,
}

impl FromStr for OutputFormat {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "binary" | "bin" => Ok(OutputFormat::Binary),
            other => Err(TrackerError::Config(format!("unknown output format '{}'", other))),
        }
    }
}
