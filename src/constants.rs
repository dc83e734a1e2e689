//! Tracking endpoint and request constants shared by the CLI and the HTTP adapter.

/// Aggregation endpoint; `{number}` and `{carrier}` are substituted per request.
pub const TRACKING_URL_TEMPLATE: &str =
    "https://www.bing.com/packagetrackingv2?packNum={number}&carrier={carrier}";

pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

// Bounds on a sanitized tracking number
pub const MIN_TRACKING_NUMBER_LEN: usize = 7;
pub const MAX_TRACKING_NUMBER_LEN: usize = 40;

/// Class attribute value of the div carrying "<Label>: <date>"
pub const DELIVERY_BLOCK_CLASS: &str = "b_focusTextSmall";

/// Label that marks a completed delivery; any other label is an estimate.
pub const DELIVERED_LABEL: &str = "Delivered";

/// Time substituted when an update row has an empty time cell.
pub const DEFAULT_UPDATE_TIME: &str = "12:00 AM";

/// Fill the endpoint template with an already-sanitized number and carrier code.
pub fn tracking_url(template: &str, number: &str, carrier_code: &str) -> String {
    template
        .replace("{number}", number)
        .replace("{carrier}", carrier_code)
}
