use tracing::{info, warn};

use crate::app::ports::HttpClientPort;
use crate::constants::tracking_url;
use crate::error::Result;
use crate::normalize::DateNormalizer;
use crate::parser::parse_tracking_page;
use crate::types::{sanitize_tracking_number, Carrier, TrackingResult};

/// Use case for looking up one tracking number: validate, fetch, extract, normalize
pub struct TrackUseCase {
    http: Box<dyn HttpClientPort>,
    normalizer: DateNormalizer,
    url_template: String,
}

impl TrackUseCase {
    pub fn new(
        http: Box<dyn HttpClientPort>,
        normalizer: DateNormalizer,
        url_template: impl Into<String>,
    ) -> Self {
        Self {
            http,
            normalizer,
            url_template: url_template.into(),
        }
    }

    /// Input is validated before any request is made; a page that cannot be
    /// read yields an error and no partial result.
    pub async fn track(&self, raw_number: &str, raw_carrier: &str) -> Result<TrackingResult> {
        let number = sanitize_tracking_number(raw_number)?;
        let carrier: Carrier = raw_carrier.parse()?;

        let url = tracking_url(&self.url_template, &number, carrier.code());
        info!(carrier = %carrier, "Fetching tracking page");
        let response = self.http.get(&url).await?;
        info!(
            "Tracking page received: status={}, size={} bytes",
            response.status,
            response.bytes.len()
        );

        let page = parse_tracking_page(response.bytes.as_slice(), &self.normalizer)?;
        let result = page.into_result(number, carrier);

        if result.updates.is_empty() {
            warn!("tracking number updates not found");
        }
        Ok(result)
    }
}
