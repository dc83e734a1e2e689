use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parcel_tracker::app::ports::{HttpClientPort, HttpGetResult};
use parcel_tracker::app::track_use_case::TrackUseCase;
use parcel_tracker::infra::output::{encode, write_output, OutputTarget};
use parcel_tracker::normalize::{DateNormalizer, FixedClock, Zone};
use parcel_tracker::parser::parse_tracking_page;
use parcel_tracker::types::OutputFormat;
use parcel_tracker::{Carrier, TrackerError, TrackingResult};
use tempfile::tempdir;

const FIXTURE: &str = include_str!("fixtures/tracking_page.html");

fn normalizer_at(now: &str, zone: Zone) -> DateNormalizer {
    let now = DateTime::parse_from_rfc3339(now)
        .unwrap()
        .with_timezone(&Utc);
    DateNormalizer::with_clock(zone, FixedClock(now))
}

struct StaticPage(&'static str);

#[async_trait]
impl HttpClientPort for StaticPage {
    async fn get(&self, _url: &str) -> parcel_tracker::Result<HttpGetResult> {
        Ok(HttpGetResult {
            status: 200,
            bytes: self.0.as_bytes().to_vec(),
        })
    }
}

struct TimedOut;

#[async_trait]
impl HttpClientPort for TimedOut {
    async fn get(&self, _url: &str) -> parcel_tracker::Result<HttpGetResult> {
        Err(TrackerError::Transport("operation timed out".to_string()))
    }
}

#[test]
fn test_fixture_yields_two_updates_in_document_order() -> Result<()> {
    let normalizer = normalizer_at("2026-10-17T12:00:00Z", Zone::Named(chrono_tz::UTC));
    let page = parse_tracking_page(FIXTURE.as_bytes(), &normalizer)?;

    assert!(page.delivered);
    assert_eq!(page.delivery_timestamp.as_deref(), Some("2026-09-18T14:30:00Z"));
    assert_eq!(page.updates.len(), 2);
    assert_eq!(page.updates[0].timestamp, "2026-09-18T14:30:00Z");
    assert_eq!(page.updates[0].status, "Delivered, In/At Mailbox");
    assert_eq!(page.updates[1].timestamp, "2026-09-18T06:10:00Z");
    assert_eq!(page.updates[1].location, "BROOKLYN, NY");
    assert_eq!(page.updates[1].status, "Out for Delivery");
    Ok(())
}

#[test]
fn test_fixture_before_event_date_rolls_back_a_year() -> Result<()> {
    let normalizer = normalizer_at(
        "2026-06-01T12:00:00Z",
        Zone::Named(chrono_tz::America::New_York),
    );
    let page = parse_tracking_page(FIXTURE.as_bytes(), &normalizer)?;

    assert_eq!(page.delivery_timestamp.as_deref(), Some("2025-09-18T14:30:00-04:00"));
    assert_eq!(page.updates[1].timestamp, "2025-09-18T06:10:00-04:00");
    Ok(())
}

#[tokio::test]
async fn test_track_end_to_end_to_json_file() -> Result<()> {
    let use_case = TrackUseCase::new(
        Box::new(StaticPage(FIXTURE)),
        normalizer_at("2026-10-17T12:00:00Z", Zone::Named(chrono_tz::UTC)),
        "http://tracker.test/?n={number}&c={carrier}",
    );
    let result = use_case.track("9400-1118-9922-3", "Usps").await?;

    let dir = tempdir()?;
    let path = dir.path().join("result.json");
    let bytes = encode(&result, OutputFormat::Json, false)?;
    write_output(&OutputTarget::File(path.clone()), &bytes)?;

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(written["trackingNum"], "9400111899223");
    assert_eq!(written["carrier"], "USPS");
    assert_eq!(written["delivered"], true);
    assert_eq!(written["deliveryDateTime"], "2026-09-18T14:30:00Z");
    assert_eq!(written["updates"].as_array().map(Vec::len), Some(2));
    assert_eq!(written["updates"][0]["dateTime"], "2026-09-18T14:30:00Z");
    Ok(())
}

#[tokio::test]
async fn test_track_page_without_tracking_data() -> Result<()> {
    let use_case = TrackUseCase::new(
        Box::new(StaticPage("<html><body><p>No results</p></body></html>")),
        normalizer_at("2026-10-17T12:00:00Z", Zone::Named(chrono_tz::UTC)),
        "http://tracker.test/{carrier}/{number}",
    );
    let result = use_case.track("1Z999AA10123456784", "ups").await?;

    assert_eq!(result.carrier, Carrier::Ups);
    assert!(!result.delivered);
    let json = serde_json::to_value(&result)?;
    assert!(json.get("deliveryDateTime").is_none());
    assert!(json.get("updates").is_none());
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_is_fatal() {
    let use_case = TrackUseCase::new(
        Box::new(TimedOut),
        normalizer_at("2026-10-17T12:00:00Z", Zone::Named(chrono_tz::UTC)),
        "http://tracker.test/{carrier}/{number}",
    );
    let err = use_case.track("1234567890", "dhl").await.unwrap_err();
    assert!(matches!(err, TrackerError::Transport(_)));
}

#[tokio::test]
async fn test_binary_output_matches_json_structure() -> Result<()> {
    let use_case = TrackUseCase::new(
        Box::new(StaticPage(FIXTURE)),
        normalizer_at("2026-10-17T12:00:00Z", Zone::Named(chrono_tz::UTC)),
        "http://tracker.test/{carrier}/{number}",
    );
    let result = use_case.track("9400111899223", "USPS").await?;

    let bytes = encode(&result, OutputFormat::Binary, false)?;
    let decoded: TrackingResult = ciborium::from_reader(bytes.as_slice())?;
    assert_eq!(decoded, result);
    Ok(())
}

#[tokio::test]
async fn test_track_fragment_without_table_markup() -> Result<()> {
    let fragment = r#"<div class="b_focusTextSmall">Estimated delivery: Monday, January 2, 2025</div>
<div class="pt_rows"><td>Dec 30</td><td></td><td> </td><td>Memphis, TN</td><td>Departed FedEx hub</td></div>"#;
    let use_case = TrackUseCase::new(
        Box::new(StaticPage(fragment)),
        normalizer_at("2025-01-01T12:00:00Z", Zone::Named(chrono_tz::UTC)),
        "http://tracker.test/{carrier}/{number}",
    );
    let result = use_case.track("123456789012", "fedex").await?;

    assert!(!result.delivered);
    assert_eq!(result.delivery_timestamp.as_deref(), Some("2025-01-02T00:00:00Z"));
    assert_eq!(result.updates.len(), 1);
    assert_eq!(result.updates[0].timestamp, "2024-12-30T00:00:00Z");
    assert_eq!(result.updates[0].location, "Memphis, TN");
    assert_eq!(result.updates[0].status, "Departed FedEx hub");
    Ok(())
}
