//! Extraction of tracking fields from the aggregation page's HTML.
//!
//! Only two things on the page matter: the delivery status div
//! (`<div class="b_focusTextSmall">Delivered: Mon, Sep 18, 2:30 PM</div>`) and
//! the table cells carrying the update history. The page is scanned as a flat
//! token stream, so cells count wherever they appear, inside a table or not.

mod rows;

pub use rows::{RawRow, RowAssembler};

use std::io::Read;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::{debug, warn};

use crate::constants::{DELIVERED_LABEL, DELIVERY_BLOCK_CLASS};
use crate::error::{Result, TrackerError};
use crate::normalize::DateNormalizer;
use crate::types::{ExtractedPage, TrackingUpdate};

/// Contents of the delivery status div, split at `": "`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryText {
    pub delivered: bool,
    pub date: String,
}

/// Page text before any date handling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPage {
    pub delivery: Option<DeliveryText>,
    pub rows: Vec<RawRow>,
}

impl RawPage {
    /// Run every date field through the normalizer.
    pub fn normalize(self, normalizer: &DateNormalizer) -> ExtractedPage {
        let (delivered, delivery_timestamp) = match self.delivery {
            Some(d) if d.delivered => (true, Some(normalizer.normalize_delivery(&d.date))),
            Some(d) => (false, Some(normalizer.normalize_estimated(&d.date))),
            None => (false, None),
        };

        let updates = self
            .rows
            .into_iter()
            .map(|row| TrackingUpdate {
                timestamp: normalizer.normalize_update(&row.date, &row.time),
                location: row.location,
                status: row.status,
            })
            .collect();

        ExtractedPage {
            delivered,
            delivery_timestamp,
            updates,
        }
    }
}

/// Read a whole tracking page and extract its fields with normalized dates.
///
/// A read failure aborts with `SourceFormat`; nothing partial is returned.
pub fn parse_tracking_page<R: Read>(reader: R, normalizer: &DateNormalizer) -> Result<ExtractedPage> {
    Ok(extract(reader)?.normalize(normalizer))
}

/// Read a whole tracking page and pull out the raw delivery text and update rows.
pub fn extract<R: Read>(mut reader: R) -> Result<RawPage> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(TrackerError::SourceFormat)?;
    debug!("Tracking page read: {} bytes", bytes.len());

    Ok(extract_str(&String::from_utf8_lossy(&bytes)))
}

/// Tokenize markup and collect the delivery block and update cells in document order.
pub fn extract_str(html: &str) -> RawPage {
    let mut tokenizer = Tokenizer::new(PageSink::default(), TokenizerOpts::default());
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();
    tokenizer.sink.finish()
}

/// Which field the text right after a start tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Delivery,
    Cell,
}

#[derive(Default)]
struct PageSink {
    page: RawPage,
    rows: RowAssembler,
    /// Open capture and the text collected for it so far
    capture: Option<(Capture, String)>,
}

impl PageSink {
    fn start_tag(&mut self, tag: &Tag) -> TokenSinkResult<()> {
        match &*tag.name {
            "div" if has_class(tag, DELIVERY_BLOCK_CLASS) => {
                self.capture = Some((Capture::Delivery, String::new()));
            }
            "td" => self.capture = Some((Capture::Cell, String::new())),
            // raw text elements: their content is never markup
            "script" => return TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                return TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "textarea" | "title" => return TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => return TokenSinkResult::Plaintext,
            _ => {}
        }
        TokenSinkResult::Continue
    }

    /// Close the open capture. Only a start tag followed directly by text yields a field.
    fn finish_capture(&mut self) {
        let Some((capture, text)) = self.capture.take() else {
            return;
        };
        if text.is_empty() {
            return;
        }
        match capture {
            Capture::Delivery => self.delivery_text(&text),
            Capture::Cell => self.cell_text(&text),
        }
    }

    fn delivery_text(&mut self, text: &str) {
        match split_delivery_text(text) {
            Some(delivery) => {
                if let Some(previous) = &self.page.delivery {
                    debug!(
                        "Delivery block '{}' replaces earlier '{}'",
                        delivery.date, previous.date
                    );
                }
                self.page.delivery = Some(delivery);
            }
            None => warn!("Skipping delivery block with unexpected text '{}'", text),
        }
    }

    fn cell_text(&mut self, text: &str) {
        let Some(row) = self.rows.push(text.trim()) else {
            return;
        };
        if row.location.is_empty() || row.status.is_empty() {
            warn!("Dropping update row with empty location or status: {:?}", row);
            return;
        }
        debug!("Update row: {:?}", row);
        self.page.rows.push(row);
    }

    fn finish(mut self) -> RawPage {
        self.finish_capture();
        if self.rows.pending() > 0 {
            debug!("Discarding {} trailing cells of an incomplete row", self.rows.pending());
        }
        self.page
    }
}

impl TokenSink for PageSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            // text can arrive in several runs (entities, newlines)
            Token::CharacterTokens(text) => {
                if let Some((_, collected)) = self.capture.as_mut() {
                    collected.push_str(&text);
                }
            }
            Token::NullCharacterToken | Token::ParseError(_) => {}
            Token::TagToken(tag) => {
                self.finish_capture();
                if tag.kind == TagKind::StartTag && !tag.self_closing {
                    return self.start_tag(&tag);
                }
            }
            Token::DoctypeToken(_) | Token::CommentToken(_) | Token::EOFToken => {
                self.finish_capture()
            }
        }
        TokenSinkResult::Continue
    }
}

fn has_class(tag: &Tag, class: &str) -> bool {
    tag.attrs
        .iter()
        .any(|attr| &*attr.name.local == "class" && &*attr.value == class)
}

fn split_delivery_text(text: &str) -> Option<DeliveryText> {
    let parts: Vec<&str> = text.trim().split(": ").collect();
    match parts.as_slice() {
        [label, date] => Some(DeliveryText {
            delivered: *label == DELIVERED_LABEL,
            date: date.to_string(),
        }),
        _ => None,
    }
}
