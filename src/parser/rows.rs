use crate::constants::DEFAULT_UPDATE_TIME;

/// Text of one update row as it appeared on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub date: String,
    pub time: String,
    pub location: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Slot {
    #[default]
    Date,
    Time,
    Location,
    Status,
}

/// Groups a flat run of table-cell texts into rows of (date, time, location, status).
///
/// The page has no usable row boundary, so cells are assigned to slots in order
/// and a row is released only when its status cell arrives. Cells left over at
/// the end of the page never form a row.
#[derive(Debug, Default)]
pub struct RowAssembler {
    next: Slot,
    date: String,
    time: String,
    location: String,
}

impl RowAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next cell; returns a row when this cell completes one.
    pub fn push(&mut self, text: &str) -> Option<RawRow> {
        match self.next {
            Slot::Date => {
                self.date = text.to_string();
                self.next = Slot::Time;
                None
            }
            Slot::Time => {
                self.time = text.to_string();
                self.next = Slot::Location;
                None
            }
            Slot::Location => {
                self.location = text.to_string();
                self.next = Slot::Status;
                None
            }
            Slot::Status => {
                self.next = Slot::Date;
                let time = std::mem::take(&mut self.time);
                Some(RawRow {
                    date: std::mem::take(&mut self.date),
                    time: if time.is_empty() {
                        DEFAULT_UPDATE_TIME.to_string()
                    } else {
                        time
                    },
                    location: std::mem::take(&mut self.location),
                    status: text.to_string(),
                })
            }
        }
    }

    /// Number of cells held for a row that has not completed yet.
    pub fn pending(&self) -> usize {
        match self.next {
            Slot::Date => 0,
            Slot::Time => 1,
            Slot::Location => 2,
            Slot::Status => 3,
        }
    }
}
