use std::io::Read;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::wire::{EventRecord, decode_events};
use crate::{Event, EventSource, FetchError, Resource};

/// Parse an event file with header `Date,EventType,Description`.
///
/// Blank lines are skipped and fields are trimmed. A row with a missing
/// column or an invalid date rejects the whole file.
///
/// # Errors
/// Returns `Parse` for `Resource::Events` describing the first bad row.
pub fn read_events_csv<R: Read>(reader: R) -> Result<Vec<Event>, FetchError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records: Vec<EventRecord> = Vec::new();
    for row in rdr.deserialize::<EventRecord>() {
        let record = row.map_err(|e| FetchError::parse(Resource::Events, e.to_string()))?;
        records.push(record);
    }
    decode_events(records)
}

enum CsvOrigin {
    File(PathBuf),
    Inline(String),
}

/// Event source backed by a static CSV file instead of the network.
///
/// The file is read on every fetch, so edits show up on the next load.
pub struct CsvEventSource {
    origin: CsvOrigin,
}

impl CsvEventSource {
    /// Read events from a file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: CsvOrigin::File(path.into()),
        }
    }

    /// Serve events from CSV text held in memory.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            origin: CsvOrigin::Inline(text.into()),
        }
    }
}

#[async_trait]
impl EventSource for CsvEventSource {
    async fn fetch_events(&self) -> Result<Vec<Event>, FetchError> {
        match &self.origin {
            CsvOrigin::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    FetchError::transport(
                        Resource::Events,
                        format!("failed to read {}: {e}", path.display()),
                    )
                })?;
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %path.display(), bytes = bytes.len(), "read event csv");
                read_events_csv(bytes.as_slice())
            }
            CsvOrigin::Inline(text) => read_events_csv(text.as_bytes()),
        }
    }

    fn origin(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventCategory;
    use chrono::NaiveDate;

    const SAMPLE: &str = "Date,EventType,Description\n\
        1990-08-02,Geopolitical,Iraq invades Kuwait\n\
        \n\
        2008-09-15, Economic , Lehman Brothers collapse\n\
        2016-11-30,OPEC,\"OPEC agrees to cut output, first since 2008\"\n";

    #[test]
    fn parses_rows_into_events() {
        let evs = read_events_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(evs.len(), 3);
        assert_eq!(evs[1].date, NaiveDate::from_ymd_opt(2008, 9, 15).unwrap());
        assert_eq!(evs[1].category, EventCategory::Economic);
        assert_eq!(evs[2].category, EventCategory::Opec);
        assert_eq!(
            evs[2].description,
            "OPEC agrees to cut output, first since 2008"
        );
    }

    #[test]
    fn header_only_file_is_empty() {
        let evs = read_events_csv("Date,EventType,Description\n".as_bytes()).unwrap();
        assert!(evs.is_empty());
    }

    #[test]
    fn short_row_rejects_file() {
        let text = "Date,EventType,Description\n2001-09-11,Geopolitical\n";
        let err = read_events_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, FetchError::Parse { resource: Resource::Events, .. }));
    }

    #[test]
    fn bad_date_rejects_file() {
        let text = "Date,EventType,Description\nyesterday,Economic,Something\n";
        let err = read_events_csv(text.as_bytes()).unwrap_err();
        assert_eq!(err.message(), "record 0: invalid date 'yesterday'");
    }

    #[tokio::test]
    async fn inline_source_serves_events() {
        let src = CsvEventSource::from_text(SAMPLE);
        assert_eq!(src.fetch_events().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn missing_file_is_a_transport_error() {
        let src = CsvEventSource::from_path("/definitely/not/here/event_data.csv");
        let err = src.fetch_events().await.unwrap_err();
        assert_eq!(err.code(), "transport");
        assert_eq!(err.resource(), Resource::Events);
    }
}
