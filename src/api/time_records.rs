//! Time-record endpoints.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/timetrack/time-records/time-bookings/{clock-in,clock-out,break-start,break-end}` | Book |
//! | GET    | `/timetrack/time-records/today` | Today's protocol |
//! | GET    | `/timetrack/time-records/my-records?startDate&endDate` | Protocol for a range |
//! | GET    | `/timetrack/status/current` | Current work status |
//! | GET    | `/timetrack/summary/today` | Dashboard summary |
//! | PATCH  | `/timetrack/time-records/{id}/notes` | Edit notes |
//! | DELETE | `/timetrack/time-records/{id}` | Delete a record |

use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::location::LocationType;
use crate::models::protocol_entry::ProtocolEntry;
use crate::models::record_type::RecordType;
use crate::models::today_summary::TodaySummary;
use crate::models::work_status::WorkStatus;

const RECORDS: &str = "/timetrack/time-records";

/// Body of every booking request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub location_type: LocationType,
    pub terminal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response of `GET /timetrack/status/current`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStatus {
    pub status: WorkStatus,
    #[serde(default)]
    pub is_working: bool,
    #[serde(default)]
    pub is_on_break: bool,
    #[serde(default)]
    pub last_record_type: Option<RecordType>,
    #[serde(default)]
    pub last_record_time: Option<String>,
}

#[derive(Debug, Serialize)]
struct NotesRequest<'a> {
    notes: &'a str,
}

pub struct TimeRecordsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TimeRecordsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Book `record_type`. The server answers with the stored record.
    pub async fn book(
        &self,
        record_type: RecordType,
        request: &BookingRequest,
    ) -> AppResult<ProtocolEntry> {
        let path = format!("{}/time-bookings/{}", RECORDS, record_type.booking_path());
        let body = serde_json::to_value(request)?;
        self.client
            .request_json(Method::POST, &path, &[], Some(&body))
            .await
    }

    pub async fn today(&self) -> AppResult<Vec<ProtocolEntry>> {
        let path = format!("{}/today", RECORDS);
        self.client.request_json(Method::GET, &path, &[], None).await
    }

    pub async fn my_records(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<ProtocolEntry>> {
        if end < start {
            return Err(AppError::Validation(format!(
                "endDate {end} is before startDate {start}"
            )));
        }
        let path = format!("{}/my-records", RECORDS);
        let query = [
            ("startDate", start.format("%Y-%m-%d").to_string()),
            ("endDate", end.format("%Y-%m-%d").to_string()),
        ];
        self.client
            .request_json(Method::GET, &path, &query, None)
            .await
    }

    pub async fn current_status(&self) -> AppResult<CurrentStatus> {
        self.client
            .request_json(Method::GET, "/timetrack/status/current", &[], None)
            .await
    }

    pub async fn summary_today(&self) -> AppResult<TodaySummary> {
        self.client
            .request_json(Method::GET, "/timetrack/summary/today", &[], None)
            .await
    }

    pub async fn update_notes(&self, id: i64, notes: &str) -> AppResult<ProtocolEntry> {
        let path = format!("{}/{}/notes", RECORDS, id);
        let body = serde_json::to_value(NotesRequest { notes })?;
        self.client
            .request_json(Method::PATCH, &path, &[], Some(&body))
            .await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let path = format!("{}/{}", RECORDS, id);
        self.client.request_unit(Method::DELETE, &path, None).await
    }
}
