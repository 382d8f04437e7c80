use axum::body::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use services::attendance_session::{CheckIn, CheckOut, SessionView};
use services::geofence::GeoPoint;
use validator::Validate;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub lng: f64,
}

impl From<Location> for GeoPoint {
    fn from(l: Location) -> Self {
        GeoPoint::new(l.lat, l.lng)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CheckInRequest {
    pub slot_id: Option<i64>,
    /// Device clock at scan time. Kept for auditing only.
    pub client_timestamp: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub location: Option<Location>,
}

impl From<CheckInRequest> for CheckIn {
    fn from(req: CheckInRequest) -> Self {
        CheckIn {
            slot_id: req.slot_id,
            client_timestamp: req.client_timestamp,
            location: req.location.map(GeoPoint::from),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CheckOutRequest {
    #[serde(alias = "client_action")]
    #[validate(length(max = 64, message = "Action must be at most 64 characters"))]
    pub action: Option<String>,
    #[validate(nested)]
    pub location: Option<Location>,
}

impl From<CheckOutRequest> for CheckOut {
    fn from(req: CheckOutRequest) -> Self {
        CheckOut {
            client_action: req.action,
            location: req.location.map(GeoPoint::from),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub slot_name: Option<String>,
    pub check_in_at: String,
    pub check_out_at: Option<String>,
    pub calendar_date: String,
    pub is_open: bool,
    pub duration_seconds: i64,
    pub check_in_location: Option<Location>,
    pub check_out_location: Option<Location>,
    pub client_reported_at: Option<String>,
    pub check_out_action: Option<String>,
}

fn location(p: GeoPoint) -> Location {
    Location {
        lat: p.lat,
        lng: p.lng,
    }
}

fn date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

impl From<SessionView> for SessionResponse {
    fn from(v: SessionView) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            slot_id: v.slot_id,
            slot_name: v.slot_name,
            check_in_at: v.check_in_at.to_rfc3339(),
            check_out_at: v.check_out_at.map(|t| t.to_rfc3339()),
            calendar_date: date(v.calendar_date),
            is_open: v.is_open,
            duration_seconds: v.duration_seconds,
            check_in_location: v.check_in_location.map(location),
            check_out_location: v.check_out_location.map(location),
            client_reported_at: v.client_reported_at.map(|t| t.to_rfc3339()),
            check_out_action: v.check_out_action,
        }
    }
}

/// Check-in and check-out bodies are optional; an empty body means "all defaults".
pub fn parse_optional_body<T>(body: &Bytes) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        Ok(T::default())
    } else {
        serde_json::from_slice(body)
    }
}
