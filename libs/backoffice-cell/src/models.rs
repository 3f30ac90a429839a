use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The account behind a booking, embedded into the staff listing so the
/// backoffice can tell walk-in contact details apart from the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingOwner {
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAppointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    #[serde(rename = "users")]
    pub user: Option<BookingOwner>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<PeriodFilter>,
}

/// Staff listing window, anchored on the current UTC date. Weeks start
/// on Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodFilter {
    Day,
    Week,
    Month,
}

impl PeriodFilter {
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let (first, last) = match self {
            PeriodFilter::Day => (today, today),
            PeriodFilter::Week => {
                let monday = today - ChronoDuration::days(today.weekday().num_days_from_monday() as i64);
                (monday, monday + ChronoDuration::days(6))
            }
            PeriodFilter::Month => {
                let first = today.with_day(1).unwrap_or(today);
                let next_month = if first.month() == 12 {
                    NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
                };
                let last = next_month
                    .map(|d| d - ChronoDuration::days(1))
                    .unwrap_or(first);
                (first, last)
            }
        };

        let start = first.and_time(NaiveTime::MIN).and_utc();
        let end = last.and_time(NaiveTime::MIN).and_utc() + ChronoDuration::days(1)
            - ChronoDuration::milliseconds(1);
        (start, end)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackofficeError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
