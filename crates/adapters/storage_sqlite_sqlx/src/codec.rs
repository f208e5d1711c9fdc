//! Column encodings shared by the repositories.
//!
//! Ids are stored as hyphenated UUID text, timestamps as RFC 3339, dates as
//! `YYYY-MM-DD` and times of day as `HH:MM:SS`.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use gymdesk_domain::time::{Timestamp, hhmm};

const TIME_FORMAT: &str = "%H:%M:%S";

fn decode<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

pub(crate) fn parse<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(decode)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(decode)
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, sqlx::Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(decode)
}

pub(crate) fn parse_time(value: &str) -> Result<NaiveTime, sqlx::Error> {
    hhmm::parse(value).map_err(decode)
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, sqlx::Error> {
    serde_json::from_str(value).map_err(decode)
}

pub(crate) fn format_time(value: NaiveTime) -> String {
    value.format(TIME_FORMAT).to_string()
}
