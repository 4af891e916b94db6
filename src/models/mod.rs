pub mod enums;
pub mod validate;
pub mod page;
pub mod user;
pub mod people;
pub mod appointment;
pub mod medicine;
pub mod order;
pub mod payment;
pub mod prescription;
pub mod record;

pub use enums::*;
pub use validate::Validate;
pub use page::{ListQuery, Page};
pub use user::*;
pub use people::*;
pub use appointment::*;
pub use medicine::*;
pub use order::*;
pub use payment::*;
pub use prescription::*;
pub use record::*;

/// Lenient date decoding for backend payloads.
///
/// The backend sends either `YYYY-MM-DD` or a full RFC 3339 timestamp
/// (`2025-03-01T00:00:00.000Z`) for the same field depending on the route.
pub(crate) mod wire_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
            .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => super::serialize(d, s),
                None => s.serialize_none(),
            }
        }

        /// Unparseable dates decode as `None` rather than failing the whole row.
        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            Ok(raw.as_deref().and_then(super::parse))
        }
    }
}
