use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ValidationError;

/// Instant normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Parses an ISO-8601 timestamp.
    ///
    /// Accepted shapes:
    /// - RFC 3339 with any offset, converted to UTC
    /// - naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` (or space separated), read as UTC
    /// - date only `YYYY-MM-DD`, read as midnight UTC
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let rfc3339_error = match OffsetDateTime::parse(input, &Rfc3339) {
            Ok(parsed) => return Ok(Self(parsed.to_offset(UtcOffset::UTC))),
            Err(error) => error,
        };

        if let Some(naive) = parse_naive(input) {
            return Ok(Self(naive.assume_utc()));
        }

        if let Ok(date) = Date::parse(input, format_description!("[year]-[month]-[day]")) {
            return Ok(Self(date.midnight().assume_utc()));
        }

        Err(ValidationError::InvalidTimestamp {
            value: input.to_owned(),
            detail: rfc3339_error.to_string(),
        })
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.to_string())
    }
}

fn parse_naive(input: &str) -> Option<PrimitiveDateTime> {
    let formats = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    ];

    formats
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(input, *format).ok())
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
