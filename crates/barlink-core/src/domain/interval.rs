use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ValidationError;

/// Unit tokens accepted after the amount, matched case-sensitively.
const UNIT_TOKENS: [&str; 5] = ["Min", "Hour", "Day", "Week", "Month"];

/// Calendar/clock unit of a bar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl IntervalUnit {
    pub const ALL: [Self; 5] = [
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
    ];

    /// Token used in the canonical `<amount><token>` form.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Minute => "Min",
            Self::Hour => "Hour",
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "Min" => Some(Self::Minute),
            "Hour" => Some(Self::Hour),
            "Day" => Some(Self::Day),
            "Week" => Some(Self::Week),
            "Month" => Some(Self::Month),
            _ => None,
        }
    }
}

/// Bar granularity such as `15Min` or `1Day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    amount: u64,
    unit: IntervalUnit,
}

impl Interval {
    /// Builds an interval directly; `amount` must be positive.
    pub fn new(amount: u64, unit: IntervalUnit) -> Result<Self, ValidationError> {
        if amount == 0 {
            return Err(ValidationError::InvalidTimeframeFormat {
                value: format!("{amount}{}", unit.token()),
            });
        }
        Ok(Self { amount, unit })
    }

    /// Parses `<positive integer><Min|Hour|Day|Week|Month>` with nothing else
    /// around it.
    ///
    /// The amount has no upper bound of its own. Only amounts past `u64::MAX`
    /// are reported as a format error, since they cannot be represented.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let invalid_format = || ValidationError::InvalidTimeframeFormat {
            value: text.to_owned(),
        };

        let digits_end = text
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(text.len());
        let (digits, token) = text.split_at(digits_end);
        if digits.is_empty() || !UNIT_TOKENS.contains(&token) {
            return Err(invalid_format());
        }

        let amount = digits.parse::<u64>().map_err(|_| invalid_format())?;
        if amount == 0 {
            return Err(invalid_format());
        }

        let unit =
            IntervalUnit::from_token(token).ok_or_else(|| ValidationError::InvalidTimeframeUnit {
                value: text.to_owned(),
                unit: token.to_owned(),
            })?;

        Ok(Self { amount, unit })
    }

    pub const fn amount(self) -> u64 {
        self.amount
    }

    pub const fn unit(self) -> IntervalUnit {
        self.unit
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.token())
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_and_days() {
        let interval = Interval::parse("15Min").expect("must parse");
        assert_eq!(interval.amount(), 15);
        assert_eq!(interval.unit(), IntervalUnit::Minute);

        let interval = Interval::from_str("1Day").expect("must parse");
        assert_eq!(interval, Interval::new(1, IntervalUnit::Day).expect("valid"));
    }

    #[test]
    fn accepts_large_amounts() {
        let interval = Interval::parse("100000Hour").expect("no upper bound");
        assert_eq!(interval.amount(), 100_000);

        let interval = Interval::parse("4294967296Min").expect("past u32 range");
        assert_eq!(interval.amount(), 4_294_967_296);
        assert_eq!(interval.to_string(), "4294967296Min");
    }

    #[test]
    fn rejects_malformed_strings() {
        for raw in [
            "abc", "Min15", "15Minutes", "", "15", "Min", "15min", " 15Min", "15Min ", "15 Min",
            "0Min", "-5Min", "+5Min", "5Days", "18446744073709551616Day",
        ] {
            let err = Interval::parse(raw).expect_err(raw);
            assert_eq!(
                err,
                ValidationError::InvalidTimeframeFormat {
                    value: raw.to_owned()
                },
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn canonical_form_round_trips() {
        for unit in IntervalUnit::ALL {
            for amount in [1, 2, 100] {
                let interval = Interval::new(amount, unit).expect("valid");
                let reparsed = Interval::parse(&interval.to_string()).expect("canonical parses");
                assert_eq!(reparsed, interval);
            }
        }
    }

    #[test]
    fn serializes_as_canonical_string() {
        let interval = Interval::parse("5Min").expect("valid");
        assert_eq!(serde_json::to_string(&interval).expect("json"), "\"5Min\"");
    }
}
