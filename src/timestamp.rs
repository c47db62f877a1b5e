use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serializer};
use snafu::{ResultExt, Snafu};
use std::str::FromStr;

/// Creation times are written as RFC 3339 strings, and read either from a
/// string or from unix seconds (what key parsers usually hand out)
pub(crate) mod required {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Seconds(i64),
        Text(String),
    }

    pub fn serialize<S>(timestamp: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(timestamp)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Owned string on purpose, some serde implementations will fail on a slice (ex: `ciborium`)
        match Repr::deserialize(deserializer)? {
            Repr::Seconds(seconds) => parse_timestamp(seconds).map_err(serde::de::Error::custom),
            Repr::Text(string) => Timestamp::from_str(&string).map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Failed to parse timestamp {timestamp}"))]
/// Error while parsing a timestamp from an integer
pub struct TimestampError {
    timestamp: i64,
    source: jiff::Error,
}

pub(crate) fn parse_timestamp(timestamp: i64) -> Result<Timestamp, TimestampError> {
    Timestamp::from_second(timestamp).context(TimestampSnafu { timestamp })
}
