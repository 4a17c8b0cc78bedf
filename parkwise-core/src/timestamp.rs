//! Text encoding for timestamps as they are persisted and displayed.

use chrono::NaiveDateTime;

/// Format used for every persisted timestamp column.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format(at: &NaiveDateTime) -> String {
    at.format(FORMAT).to_string()
}

pub fn parse(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, FORMAT)
}

/// `#[serde(with = "timestamp::as_text")]` helpers.
pub mod as_text {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format(at))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse(&text).map_err(D::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(at: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match at {
                Some(at) => serializer.serialize_some(&super::super::format(at)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|text| super::super::parse(&text).map_err(D::Error::custom))
                .transpose()
        }
    }
}
