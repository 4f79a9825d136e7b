use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::{date, format_description};
use time::{Date, OffsetDateTime};
use vodca::{AsRefln, Fromln};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date without time-of-day or offset, encoded as `YYYY-MM-DD`.
///
/// `0001-01-01` is the unset value; it is what an omitted date clears to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct PublicationDate(Date);

impl PublicationDate {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }

    pub fn unset() -> Self {
        Self(date!(0001 - 01 - 01))
    }

    pub fn today() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::unset()
    }

    pub fn parse(text: &str) -> Result<Self, time::error::Parse> {
        Date::parse(text, DATE_FORMAT).map(Self)
    }

    pub fn format(&self) -> Result<String, time::error::Format> {
        self.0.format(DATE_FORMAT)
    }
}

impl Default for PublicationDate {
    fn default() -> Self {
        Self::unset()
    }
}

impl Serialize for PublicationDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.format().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for PublicationDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(|_| {
            serde::de::Error::custom("invalid publicationDate format, expected YYYY-MM-DD")
        })
    }
}
