//! Profile records produced by the extraction stage.
//!
//! Every field of a [`ProfileRecord`] is either a real value or an explicit
//! [`Field::Unavailable`] marker. Nothing is ever absent: downstream rows are
//! aligned 1:1 with the profile URLs that produced them.

use serde::{Serialize, Serializer};

/// Rendering of [`Field::Unavailable`] in reports.
pub const UNAVAILABLE: &str = "null";

#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Value(T),
    Unavailable,
}

impl<T> Field<T> {
    #[must_use]
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            Field::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Field::Unavailable)
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Value(value)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Value(v) => v.fmt(f),
            Field::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(v) => v.serialize(serializer),
            Field::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

/// Statistics and contact details scraped from one profile page.
///
/// Counts are floats because abbreviated counts (`"1.5m"`) are expanded by
/// multiplication and keep their fractional form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRecord {
    pub username: Field<String>,
    pub followers: Field<f64>,
    pub following: Field<f64>,
    pub posts: Field<f64>,
    /// Comma-joined addresses; an empty string when none were found.
    pub emails: Field<String>,
    pub profile_url: Field<String>,
    pub hashtag: Field<String>,
}

impl ProfileRecord {
    /// Placeholder occupying the position of a profile that could not be
    /// extracted.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            username: Field::Unavailable,
            followers: Field::Unavailable,
            following: Field::Unavailable,
            posts: Field::Unavailable,
            emails: Field::Unavailable,
            profile_url: Field::Unavailable,
            hashtag: Field::Unavailable,
        }
    }

    /// True when every field is [`Field::Unavailable`].
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.username.is_unavailable()
            && self.followers.is_unavailable()
            && self.following.is_unavailable()
            && self.posts.is_unavailable()
            && self.emails.is_unavailable()
            && self.profile_url.is_unavailable()
            && self.hashtag.is_unavailable()
    }

    /// Label the record with the hashtag run that produced it.
    #[must_use]
    pub fn labeled(mut self, hashtag: &str) -> Self {
        self.hashtag = Field::Value(hashtag.to_string());
        self
    }

    /// Non-empty contact addresses, if any were found.
    #[must_use]
    pub fn email_list(&self) -> Vec<&str> {
        self.emails
            .as_value()
            .map(|joined| joined.split(',').filter(|e| !e.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProfileRecord {
        ProfileRecord {
            username: Field::Value("Jane Doe (@jane)".to_string()),
            followers: Field::Value(12_000.0),
            following: Field::Value(300.0),
            posts: Field::Value(42.0),
            emails: Field::Value("jane@site.co,press@site.co".to_string()),
            profile_url: Field::Value("https://www.instagram.com/jane/".to_string()),
            hashtag: Field::Unavailable,
        }
    }

    #[test]
    fn unavailable_record_has_every_field_unavailable() {
        let record = ProfileRecord::unavailable();
        assert!(record.is_unavailable());
        assert_eq!(record.followers.to_string(), UNAVAILABLE);
    }

    #[test]
    fn labeling_a_sentinel_only_fills_hashtag() {
        let record = ProfileRecord::unavailable().labeled("ad");
        assert_eq!(record.hashtag, Field::Value("ad".to_string()));
        assert!(record.username.is_unavailable());
        assert!(!record.is_unavailable());
    }

    #[test]
    fn email_list_splits_joined_addresses() {
        assert_eq!(sample().email_list(), vec!["jane@site.co", "press@site.co"]);
    }

    #[test]
    fn email_list_is_empty_for_blank_or_unavailable_emails() {
        let mut record = sample();
        record.emails = Field::Value(String::new());
        assert!(record.email_list().is_empty());
        assert!(ProfileRecord::unavailable().email_list().is_empty());
    }

    #[test]
    fn serializes_unavailable_fields_as_null_marker() {
        let json = serde_json::to_value(ProfileRecord::unavailable()).unwrap();
        assert_eq!(json["followers"], serde_json::json!("null"));
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["followers"], serde_json::json!(12_000.0));
    }
}
