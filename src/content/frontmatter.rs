//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};

use super::ContentError;

/// Custom deserializer that accepts any YAML scalar and keeps it as text,
/// so `title: 2024` or `ogImage: true` do not break the whole note
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarAsString;

    impl<'de> Visitor<'de> for ScalarAsString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScalarAsString)
}

/// Recognized front-matter keys of a note. Every field is optional;
/// anything else in the block is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_as_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub canonical: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub og_url: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub og_title: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub og_description: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub og_image: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub og_sitename: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub twitter_handle: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub twitter_site: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub twitter_card_type: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Content without a leading `---` block yields the default front-matter
    /// and the content untouched. A block that is not a YAML mapping is an
    /// error, so the caller can decide how to degrade.
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some(rest) = content.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content));
        };

        // The opening fence must sit alone on its line
        let Some(rest) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) else {
            return Ok((FrontMatter::default(), content));
        };

        let Some((yaml_content, remaining)) = split_closing_fence(rest) else {
            // No closing ---, treat as no front-matter
            return Ok((FrontMatter::default(), content));
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
        Ok((fm, remaining))
    }
}

/// Find the closing `---` line, returning (yaml, body)
fn split_closing_fence(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
