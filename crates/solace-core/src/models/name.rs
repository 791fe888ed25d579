use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Rendered when a name carries no usable parts.
pub const UNNAMED: &str = "Unnamed client";

/// A client's name in any of the shapes the dashboard and the data store use.
///
/// Inbound JSON may be a bare string, a list of name parts, or a structured
/// object. `prefix` and `given` accept a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ClientName {
    Plain(String),
    Parts(Vec<String>),
    Structured {
        #[serde(default, deserialize_with = "one_or_many")]
        prefix: Vec<String>,
        #[serde(default, deserialize_with = "one_or_many")]
        given: Vec<String>,
        #[serde(default)]
        family: Option<String>,
    },
}

impl ClientName {
    /// Normalize to a single display string.
    ///
    /// Parts are trimmed and joined with single spaces; empty parts are
    /// skipped. Never returns an empty string.
    pub fn display_name(&self) -> String {
        let joined = match self {
            ClientName::Plain(name) => join_parts([name.as_str()]),
            ClientName::Parts(parts) => join_parts(parts.iter().map(String::as_str)),
            ClientName::Structured {
                prefix,
                given,
                family,
            } => join_parts(
                prefix
                    .iter()
                    .chain(given)
                    .map(String::as_str)
                    .chain(family.as_deref()),
            ),
        };

        if joined.is_empty() {
            UNNAMED.to_string()
        } else {
            joined
        }
    }
}

impl From<&str> for ClientName {
    fn from(name: &str) -> Self {
        ClientName::Plain(name.to_string())
    }
}

fn join_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deserialize a field that may hold one string or a list of strings.
/// `null` yields an empty list.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(part)) => vec![part],
        Some(OneOrMany::Many(parts)) => parts,
        None => Vec::new(),
    })
}
