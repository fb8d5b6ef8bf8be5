//! Front matter parsing
//!
//! A document is a metadata block followed by free-form body text:
//! ```plain
//! ---
//! title: Eating for better sleep
//! tags: [diet, sleep]
//! ---
//! The body starts here and is kept verbatim.
//! ```
//! A `---` fence holds YAML, a `+++` fence holds TOML.

use std::collections::BTreeMap;

use serde_json::Value;

/// Loosely typed metadata, exactly as authored
pub type Metadata = BTreeMap<String, Value>;

const YAML_FENCE: &str = "---";
const TOML_FENCE: &str = "+++";

/// A document split into its metadata block and body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    metadata: Metadata,
    body: String,
}

/// Errors raised when a metadata block is present but cannot be read
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The opening fence has no closing counterpart
    #[error("Front matter opened with `{0}` is never closed")]
    Unterminated(&'static str),
    /// YAML parse error
    #[error("YAML front matter error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// TOML parse error
    #[error("TOML front matter error: {0}")]
    Toml(#[from] toml::de::Error),
    /// The block parsed, but to a scalar or a list instead of key/value pairs
    #[error("Front matter must be a table of key/value pairs")]
    NotATable,
}

impl Document {
    /// Create a document from already separated parts
    #[must_use]
    pub const fn new(metadata: Metadata, body: String) -> Self {
        Self { metadata, body }
    }

    /// Get the metadata mapping
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Get the body text
    #[must_use]
    pub const fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Consume the document and return its parts
    #[must_use]
    pub fn into_parts(self) -> (Metadata, String) {
        (self.metadata, self.body)
    }
}

/// Split `raw` into metadata and body.
///
/// Text without a front matter fence on its first line is accepted as a body with
/// empty metadata.
///
/// # Errors
/// Returns `ParseError` if a fence is opened but the block is unterminated, fails to parse,
/// or is not a key/value table.
pub fn parse(raw: &str) -> Result<Document, ParseError> {
    let input = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some((fence, rest)) = open_fence(input) else {
        return Ok(Document::new(Metadata::new(), input.to_owned()));
    };

    let (block, body) = split_block(rest, fence).ok_or(ParseError::Unterminated(fence))?;

    let metadata = if block.trim().is_empty() {
        Metadata::new()
    } else if fence == YAML_FENCE {
        parse_yaml(block)?
    } else {
        parse_toml(block)?
    };

    Ok(Document::new(metadata, body.to_owned()))
}

fn open_fence(input: &str) -> Option<(&'static str, &str)> {
    let (first, rest) = split_line(input);
    let first = first.trim_end();
    [YAML_FENCE, TOML_FENCE]
        .into_iter()
        .find(|fence| first == *fence)
        .map(|fence| (fence, rest))
}

// (line without its terminator, everything after the terminator)
fn split_line(input: &str) -> (&str, &str) {
    input.find('\n').map_or((input, ""), |index| {
        (input[..index].trim_end_matches('\r'), &input[index + 1..])
    })
}

fn split_block<'a>(input: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let mut rest = input;
    while !rest.is_empty() {
        let start = input.len() - rest.len();
        let (line, remainder) = split_line(rest);
        if line.trim_end() == fence {
            return Some((&input[..start], remainder));
        }
        rest = remainder;
    }
    None
}

fn parse_yaml(block: &str) -> Result<Metadata, ParseError> {
    match serde_yaml::from_str::<Value>(block)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Null => Ok(Metadata::new()),
        _ => Err(ParseError::NotATable),
    }
}

fn parse_toml(block: &str) -> Result<Metadata, ParseError> {
    let table: toml::Table = toml::from_str(block)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect())
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(number) => Value::from(number),
        toml::Value::Float(number) => Value::from(number),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
