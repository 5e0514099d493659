use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Where the canonical mapping lives: one file on one branch of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSource {
    pub repository_url: String,
    pub file_path: String,
    pub branch: String,
}

/// Article identifier as it appears in the remote document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Text(text) => f.write_str(text),
            Identifier::Number(number) => write!(f, "{}", number),
        }
    }
}

/// Parsed remote document. Only `files` is consumed; every other field is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteMapping {
    /// Source path -> identifier, kept in document order.
    #[serde(default, deserialize_with = "ordered_files")]
    files: Vec<(String, Identifier)>,
}

/// Reads the `files` object into pairs without losing document order. A key
/// repeated in the object keeps its first position and its last value.
fn ordered_files<'de, D>(deserializer: D) -> Result<Vec<(String, Identifier)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FilesVisitor;

    impl<'de> Visitor<'de> for FilesVisitor {
        type Value = Vec<(String, Identifier)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object mapping source paths to article ids")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut files: Vec<(String, Identifier)> =
                Vec::with_capacity(map.size_hint().unwrap_or(0));
            let mut positions: HashMap<String, usize> = HashMap::new();

            while let Some((path, identifier)) = map.next_entry::<String, Identifier>()? {
                match positions.get(&path) {
                    Some(&index) => files[index].1 = identifier,
                    None => {
                        positions.insert(path.clone(), files.len());
                        files.push((path, identifier));
                    }
                }
            }
            Ok(files)
        }
    }

    deserializer.deserialize_map(FilesVisitor)
}

impl RemoteMapping {
    pub fn from_slice(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// (path, identifier) pairs in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Identifier)> + '_ {
        self.files
            .iter()
            .map(|(path, identifier)| (path.as_str(), identifier))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub identifier: String,
    pub path: String,
}

impl LinkEntry {
    /// `  '<identifier>': '<path>'`
    pub fn render(&self) -> String {
        format!(
            "  '{}': '{}'",
            escape_single_quoted(&self.identifier),
            escape_single_quoted(&self.path)
        )
    }
}

fn escape_single_quoted(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Rendered map entries, sorted by identifier, one per line, no braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBlock {
    entries: Vec<LinkEntry>,
    text: String,
}

impl GeneratedBlock {
    pub fn new(entries: Vec<LinkEntry>) -> Self {
        let text = entries
            .iter()
            .map(LinkEntry::render)
            .collect::<Vec<_>>()
            .join(",\n");
        Self { entries, text }
    }

    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for GeneratedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Outcome of writing the generated block into the target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub target: String,
    pub entries: usize,
    pub changed: bool,
    pub written: bool,
}
