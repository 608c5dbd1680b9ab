//! CF standard name descriptions.
//!
//! Built once from the CF standard name table XML
//! (<https://cfconventions.org/Data/cf-standard-names/current/src/cf-standard-name-table.xml>)
//! and shared read-only by every record built afterwards.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::error::{Result, UmmVarError};

/// Standard name → description lookup.
#[derive(Debug, Clone, Default)]
pub struct VocabularyTable {
    descriptions: HashMap<String, String>,
}

impl VocabularyTable {
    /// An empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from `(term, description)` pairs.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            descriptions: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load the standard name table from a local XML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let xml = std::fs::read_to_string(path.as_ref())?;
        let table = Self::from_xml(&xml)?;
        debug!(
            path = %path.as_ref().display(),
            terms = table.len(),
            "Loaded CF standard name table"
        );
        Ok(table)
    }

    /// Parse the CF standard name table XML.
    ///
    /// Every `<entry id="...">` contributes its `<description>` text.
    /// Entries with an empty description and `<alias>` elements are skipped.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut descriptions = HashMap::new();
        let mut buf = Vec::new();
        let mut entry: Option<String> = None;
        let mut in_description = false;
        let mut text = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"entry" => {
                        entry = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"id")
                            .map(|a| String::from_utf8_lossy(&a.value).into_owned());
                    }
                    b"description" if entry.is_some() => {
                        in_description = true;
                        text.clear();
                    }
                    _ => {}
                },
                Ok(Event::Text(t)) if in_description => {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| UmmVarError::Vocabulary(e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Ok(Event::CData(c)) if in_description => {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"description" if in_description => {
                        in_description = false;
                        if let Some(id) = &entry {
                            if !text.is_empty() {
                                descriptions.insert(id.clone(), text.clone());
                            }
                        }
                    }
                    b"entry" => entry = None,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(UmmVarError::Vocabulary(format!(
                        "XML parsing error at position {}: {:?}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { descriptions })
    }

    /// Description of a standard name, if the table has one.
    pub fn description(&self, term: &str) -> Option<&str> {
        self.descriptions.get(term).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}
