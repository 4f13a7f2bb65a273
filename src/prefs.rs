//! Last-used parameter values keyed by tool name.
//!
//! Failures to read or write the backing file are non-fatal: they are logged
//! and the caller falls back to the built-in defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "preferences")]
struct PrefFile {
    #[serde(rename = "tool", default)]
    tools: Vec<SavedTool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedTool {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "value", default)]
    values: Vec<String>,
}

#[derive(Debug, Default)]
pub struct PrefStore {
    path: Option<PathBuf>,
    tools: BTreeMap<String, Vec<String>>,
}

impl PrefStore {
    /// A store that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store from an XML file. A missing or unreadable file gives an
    /// empty store bound to that path.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tools = match std::fs::read_to_string(&path) {
            Ok(xml) => match Self::parse(&xml) {
                Ok(tools) => tools,
                Err(err) => {
                    log::warn!("ignoring malformed preference file {}: {err}", path.display());
                    BTreeMap::new()
                }
            },
            Err(err) => {
                log::debug!("no preference file at {}: {err}", path.display());
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path),
            tools,
        }
    }

    fn parse(xml: &str) -> Result<BTreeMap<String, Vec<String>>, quick_xml::DeError> {
        let file: PrefFile = quick_xml::de::from_str(xml)?;
        Ok(file
            .tools
            .into_iter()
            .map(|tool| (tool.name, tool.values))
            .collect())
    }

    fn to_xml(&self) -> Result<String, quick_xml::DeError> {
        let file = PrefFile {
            tools: self
                .tools
                .iter()
                .map(|(name, values)| SavedTool {
                    name: name.clone(),
                    values: values.clone(),
                })
                .collect(),
        };
        quick_xml::se::to_string(&file)
    }

    /// Last-used values for a tool, or the supplied defaults when nothing was
    /// stored or the stored shape no longer matches the prompt list.
    #[must_use]
    pub fn read_defaults(&self, tool: &str, defaults: &[String]) -> Vec<String> {
        match self.tools.get(tool) {
            Some(values) if values.len() == defaults.len() => values.clone(),
            Some(_) | None => defaults.to_vec(),
        }
    }

    /// Remember a tool's values and persist if the store is file-backed.
    /// Double-quote characters are stripped before saving; an inch suffix
    /// would otherwise corrupt the round-trip.
    pub fn write_values(&mut self, tool: &str, values: &[String]) {
        let cleaned: Vec<String> = values.iter().map(|v| v.replace('"', "")).collect();
        self.tools.insert(tool.to_owned(), cleaned);
        self.persist();
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let xml = match self.to_xml() {
            Ok(xml) => xml,
            Err(err) => {
                log::warn!("could not serialize preferences: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(path, xml) {
            log::warn!("could not write preferences to {}: {err}", path.display());
        }
    }
}
