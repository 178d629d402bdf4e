//! Candidate and module types

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Where a candidate name was found on its page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    Title,
    /// Heading level 1, 2 or 3
    Heading(u8),
    /// Position in the breadcrumb trail
    Breadcrumb(usize),
}

impl CandidateSource {
    /// Lower ranks win when a cluster picks its representative
    pub fn priority(&self) -> u8 {
        match self {
            CandidateSource::Title => 0,
            CandidateSource::Heading(level) => *level,
            CandidateSource::Breadcrumb(_) => 99,
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::Title => write!(f, "title"),
            CandidateSource::Heading(level) => write!(f, "heading_h{}", level),
            CandidateSource::Breadcrumb(index) => write!(f, "breadcrumb_{}", index),
        }
    }
}

/// A name that might denote a module, with the text it came with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCandidate {
    pub name: String,
    pub source: CandidateSource,
    pub content: String,
    pub url: String,
}

/// Submodule name to description, in insertion order
///
/// Serializes as a JSON object whose keys keep insertion order. Inserting an
/// existing name replaces its description in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submodules(Vec<(String, String)>);

impl Submodules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, description: impl Into<String>) {
        let name = name.into();
        let description = description.into();

        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = description,
            None => self.0.push((name, description)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, description)| description.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, d)| (n.as_str(), d.as_str()))
    }
}

impl FromIterator<(String, String)> for Submodules {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut submodules = Submodules::new();
        for (name, description) in iter {
            submodules.insert(name, description);
        }
        submodules
    }
}

impl Serialize for Submodules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, description) in &self.0 {
            map.serialize_entry(name, description)?;
        }
        map.end()
    }
}

struct SubmodulesVisitor;

impl<'de> Visitor<'de> for SubmodulesVisitor {
    type Value = Submodules;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of submodule names to descriptions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut submodules = Submodules::new();
        while let Some((name, description)) = access.next_entry::<String, String>()? {
            submodules.insert(name, description);
        }
        Ok(submodules)
    }
}

impl<'de> Deserialize<'de> for Submodules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SubmodulesVisitor)
    }
}

/// A module found in the documentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub description: String,
    pub submodules: Submodules,
    /// Heuristic confidence in [0.5, 1.0]
    pub confidence_score: f64,
    /// Pages the module's representative came from
    #[serde(default)]
    pub source_urls: Vec<String>,
}
