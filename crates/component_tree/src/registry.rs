use std::path::PathBuf;

use ahash::AHashMap;

use crate::parse::{FileExtraction, RouteDeclaration};

/// What is known about one component, from the file that declared it last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord {
    pub name: String,
    pub defined_in: PathBuf,
    /// Components rendered anywhere in the defining file
    pub uses: Vec<String>,
    /// Routes declared in the defining file, excluding routes back to this component
    pub routes: Vec<RouteDeclaration>,
    pub props: Vec<String>,
}

/// Name-keyed index of every component found in a scan.
///
/// A name declared in more than one file keeps the record of the file
/// applied last.
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
    records: AHashMap<String, ComponentRecord>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from per-file results, applied in the order given
    pub fn from_extractions<'a>(extractions: impl IntoIterator<Item = &'a FileExtraction>) -> Self {
        let mut registry = Self::new();
        for extraction in extractions {
            registry.insert_file(extraction);
        }
        registry
    }

    pub fn insert_file(&mut self, extraction: &FileExtraction) {
        for component in extraction.components.iter() {
            let routes = extraction
                .routes
                .iter()
                .filter(|route| route.component != component.name)
                .cloned()
                .collect();
            let record = ComponentRecord {
                name: component.name.clone(),
                defined_in: component.defined_in.clone(),
                uses: extraction.used_components.clone(),
                routes,
                props: component.props.clone(),
            };
            if let Some(previous) = self.records.insert(component.name.clone(), record) {
                tracing::debug!(
                    "{} redeclared in {}, replacing the record from {}",
                    component.name,
                    component.defined_in.display(),
                    previous.defined_in.display()
                );
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ComponentRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.records.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}
