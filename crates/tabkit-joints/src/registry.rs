//! Face-local registry of named tab definitions.
//!
//! A face records the exact parameters of every named toothed edge it
//! draws. The derived views are computed eagerly at registration time: the
//! `fit` view (reversed and inverted, ready for the adjoining face's mating
//! edge) and the pattern-only view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tabkit_core::pattern::TabsPattern;

use crate::interlock::TabsOptions;

/// The exact parameters of one toothed edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabsDef {
    pub pattern: TabsPattern,
    pub options: TabsOptions,
}

impl TabsDef {
    pub fn new(pattern: TabsPattern, options: TabsOptions) -> Self {
        Self { pattern, options }
    }

    /// The definition an adjoining face draws to mate with this edge:
    /// the pattern reversed (the other face travels the edge the opposite
    /// way) and inverted (its teeth fill these gaps).
    pub fn fit(&self) -> TabsDef {
        TabsDef {
            pattern: TabsPattern::from_pattern(self.pattern.pattern().reverse().invert()),
            options: self.options.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NamedTab {
    def: TabsDef,
    fit: TabsDef,
}

/// Named tab definitions of one face.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabRegistry {
    entries: BTreeMap<String, NamedTab>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition; the fit view is derived immediately.
    /// Re-registering a name replaces the previous definition.
    pub fn insert(&mut self, name: impl Into<String>, def: TabsDef) {
        let name = name.into();
        let fit = def.fit();
        if self
            .entries
            .insert(name.clone(), NamedTab { def, fit })
            .is_some()
        {
            debug!("replaced tab definition '{}'", name);
        }
    }

    /// The raw definition as drawn.
    pub fn def(&self, name: &str) -> Option<&TabsDef> {
        self.entries.get(name).map(|entry| &entry.def)
    }

    /// The reversed + inverted definition for the adjoining face.
    pub fn fit(&self, name: &str) -> Option<&TabsDef> {
        self.entries.get(name).map(|entry| &entry.fit)
    }

    /// Just the pattern of a definition.
    pub fn pattern(&self, name: &str) -> Option<&TabsPattern> {
        self.def(name).map(|def| &def.pattern)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
