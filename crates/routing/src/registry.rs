//! Pipeline name registry
//!
//! Interns destination names into `PipelineId`s while a routing table is
//! compiled. The same name always resolves to the same id.

use std::collections::HashMap;

use crate::PipelineId;
use crate::error::{Result, RoutingError};

/// Name → `PipelineId` mapping, ids assigned in first-seen order
#[derive(Debug, Clone, Default)]
pub struct PipelineRegistry {
    ids: HashMap<String, PipelineId>,
    names: Vec<String>,
}

impl PipelineRegistry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pipeline name, returning its id
    ///
    /// Registering an existing name returns the id it already has.
    pub fn register(&mut self, name: &str) -> Result<PipelineId> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }

        if self.names.len() >= PipelineId::MAX {
            return Err(RoutingError::TooManyPipelines {
                max: PipelineId::MAX,
            });
        }

        let id = PipelineId::new(self.names.len() as u16);
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        Ok(id)
    }

    /// Register every name in order, keeping duplicates out of the result
    pub fn register_all<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<PipelineId>> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let id = self.register(name.as_ref())?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Look up the id of a registered name
    #[inline]
    pub fn get(&self, name: &str) -> Option<PipelineId> {
        self.ids.get(name).copied()
    }

    /// Name of a registered id
    #[inline]
    pub fn name(&self, id: PipelineId) -> Option<&str> {
        self.names.get(id.as_usize()).map(String::as_str)
    }

    /// Registered names, indexed by `PipelineId`
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over `(id, name)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (PipelineId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (PipelineId::new(i as u16), name.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
