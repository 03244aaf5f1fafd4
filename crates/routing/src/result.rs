//! Per-request routing result

use crate::PipelineId;
use crate::signal::RoutableSignal;

/// Destinations and the data each receives for one request
///
/// Entries are kept in first-assignment order. Data assigned to the same
/// pipeline more than once is appended in assignment order. Empty payloads
/// are never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingResult<T> {
    entries: Vec<(PipelineId, T)>,
}

impl<T> Default for RoutingResult<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: RoutableSignal> RoutingResult<T> {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a payload to every pipeline in `pipelines`
    ///
    /// Repeated ids receive the payload once. The payload is cloned for all
    /// but the last destination.
    pub fn assign(&mut self, pipelines: &[PipelineId], data: T) {
        if data.is_empty() {
            return;
        }

        let Some((&last, rest)) = pipelines.split_last() else {
            return;
        };

        for (i, &id) in rest.iter().enumerate() {
            if !rest[..i].contains(&id) && id != last {
                self.push(id, data.clone());
            }
        }
        self.push(last, data);
    }

    fn push(&mut self, id: PipelineId, data: T) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing)) => existing.append(data),
            None => self.entries.push((id, data)),
        }
    }

    /// Data assigned to a pipeline
    pub fn get(&self, id: PipelineId) -> Option<&T> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, data)| data)
    }

    /// Pipelines in first-assignment order
    pub fn pipelines(&self) -> impl Iterator<Item = PipelineId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PipelineId, &T)> {
        self.entries.iter().map(|(id, data)| (*id, data))
    }

    /// Total leaf records across every destination
    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, data)| data.record_count()).sum()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> IntoIterator for RoutingResult<T> {
    type Item = (PipelineId, T);
    type IntoIter = std::vec::IntoIter<(PipelineId, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigroute_protocol::{
        Attributes, LogRecord, Logs, Resource, ResourceLogs, ScopeLogs, Telemetry,
    };

    fn logs(body: &str) -> Logs {
        Logs::new().with(ResourceLogs::new(
            Resource::default(),
            vec![ScopeLogs::new(
                Default::default(),
                vec![LogRecord::new(body, Attributes::new())],
            )],
        ))
    }

    fn id(n: u16) -> PipelineId {
        PipelineId::new(n)
    }

    #[test]
    fn test_assign_to_many() {
        let mut result = RoutingResult::new();
        result.assign(&[id(0), id(1)], logs("a"));

        assert_eq!(result.len(), 2);
        assert_eq!(result.get(id(0)), Some(&logs("a")));
        assert_eq!(result.get(id(1)), Some(&logs("a")));
        assert_eq!(result.record_count(), 2);
    }

    #[test]
    fn test_empty_payload_is_skipped() {
        let mut result = RoutingResult::new();
        result.assign(&[id(0)], Logs::new());
        result.assign(&[], logs("a"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_repeated_ids_receive_once() {
        let mut result = RoutingResult::new();
        result.assign(&[id(1), id(0), id(1), id(0)], logs("a"));

        assert_eq!(result.pipelines().collect::<Vec<_>>(), vec![id(1), id(0)]);
        assert_eq!(result.get(id(0)).map(Telemetry::record_count), Some(1));
        assert_eq!(result.get(id(1)).map(Telemetry::record_count), Some(1));
    }

    #[test]
    fn test_later_assignments_append_in_order() {
        let mut result = RoutingResult::new();
        result.assign(&[id(0)], logs("first"));
        result.assign(&[id(1)], logs("other"));
        result.assign(&[id(0)], logs("second"));

        assert_eq!(result.pipelines().collect::<Vec<_>>(), vec![id(0), id(1)]);

        let bodies: Vec<_> = result
            .get(id(0))
            .unwrap()
            .resource_logs
            .iter()
            .flat_map(|rl| &rl.scope_logs)
            .flat_map(|sl| &sl.log_records)
            .map(|r| r.body.as_str())
            .collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }

    #[test]
    fn test_into_iter_moves_entries() {
        let mut result = RoutingResult::new();
        result.assign(&[id(3)], logs("a"));

        let entries: Vec<_> = result.into_iter().collect();
        assert_eq!(entries, vec![(id(3), logs("a"))]);
    }
}
