//! Interval alarms keyed by elapsed-seconds value.

use crate::config::{MSG_DUPLICATE_ALARM, MSG_ZERO_ALARM};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle for an alarm; survives reordering and removal of others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlarmId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: AlarmId,
    pub target_seconds: u32,
    #[serde(default)]
    pub triggered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmError {
    ZeroTarget,
    Duplicate(u32),
    UnknownId(AlarmId),
}

impl fmt::Display for AlarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmError::ZeroTarget => write!(f, "Alarm time must be greater than zero"),
            AlarmError::Duplicate(secs) => write!(f, "An alarm at {}s already exists", secs),
            AlarmError::UnknownId(id) => write!(f, "No alarm with id {}", id.0),
        }
    }
}

impl std::error::Error for AlarmError {}

impl AlarmError {
    /// Message for a blocking prompt, if the user needs to be told.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            AlarmError::ZeroTarget => Some(MSG_ZERO_ALARM),
            AlarmError::Duplicate(_) => Some(MSG_DUPLICATE_ALARM),
            AlarmError::UnknownId(_) => None,
        }
    }
}

/// Ordered set of alarms, ascending by target and unique per target.
#[derive(Debug, Clone, Default)]
pub struct AlarmRegistry {
    alarms: Vec<Alarm>,
    next_id: u32,
}

impl AlarmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted alarms. Zero targets, duplicate targets and
    /// duplicate ids are dropped.
    pub fn from_alarms(alarms: Vec<Alarm>) -> Self {
        let mut registry = Self::new();
        for alarm in alarms {
            if alarm.target_seconds == 0 || registry.get(alarm.id).is_some() {
                continue;
            }
            if let Err(pos) = registry.position(alarm.target_seconds) {
                registry.next_id = registry.next_id.max(alarm.id.0.wrapping_add(1));
                registry.alarms.insert(pos, alarm);
            }
        }
        registry
    }

    fn position(&self, target_seconds: u32) -> Result<usize, usize> {
        self.alarms
            .binary_search_by_key(&target_seconds, |a| a.target_seconds)
    }

    pub fn add(&mut self, target_seconds: u32) -> Result<AlarmId, AlarmError> {
        if target_seconds == 0 {
            return Err(AlarmError::ZeroTarget);
        }
        let pos = match self.position(target_seconds) {
            Ok(_) => return Err(AlarmError::Duplicate(target_seconds)),
            Err(pos) => pos,
        };

        let id = AlarmId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.alarms.insert(
            pos,
            Alarm {
                id,
                target_seconds,
                triggered: false,
            },
        );
        debug!("Alarm {} added at {}s", id.0, target_seconds);
        Ok(id)
    }

    pub fn remove(&mut self, id: AlarmId) -> Result<Alarm, AlarmError> {
        let idx = self
            .alarms
            .iter()
            .position(|a| a.id == id)
            .ok_or(AlarmError::UnknownId(id))?;
        Ok(self.alarms.remove(idx))
    }

    /// Mark every pending alarm whose target equals `current_elapsed`.
    ///
    /// Matching is by equality so an alarm only fires on the exact tick it is
    /// crossed. Returns the alarms that fired on this call.
    pub fn check_and_trigger(&mut self, current_elapsed: u32) -> Vec<Alarm> {
        let mut reached = Vec::new();
        for alarm in self
            .alarms
            .iter_mut()
            .filter(|a| !a.triggered && a.target_seconds == current_elapsed)
        {
            alarm.triggered = true;
            info!("Alarm {} reached at {}s", alarm.id.0, alarm.target_seconds);
            reached.push(alarm.clone());
        }
        reached
    }

    pub fn clear_triggered(&mut self) {
        for alarm in &mut self.alarms {
            alarm.triggered = false;
        }
    }

    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter()
    }

    pub fn as_slice(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(registry: &AlarmRegistry) -> Vec<u32> {
        registry.iter().map(|a| a.target_seconds).collect()
    }

    fn stored(id: u32, target_seconds: u32, triggered: bool) -> Alarm {
        Alarm {
            id: AlarmId(id),
            target_seconds,
            triggered,
        }
    }

    #[test]
    fn add_keeps_ascending_order() {
        let mut registry = AlarmRegistry::new();
        for t in [300, 60, 3_600, 90] {
            registry.add(t).unwrap();
        }
        assert_eq!(targets(&registry), vec![60, 90, 300, 3_600]);
    }

    #[test]
    fn zero_and_duplicate_targets_are_rejected() {
        let mut registry = AlarmRegistry::new();
        registry.add(45).unwrap();
        assert_eq!(registry.add(0), Err(AlarmError::ZeroTarget));
        assert_eq!(registry.add(45), Err(AlarmError::Duplicate(45)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ids_stay_stable_across_removal() {
        let mut registry = AlarmRegistry::new();
        let a = registry.add(10).unwrap();
        let b = registry.add(5).unwrap();
        let c = registry.add(20).unwrap();

        let removed = registry.remove(a).unwrap();
        assert_eq!(removed.target_seconds, 10);
        assert_eq!(registry.get(b).unwrap().target_seconds, 5);
        assert_eq!(registry.get(c).unwrap().target_seconds, 20);
        assert_eq!(registry.remove(a), Err(AlarmError::UnknownId(a)));

        // Ids are never reused.
        let d = registry.add(10).unwrap();
        assert_ne!(d, a);
    }

    #[test]
    fn triggers_only_on_exact_match_and_once() {
        let mut registry = AlarmRegistry::new();
        let id = registry.add(5).unwrap();

        assert!(registry.check_and_trigger(6).is_empty());
        assert!(registry.check_and_trigger(4).is_empty());

        let fired = registry.check_and_trigger(5);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert!(registry.get(id).unwrap().triggered);

        assert!(registry.check_and_trigger(5).is_empty());
    }

    #[test]
    fn clear_triggered_rearms_alarms() {
        let mut registry = AlarmRegistry::new();
        registry.add(3).unwrap();
        registry.check_and_trigger(3);
        registry.clear_triggered();
        assert!(registry.iter().all(|a| !a.triggered));
        assert_eq!(registry.check_and_trigger(3).len(), 1);
    }

    #[test]
    fn from_alarms_sorts_dedups_and_continues_ids() {
        let saved = vec![
            stored(4, 30, false),
            stored(1, 10, true),
            stored(7, 30, false),
            stored(2, 0, false),
        ];
        let mut registry = AlarmRegistry::from_alarms(saved);
        assert_eq!(targets(&registry), vec![10, 30]);
        let next = registry.add(50).unwrap();
        assert_eq!(next, AlarmId(5));
    }

    #[test]
    fn from_alarms_keeps_ids_unique() {
        let mut registry =
            AlarmRegistry::from_alarms(vec![stored(3, 10, false), stored(3, 20, false)]);
        assert_eq!(targets(&registry), vec![10]);

        let removed = registry.remove(AlarmId(3)).unwrap();
        assert_eq!(removed.target_seconds, 10);
        assert!(registry.is_empty());
    }
}
