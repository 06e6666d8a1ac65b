// src/dispatch/shadow.rs
//! Per-entity shadow state
//!
//! Fixed-size slot tables, one per entity kind, holding opaque script
//! values. Only the dispatch thread touches them. A slot's value must be
//! gone before a new occupant of that slot becomes observable.

use crate::dispatch::value::Value;
use crate::engine::types::EntityKind;
use crate::utils::config::EntityLimits;
use crate::utils::errors::{EngineError, Result};

/// Shadow tables for every entity kind
#[derive(Debug, Clone)]
pub struct ShadowState {
    tables: Vec<Vec<Option<Value>>>,
}

impl ShadowState {
    pub fn new(limits: EntityLimits) -> Self {
        let tables = EntityKind::ALL
            .iter()
            .map(|kind| vec![None; limits.capacity(*kind)])
            .collect();
        Self { tables }
    }

    pub fn capacity(&self, kind: EntityKind) -> usize {
        self.tables[kind.index()].len()
    }

    pub fn get(&self, kind: EntityKind, slot: usize) -> Option<&Value> {
        self.tables[kind.index()].get(slot)?.as_ref()
    }

    pub fn get_mut(&mut self, kind: EntityKind, slot: usize) -> Option<&mut Value> {
        self.tables[kind.index()].get_mut(slot)?.as_mut()
    }

    /// Store a value, returning the previous one
    pub fn set(&mut self, kind: EntityKind, slot: usize, value: Value) -> Result<Option<Value>> {
        let entry = self.entry(kind, slot)?;
        Ok(entry.replace(value))
    }

    /// The slot's value, created empty-table on first access
    pub fn data(&mut self, kind: EntityKind, slot: usize) -> Result<&mut Value> {
        let entry = self.entry(kind, slot)?;
        Ok(entry.get_or_insert_with(|| Value::Table(Default::default())))
    }

    /// Discard the slot's value; out-of-range slots are ignored
    pub fn clear(&mut self, kind: EntityKind, slot: usize) -> Option<Value> {
        self.tables[kind.index()].get_mut(slot)?.take()
    }

    /// Discard every value of one kind
    pub fn clear_kind(&mut self, kind: EntityKind) {
        self.tables[kind.index()].iter_mut().for_each(|entry| *entry = None);
    }

    pub fn clear_all(&mut self) {
        for table in &mut self.tables {
            table.iter_mut().for_each(|entry| *entry = None);
        }
    }

    /// Number of populated slots for a kind
    pub fn occupied(&self, kind: EntityKind) -> usize {
        self.tables[kind.index()].iter().filter(|e| e.is_some()).count()
    }

    fn entry(&mut self, kind: EntityKind, slot: usize) -> Result<&mut Option<Value>> {
        let table = &mut self.tables[kind.index()];
        let capacity = table.len();
        table
            .get_mut(slot)
            .ok_or(EngineError::SlotOutOfRange {
                kind,
                slot,
                capacity,
            })
    }
}
