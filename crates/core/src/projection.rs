// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized read cache of server entities.
//!
//! A [`Projection`] keeps entities in a `byId` map plus an `allIds` order
//! list. A pull replaces the whole set ("last pull wins", no incremental
//! merge); a locally known change is upserted one entity at a time.
//!
//! Invariant: `all_ids` holds exactly the keys of `by_id`, without
//! duplicates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entity that can live in a [`Projection`].
pub trait Entity: Clone {
    /// Stable identifier, unique within a projection.
    fn entity_id(&self) -> &str;

    /// Merges a newer version of the same entity onto this one.
    fn merge(&mut self, patch: Self);
}

/// In-memory `byId`/`allIds` view of remote entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection<E> {
    by_id: HashMap<String, E>,
    all_ids: Vec<String>,
    last_sync: Option<DateTime<Utc>>,
}

impl<E> Default for Projection<E> {
    fn default() -> Self {
        Projection {
            by_id: HashMap::new(),
            all_ids: Vec::new(),
            last_sync: None,
        }
    }
}

impl<E: Entity> Projection<E> {
    /// Creates an empty projection that has never been synced.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every entity with `entities`, in the given order.
    ///
    /// Entities absent from `entities` are evicted. If the list repeats an
    /// id, the id keeps its first position and the later record wins.
    pub fn replace_all(&mut self, entities: Vec<E>, now: DateTime<Utc>) {
        let mut by_id = HashMap::with_capacity(entities.len());
        let mut all_ids = Vec::with_capacity(entities.len());
        for entity in entities {
            let id = entity.entity_id().to_string();
            if by_id.insert(id.clone(), entity).is_none() {
                all_ids.push(id);
            }
        }
        self.by_id = by_id;
        self.all_ids = all_ids;
        self.last_sync = Some(now);
    }

    /// Merges a single entity, appending its id only when it is new.
    pub fn upsert(&mut self, entity: E) {
        let id = entity.entity_id().to_string();
        match self.by_id.get_mut(&id) {
            Some(existing) => existing.merge(entity),
            None => {
                self.by_id.insert(id.clone(), entity);
                self.all_ids.push(id);
            }
        }
    }

    /// Looks up an entity. Never fails; absent ids yield `None`.
    pub fn get(&self, id: &str) -> Option<&E> {
        self.by_id.get(id)
    }

    /// Identifiers in projection order.
    pub fn ids(&self) -> &[String] {
        &self.all_ids
    }

    /// Entities in projection order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.all_ids.iter().filter_map(|id| self.by_id.get(id))
    }

    /// Time of the last successful full replacement.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    pub fn len(&self) -> usize {
        self.all_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_ids.is_empty()
    }

    /// Returns true if `by_id` and `all_ids` agree (same keys, no duplicates).
    pub fn is_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.all_ids.len());
        self.all_ids.len() == self.by_id.len()
            && self
                .all_ids
                .iter()
                .all(|id| self.by_id.contains_key(id) && seen.insert(id))
    }
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
