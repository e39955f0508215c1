//! Arena-backed location tree.
//!
//! Nodes live in a flat `Vec` and point at their parent by index; children
//! are never stored, they are derived by scanning parent links. Depth is
//! computed once at construction so specificity queries are a comparison.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use shipquote_core::{LocationId, ShippingError, ShippingResult};

use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    location: Location,
    parent: Option<usize>,
    depth: u32,
}

/// Immutable snapshot of the location tree.
///
/// Invariants (checked by [`LocationHierarchy::new`]): ids are unique, every
/// parent exists, parent links are acyclic, and there is exactly one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Location>", into = "Vec<Location>")]
pub struct LocationHierarchy {
    nodes: Vec<Node>,
    index: HashMap<LocationId, usize>,
    root: usize,
}

impl LocationHierarchy {
    pub fn new<I>(locations: I) -> ShippingResult<Self>
    where
        I: IntoIterator<Item = Location>,
    {
        let locations: Vec<Location> = locations.into_iter().collect();

        let mut index = HashMap::with_capacity(locations.len());
        for (i, location) in locations.iter().enumerate() {
            if index.insert(location.id, i).is_some() {
                return Err(ShippingError::invalid_hierarchy(format!(
                    "duplicate location id {}",
                    location.id
                )));
            }
        }

        let mut parents = Vec::with_capacity(locations.len());
        for location in &locations {
            let parent = match location.parent {
                None => None,
                Some(parent_id) => Some(*index.get(&parent_id).ok_or_else(|| {
                    ShippingError::invalid_hierarchy(format!(
                        "location {} has unknown parent {}",
                        location.id, parent_id
                    ))
                })?),
            };
            parents.push(parent);
        }

        let roots: Vec<usize> = (0..locations.len()).filter(|&i| parents[i].is_none()).collect();
        let root = match roots.as_slice() {
            [root] => *root,
            [] => return Err(ShippingError::invalid_hierarchy("no root location")),
            _ => {
                return Err(ShippingError::invalid_hierarchy(format!(
                    "expected a single root location, found {}",
                    roots.len()
                )));
            }
        };

        let mut nodes = Vec::with_capacity(locations.len());
        for (i, location) in locations.into_iter().enumerate() {
            let depth = depth_of(i, &parents).ok_or_else(|| {
                ShippingError::invalid_hierarchy(format!(
                    "location {} is part of a parent cycle",
                    location.id
                ))
            })?;
            nodes.push(Node {
                location,
                parent: parents[i],
                depth,
            });
        }

        Ok(Self { nodes, index, root })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Location {
        &self.nodes[self.root].location
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.nodes.iter().map(|n| &n.location)
    }

    pub fn knows(&self, id: LocationId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: LocationId) -> ShippingResult<&Location> {
        Ok(&self.nodes[self.slot(id)?].location)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Location> {
        self.iter().find(|l| l.name == name)
    }

    /// Distance from the root (the root has depth 0).
    pub fn depth(&self, id: LocationId) -> ShippingResult<u32> {
        Ok(self.nodes[self.slot(id)?].depth)
    }

    pub fn children_of(&self, id: LocationId) -> ShippingResult<Vec<&Location>> {
        let slot = self.slot(id)?;
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.parent == Some(slot))
            .map(|n| &n.location)
            .collect())
    }

    /// True iff `candidate` is `ancestor` or lies beneath it.
    pub fn contains_location(
        &self,
        ancestor: LocationId,
        candidate: LocationId,
    ) -> ShippingResult<bool> {
        let ancestor = self.slot(ancestor)?;
        let mut current = self.slot(candidate)?;
        let target_depth = self.nodes[ancestor].depth;

        while self.nodes[current].depth > target_depth {
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => return Ok(false),
            }
        }
        Ok(current == ancestor)
    }

    /// Path from the root down to `id`, inclusive, least specific first.
    pub fn locations_containing(&self, id: LocationId) -> ShippingResult<Vec<&Location>> {
        let mut path = Vec::new();
        let mut current = Some(self.slot(id)?);
        while let Some(slot) = current {
            path.push(&self.nodes[slot].location);
            current = self.nodes[slot].parent;
        }
        path.reverse();
        Ok(path)
    }

    /// The deepest of `candidates` that contains `target`.
    ///
    /// Candidates at equal depth are resolved in favour of the one listed
    /// first. Fails with `NotFound` when no candidate contains `target`.
    pub fn most_specific_containing<I>(
        &self,
        candidates: I,
        target: LocationId,
    ) -> ShippingResult<LocationId>
    where
        I: IntoIterator<Item = LocationId>,
    {
        self.slot(target)?;

        let mut best: Option<(LocationId, u32)> = None;
        for candidate in candidates {
            if !self.contains_location(candidate, target)? {
                continue;
            }
            let depth = self.depth(candidate)?;
            if best.is_none_or(|(_, best_depth)| depth > best_depth) {
                best = Some((candidate, depth));
            }
        }

        best.map(|(id, _)| id).ok_or(ShippingError::NotFound(target))
    }

    fn slot(&self, id: LocationId) -> ShippingResult<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(ShippingError::UnknownLocation(id))
    }
}

/// Walk parent links up to the root; `None` if the walk never terminates.
fn depth_of(start: usize, parents: &[Option<usize>]) -> Option<u32> {
    let mut depth = 0u32;
    let mut current = start;
    while let Some(parent) = parents[current] {
        depth += 1;
        if depth as usize > parents.len() {
            return None;
        }
        current = parent;
    }
    Some(depth)
}

impl TryFrom<Vec<Location>> for LocationHierarchy {
    type Error = ShippingError;

    fn try_from(value: Vec<Location>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocationHierarchy> for Vec<Location> {
    fn from(value: LocationHierarchy) -> Self {
        value.nodes.into_iter().map(|n| n.location).collect()
    }
}
