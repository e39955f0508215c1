//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Reference data records (locations, methods, groups, shipping
/// configurations) are entities: two records with the same id are the same
/// record even when loaded from different snapshots.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Identifiers of `entities`, in order.
pub fn ids<'a, E, I>(entities: I) -> Vec<E::Id>
where
    E: Entity + 'a,
    I: IntoIterator<Item = &'a E>,
{
    entities.into_iter().map(|e| e.id()).collect()
}
