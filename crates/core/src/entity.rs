//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Catalog and sales views join records by identity, so anything that can be
/// looked up by id implements this.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// First entity in `items` with the given id.
pub fn find_by_id<E: Entity>(items: &[E], id: E::Id) -> Option<&E> {
    items.iter().find(|item| item.id() == id)
}

/// Mutable variant of [`find_by_id`].
pub fn find_by_id_mut<E: Entity>(items: &mut [E], id: E::Id) -> Option<&mut E> {
    items.iter_mut().find(|item| item.id() == id)
}
