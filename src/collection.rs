//! Aggregating successive page loads into one ordered collection.

use indexmap::IndexMap;
use std::hash::Hash;

use crate::page::PageSlice;

/// A value that carries its own stable identity, used to merge pages by
/// identity rather than by position so that an item appearing on two
/// overlapping pages is deduplicated rather than duplicated.
pub trait Identifiable {
    type Id: Eq + Hash + Clone;

    fn id(&self) -> Self::Id;
}

/// The capability a paginated reducer needs from whatever collection type
/// it aggregates pages into: construct from a first page, and fold a
/// further page in from either end.
pub trait PaginatedCollection: Sized {
    type Item;
    type Page;

    fn values(&self) -> Vec<&Self::Item>;
    fn last_page(&self) -> &Self::Page;
    fn next_page(&self) -> Option<&Self::Page>;
    fn has_next_page(&self) -> bool {
        self.next_page().is_some()
    }

    /// Builds a fresh collection from the first page loaded.
    fn from_initial(slice: PageSlice<Self::Item, Self::Page>) -> Self;

    /// Folds a page loaded after the existing ones into the collection.
    fn upsert_appending(self, slice: PageSlice<Self::Item, Self::Page>) -> Self;

    /// Folds a page loaded before the existing ones into the collection,
    /// preserving the existing `next_page` (the newly loaded slice's own
    /// `next_page` describes what comes before it, not after the tail).
    fn upsert_prepending(self, slice: PageSlice<Self::Item, Self::Page>) -> Self;
}

/// The default [`PaginatedCollection`] implementation: an ordered,
/// id-keyed store so an item appearing again on a later or overlapping
/// page updates in place instead of duplicating.
#[derive(Clone, Debug)]
pub struct IdentifiedPaginatedCollection<V: Identifiable, P> {
    items: IndexMap<V::Id, V>,
    last_page: P,
    next_page: Option<P>,
}

impl<V: Identifiable, P> IdentifiedPaginatedCollection<V, P> {
    /// An iterator over the collection's items in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &V::Id) -> Option<&V> {
        self.items.get(id)
    }

    pub(crate) fn items_mut(&mut self) -> &mut IndexMap<V::Id, V> {
        &mut self.items
    }

    fn upsert(mut self, slice: PageSlice<V, P>, prepend: bool, replace_next_page: bool) -> Self {
        if prepend {
            // Matched ids are updated in place and never move. Ids the
            // existing collection doesn't have yet are inserted in slice
            // order, right after the most recently matched id seen so far
            // (or at the very front, if none has been matched yet) so a run
            // of brand-new ids lands contiguous with its nearest match
            // instead of jumping to the absolute front of the collection.
            let mut insert_at = 0usize;
            for item in slice.values {
                let id = item.id();
                if let Some(index) = self.items.get_index_of(&id) {
                    if let Some((_, existing)) = self.items.get_index_mut(index) {
                        *existing = item;
                    }
                    insert_at = index + 1;
                } else {
                    self.items.shift_insert(insert_at, id, item);
                    insert_at += 1;
                }
            }
        } else {
            for item in slice.values {
                self.items.insert(item.id(), item);
            }
        }
        self.last_page = slice.page;
        if replace_next_page {
            self.next_page = slice.next_page;
        }
        self
    }
}

/// Two collections are equal when their items are equal in the same order.
/// `IndexMap`'s own `PartialEq` compares keys and values as sets, which
/// would call two collections with the same ids in a different order
/// equal; pagination order is meaningful here, so this compares id and
/// value pairwise, position by position, instead.
impl<V, P> PartialEq for IdentifiedPaginatedCollection<V, P>
where
    V: Identifiable + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|((id_a, v_a), (id_b, v_b))| id_a == id_b && v_a == v_b)
    }
}

impl<V, P> PaginatedCollection for IdentifiedPaginatedCollection<V, P>
where
    V: Identifiable,
{
    type Item = V;
    type Page = P;

    fn values(&self) -> Vec<&Self::Item> {
        self.items.values().collect()
    }

    fn last_page(&self) -> &Self::Page {
        &self.last_page
    }

    fn next_page(&self) -> Option<&Self::Page> {
        self.next_page.as_ref()
    }

    fn from_initial(slice: PageSlice<Self::Item, Self::Page>) -> Self {
        let mut items = IndexMap::with_capacity(slice.values.len());
        for item in slice.values {
            items.insert(item.id(), item);
        }
        Self { items, last_page: slice.page, next_page: slice.next_page }
    }

    fn upsert_appending(self, slice: PageSlice<Self::Item, Self::Page>) -> Self {
        self.upsert(slice, false, true)
    }

    fn upsert_prepending(self, slice: PageSlice<Self::Item, Self::Page>) -> Self {
        self.upsert(slice, true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    impl Identifiable for Item {
        type Id = u32;
        fn id(&self) -> u32 {
            self.id
        }
    }

    fn slice(items: &[(u32, &'static str)], page: u32, next: Option<u32>) -> PageSlice<Item, u32> {
        PageSlice::new(
            items.iter().map(|(id, label)| Item { id: *id, label }).collect(),
            page,
            next,
        )
    }

    #[test]
    fn from_initial_sets_page_and_items() {
        let c = IdentifiedPaginatedCollection::from_initial(slice(&[(1, "a"), (2, "b")], 1, Some(2)));
        assert_eq!(c.len(), 2);
        assert_eq!(*c.last_page(), 1);
        assert_eq!(c.next_page(), Some(&2));
    }

    #[test]
    fn upsert_appending_extends_and_dedups_by_id() {
        let c = IdentifiedPaginatedCollection::from_initial(slice(&[(1, "a")], 1, Some(2)));
        let c = c.upsert_appending(slice(&[(1, "a-updated"), (2, "b")], 2, None));
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(&1).unwrap().label, "a-updated");
        assert!(!c.has_next_page());
    }

    #[test]
    fn upsert_prepending_preserves_old_next_page() {
        let c = IdentifiedPaginatedCollection::from_initial(slice(&[(3, "c")], 2, Some(4)));
        let c = c.upsert_prepending(slice(&[(1, "a"), (2, "b")], 1, Some(2)));
        let ids: Vec<u32> = c.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(c.next_page(), Some(&4));
    }

    /// A matched id keeps its existing position; ids new to the collection
    /// land in slice order right after the nearest preceding match, not at
    /// the absolute front of the whole collection.
    #[test]
    fn upsert_prepending_updates_a_matched_id_in_place_instead_of_moving_it() {
        let c = IdentifiedPaginatedCollection::from_initial(slice(
            &[(1, "r1"), (2, "r2"), (3, "first")],
            1,
            None,
        ));
        let c = c.upsert_prepending(slice(&[(3, "second"), (4, "r4"), (5, "r5")], 2, Some(99)));
        let ids: Vec<u32> = c.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(c.get(&3).unwrap().label, "second");
    }

    #[test]
    fn equality_compares_ordered_ids_and_values_not_just_set_membership() {
        let a = IdentifiedPaginatedCollection::from_initial(slice(&[(1, "a"), (2, "b")], 1, None));
        let b = IdentifiedPaginatedCollection::from_initial(slice(&[(1, "a"), (2, "b")], 1, None));
        let reordered =
            IdentifiedPaginatedCollection::from_initial(slice(&[(2, "b"), (1, "a")], 1, None));
        let different_value =
            IdentifiedPaginatedCollection::from_initial(slice(&[(1, "a"), (2, "z")], 1, None));

        assert_eq!(a, b);
        assert_ne!(a, reordered);
        assert_ne!(a, different_value);
    }
}
