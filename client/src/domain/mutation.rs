//! The modify step of a read-modify-write cycle.
//!
//! A [`Mutation`] is applied to a freshly read [`MenuAggregate`] in memory;
//! the synchronizer then writes the whole aggregate back. The same rules
//! hold for every entity kind through [`MenuEntity`].

use std::fmt;

use super::menu::{Category, Dish, EntityId, Ingredient, MenuAggregate, MenuSnapshot};

/// Entity collections held by the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `ingredients` collection.
    Ingredient,
    /// `categories` collection.
    Category,
    /// `dishes` collection.
    Dish,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ingredient => "ingredient",
            Self::Category => "category",
            Self::Dish => "dish",
        })
    }
}

/// Binds an entity type to its collection in the aggregate and the snapshot.
pub trait MenuEntity: Clone + fmt::Debug + Send + Sync + 'static {
    /// Collection this entity lives in.
    const KIND: EntityKind;

    /// Identity used for replace- and remove-by-identity.
    fn id(&self) -> &EntityId;

    /// Mutable access to the entity's collection inside the aggregate.
    fn collection_mut(menu: &mut MenuAggregate) -> &mut Vec<Self>;

    /// Mutable access to the matching snapshot collection.
    fn snapshot_collection_mut(snapshot: &mut MenuSnapshot) -> &mut Vec<Self>;
}

impl MenuEntity for Ingredient {
    const KIND: EntityKind = EntityKind::Ingredient;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn collection_mut(menu: &mut MenuAggregate) -> &mut Vec<Self> {
        &mut menu.ingredients
    }

    fn snapshot_collection_mut(snapshot: &mut MenuSnapshot) -> &mut Vec<Self> {
        &mut snapshot.ingredients
    }
}

impl MenuEntity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn collection_mut(menu: &mut MenuAggregate) -> &mut Vec<Self> {
        &mut menu.categories
    }

    fn snapshot_collection_mut(snapshot: &mut MenuSnapshot) -> &mut Vec<Self> {
        &mut snapshot.categories
    }
}

impl MenuEntity for Dish {
    const KIND: EntityKind = EntityKind::Dish;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn collection_mut(menu: &mut MenuAggregate) -> &mut Vec<Self> {
        &mut menu.dishes
    }

    fn snapshot_collection_mut(snapshot: &mut MenuSnapshot) -> &mut Vec<Self> {
        &mut snapshot.dishes
    }
}

/// A requested change to one entity collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<E> {
    /// Append a new entity.
    Add(E),
    /// Replace the entity matching `id` wholesale (no field merge).
    Update {
        /// Identity of the entity to replace.
        id: EntityId,
        /// Entity written in its place.
        replacement: E,
    },
    /// Remove the entity matching `id`.
    Delete {
        /// Identity of the entity to remove.
        id: EntityId,
    },
}

/// Result of applying a [`Mutation`] to an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The collection changed as requested.
    Applied,
    /// No entity matched the update/delete target; the collection is unchanged.
    TargetMissing,
    /// Applying would have duplicated this id; the collection is unchanged.
    DuplicateId(EntityId),
}

impl<E: MenuEntity> Mutation<E> {
    /// Short verb used in log events.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    /// Identity the mutation is about.
    #[must_use]
    pub fn target(&self) -> &EntityId {
        match self {
            Self::Add(entity) => entity.id(),
            Self::Update { id, .. } | Self::Delete { id } => id,
        }
    }

    /// Apply the change to `menu` in place.
    ///
    /// Adds append; updates replace every entry with the target id; deletes
    /// filter the target id out. A change that would introduce a second
    /// entry with the same id leaves `menu` untouched.
    ///
    /// # Examples
    /// ```
    /// use menu_admin::domain::{Ingredient, MenuAggregate, Mutation, MutationOutcome};
    ///
    /// let mut menu = MenuAggregate::new(vec![Ingredient::new(1, "Salt")], Vec::new());
    /// let outcome = Mutation::Update {
    ///     id: 1.into(),
    ///     replacement: Ingredient::new(1, "Pepper"),
    /// }
    /// .apply(&mut menu);
    ///
    /// assert_eq!(outcome, MutationOutcome::Applied);
    /// assert_eq!(menu.ingredients[0].name, "Pepper");
    /// ```
    pub fn apply(self, menu: &mut MenuAggregate) -> MutationOutcome {
        let collection = E::collection_mut(menu);
        match self {
            Self::Add(entity) => {
                if collection.iter().any(|existing| existing.id() == entity.id()) {
                    return MutationOutcome::DuplicateId(entity.id().clone());
                }
                collection.push(entity);
                MutationOutcome::Applied
            }
            Self::Update { id, replacement } => {
                if !collection.iter().any(|existing| existing.id() == &id) {
                    return MutationOutcome::TargetMissing;
                }
                if replacement.id() != &id
                    && collection
                        .iter()
                        .any(|existing| existing.id() == replacement.id())
                {
                    return MutationOutcome::DuplicateId(replacement.id().clone());
                }
                for existing in collection.iter_mut().filter(|existing| existing.id() == &id) {
                    *existing = replacement.clone();
                }
                MutationOutcome::Applied
            }
            Self::Delete { id } => {
                let before = collection.len();
                collection.retain(|existing| existing.id() != &id);
                if collection.len() == before {
                    MutationOutcome::TargetMissing
                } else {
                    MutationOutcome::Applied
                }
            }
        }
    }
}
