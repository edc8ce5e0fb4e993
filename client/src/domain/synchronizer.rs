//! Read-modify-write synchronisation of the menu aggregate.
//!
//! Every mutation runs its own cycle: fetch the aggregate fresh, apply the
//! change in memory, `PUT` the whole aggregate back, then replace the matching
//! snapshot collection with the written value. The cached snapshot is never
//! the base of a write.
//!
//! With [`WriteOrdering::Concurrent`] cycles are not serialised against each
//! other and the last write of the whole aggregate wins; an overlapping cycle
//! can silently discard another's change. [`WriteOrdering::Serialized`] runs
//! one cycle at a time through this synchronizer instead. Neither protects
//! against other writers of the same backend document.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{debug, info, warn};

use super::error::SyncError;
use super::menu::{Category, Dish, EntityId, Ingredient, MenuSnapshot};
use super::mutation::{MenuEntity, Mutation, MutationOutcome};
use super::ports::MenuStore;

/// How overlapping mutation cycles are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteOrdering {
    /// Cycles interleave freely; last whole-aggregate write wins.
    #[default]
    Concurrent,
    /// One cycle at a time, in lock acquisition order.
    Serialized,
}

/// What happens when an update or delete names an absent id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingTargetPolicy {
    /// Write the unchanged aggregate and report success.
    #[default]
    Ignore,
    /// Fail with [`SyncError::NotFound`] before writing.
    Reject,
}

/// Ordering and failure policy for the synchronizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Ordering of overlapping cycles.
    pub write_ordering: WriteOrdering,
    /// Handling of absent update/delete targets.
    pub missing_target: MissingTargetPolicy,
}

/// Coarse lifecycle reported to views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No successful load or write yet.
    Unloaded,
    /// A fetch or write is in flight.
    Loading,
    /// A snapshot is available and nothing is in flight.
    Loaded,
}

/// Observable synchronizer state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    snapshot: Option<MenuSnapshot>,
    in_flight: usize,
}

impl SyncState {
    /// Last successfully loaded or written snapshot, if any.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&MenuSnapshot> {
        self.snapshot.as_ref()
    }

    /// Number of load or mutation cycles currently running.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Derive the coarse status.
    #[must_use]
    pub const fn status(&self) -> SyncStatus {
        if self.in_flight > 0 {
            SyncStatus::Loading
        } else if self.snapshot.is_some() {
            SyncStatus::Loaded
        } else {
            SyncStatus::Unloaded
        }
    }
}

/// Keeps `in_flight` accurate even when a cycle's future is dropped.
struct InFlight<'a> {
    state: &'a watch::Sender<SyncState>,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a watch::Sender<SyncState>) -> Self {
        state.send_modify(|current| current.in_flight += 1);
        Self { state }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state
            .send_modify(|current| current.in_flight = current.in_flight.saturating_sub(1));
    }
}

/// Orchestrates loads and read-modify-write cycles against a [`MenuStore`].
pub struct MenuSynchronizer<S: ?Sized> {
    store: Arc<S>,
    policy: SyncPolicy,
    state: watch::Sender<SyncState>,
    cycle_lock: Mutex<()>,
}

impl<S: ?Sized> MenuSynchronizer<S> {
    /// Create an unloaded synchronizer with the default policy.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, SyncPolicy::default())
    }

    /// Create an unloaded synchronizer with an explicit policy.
    #[must_use]
    pub fn with_policy(store: Arc<S>, policy: SyncPolicy) -> Self {
        let (state, _) = watch::channel(SyncState::default());
        Self {
            store,
            policy,
            state,
            cycle_lock: Mutex::new(()),
        }
    }

    /// Policy this synchronizer was built with.
    #[must_use]
    pub const fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Current snapshot; empty while unloaded.
    #[must_use]
    pub fn snapshot(&self) -> MenuSnapshot {
        self.state.borrow().snapshot.clone().unwrap_or_default()
    }

    /// Current coarse status.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.state.borrow().status()
    }

    /// Watch state changes; a new value is published on every snapshot
    /// replacement and every in-flight transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    async fn serialize_cycle(&self) -> Option<MutexGuard<'_, ()>> {
        match self.policy.write_ordering {
            WriteOrdering::Serialized => Some(self.cycle_lock.lock().await),
            WriteOrdering::Concurrent => None,
        }
    }
}

impl<S> MenuSynchronizer<S>
where
    S: MenuStore + ?Sized,
{
    /// Fetch the aggregate and replace the whole snapshot with it.
    ///
    /// On failure the previous state (unloaded or the last snapshot) is kept
    /// and the store error is returned. No retry is attempted. Under
    /// [`WriteOrdering::Serialized`] a load waits for running cycles, so it
    /// never publishes data read before a write finished.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] when the read fails.
    pub async fn load_menu(&self) -> Result<MenuSnapshot, SyncError> {
        let _cycle = self.serialize_cycle().await;
        let _in_flight = InFlight::enter(&self.state);
        debug!("fetching menu aggregate");
        let menu = self.store.fetch_menu().await.map_err(|error| {
            warn!(%error, "menu load failed; keeping previous snapshot");
            SyncError::from(error)
        })?;

        let snapshot = MenuSnapshot::from_aggregate(&menu);
        let summary = snapshot.summary();
        self.state
            .send_modify(|current| current.snapshot = Some(snapshot.clone()));
        info!(
            ingredients = summary.ingredients,
            categories = summary.categories,
            dishes = summary.dishes,
            "menu snapshot replaced"
        );
        Ok(snapshot)
    }

    /// Run one read-modify-write cycle for `mutation`.
    ///
    /// On success the snapshot collection for `E` is replaced by the
    /// collection that was written, without re-fetching. Before any load the
    /// snapshot is first seeded from the whole aggregate that was written.
    /// On any failure the snapshot is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the store failure, or [`SyncError::NotFound`] /
    /// [`SyncError::DuplicateId`] when the policy refuses the change.
    pub async fn apply<E: MenuEntity>(&self, mutation: Mutation<E>) -> Result<(), SyncError> {
        let _cycle = self.serialize_cycle().await;
        let _in_flight = InFlight::enter(&self.state);
        let kind = E::KIND;
        let verb = mutation.verb();
        let target = mutation.target().clone();

        debug!(%kind, %target, verb, "reading menu aggregate");
        let mut menu = self.store.fetch_menu().await.map_err(|error| {
            warn!(%kind, %target, verb, %error, "menu read failed");
            SyncError::from(error)
        })?;

        match mutation.apply(&mut menu) {
            MutationOutcome::Applied => {}
            MutationOutcome::TargetMissing => match self.policy.missing_target {
                MissingTargetPolicy::Ignore => {
                    warn!(%kind, %target, verb, "target absent; writing menu unchanged");
                }
                MissingTargetPolicy::Reject => {
                    return Err(SyncError::NotFound { kind, id: target });
                }
            },
            MutationOutcome::DuplicateId(id) => {
                return Err(SyncError::DuplicateId { kind, id });
            }
        }

        debug!(%kind, %target, verb, "writing menu aggregate");
        self.store.replace_menu(&menu).await.map_err(|error| {
            warn!(%kind, %target, verb, %error, "menu write failed");
            SyncError::from(error)
        })?;

        let count = E::collection_mut(&mut menu).len();
        self.state.send_modify(|current| {
            let snapshot = current
                .snapshot
                .get_or_insert_with(|| MenuSnapshot::from_aggregate(&menu));
            *E::snapshot_collection_mut(snapshot) = std::mem::take(E::collection_mut(&mut menu));
        });
        info!(%kind, %target, verb, count, "snapshot collection replaced");
        Ok(())
    }

    /// Append an ingredient.
    pub async fn add_ingredient(&self, ingredient: Ingredient) -> Result<(), SyncError> {
        self.apply(Mutation::Add(ingredient)).await
    }

    /// Replace the ingredient with `id` by `ingredient`.
    pub async fn update_ingredient(
        &self,
        id: impl Into<EntityId>,
        ingredient: Ingredient,
    ) -> Result<(), SyncError> {
        self.apply(Mutation::Update {
            id: id.into(),
            replacement: ingredient,
        })
        .await
    }

    /// Remove the ingredient with `id`.
    pub async fn delete_ingredient(&self, id: impl Into<EntityId>) -> Result<(), SyncError> {
        self.apply(Mutation::<Ingredient>::Delete { id: id.into() })
            .await
    }

    /// Append a category.
    pub async fn add_category(&self, category: Category) -> Result<(), SyncError> {
        self.apply(Mutation::Add(category)).await
    }

    /// Replace the category with `id` by `category`.
    pub async fn update_category(
        &self,
        id: impl Into<EntityId>,
        category: Category,
    ) -> Result<(), SyncError> {
        self.apply(Mutation::Update {
            id: id.into(),
            replacement: category,
        })
        .await
    }

    /// Remove the category with `id`. Dishes referencing it are kept.
    pub async fn delete_category(&self, id: impl Into<EntityId>) -> Result<(), SyncError> {
        self.apply(Mutation::<Category>::Delete { id: id.into() })
            .await
    }

    /// Append a dish.
    pub async fn add_dish(&self, dish: Dish) -> Result<(), SyncError> {
        self.apply(Mutation::Add(dish)).await
    }

    /// Replace the dish with `id` by `dish`.
    pub async fn update_dish(&self, id: impl Into<EntityId>, dish: Dish) -> Result<(), SyncError> {
        self.apply(Mutation::Update {
            id: id.into(),
            replacement: dish,
        })
        .await
    }

    /// Remove the dish with `id`.
    pub async fn delete_dish(&self, id: impl Into<EntityId>) -> Result<(), SyncError> {
        self.apply(Mutation::<Dish>::Delete { id: id.into() }).await
    }
}

#[cfg(test)]
#[path = "synchronizer_tests.rs"]
mod tests;
