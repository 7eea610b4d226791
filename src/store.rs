//! Persistence collaborator and per-location serialization.
//!
//! Planners are pure; everything that touches storage lives here. A
//! [`LocationScheduler`] wraps a [`TaskStore`] and runs every operation as
//! read snapshot, plan, apply diff, holding the location's lock for the
//! whole sequence so concurrent requests cannot lose order keys or
//! overwrite dates computed from a stale snapshot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result, StoreError};
use crate::models::{ChangeSet, Task, TaskDraft, TaskId, TaskList};
use crate::planner::{
    insertion_points, link_slots, plan_delete, plan_insert, plan_link, plan_move, plan_renumber,
    plan_unlink, plan_update, InsertionIntent, LinkSlot, MoveTarget, TaskUpdate,
};

/// Identifier of a location (a job site area owning one task sequence).
pub type LocationId = u64;

/// Storage for task sequences.
pub trait TaskStore: Send + Sync {
    /// All tasks of a location, sorted by order key. Unknown locations are empty.
    fn ordered_tasks(&self, location: LocationId) -> std::result::Result<Vec<Task>, StoreError>;

    /// Persists a change set. Either every record is written or none is.
    fn apply_changes(
        &self,
        location: LocationId,
        changes: &ChangeSet,
    ) -> std::result::Result<(), StoreError>;

    /// Reserves a fresh task id.
    fn next_task_id(&self) -> std::result::Result<TaskId, StoreError>;
}

/// In-memory implementation for development and testing.
pub struct InMemoryTaskStore {
    locations: RwLock<HashMap<LocationId, HashMap<TaskId, Task>>>,
    next_id: AtomicU64,
}

impl InMemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            locations: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Loads tasks into a location, replacing any with the same id.
    ///
    /// Later ids from [`TaskStore::next_task_id`] never collide with seeded ones.
    pub fn seed(
        &self,
        location: LocationId,
        tasks: impl IntoIterator<Item = Task>,
    ) -> std::result::Result<(), StoreError> {
        let mut locations = self
            .locations
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let entry = locations.entry(location).or_default();
        for task in tasks {
            self.next_id.fetch_max(task.id.0.saturating_add(1), Ordering::SeqCst);
            entry.insert(task.id, task);
        }
        Ok(())
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn ordered_tasks(&self, location: LocationId) -> std::result::Result<Vec<Task>, StoreError> {
        let locations = self
            .locations
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let mut tasks: Vec<Task> = locations
            .get(&location)
            .map(|tasks| tasks.values().cloned().collect())
            .unwrap_or_default();
        tasks.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    fn apply_changes(
        &self,
        location: LocationId,
        changes: &ChangeSet,
    ) -> std::result::Result<(), StoreError> {
        let mut locations = self
            .locations
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;

        // Validate everything before the first write
        let existing = locations.get(&location);
        let touches_existing = !changes.updated.is_empty() || changes.deleted.is_some();
        if existing.is_none() && touches_existing {
            return Err(StoreError::LocationNotFound(location));
        }
        if let Some(tasks) = existing {
            if let Some(created) = &changes.created {
                if tasks.contains_key(&created.id) {
                    return Err(StoreError::Conflict(format!(
                        "task {} already exists in location {location}",
                        created.id
                    )));
                }
            }
            let unknown = changes
                .updated
                .iter()
                .map(|t| t.id)
                .chain(changes.deleted)
                .find(|id| !tasks.contains_key(id));
            if let Some(id) = unknown {
                return Err(StoreError::TaskNotFound(id));
            }
        }

        let tasks = locations.entry(location).or_default();
        if let Some(created) = &changes.created {
            self.next_id.fetch_max(created.id.0.saturating_add(1), Ordering::SeqCst);
            tasks.insert(created.id, created.clone());
        }
        for task in &changes.updated {
            tasks.insert(task.id, task.clone());
        }
        if let Some(id) = changes.deleted {
            tasks.remove(&id);
        }
        Ok(())
    }

    fn next_task_id(&self) -> std::result::Result<TaskId, StoreError> {
        Ok(TaskId(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }
}

/// Runs planners against a store, one operation per location at a time.
pub struct LocationScheduler<S> {
    store: S,
    config: PlannerConfig,
    locks: Mutex<HashMap<LocationId, Arc<Mutex<()>>>>,
}

impl<S: TaskStore> LocationScheduler<S> {
    /// Creates a scheduler with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, PlannerConfig::default())
    }

    /// Creates a scheduler with an explicit configuration.
    pub fn with_config(store: S, config: PlannerConfig) -> Self {
        Self {
            store,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The planner configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Starts a draft with a freshly reserved id.
    pub fn draft(&self, name: impl Into<String>) -> Result<TaskDraft> {
        let id = self.store.next_task_id()?;
        Ok(TaskDraft::new(id, name))
    }

    /// Current snapshot of a location.
    pub fn snapshot(&self, location: LocationId) -> Result<TaskList> {
        Ok(TaskList::new(self.store.ordered_tasks(location)?))
    }

    /// Eligible positions for a new task.
    pub fn insertion_points(&self, location: LocationId) -> Result<Vec<InsertionIntent>> {
        Ok(insertion_points(&self.snapshot(location)?))
    }

    /// Anchor-date choices for linking `targets`.
    pub fn link_slots(&self, location: LocationId, targets: &[TaskId]) -> Result<Vec<LinkSlot>> {
        Ok(link_slots(&self.snapshot(location)?, targets)?)
    }

    /// Inserts a new task.
    pub fn insert(
        &self,
        location: LocationId,
        draft: TaskDraft,
        intent: &InsertionIntent,
    ) -> Result<ChangeSet> {
        self.transact(location, |list| plan_insert(list, draft, intent, &self.config))
    }

    /// Deletes a task.
    pub fn delete(&self, location: LocationId, id: TaskId) -> Result<ChangeSet> {
        self.transact(location, |list| plan_delete(list, id))
    }

    /// Links existing tasks onto the date of slot `slot`.
    pub fn link(&self, location: LocationId, targets: &[TaskId], slot: usize) -> Result<ChangeSet> {
        self.transact(location, |list| plan_link(list, targets, slot))
    }

    /// Removes a task from its linked group.
    pub fn unlink(&self, location: LocationId, id: TaskId) -> Result<ChangeSet> {
        self.transact(location, |list| plan_unlink(list, id))
    }

    /// Moves a task.
    pub fn move_task(&self, location: LocationId, id: TaskId, target: MoveTarget) -> Result<ChangeSet> {
        self.transact(location, |list| plan_move(list, id, target, &self.config))
    }

    /// Edits a task's date, dependency or status.
    pub fn update(&self, location: LocationId, id: TaskId, update: &TaskUpdate) -> Result<ChangeSet> {
        self.transact(location, |list| plan_update(list, id, update))
    }

    /// Respaces every order key of a location.
    pub fn renumber(&self, location: LocationId) -> Result<ChangeSet> {
        self.transact(location, |list| plan_renumber(list, &self.config))
    }

    fn location_lock(&self, location: LocationId) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(Arc::clone(locks.entry(location).or_default()))
    }

    /// Drops the location's lock entry once no other request holds or waits on it.
    fn release_lock(&self, location: LocationId, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };
        // One reference in the map, one held here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&location);
        }
    }

    fn transact<F>(&self, location: LocationId, plan: F) -> Result<ChangeSet>
    where
        F: FnOnce(&TaskList) -> std::result::Result<ChangeSet, PlanError>,
    {
        let lock = self.location_lock(location)?;
        let result = self.run_locked(&lock, location, plan);
        self.release_lock(location, lock);
        result
    }

    fn run_locked<F>(&self, lock: &Mutex<()>, location: LocationId, plan: F) -> Result<ChangeSet>
    where
        F: FnOnce(&TaskList) -> std::result::Result<ChangeSet, PlanError>,
    {
        let _guard = lock
            .lock()
            .map_err(|e| StoreError::Internal(e.to_string()))?;

        let snapshot = self.snapshot(location)?;
        let changes = plan(&snapshot)?;
        if !changes.is_empty() {
            self.store.apply_changes(location, &changes)?;
        }
        tracing::debug!(
            location,
            created = changes.created.is_some(),
            updated = changes.updated.len(),
            deleted = changes.deleted.is_some(),
            "applied changes"
        );
        Ok(changes)
    }
}
