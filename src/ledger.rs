//! Local mutation code path.
//!
//! Every local change to tasks and leaves goes through here: load the
//! collection, mutate it in memory, write it back whole. The service
//! falls back to this when the remote backend fails, and the REST server
//! uses it directly. One mutex serializes the read-modify-write cycles
//! of a process; separate processes still race, last write wins.

use crate::error::{ServiceError, ServiceResult};
use crate::models::*;
use crate::store::{Collection, CollectionStore, CollectionStoreExt, StoreError, StoreResult};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard};

/// Whether `set_task_status` checks the lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any status from any status.
    #[default]
    Loose,
    /// Only transitions allowed by `TaskStatus::can_transition_to`.
    Strict,
}

impl StatusPolicy {
    pub fn check(self, id: TaskId, from: TaskStatus, to: TaskStatus) -> ServiceResult<()> {
        match self {
            StatusPolicy::Strict if !from.can_transition_to(to) => {
                Err(ServiceError::IllegalTransition { id, from, to })
            }
            _ => Ok(()),
        }
    }
}

/// Status a freshly created task starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialStatus {
    /// Always "To Do", whatever the draft says.
    ToDo,
    /// The draft's status, or "To Do" if it has none.
    FromDraft,
}

pub struct Ledger {
    store: Arc<dyn CollectionStore>,
    write_lock: Mutex<()>,
}

impl Ledger {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Ledger {
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn collection<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
        self.store.read(collection)
    }

    pub fn employees(&self) -> StoreResult<Vec<Employee>> {
        self.store.read(Collection::Employees)
    }

    // ── Tasks ─────────────────────────────────────────────────

    pub fn tasks(&self, assignee: Option<&str>) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self.store.read(Collection::Tasks)?;
        if let Some(id) = assignee {
            tasks.retain(|t| t.assigned_to_id == id);
        }
        Ok(tasks)
    }

    pub fn create_task(&self, draft: TaskDraft, initial: InitialStatus) -> StoreResult<Task> {
        let _guard = self.lock()?;
        let mut tasks: Vec<Task> = self.store.read(Collection::Tasks)?;
        let id = self.next_id(Collection::Tasks, tasks.iter().map(|t| t.id))?;
        let status = match initial {
            InitialStatus::ToDo => TaskStatus::ToDo,
            InitialStatus::FromDraft => draft.status.unwrap_or(TaskStatus::ToDo),
        };
        let task = Task {
            id,
            title: draft.title,
            assigned_to: draft.assigned_to,
            assigned_to_id: draft.assigned_to_id,
            due_date: draft.due_date,
            priority: draft.priority,
            status,
        };
        tasks.push(task.clone());
        self.store.write(Collection::Tasks, &tasks)?;
        tracing::debug!(task_id = id, "task created");
        Ok(task)
    }

    /// Replace the stored task with the draft's id. A draft without a
    /// status keeps the stored one. `None` if there is no such task.
    pub fn replace_task(&self, id: TaskId, draft: TaskDraft) -> StoreResult<Option<Task>> {
        self.update_task(id, |task| {
            task.title = draft.title;
            task.assigned_to = draft.assigned_to;
            task.assigned_to_id = draft.assigned_to_id;
            task.due_date = draft.due_date;
            task.priority = draft.priority;
            if let Some(status) = draft.status {
                task.status = status;
            }
            Ok::<_, StoreError>(())
        })
    }

    pub fn merge_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Option<Task>> {
        self.update_task(id, |task| {
            patch.apply_to(task);
            Ok::<_, StoreError>(())
        })
    }

    pub fn set_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        policy: StatusPolicy,
    ) -> ServiceResult<Option<Task>> {
        self.update_task(id, |task| {
            policy.check(id, task.status, status)?;
            task.status = status;
            Ok::<_, ServiceError>(())
        })
    }

    /// Remove a task. Returns whether anything was removed; absent ids
    /// are not an error.
    pub fn delete_task(&self, id: TaskId) -> StoreResult<bool> {
        let _guard = self.lock()?;
        let mut tasks: Vec<Task> = self.store.read(Collection::Tasks)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        let removed = tasks.len() != before;
        if removed {
            self.store.write(Collection::Tasks, &tasks)?;
        }
        Ok(removed)
    }

    fn update_task<E, F>(&self, id: TaskId, mutate: F) -> Result<Option<Task>, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut Task) -> Result<(), E>,
    {
        let _guard = self.lock()?;
        let mut tasks: Vec<Task> = self.store.read(Collection::Tasks)?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        mutate(task)?;
        let updated = task.clone();
        self.store.write(Collection::Tasks, &tasks)?;
        Ok(Some(updated))
    }

    // ── Leaves ────────────────────────────────────────────────

    pub fn leaves(&self, employee_id: Option<&str>) -> StoreResult<Vec<Leave>> {
        let mut leaves: Vec<Leave> = self.store.read(Collection::Leaves)?;
        if let Some(id) = employee_id {
            leaves.retain(|l| l.employee_id == id);
        }
        Ok(leaves)
    }

    /// File a leave application. It always starts Pending.
    pub fn apply_leave(&self, draft: LeaveDraft) -> StoreResult<Leave> {
        let _guard = self.lock()?;
        let mut leaves: Vec<Leave> = self.store.read(Collection::Leaves)?;
        let id = self.next_id(Collection::Leaves, leaves.iter().map(|l| l.id))?;
        let leave = Leave {
            id,
            employee_id: draft.employee_id,
            name: draft.name,
            kind: draft.kind,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: LeaveStatus::Pending,
        };
        leaves.push(leave.clone());
        self.store.write(Collection::Leaves, &leaves)?;
        Ok(leave)
    }

    pub fn set_leave_status(&self, id: LeaveId, status: LeaveStatus) -> StoreResult<Option<Leave>> {
        let _guard = self.lock()?;
        let mut leaves: Vec<Leave> = self.store.read(Collection::Leaves)?;
        let Some(leave) = leaves.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        leave.status = status;
        let updated = leave.clone();
        self.store.write(Collection::Leaves, &leaves)?;
        Ok(Some(updated))
    }

    // ── Ids ───────────────────────────────────────────────────

    /// Next id for `collection`: the current millisecond clock, bumped
    /// past both the largest id present and the last id ever handed out.
    /// Must be called with the write lock held.
    fn next_id(&self, collection: Collection, existing: impl Iterator<Item = u64>) -> StoreResult<u64> {
        let watermark_key = format!("{}_last_id", collection.key());
        let last_issued = self.store.get(&watermark_key)?.and_then(|v| v.as_u64());
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);

        let floor = existing
            .max()
            .into_iter()
            .chain(last_issued)
            .max()
            .map_or(0, |highest| highest.saturating_add(1));
        let id = now.max(floor);

        self.store.put(&watermark_key, serde_json::json!(id))?;
        Ok(id)
    }
}

// ── Tests ──────────────────────────────────────────────────────
