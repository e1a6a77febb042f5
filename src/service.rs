//! Task and leave operations over the remote backend, with per-call
//! fallback to the local ledger.
//!
//! Every operation first tries `ctx.remote`. Any failure (unreachable,
//! timeout, non-2xx, bad payload) is logged and the same operation runs
//! against the local store instead. Nothing is cached: the next call
//! tries the remote again.
//!
//! The one exception is a 409 on a status change: the backend enforces
//! its own lifecycle and said no, so the refusal goes back to the caller.

use crate::balancer;
use crate::error::{ServiceError, ServiceResult};
use crate::ledger::{InitialStatus, Ledger, StatusPolicy};
use crate::models::*;
use crate::remote::{RemoteBackend, RemoteError};
use std::sync::Arc;

// ── Call context ──────────────────────────────────────────────

/// Per-call settings. Passed explicitly so tests and callers can run
/// isolated contexts side by side.
#[derive(Clone, Default)]
pub struct Context {
    pub remote: Option<Arc<dyn RemoteBackend>>,
    pub policy: StatusPolicy,
}

impl Context {
    pub fn local_only() -> Self {
        Context::default()
    }

    pub fn with_remote(remote: Arc<dyn RemoteBackend>) -> Self {
        Context {
            remote: Some(remote),
            policy: StatusPolicy::Loose,
        }
    }

    pub fn strict(mut self) -> Self {
        self.policy = StatusPolicy::Strict;
        self
    }
}

// ── Two-stage result ──────────────────────────────────────────

/// Where a result came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sourced<T> {
    Remote(T),
    Local(T),
}

impl<T> Sourced<T> {
    pub fn into_inner(self) -> T {
        match self {
            Sourced::Remote(v) | Sourced::Local(v) => v,
        }
    }

    pub fn get(&self) -> &T {
        match self {
            Sourced::Remote(v) | Sourced::Local(v) => v,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Sourced::Local(_))
    }

    pub fn origin(&self) -> &'static str {
        match self {
            Sourced::Remote(_) => "remote",
            Sourced::Local(_) => "local",
        }
    }
}

fn fell_back(op: &'static str, err: &RemoteError) {
    tracing::warn!(op, error = %err, "remote backend failed, using local store");
}

/// Result of declining a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclineOutcome {
    /// Moved to a teammate and waiting for their acceptance.
    Reassigned(Task),
    /// Nobody better in the department; the task stays Declined.
    Declined(Task),
}

impl DeclineOutcome {
    pub fn task(&self) -> &Task {
        match self {
            DeclineOutcome::Reassigned(t) | DeclineOutcome::Declined(t) => t,
        }
    }
}

// ── Service ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct OfficeService {
    ledger: Arc<Ledger>,
}

impl OfficeService {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        OfficeService { ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Whether the remote backend answers its health check. Always
    /// false in local-only mode.
    pub async fn backend_health(&self, ctx: &Context) -> bool {
        let Some(remote) = &ctx.remote else {
            return false;
        };
        match remote.health().await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        }
    }

    pub async fn list_employees(&self, ctx: &Context) -> ServiceResult<Sourced<Vec<Employee>>> {
        if let Some(remote) = &ctx.remote {
            match remote.list_employees().await {
                Ok(list) => return Ok(Sourced::Remote(list)),
                Err(e) => fell_back("list_employees", &e),
            }
        }
        Ok(Sourced::Local(self.ledger.employees()?))
    }

    // ── Tasks ─────────────────────────────────────────────────

    pub async fn list_tasks(&self, ctx: &Context, assignee: Option<&str>) -> ServiceResult<Sourced<Vec<Task>>> {
        if let Some(remote) = &ctx.remote {
            match remote.list_tasks(assignee).await {
                Ok(list) => return Ok(Sourced::Remote(list)),
                Err(e) => fell_back("list_tasks", &e),
            }
        }
        Ok(Sourced::Local(self.ledger.tasks(assignee)?))
    }

    /// Create (no id) or replace (id) a task.
    ///
    /// New tasks always start "To Do". Replacing an id that doesn't
    /// exist stores nothing and yields `None`.
    pub async fn save_task(&self, ctx: &Context, draft: TaskDraft) -> ServiceResult<Sourced<Option<Task>>> {
        if let Some(remote) = &ctx.remote {
            let attempt = match draft.id {
                Some(id) => remote.update_task(id, &draft).await,
                None => remote.create_task(&draft).await,
            };
            match attempt {
                Ok(task) => return Ok(Sourced::Remote(Some(task))),
                Err(e) => fell_back("save_task", &e),
            }
        }
        let stored = match draft.id {
            Some(id) => self.ledger.replace_task(id, draft)?,
            None => Some(self.ledger.create_task(draft, InitialStatus::ToDo)?),
        };
        Ok(Sourced::Local(stored))
    }

    /// Remove a task. Missing ids are fine; this always reports success.
    pub async fn delete_task(&self, ctx: &Context, id: TaskId) -> ServiceResult<Sourced<bool>> {
        if let Some(remote) = &ctx.remote {
            match remote.delete_task(id).await {
                Ok(()) => return Ok(Sourced::Remote(true)),
                Err(e) => fell_back("delete_task", &e),
            }
        }
        if !self.ledger.delete_task(id)? {
            tracing::debug!(task_id = id, "delete of unknown task ignored");
        }
        Ok(Sourced::Local(true))
    }

    /// Overwrite a task's status. Under `StatusPolicy::Loose` any status
    /// may follow any other; `Strict` applies the lifecycle on the local
    /// path. A backend refusal comes back as `ServiceError::Rejected`.
    pub async fn set_task_status(
        &self,
        ctx: &Context,
        id: TaskId,
        status: TaskStatus,
    ) -> ServiceResult<Sourced<Option<Task>>> {
        if let Some(remote) = &ctx.remote {
            match remote.set_task_status(id, status).await {
                Ok(task) => return Ok(Sourced::Remote(Some(task))),
                // Writing it locally anyway would split the two stores
                Err(e) if e.is_rejection() => {
                    return Err(ServiceError::Rejected {
                        id,
                        to: status,
                        reason: e.to_string(),
                    })
                }
                Err(e) => fell_back("set_task_status", &e),
            }
        }
        Ok(Sourced::Local(self.ledger.set_task_status(id, status, ctx.policy)?))
    }

    pub async fn accept_task(&self, ctx: &Context, id: TaskId) -> ServiceResult<Sourced<Option<Task>>> {
        self.set_task_status(ctx, id, TaskStatus::ToDo).await
    }

    /// Decline a task and try to hand it to the least-loaded teammate.
    ///
    /// The task is marked Declined first, so it still counts against the
    /// decliner's load. Only a teammate with strictly fewer active tasks
    /// takes it over, as Pending Acceptance; on a tie it stays Declined.
    /// `None` if the task doesn't exist.
    pub async fn decline_task(&self, ctx: &Context, id: TaskId) -> ServiceResult<Option<DeclineOutcome>> {
        let Some(declined) = self
            .set_task_status(ctx, id, TaskStatus::Declined)
            .await?
            .into_inner()
        else {
            return Ok(None);
        };

        let employees = self.list_employees(ctx).await?.into_inner();
        let Some(current) = employees.iter().find(|e| e.id == declined.assigned_to_id) else {
            tracing::info!(task_id = id, assignee = %declined.assigned_to_id, "assignee not on roster, task stays declined");
            return Ok(Some(DeclineOutcome::Declined(declined)));
        };

        let tasks = self.list_tasks(ctx, None).await?.into_inner();
        let roster = balancer::department_roster(&employees, &current.dept);
        let next = match balancer::lighter_than(&roster, &tasks, &current.id) {
            Some(next) => next,
            None => {
                tracing::info!(task_id = id, dept = %current.dept, "no better assignee, task stays declined");
                return Ok(Some(DeclineOutcome::Declined(declined)));
            }
        };

        let mut task = declined;
        task.assign(next);
        task.status = TaskStatus::PendingAcceptance;

        match self.save_task(ctx, task.into()).await?.into_inner() {
            Some(saved) => {
                tracing::info!(task_id = id, from = %current.id, to = %saved.assigned_to_id, "task reassigned");
                Ok(Some(DeclineOutcome::Reassigned(saved)))
            }
            // Deleted between the two writes.
            None => Ok(None),
        }
    }

    // ── Leaves ────────────────────────────────────────────────

    pub async fn list_leaves(&self, ctx: &Context, employee_id: Option<&str>) -> ServiceResult<Sourced<Vec<Leave>>> {
        if let Some(remote) = &ctx.remote {
            match remote.list_leaves(employee_id).await {
                Ok(list) => return Ok(Sourced::Remote(list)),
                Err(e) => fell_back("list_leaves", &e),
            }
        }
        Ok(Sourced::Local(self.ledger.leaves(employee_id)?))
    }

    pub async fn apply_leave(&self, ctx: &Context, draft: LeaveDraft) -> ServiceResult<Sourced<Leave>> {
        if let Some(remote) = &ctx.remote {
            match remote.apply_leave(&draft).await {
                Ok(leave) => return Ok(Sourced::Remote(leave)),
                Err(e) => fell_back("apply_leave", &e),
            }
        }
        Ok(Sourced::Local(self.ledger.apply_leave(draft)?))
    }

    pub async fn set_leave_status(
        &self,
        ctx: &Context,
        id: LeaveId,
        status: LeaveStatus,
    ) -> ServiceResult<Sourced<Option<Leave>>> {
        if let Some(remote) = &ctx.remote {
            match remote.set_leave_status(id, status).await {
                Ok(leave) => return Ok(Sourced::Remote(Some(leave))),
                Err(e) => fell_back("set_leave_status", &e),
            }
        }
        Ok(Sourced::Local(self.ledger.set_leave_status(id, status)?))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteResult;
    use crate::seed;
    use crate::store::{Collection, CollectionStoreExt, MemoryStore};
    use async_trait::async_trait;
    use reqwest::{Method, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const KWESI: &str = "CSC/22/01/0011";
    const MICHELLE: &str = "CSC/22/01/1073";
    const SELASI: &str = "CSC/22/01/1883";

    fn service() -> OfficeService {
        let store = Arc::new(MemoryStore::new());
        seed::ensure_seeded(store.as_ref()).unwrap();
        OfficeService::new(Arc::new(Ledger::new(store)))
    }

    fn draft_for(title: &str, assignee: &Employee) -> TaskDraft {
        TaskDraft {
            id: None,
            title: title.into(),
            assigned_to: assignee.name.clone(),
            assigned_to_id: assignee.id.clone(),
            due_date: "2023-11-20".into(),
            priority: Priority::Medium,
            status: None,
        }
    }

    fn employee(svc: &OfficeService, id: &str) -> Employee {
        svc.ledger().employees().unwrap().into_iter().find(|e| e.id == id).unwrap()
    }

    /// Remote that fails every call, counting attempts.
    #[derive(Default)]
    struct DeadRemote {
        calls: AtomicUsize,
        /// Answer 409 instead of 503.
        refuses: bool,
    }

    impl DeadRemote {
        fn refusing() -> Self {
            DeadRemote {
                refuses: true,
                ..DeadRemote::default()
            }
        }

        fn fail<T>(&self) -> RemoteResult<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.refuses {
                return Err(RemoteError::Rejected {
                    path: "/tasks/3/status".into(),
                    message: "task 3: Completed → To Do is not an allowed transition".into(),
                });
            }
            Err(RemoteError::Status {
                method: Method::GET,
                path: "/".into(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            })
        }
    }

    #[async_trait]
    impl RemoteBackend for DeadRemote {
        async fn health(&self) -> RemoteResult<bool> { self.fail() }
        async fn list_employees(&self) -> RemoteResult<Vec<Employee>> { self.fail() }
        async fn list_tasks(&self, _: Option<&str>) -> RemoteResult<Vec<Task>> { self.fail() }
        async fn create_task(&self, _: &TaskDraft) -> RemoteResult<Task> { self.fail() }
        async fn update_task(&self, _: TaskId, _: &TaskDraft) -> RemoteResult<Task> { self.fail() }
        async fn set_task_status(&self, _: TaskId, _: TaskStatus) -> RemoteResult<Task> { self.fail() }
        async fn delete_task(&self, _: TaskId) -> RemoteResult<()> { self.fail() }
        async fn list_leaves(&self, _: Option<&str>) -> RemoteResult<Vec<Leave>> { self.fail() }
        async fn apply_leave(&self, _: &LeaveDraft) -> RemoteResult<Leave> { self.fail() }
        async fn set_leave_status(&self, _: LeaveId, _: LeaveStatus) -> RemoteResult<Leave> { self.fail() }
    }

    /// Remote that serves a fixed task list and refuses everything else.
    struct FixedRemote {
        tasks: Vec<Task>,
    }

    #[async_trait]
    impl RemoteBackend for FixedRemote {
        async fn health(&self) -> RemoteResult<bool> { Ok(true) }
        async fn list_employees(&self) -> RemoteResult<Vec<Employee>> { Ok(seed::employees()) }
        async fn list_tasks(&self, _: Option<&str>) -> RemoteResult<Vec<Task>> { Ok(self.tasks.clone()) }
        async fn create_task(&self, _: &TaskDraft) -> RemoteResult<Task> { DeadRemote::default().fail() }
        async fn update_task(&self, _: TaskId, _: &TaskDraft) -> RemoteResult<Task> { DeadRemote::default().fail() }
        async fn set_task_status(&self, _: TaskId, _: TaskStatus) -> RemoteResult<Task> { DeadRemote::default().fail() }
        async fn delete_task(&self, _: TaskId) -> RemoteResult<()> { DeadRemote::default().fail() }
        async fn list_leaves(&self, _: Option<&str>) -> RemoteResult<Vec<Leave>> { DeadRemote::default().fail() }
        async fn apply_leave(&self, _: &LeaveDraft) -> RemoteResult<Leave> { DeadRemote::default().fail() }
        async fn set_leave_status(&self, _: LeaveId, _: LeaveStatus) -> RemoteResult<Leave> { DeadRemote::default().fail() }
    }

    #[tokio::test]
    async fn decline_moves_task_to_less_loaded_teammate() {
        let svc = service();
        let ctx = Context::local_only();
        let kwesi = employee(&svc, KWESI);

        // Kwesi (IT) carries "Update Website" plus one more; Michelle (IT) has one
        let extra = svc.save_task(&ctx, draft_for("Patch laptops", &kwesi)).await.unwrap().into_inner().unwrap();
        let outcome = svc.decline_task(&ctx, extra.id).await.unwrap().unwrap();

        let DeclineOutcome::Reassigned(task) = outcome else {
            panic!("expected reassignment, got {outcome:?}");
        };
        assert_eq!(task.assigned_to_id, MICHELLE);
        assert_eq!(task.assigned_to, "Michelle Nana Akua Arhin");
        assert_eq!(task.status, TaskStatus::PendingAcceptance);

        let stored = svc.list_tasks(&ctx, None).await.unwrap().into_inner();
        assert_eq!(stored.iter().find(|t| t.id == extra.id), Some(&task));
    }

    #[tokio::test]
    async fn sole_department_member_keeps_declined_task() {
        let svc = service();
        let ctx = Context::local_only();
        let selasi = employee(&svc, SELASI);

        let task = svc.save_task(&ctx, draft_for("Brand refresh", &selasi)).await.unwrap().into_inner().unwrap();
        let outcome = svc.decline_task(&ctx, task.id).await.unwrap().unwrap();

        let DeclineOutcome::Declined(task) = outcome else {
            panic!("expected no reassignment, got {outcome:?}");
        };
        assert_eq!(task.status, TaskStatus::Declined);
        assert_eq!(task.assigned_to_id, SELASI);
    }

    #[tokio::test]
    async fn teammate_with_no_tasks_takes_the_declined_one() {
        let store = Arc::new(MemoryStore::new());
        let a = Employee {
            id: "CSC/23/02/0001".into(),
            name: "A".into(),
            dept: "IT".into(),
            position: "Dev".into(),
            email: "a@smartoffice.com".into(),
            phone: "1".into(),
            role: Role::Employee,
        };
        let b = Employee {
            id: "CSC/23/02/0002".into(),
            name: "B".into(),
            ..a.clone()
        };
        store.write(Collection::Employees, &[a.clone(), b.clone()]).unwrap();
        let svc = OfficeService::new(Arc::new(Ledger::new(store)));
        let ctx = Context::local_only();

        let t = svc.save_task(&ctx, draft_for("T", &a)).await.unwrap().into_inner().unwrap();
        svc.save_task(&ctx, draft_for("other", &a)).await.unwrap();

        let outcome = svc.decline_task(&ctx, t.id).await.unwrap().unwrap();
        assert_eq!(outcome.task().assigned_to_id, b.id);
        assert_eq!(outcome.task().status, TaskStatus::PendingAcceptance);
    }

    #[tokio::test]
    async fn decliner_winning_the_tie_keeps_the_task() {
        let svc = service();
        let ctx = Context::local_only();
        // Michelle now carries two tasks; Kwesi still carries task 1, which
        // counts against him even once declined.
        let michelle = employee(&svc, MICHELLE);
        svc.save_task(&ctx, draft_for("Rack cabling", &michelle)).await.unwrap();

        let outcome = svc.decline_task(&ctx, 1).await.unwrap().unwrap();
        assert!(matches!(outcome, DeclineOutcome::Declined(ref t) if t.assigned_to_id == KWESI));
    }

    #[tokio::test]
    async fn equally_loaded_teammate_earlier_in_roster_does_not_take_it() {
        let svc = service();
        let ctx = Context::local_only();
        // Michelle declines "Fix Server Issue"; Kwesi comes first in IT and
        // also carries one active task.
        let outcome = svc.decline_task(&ctx, 4).await.unwrap().unwrap();

        let DeclineOutcome::Declined(task) = outcome else {
            panic!("a tie must not reassign, got {outcome:?}");
        };
        assert_eq!(task.assigned_to_id, MICHELLE);
        assert_eq!(task.status, TaskStatus::Declined);

        let stored = svc.ledger().tasks(Some(KWESI)).unwrap();
        assert!(stored.iter().all(|t| t.id != 4));
    }

    #[tokio::test]
    async fn decline_unknown_task_is_none() {
        let svc = service();
        assert!(svc.decline_task(&Context::local_only(), 777).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_list_round_trips() {
        let svc = service();
        let ctx = Context::local_only();
        let selasi = employee(&svc, SELASI);

        let created = svc.save_task(&ctx, draft_for("Press release", &selasi)).await.unwrap();
        assert!(created.is_local());
        let created = created.into_inner().unwrap();
        assert_eq!(created.status, TaskStatus::ToDo);

        let listed = svc.list_tasks(&ctx, Some(SELASI)).await.unwrap().into_inner();
        assert_eq!(listed, vec![created.clone()]);

        let mut edit = TaskDraft::from(created.clone());
        edit.title = "Press release (final)".into();
        let edited = svc.save_task(&ctx, edit).await.unwrap().into_inner().unwrap();
        assert_eq!(edited.id, created.id);
        assert_eq!(edited.title, "Press release (final)");
    }

    #[tokio::test]
    async fn create_ignores_caller_status() {
        let svc = service();
        let ctx = Context::local_only();
        let mut draft = draft_for("Sneaky", &employee(&svc, SELASI));
        draft.status = Some(TaskStatus::Completed);
        let task = svc.save_task(&ctx, draft).await.unwrap().into_inner().unwrap();
        assert_eq!(task.status, TaskStatus::ToDo);
    }

    #[tokio::test]
    async fn saving_unknown_id_stores_nothing() {
        let svc = service();
        let ctx = Context::local_only();
        let mut draft = draft_for("Ghost", &employee(&svc, SELASI));
        draft.id = Some(31337);
        assert_eq!(svc.save_task(&ctx, draft).await.unwrap(), Sourced::Local(None));
        assert_eq!(svc.list_tasks(&ctx, None).await.unwrap().into_inner().len(), 4);
    }

    #[tokio::test]
    async fn delete_then_list_never_shows_the_id() {
        let svc = service();
        let ctx = Context::local_only();
        assert!(svc.delete_task(&ctx, 2).await.unwrap().into_inner());
        let ids: Vec<TaskId> = svc.list_tasks(&ctx, None).await.unwrap().into_inner().iter().map(|t| t.id).collect();
        assert!(!ids.contains(&2));

        // Again: still fine
        assert!(svc.delete_task(&ctx, 2).await.unwrap().into_inner());
    }

    #[tokio::test]
    async fn accept_moves_to_to_do() {
        let svc = service();
        let ctx = Context::local_only();
        let task = svc.accept_task(&ctx, 2).await.unwrap().into_inner().unwrap();
        assert_eq!(task.status, TaskStatus::ToDo);
    }

    #[tokio::test]
    async fn strict_context_rejects_illegal_transition() {
        let svc = service();
        let ctx = Context::local_only().strict();
        let err = svc.set_task_status(&ctx, 3, TaskStatus::InProgress).await.unwrap_err();
        assert!(matches!(err, ServiceError::IllegalTransition { .. }));

        // The same call is fine in loose mode
        let loose = Context::local_only();
        assert!(svc.set_task_status(&loose, 3, TaskStatus::InProgress).await.unwrap().into_inner().is_some());
    }

    #[tokio::test]
    async fn backend_refusal_is_returned_not_written_locally() {
        let svc = service();
        let ctx = Context::with_remote(Arc::new(DeadRemote::refusing()));

        let err = svc.set_task_status(&ctx, 3, TaskStatus::ToDo).await.unwrap_err();
        assert!(matches!(err, ServiceError::Rejected { id: 3, to: TaskStatus::ToDo, .. }));

        let task = svc.ledger().tasks(None).unwrap().into_iter().find(|t| t.id == 3).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);

        // Decline goes through the same status change
        assert!(matches!(svc.decline_task(&ctx, 3).await, Err(ServiceError::Rejected { .. })));
    }

    #[tokio::test]
    async fn failing_remote_falls_back_for_every_call() {
        let svc = service();
        let dead = Arc::new(DeadRemote::default());
        let ctx = Context::with_remote(dead.clone());

        let tasks = svc.list_tasks(&ctx, None).await.unwrap();
        assert!(tasks.is_local());
        assert_eq!(tasks.get().len(), 4);

        let leaves = svc.list_leaves(&ctx, Some("CSC/22/01/0217")).await.unwrap();
        assert_eq!(leaves.get().len(), 1);

        let leave = svc
            .apply_leave(
                &ctx,
                LeaveDraft {
                    employee_id: SELASI.into(),
                    name: "Selasi Ahiaku".into(),
                    kind: "Vacation".into(),
                    start_date: "2024-02-01".into(),
                    end_date: "2024-02-03".into(),
                },
            )
            .await
            .unwrap();
        assert!(leave.is_local());
        assert_eq!(leave.get().status, LeaveStatus::Pending);

        let rejected = svc.set_leave_status(&ctx, leave.get().id, LeaveStatus::Rejected).await.unwrap();
        assert_eq!(rejected.into_inner().unwrap().status, LeaveStatus::Rejected);

        assert!(!svc.backend_health(&ctx).await);
        // Not cached: each call went to the remote first
        assert_eq!(dead.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn decline_through_dead_remote_still_reassigns_locally() {
        let svc = service();
        let ctx = Context::with_remote(Arc::new(DeadRemote::default()));
        let kwesi = employee(&svc, KWESI);
        let extra = svc.save_task(&ctx, draft_for("Patch laptops", &kwesi)).await.unwrap().into_inner().unwrap();

        let outcome = svc.decline_task(&ctx, extra.id).await.unwrap().unwrap();
        assert_eq!(outcome.task().assigned_to_id, MICHELLE);
    }

    #[tokio::test]
    async fn healthy_remote_answers_without_touching_local() {
        let svc = service();
        let remote_tasks = vec![seed::tasks().remove(0)];
        let ctx = Context::with_remote(Arc::new(FixedRemote { tasks: remote_tasks.clone() }));

        let tasks = svc.list_tasks(&ctx, None).await.unwrap();
        assert_eq!(tasks, Sourced::Remote(remote_tasks));
        assert!(svc.backend_health(&ctx).await);

        // Writes the fixed remote refuses land locally
        let deleted = svc.delete_task(&ctx, 4).await.unwrap();
        assert!(deleted.is_local());
        assert_eq!(svc.ledger().tasks(None).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn local_only_context_reports_unhealthy_backend() {
        assert!(!service().backend_health(&Context::local_only()).await);
    }
}
