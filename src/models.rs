use serde::{Deserialize, Serialize};

pub type TaskId = u64;
pub type LeaveId = u64;

// ── People ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

/// Seeded once, never edited by the core. `id` looks like `CSC/22/01/0011`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub dept: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
}

/// The single logged-in session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub email: String,
}

// ── Tasks ─────────────────────────────────────────────────────

/// Task status.
///
/// Intended lifecycle (only enforced under `StatusPolicy::Strict`):
///
/// ```text
/// To Do → In Progress → Completed
/// Pending Acceptance → To Do (accepted)
/// Pending Acceptance → Declined → Pending Acceptance (reassigned)
/// ```
///
/// Completed is terminal. Declined is transient: the balancer moves the
/// task straight back to Pending Acceptance when it finds someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    // Old server seeds wrote plain "Pending".
    #[serde(rename = "Pending Acceptance", alias = "Pending")]
    PendingAcceptance,
    Declined,
    Completed,
}

impl TaskStatus {
    /// Anything not Completed counts against an employee's load.
    pub fn is_active(self) -> bool {
        self != TaskStatus::Completed
    }

    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (ToDo, InProgress)
                | (InProgress, Completed)
                | (PendingAcceptance, ToDo)
                | (PendingAcceptance, Declined)
                | (Declined, PendingAcceptance)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::PendingAcceptance => "Pending Acceptance",
            TaskStatus::Declined => "Declined",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "to do" | "todo" => Ok(TaskStatus::ToDo),
            "in progress" => Ok(TaskStatus::InProgress),
            "pending acceptance" | "pending" => Ok(TaskStatus::PendingAcceptance),
            "declined" => Ok(TaskStatus::Declined),
            "completed" | "done" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority `{other}`")),
        }
    }
}

/// A stored task. `assigned_to` is the assignee's display name, kept in
/// step with `assigned_to_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub assigned_to: String,
    pub assigned_to_id: String,
    pub due_date: String,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl Task {
    pub fn assign(&mut self, employee: &Employee) {
        self.assigned_to_id = employee.id.clone();
        self.assigned_to = employee.name.clone();
    }
}

/// What a caller hands to `save_task`. No id means create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub title: String,
    pub assigned_to: String,
    pub assigned_to_id: String,
    pub due_date: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl From<Task> for TaskDraft {
    fn from(task: Task) -> Self {
        TaskDraft {
            id: Some(task.id),
            title: task.title,
            assigned_to: task.assigned_to,
            assigned_to_id: task.assigned_to_id,
            due_date: task.due_date,
            priority: task.priority,
            status: Some(task.status),
        }
    }
}

/// Partial update body for `PUT /tasks/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_to_id: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(assigned_to_id) = self.assigned_to_id {
            task.assigned_to_id = assigned_to_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusBody<S> {
    pub status: S,
}

// ── Leave ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::str::FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            other => Err(format!("unknown leave status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: LeaveId,
    pub employee_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: String,
    pub end_date: String,
    pub status: LeaveStatus,
}

/// A leave application. Id and status are always decided by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDraft {
    pub employee_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: String,
    pub end_date: String,
}

// ── Attendance, documents, finances ───────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub date: String,
    pub employee_id: String,
    pub name: String,
    pub status: AttendanceStatus,
    pub time_in: String,
    pub time_out: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub file_name: String,
    pub category: String,
    pub description: String,
    pub visibility: String,
    pub uploaded_by: String,
    pub upload_date: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRecord {
    pub id: String,
    pub date: String,
    pub category: String,
    pub department: String,
    pub description: String,
    pub amount: String,
    pub status: String,
    pub submitted_by: String,
    #[serde(default)]
    pub version_history: Vec<serde_json::Value>,
}
