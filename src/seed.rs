//! Bootstrap dataset and first-run seeding.

use crate::models::*;
use crate::store::{Collection, CollectionStore, CollectionStoreExt, StoreResult, SCHEMA_KEY};

/// Bumped whenever the bootstrap data changes shape.
pub const SCHEMA_VERSION: u64 = 1;

/// Employee ids issued by the seed all carry this prefix.
const EMPLOYEE_ID_PREFIX: &str = "CSC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Marker present and current; nothing touched.
    AlreadySeeded,
    /// Unmarked store whose data looks like ours; kept as-is and marked.
    Adopted,
    /// All data collections replaced with the bootstrap set.
    Seeded,
}

/// Seed the store once.
///
/// A store carrying the current schema marker is left alone. An unmarked
/// store is reseeded only if it has no employees or its first employee id
/// lacks the `CSC` prefix; otherwise its data is adopted. Either way the
/// marker is written, so the prefix check runs at most once per store.
pub fn ensure_seeded(store: &dyn CollectionStore) -> StoreResult<SeedOutcome> {
    let marker = store.get(SCHEMA_KEY)?.and_then(|v| v.as_u64());
    if marker.is_some_and(|v| v >= SCHEMA_VERSION) {
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let outcome = if marker.is_none() && looks_seeded(store)? {
        SeedOutcome::Adopted
    } else {
        write_bootstrap(store)?;
        SeedOutcome::Seeded
    };

    store.put(SCHEMA_KEY, serde_json::json!(SCHEMA_VERSION))?;
    tracing::info!(?outcome, schema = SCHEMA_VERSION, "store seed check done");
    Ok(outcome)
}

fn looks_seeded(store: &dyn CollectionStore) -> StoreResult<bool> {
    // Read loosely: a foreign dataset may not fit the Employee shape at all.
    let employees: Vec<serde_json::Value> = match store.read(Collection::Employees) {
        Ok(list) => list,
        Err(_) => return Ok(false),
    };
    Ok(employees
        .first()
        .and_then(|e| e.get("id"))
        .and_then(|id| id.as_str())
        .is_some_and(|id| id.starts_with(EMPLOYEE_ID_PREFIX)))
}

fn write_bootstrap(store: &dyn CollectionStore) -> StoreResult<()> {
    store.write(Collection::Employees, &employees())?;
    store.write(Collection::Attendance, &attendance())?;
    store.write(Collection::Leaves, &leaves())?;
    store.write(Collection::Tasks, &tasks())?;
    store.write(Collection::Documents, &documents())?;
    store.write(Collection::Finances, &finances())?;
    Ok(())
}

// ── Bootstrap data ────────────────────────────────────────────

fn employee(id: &str, name: &str, dept: &str, position: &str, email: &str, phone: &str) -> Employee {
    Employee {
        id: id.into(),
        name: name.into(),
        dept: dept.into(),
        position: position.into(),
        email: email.into(),
        phone: phone.into(),
        role: Role::Employee,
    }
}

pub fn employees() -> Vec<Employee> {
    vec![
        employee("CSC/22/01/0011", "Kwesi Essel Turkson", "IT", "Developer", "kwesi.turkson@smartoffice.com", "123-456-7890"),
        employee("CSC/22/01/0349", "Ellis Fafali Gbewordo", "HR", "Manager", "ellis.gbewordo@smartoffice.com", "098-765-4321"),
        employee("CSC/22/01/0217", "Theophilus Tettey Charwetey Martey", "Finance", "Analyst", "theophilus.martey@smartoffice.com", "555-555-5555"),
        employee("CSC/22/01/1883", "Selasi Ahiaku", "Marketing", "Lead", "selasi.ahiaku@smartoffice.com", "111-222-3333"),
        employee("CSC/22/01/1073", "Michelle Nana Akua Arhin", "IT", "SysAdmin", "michelle.arhin@smartoffice.com", "444-444-4444"),
    ]
}

pub fn attendance() -> Vec<AttendanceRecord> {
    let record = |id, employee_id: &str, name: &str, status, time_in: &str, time_out: &str| AttendanceRecord {
        id: Some(id),
        date: "2023-10-25".into(),
        employee_id: employee_id.into(),
        name: name.into(),
        status,
        time_in: time_in.into(),
        time_out: time_out.into(),
    };
    vec![
        record(1, "CSC/22/01/0011", "Kwesi Essel Turkson", AttendanceStatus::Present, "09:00", "17:00"),
        record(2, "CSC/22/01/0349", "Ellis Fafali Gbewordo", AttendanceStatus::Present, "08:55", "17:10"),
        record(3, "CSC/22/01/0217", "Theophilus Tettey Charwetey Martey", AttendanceStatus::Absent, "-", "-"),
    ]
}

pub fn leaves() -> Vec<Leave> {
    vec![
        Leave {
            id: 1,
            employee_id: "CSC/22/01/0011".into(),
            name: "Kwesi Essel Turkson".into(),
            kind: "Sick Leave".into(),
            start_date: "2023-11-01".into(),
            end_date: "2023-11-02".into(),
            status: LeaveStatus::Approved,
        },
        Leave {
            id: 2,
            employee_id: "CSC/22/01/0217".into(),
            name: "Theophilus Tettey Charwetey Martey".into(),
            kind: "Vacation".into(),
            start_date: "2023-12-15".into(),
            end_date: "2023-12-20".into(),
            status: LeaveStatus::Pending,
        },
    ]
}

pub fn tasks() -> Vec<Task> {
    let task = |id, title: &str, name: &str, emp: &str, due: &str, status, priority| Task {
        id,
        title: title.into(),
        assigned_to: name.into(),
        assigned_to_id: emp.into(),
        due_date: due.into(),
        priority,
        status,
    };
    vec![
        task(1, "Update Website", "Kwesi Essel Turkson", "CSC/22/01/0011", "2023-10-30", TaskStatus::InProgress, Priority::High),
        task(2, "Payroll Processing", "Theophilus Tettey Charwetey Martey", "CSC/22/01/0217", "2023-10-28", TaskStatus::PendingAcceptance, Priority::Medium),
        task(3, "Recruitment Drive", "Ellis Fafali Gbewordo", "CSC/22/01/0349", "2023-11-05", TaskStatus::Completed, Priority::High),
        task(4, "Fix Server Issue", "Michelle Nana Akua Arhin", "CSC/22/01/1073", "2023-10-29", TaskStatus::ToDo, Priority::High),
    ]
}

pub fn documents() -> Vec<Document> {
    let doc = |id: &str, file: &str, category: &str, description: &str, visibility: &str, by: &str, date: &str, size: &str| Document {
        id: id.into(),
        file_name: file.into(),
        category: category.into(),
        description: description.into(),
        visibility: visibility.into(),
        uploaded_by: by.into(),
        upload_date: date.into(),
        size: size.into(),
    };
    vec![
        doc("1", "Employee-Handbook.pdf", "Policies", "Company employee handbook and guidelines", "Company", "Admin User", "2023-10-01", "3.2 MB"),
        doc("2", "Q3-Financial-Report.pdf", "Finance", "Q3 2023 financial performance report", "Private", "Admin User", "2023-10-15", "5.1 MB"),
        doc("3", "Project-Charter.docx", "Projects", "New project initiative charter and scope", "Department", "Ellis Fafali Gbewordo", "2023-10-20", "1.8 MB"),
    ]
}

pub fn finances() -> Vec<FinanceRecord> {
    let entry = |id: &str, date: &str, category: &str, dept: &str, description: &str, amount: &str, status: &str, by: &str| FinanceRecord {
        id: id.into(),
        date: date.into(),
        category: category.into(),
        department: dept.into(),
        description: description.into(),
        amount: amount.into(),
        status: status.into(),
        submitted_by: by.into(),
        version_history: Vec::new(),
    };
    vec![
        entry("1", "2023-10-15", "Salaries", "IT", "October payroll processing", "15000", "Approved", "Admin User"),
        entry("2", "2023-10-18", "Equipment", "IT", "Laptop purchases for new hires", "3500", "Pending", "Michelle Nana Akua Arhin"),
        entry("3", "2023-10-20", "Training", "HR", "Professional development courses", "2500", "Approved", "Ellis Fafali Gbewordo"),
    ]
}

// ── Tests ──────────────────────────────────────────────────────
