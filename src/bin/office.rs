//! `office`: command-line client for the SmartOffice service.
//!
//! Talks to the REST server when one is configured and falls back to a
//! local redb store whenever it can't.

use clap::{Parser, Subcommand, ValueEnum};
use smartoffice_server::models::*;
use smartoffice_server::persist::LocalStore;
use smartoffice_server::remote::HttpBackend;
use smartoffice_server::session::{LoginOutcome, SessionGate};
use smartoffice_server::store::{Collection, CollectionStore};
use smartoffice_server::summary::{self, AttendanceStats, TaskStats};
use smartoffice_server::{seed, Context, DeclineOutcome, Ledger, OfficeService, Settings, Sourced};
use std::path::PathBuf;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "office", version, about = "SmartOffice tasks and leave from the terminal")]
struct Cli {
    /// Backend base URL; an empty string means local-only
    #[arg(long, global = true)]
    api: Option<String>,

    /// Local fallback store
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Enforce the task lifecycle on local status changes
    #[arg(long, global = true)]
    strict: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LoginAs {
    Admin,
    Employee,
}

impl From<LoginAs> for Role {
    fn from(value: LoginAs) -> Self {
        match value {
            LoginAs::Admin => Role::Admin,
            LoginAs::Employee => Role::Employee,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Start a session (employees: email or id, password = last 4 of id)
    Login {
        username: String,
        password: String,
        #[arg(long, value_enum, default_value = "employee")]
        role: LoginAs,
    },
    Logout,
    Whoami,
    Employees,
    Tasks {
        /// Only tasks assigned to this employee id
        #[arg(long)]
        user: Option<String>,
    },
    AddTask {
        title: String,
        /// Employee id of the assignee
        #[arg(long)]
        assignee: String,
        #[arg(long)]
        due: String,
        #[arg(long, default_value = "Medium")]
        priority: Priority,
    },
    TaskStatus {
        id: TaskId,
        status: TaskStatus,
    },
    Accept {
        id: TaskId,
    },
    /// Decline a task; it moves to a teammate with strictly fewer active tasks, if any
    Decline {
        id: TaskId,
    },
    DeleteTask {
        id: TaskId,
    },
    Leaves {
        #[arg(long)]
        employee: Option<String>,
    },
    ApplyLeave {
        #[arg(long)]
        employee: String,
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    LeaveStatus {
        id: LeaveId,
        status: LeaveStatus,
    },
    /// Task and attendance counters, optionally filtered
    Stats {
        #[arg(long, default_value = "")]
        query: String,
    },
    Health,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "smartoffice_server=debug" } else { "smartoffice_server=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::load()?;
    if let Some(api) = cli.api.clone() {
        settings.api_base = api;
    }
    if let Some(path) = cli.store.clone() {
        settings.local_store_path = path;
    }

    // ── Local fallback store ───────────────────────────────────
    let store: Arc<dyn CollectionStore> = Arc::new(LocalStore::open(&settings.local_store_path, &settings.namespace)?);
    seed::ensure_seeded(store.as_ref())?;
    let ledger = Arc::new(Ledger::new(store.clone()));
    let service = OfficeService::new(ledger.clone());
    let gate = SessionGate::new(store, settings.admin.clone());

    // ── Call context ───────────────────────────────────────────
    let mut ctx = match settings.api_base() {
        Some(base) => Context::with_remote(Arc::new(HttpBackend::new(base, settings.request_timeout())?)),
        None => Context::local_only(),
    };
    if cli.strict || settings.strict_status {
        ctx = ctx.strict();
    }

    run(cli.command, &service, &gate, &ctx).await
}

async fn run(command: Command, service: &OfficeService, gate: &SessionGate, ctx: &Context) -> Result<(), BoxError> {
    match command {
        Command::Login { username, password, role } => match gate.login(role.into(), &username, &password)? {
            LoginOutcome::Success(user) => println!("Logged in as {} ({})", user.name, user.id),
            LoginOutcome::InvalidCredentials { message } => {
                eprintln!("{message}");
                std::process::exit(1);
            }
        },
        Command::Logout => {
            gate.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match gate.current_user()? {
            Some(user) => println!("{} <{}> {:?} ({})", user.name, user.email, user.role, user.id),
            None => println!("Not logged in"),
        },
        Command::Employees => {
            let employees = service.list_employees(ctx).await?;
            origin(&employees);
            for e in employees.get() {
                println!("{:<16} {:<36} {:<10} {}", e.id, e.name, e.dept, e.position);
            }
        }
        Command::Tasks { user } => {
            let tasks = service.list_tasks(ctx, user.as_deref()).await?;
            origin(&tasks);
            tasks.get().iter().for_each(print_task);
        }
        Command::AddTask { title, assignee, due, priority } => {
            let employees = service.list_employees(ctx).await?.into_inner();
            let Some(employee) = employees.iter().find(|e| e.id == assignee) else {
                return Err(format!("no employee with id {assignee}").into());
            };
            let draft = TaskDraft {
                id: None,
                title,
                assigned_to: employee.name.clone(),
                assigned_to_id: employee.id.clone(),
                due_date: due,
                priority,
                status: None,
            };
            report_task(service.save_task(ctx, draft).await?);
        }
        Command::TaskStatus { id, status } => report_task(service.set_task_status(ctx, id, status).await?),
        Command::Accept { id } => report_task(service.accept_task(ctx, id).await?),
        Command::Decline { id } => match service.decline_task(ctx, id).await? {
            Some(DeclineOutcome::Reassigned(task)) => {
                println!("Reassigned to {} ({}), awaiting acceptance", task.assigned_to, task.assigned_to_id);
                print_task(&task);
            }
            Some(DeclineOutcome::Declined(task)) => {
                println!("No teammate with a lighter load; task stays declined");
                print_task(&task);
            }
            None => println!("Task {id} not found"),
        },
        Command::DeleteTask { id } => {
            let deleted = service.delete_task(ctx, id).await?;
            origin(&deleted);
            println!("Task {id} deleted");
        }
        Command::Leaves { employee } => {
            let leaves = service.list_leaves(ctx, employee.as_deref()).await?;
            origin(&leaves);
            leaves.get().iter().for_each(print_leave);
        }
        Command::ApplyLeave { employee, kind, from, to } => {
            let employees = service.list_employees(ctx).await?.into_inner();
            let name = employees
                .iter()
                .find(|e| e.id == employee)
                .map(|e| e.name.clone())
                .ok_or_else(|| format!("no employee with id {employee}"))?;
            let draft = LeaveDraft {
                employee_id: employee,
                name,
                kind,
                start_date: from,
                end_date: to,
            };
            let leave = service.apply_leave(ctx, draft).await?;
            origin(&leave);
            print_leave(leave.get());
        }
        Command::LeaveStatus { id, status } => {
            let leave = service.set_leave_status(ctx, id, status).await?;
            origin(&leave);
            match leave.get() {
                Some(leave) => print_leave(leave),
                None => println!("Leave {id} not found"),
            }
        }
        Command::Stats { query } => {
            let tasks = service.list_tasks(ctx, None).await?;
            origin(&tasks);
            let t = TaskStats::count(summary::filter_tasks(tasks.get(), &query));
            println!("Tasks: {} total, {} completed, {} in progress", t.total, t.completed, t.in_progress);

            // Attendance has no remote endpoint
            let attendance: Vec<AttendanceRecord> = service.ledger().collection(Collection::Attendance)?;
            let a = AttendanceStats::count(summary::filter_attendance(&attendance, &query));
            println!("Attendance: {} present, {} absent, {} late of {} records", a.present, a.absent, a.late, a.records);
        }
        Command::Health => {
            if service.backend_health(ctx).await {
                println!("Backend is up");
            } else {
                println!("Backend unavailable; running on the local store");
            }
        }
    }
    Ok(())
}

fn origin<T>(result: &Sourced<T>) {
    eprintln!("({} data)", result.origin());
}

fn report_task(result: Sourced<Option<Task>>) {
    origin(&result);
    match result.get() {
        Some(task) => print_task(task),
        None => println!("Task not found"),
    }
}

fn print_task(task: &Task) {
    println!(
        "{:>14}  {:<19} {:<7} {:<10} {} → {}",
        task.id,
        task.status.label(),
        task.priority.label(),
        task.due_date,
        task.title,
        task.assigned_to
    );
}

fn print_leave(leave: &Leave) {
    println!(
        "{:>14}  {:<9} {:<14} {} .. {}  {}",
        leave.id,
        format!("{:?}", leave.status),
        leave.kind,
        leave.start_date,
        leave.end_date,
        leave.name
    );
}
