//! Least-loaded teammate selection for declined tasks.

use crate::models::{Employee, Task};

/// Employees of `dept`, in roster order.
pub fn department_roster<'a>(employees: &'a [Employee], dept: &str) -> Vec<&'a Employee> {
    employees.iter().filter(|e| e.dept == dept).collect()
}

/// Number of non-completed tasks assigned to `employee_id`.
pub fn active_load(tasks: &[Task], employee_id: &str) -> usize {
    tasks
        .iter()
        .filter(|t| t.assigned_to_id == employee_id && t.status.is_active())
        .count()
}

/// Pick the roster member with the fewest active tasks.
///
/// Ties go to whoever comes first in the roster. Returns `None` only for
/// an empty roster. The caller must check whether the winner is the
/// person who just declined.
pub fn least_loaded<'a>(roster: &[&'a Employee], tasks: &[Task]) -> Option<&'a Employee> {
    let mut best: Option<(&'a Employee, usize)> = None;
    for &employee in roster {
        let load = active_load(tasks, &employee.id);
        match best {
            Some((_, min)) if load >= min => {}
            _ => best = Some((employee, load)),
        }
    }
    best.map(|(employee, _)| employee)
}

/// The least-loaded roster member, but only if they carry strictly fewer
/// active tasks than `employee_id` does. A tie keeps the work where it is.
pub fn lighter_than<'a>(roster: &[&'a Employee], tasks: &[Task], employee_id: &str) -> Option<&'a Employee> {
    let current = active_load(tasks, employee_id);
    least_loaded(roster, tasks).filter(|next| active_load(tasks, &next.id) < current)
}
