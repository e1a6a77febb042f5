//! Search filters and dashboard counters.

use crate::models::{AttendanceRecord, AttendanceStatus, Task, TaskStatus};
use serde::Serialize;

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Tasks whose title, assignee name, priority or status contains `query`,
/// ignoring case. An empty query keeps everything.
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    tasks
        .iter()
        .filter(|t| {
            needle.is_empty()
                || contains_ci(&t.title, &needle)
                || contains_ci(&t.assigned_to, &needle)
                || contains_ci(t.priority.label(), &needle)
                || contains_ci(t.status.label(), &needle)
        })
        .collect()
}

/// Attendance records matching on name, employee id or status.
pub fn filter_attendance<'a>(records: &'a [AttendanceRecord], query: &str) -> Vec<&'a AttendanceRecord> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| {
            needle.is_empty()
                || contains_ci(&r.name, &needle)
                || contains_ci(&r.employee_id, &needle)
                || contains_ci(r.status.label(), &needle)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
}

impl TaskStats {
    pub fn count<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(TaskStats::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                _ => {}
            }
            stats
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub records: usize,
}

impl AttendanceStats {
    pub fn count<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        records.into_iter().fold(AttendanceStats::default(), |mut stats, record| {
            stats.records += 1;
            match record.status {
                AttendanceStatus::Present => stats.present += 1,
                AttendanceStatus::Absent => stats.absent += 1,
                AttendanceStatus::Late => stats.late += 1,
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn empty_query_matches_everything() {
        let tasks = seed::tasks();
        assert_eq!(filter_tasks(&tasks, "").len(), 4);
        assert_eq!(filter_tasks(&tasks, "   ").len(), 4);
    }

    #[test]
    fn task_filter_is_case_insensitive_across_fields() {
        let tasks = seed::tasks();
        let by_title: Vec<_> = filter_tasks(&tasks, "WEBSITE").iter().map(|t| t.id).collect();
        assert_eq!(by_title, vec![1]);

        let by_assignee: Vec<_> = filter_tasks(&tasks, "michelle").iter().map(|t| t.id).collect();
        assert_eq!(by_assignee, vec![4]);

        // "High" priority on 1, 3 and 4
        assert_eq!(filter_tasks(&tasks, "high").len(), 3);
        assert_eq!(filter_tasks(&tasks, "pending acc").len(), 1);
        assert!(filter_tasks(&tasks, "nothing like this").is_empty());
    }

    #[test]
    fn task_stats_count_filtered_slice() {
        let tasks = seed::tasks();
        let all = TaskStats::count(&tasks);
        assert_eq!(
            all,
            TaskStats {
                total: 4,
                completed: 1,
                in_progress: 1
            }
        );

        let high = TaskStats::count(filter_tasks(&tasks, "high"));
        assert_eq!(high.total, 3);
        assert_eq!(high.completed, 1);
    }

    #[test]
    fn attendance_filter_and_stats() {
        let records = seed::attendance();
        assert_eq!(
            AttendanceStats::count(&records),
            AttendanceStats {
                present: 2,
                absent: 1,
                late: 0,
                records: 3
            }
        );

        let absent = filter_attendance(&records, "absent");
        assert_eq!(absent.len(), 1);
        assert_eq!(absent[0].employee_id, "CSC/22/01/0217");

        assert_eq!(filter_attendance(&records, "csc/22/01/03").len(), 1);
    }
}
