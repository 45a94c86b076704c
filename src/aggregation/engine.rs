//! Snapshot queries: name search, highest salary, top earners.
//!
//! Every function takes the snapshot exactly as the upstream listed it. Order
//! is significant: search results keep it and salary ties fall back to it.

use std::cmp::Reverse;

use crate::employees::Employee;

/// Employees whose name contains `fragment`, ignoring case, in snapshot order.
///
/// Nameless employees never match. An empty fragment matches every named one.
pub fn search_by_name_fragment(snapshot: &[Employee], fragment: &str) -> Vec<Employee> {
    let needle = fragment.to_lowercase();
    snapshot
        .iter()
        .filter(|e| {
            e.name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Highest salary in the snapshot, or 0 when it is empty.
///
/// 0 doubles as "no data"; real salaries start at 1.
pub fn max_salary(snapshot: &[Employee]) -> u32 {
    snapshot.iter().map(|e| e.salary).max().unwrap_or(0)
}

/// Names of the `n` best paid employees, highest salary first.
///
/// Equal salaries keep their snapshot order (`sort_by_key` is stable).
pub fn top_n_earning_names(snapshot: &[Employee], n: usize) -> Vec<Option<String>> {
    let mut ranked: Vec<&Employee> = snapshot.iter().collect();
    ranked.sort_by_key(|e| Reverse(e.salary));
    ranked.into_iter().take(n).map(|e| e.name.clone()).collect()
}
