//! Evaluation order.
//!
//! Fields declaring `validate_after = A` are evaluated after field `A`. Roots
//! (no dependency) are seeded in `(order, name)` order. Each time a field is
//! taken from the front of the queue, the fields waiting on it are pushed to
//! the *front* of the queue in their own `(order, name)` order, giving a
//! depth-first walk. A field whose dependency is never scheduled (unknown
//! target or cycle) is never reached.

use crate::errors::SchemaError;
use crate::field::{FieldDescriptor, FieldId, FieldSnapshot, Snapshots};
use std::collections::{HashMap, HashSet, VecDeque};

/// Why a field can never be reached by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyIssue {
    Dangling { field: String, target: FieldId },
    Cycle { field: String },
}

impl From<DependencyIssue> for SchemaError {
    fn from(issue: DependencyIssue) -> Self {
        match issue {
            DependencyIssue::Dangling { field, target } => SchemaError::DanglingDependency {
                field,
                target: target.0,
            },
            DependencyIssue::Cycle { field } => SchemaError::DependencyCycle { field },
        }
    }
}

fn sort_key(descriptor: &FieldDescriptor) -> (u32, &str) {
    (descriptor.order, descriptor.name.as_str())
}

/// Order every identified field of `snapshots` for evaluation.
pub fn schedule(snapshots: &Snapshots) -> Vec<&FieldSnapshot> {
    let mut fields: Vec<&FieldSnapshot> = snapshots
        .iter()
        .filter(|snapshot| snapshot.id().is_assigned())
        .collect();
    fields.sort_by(|a, b| sort_key(a.descriptor()).cmp(&sort_key(b.descriptor())));

    let mut waiting: HashMap<FieldId, Vec<&FieldSnapshot>> = HashMap::new();
    let mut queue: VecDeque<&FieldSnapshot> = VecDeque::new();

    for snapshot in fields {
        match snapshot.descriptor().validate_after.and_then(FieldId::assigned) {
            Some(target) => waiting.entry(target).or_default().push(snapshot),
            None => queue.push_back(snapshot),
        }
    }

    let mut ordered = Vec::with_capacity(snapshots.len());
    while let Some(next) = queue.pop_front() {
        ordered.push(next);
        if let Some(children) = waiting.remove(&next.id()) {
            for child in children.into_iter().rev() {
                queue.push_front(child);
            }
        }
    }

    if !waiting.is_empty() {
        let skipped: Vec<&str> = waiting.values().flatten().map(|s| s.name()).collect();
        formwork_log::debug!("Fields never scheduled: {}", skipped.join(", "));
    }

    ordered
}

/// Single-field mode: exactly the requested field, no dependencies pulled in.
pub fn schedule_one(snapshots: &Snapshots, id: FieldId) -> Option<Vec<&FieldSnapshot>> {
    snapshots.get(id).map(|snapshot| vec![snapshot])
}

/// Find fields that the scheduler would silently skip.
pub fn dependency_issues(fields: &[FieldDescriptor]) -> Vec<DependencyIssue> {
    let parents: HashMap<FieldId, Option<FieldId>> = fields
        .iter()
        .filter(|f| f.id.is_assigned())
        .map(|f| (f.id, f.validate_after.and_then(FieldId::assigned)))
        .collect();

    let mut issues = Vec::new();
    for field in fields.iter().filter(|f| f.id.is_assigned()) {
        let Some(target) = field.validate_after.and_then(FieldId::assigned) else {
            continue;
        };

        if !parents.contains_key(&target) {
            issues.push(DependencyIssue::Dangling {
                field: field.name.clone(),
                target,
            });
            continue;
        }

        // Walk up the chain; reaching a root means the field is reachable
        let mut seen = HashSet::from([field.id]);
        let mut current = Some(target);
        while let Some(id) = current {
            if !seen.insert(id) {
                issues.push(DependencyIssue::Cycle {
                    field: field.name.clone(),
                });
                break;
            }
            current = match parents.get(&id) {
                Some(parent) => *parent,
                None => {
                    // Dangling further up; reported on that field
                    break;
                }
            };
        }
    }

    issues
}
