use thiserror::Error;

use crate::models::backend::PodRecord;
use crate::models::views::{HealthView, PodKey};

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("entity at index {index} is missing a name/namespace pair")]
    MalformedEntity { index: usize },
}

/// Builds the display aggregate for one pod-health snapshot.
///
/// Pure: the same snapshot always yields the same view. Entities without a
/// name/namespace pair are dropped individually and reported; the rest of
/// the snapshot is still processed.
pub fn reconcile(seq: u64, records: &[PodRecord]) -> (HealthView, Vec<ClassificationError>) {
    let mut view = HealthView {
        seq,
        ..HealthView::default()
    };
    let mut dropped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        if record.name.is_empty() || record.namespace.is_empty() {
            dropped.push(ClassificationError::MalformedEntity { index });
            continue;
        }

        for issue in &record.potential_issues {
            view.total_issues += 1;
            *view
                .issues_by_type
                .entry(issue.issue_type.clone())
                .or_insert(0) += 1;
        }
        if !record.potential_issues.is_empty() {
            view.pods_with_issues.insert(record.name.clone());
        }
        view.pods.insert(
            PodKey::new(&record.namespace, &record.name),
            record.clone(),
        );
    }

    (view, dropped)
}
