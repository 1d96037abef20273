use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::classify::{LineClass, classify_line, parse_period_end};
use super::types::{Invoice, ServiceName};

/// Whether a service still looks like it is being billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    Active,
    Cancelled,
}

impl ServiceStatus {
    pub fn is_active(self) -> bool {
        self == ServiceStatus::Active
    }
}

/// Classify every inferred service in the batch as active or cancelled.
///
/// A service's evidence is the latest billing-period end found on any
/// of its primary lines. The reference point is the latest period end
/// across *all* services: still-billed services renew on a shared
/// cadence, so anything within a day of that is active. A service with
/// no parseable period end at all is always cancelled.
///
/// The returned map is sorted by name, ready for selector population.
pub fn service_status(batch: &[Invoice]) -> BTreeMap<ServiceName, ServiceStatus> {
    let mut latest_end: BTreeMap<ServiceName, Option<NaiveDate>> = BTreeMap::new();
    let mut global_latest: Option<NaiveDate> = None;

    for invoice in batch {
        for item in &invoice.items {
            let LineClass::Primary { service } = classify_line(&item.name) else {
                continue;
            };
            let entry = latest_end.entry(service).or_insert(None);
            if let Some(end) = parse_period_end(&item.name) {
                if entry.is_none_or(|current| end > current) {
                    *entry = Some(end);
                }
                if global_latest.is_none_or(|current| end > current) {
                    global_latest = Some(end);
                }
            }
        }
    }

    latest_end
        .into_iter()
        .map(|(service, end)| {
            let status = match (global_latest, end) {
                (Some(global), Some(end)) if (global - end).num_days().abs() <= 1 => {
                    ServiceStatus::Active
                }
                _ => ServiceStatus::Cancelled,
            };
            (service, status)
        })
        .collect()
}

/// Name-sorted service list for a selector, optionally keeping
/// cancelled services visible.
pub fn selectable_services(
    status: &BTreeMap<ServiceName, ServiceStatus>,
    include_cancelled: bool,
) -> Vec<&ServiceName> {
    status
        .iter()
        .filter(|(_, s)| include_cancelled || s.is_active())
        .map(|(name, _)| name)
        .collect()
}
