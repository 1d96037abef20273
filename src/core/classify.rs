use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::types::ServiceName;

/// Marker that tags a line item as the headline charge of a service.
/// The feed encodes it as `"<service> / Server Operating System: <os>"`.
static PRIMARY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s/\sServer Operating System:").expect("hardcoded regex should be valid")
});

/// Trailing metered-hours suffix, e.g. `"(730 hours)"`.
static HOURS_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\([^)]*hours\)\s*$").expect("hardcoded regex should be valid"));

/// Trailing billing-period suffix, e.g. `"(1 Jun 2024 to 30 Jun 2024 - plan)"`.
/// Matches any trailing parenthetical containing "to". Deliberately loose,
/// the feed is not consistent about period formatting.
static PERIOD_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\([^)]*to[^)]*\)\s*$").expect("hardcoded regex should be valid"));

/// Billing period as written inside a line name:
/// `"(D Month YYYY to D Month YYYY - ...)"`. The second date is the
/// period end.
static BILLING_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\((\d{1,2}\s+[A-Za-z]+\s+\d{4})\s+to\s+(\d{1,2}\s+[A-Za-z]+\s+\d{4})\s+-")
        .expect("hardcoded regex should be valid")
});

/// Names that mark a line as a credit, discount, refund or adjustment.
/// Such lines disqualify the whole invoice from per-line allocation.
static CREDIT_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)credit|discount|refund|adjust").expect("hardcoded regex should be valid")
});

/// What a line item is, decided purely from its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Headline charge for a service; starts a new group.
    Primary { service: ServiceName },
    /// Anything else; attributed to the nearest preceding primary line.
    Addon,
}

impl LineClass {
    pub fn is_primary(&self) -> bool {
        matches!(self, LineClass::Primary { .. })
    }
}

/// Classify a line item by name. The marker match is the sole signal;
/// there is no structured field distinguishing a service's headline
/// charge from its add-ons.
pub fn classify_line(name: &str) -> LineClass {
    if PRIMARY_MARKER.is_match(name) {
        LineClass::Primary {
            service: canonical_service_name(name),
        }
    } else {
        LineClass::Addon
    }
}

/// Reduce a raw line name to the canonical service name.
///
/// Transforms run in a fixed order: trim, cut at the marker, strip a
/// trailing hours suffix, strip a trailing period suffix, trim again.
/// If nothing survives, the name is the literal `"Service"`.
pub fn canonical_service_name(name: &str) -> ServiceName {
    let cut = cut_at_marker(name.trim());
    let stripped = strip_period_suffix(strip_hours_suffix(cut)).trim();
    if stripped.is_empty() {
        ServiceName::from("Service")
    } else {
        ServiceName::from(stripped)
    }
}

/// Parse the billing-period end date out of a raw (unstripped) line
/// name. Impossible calendar dates ("31 June") and unknown month names
/// fail the parse; callers treat that the same as no period at all.
pub fn parse_period_end(name: &str) -> Option<NaiveDate> {
    let caps = BILLING_PERIOD.captures(name)?;
    NaiveDate::parse_from_str(caps.get(2)?.as_str(), "%d %B %Y").ok()
}

/// Whether a line name reads as a credit, discount, refund or
/// adjustment.
pub fn is_credit_like(name: &str) -> bool {
    CREDIT_LIKE.is_match(name)
}

fn cut_at_marker(name: &str) -> &str {
    match PRIMARY_MARKER.find(name) {
        Some(m) => name[..m.start()].trim_end(),
        None => name,
    }
}

fn strip_hours_suffix(name: &str) -> &str {
    match HOURS_SUFFIX.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

fn strip_period_suffix(name: &str) -> &str {
    match PERIOD_SUFFIX.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}
