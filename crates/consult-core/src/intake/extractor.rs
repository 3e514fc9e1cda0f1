//! Keyword heuristic that turns patient replies into record entries.
//!
//! Matching is a case-insensitive substring search, not tokenized: "pillow"
//! counts as a medication mention because it contains "pill".

use super::record::{PatientRecord, RecordedResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record list a reply can be filed under by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactCategory {
    ChronicCondition,
    Allergy,
    Medication,
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct FactRule {
    pub category: FactCategory,
    /// Lowercase fragments; any single hit files the reply.
    pub keywords: &'static [&'static str],
}

/// Rules in application order.
pub const FACT_RULES: &[FactRule] = &[
    FactRule {
        category: FactCategory::ChronicCondition,
        keywords: &["chronic", "suffer from", "diagnosis"],
    },
    FactRule {
        category: FactCategory::Allergy,
        keywords: &["allerg", "intolerant"],
    },
    FactRule {
        category: FactCategory::Medication,
        keywords: &["taking", "medication", "pill"],
    },
];

impl FactRule {
    pub fn matches(&self, lowercase_text: &str) -> bool {
        self.keywords.iter().any(|k| lowercase_text.contains(k))
    }
}

/// Returns every category whose keywords appear in `reply`, in table order.
pub fn classify(reply: &str) -> Vec<FactCategory> {
    let lower = reply.to_lowercase();
    FACT_RULES
        .iter()
        .filter(|rule| rule.matches(&lower))
        .map(|rule| rule.category)
        .collect()
}

/// Folds one patient reply into `record`.
///
/// `at` is the timestamp stored with the raw response; passing it in keeps
/// the function deterministic.
pub fn extract(
    mut record: PatientRecord,
    reply: &str,
    is_first_reply: bool,
    at: DateTime<Utc>,
) -> PatientRecord {
    if is_first_reply && record.main_complaint.is_none() {
        record.main_complaint = Some(reply.to_string());
    }

    for category in classify(reply) {
        let list = match category {
            FactCategory::ChronicCondition => &mut record.chronic_conditions,
            FactCategory::Allergy => &mut record.allergies,
            FactCategory::Medication => &mut record.medications,
        };
        list.push(reply.to_string());
    }

    if !is_first_reply {
        record.symptoms.push(reply.to_string());
    }

    record.responses.push(RecordedResponse {
        at,
        text: reply.to_string(),
    });

    record
}
