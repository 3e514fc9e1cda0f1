//! Guided-intake domain module.
//!
//! - `record`: the accumulating `PatientRecord`
//! - `extractor`: keyword rule table and the `extract` fold
//! - `completion`: final-summary detection for assistant replies

mod completion;
mod extractor;
mod record;

pub use completion::{FINAL_MARKERS, is_final};
pub use extractor::{FACT_RULES, FactCategory, FactRule, classify, extract};
pub use record::{PatientRecord, RecordedResponse};

/// First assistant turn of every guided-intake session. Returned verbatim,
/// never generated.
pub const INTAKE_GREETING: &str = "Hello! I'm a virtual intake assistant. \
I'll ask you a few questions, one at a time, to understand what is going on before you see a doctor. \
What is bothering you today?";
