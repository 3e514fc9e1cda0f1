//! Detects whether an assistant reply is the final structured summary.

/// Lowercase phrases; a reply containing any one of them is final.
pub const FINAL_MARKERS: &[&str] = &[
    "complaint summary",
    "probable diagnosis",
    "examination recommendations",
    "what to do now",
    "when to see a doctor urgently",
    "1)",
    "2)",
    "3)",
    "4)",
    "5)",
    "does not replace an in-person medical exam",
];

/// Stateless: looks at one reply, not at how many turns have passed.
pub fn is_final(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    FINAL_MARKERS.iter().any(|marker| lower.contains(marker))
}
