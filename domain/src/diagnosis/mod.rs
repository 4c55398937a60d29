//! Diagnosis result synthesis
//!
//! Turns free-text agent output into a structured [`DiagnosisResult`] and
//! renders it back to user-facing text.
//!
//! Parsing is best-effort: every field has a documented default, so a reply
//! that matches nothing still yields a structurally valid result.
//!
//! | Field | Source | Default |
//! |-------|--------|---------|
//! | diagnosis | `Diagnosis:` / `Diagnose:` line | [`DEFAULT_DIAGNOSIS`] |
//! | confidence | `Confidence:` / `Certainty:` N% | [`DEFAULT_CONFIDENCE`] |
//! | differential | state's top 3 hypotheses | empty |
//! | tests | state's ordered tests | empty |
//! | management | `Management:` / `Treatment:` / `Plan:` block | [`DEFAULT_MANAGEMENT`] |

pub mod parsing;
pub mod render;
pub mod result;

pub use parsing::{
    DEFAULT_CONFIDENCE, DEFAULT_DIAGNOSIS, DEFAULT_MANAGEMENT, DIFFERENTIAL_SIZE, TEST_RATIONALE,
    extract_confidence, extract_diagnosis, extract_management, parse_accuracy_score,
    parse_ranked_hypotheses, synthesize,
};
pub use render::{DISCLAIMER, render_report};
pub use result::{DiagnosisResult, RecommendedTest};
