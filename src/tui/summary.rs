//! AI task-summary collaborator seam.
//!
//! The dashboard can show a short generated summary and suggested next
//! steps for a task. The provider sits behind a trait so a network-backed
//! implementation can plug in; the shipped implementation is the degraded
//! path and always returns the fixed fallback strings. A provider must
//! return a string in every case. Failures degrade inside the
//! implementation and never cross this boundary.

/// Produces short helper texts for a task.
pub trait Summarizer {
    /// A concise dashboard summary of the task.
    fn task_summary(&self, title: &str, description: &str) -> String;

    /// A short plain list of suggested next steps.
    fn next_steps(&self, title: &str) -> String;
}

/// Offline provider: always answers with the fallback texts.
pub struct OfflineSummarizer;

impl Summarizer for OfflineSummarizer {
    fn task_summary(&self, _title: &str, _description: &str) -> String {
        "Could not generate summary at this time.".to_string()
    }

    fn next_steps(&self, _title: &str) -> String {
        "1. Review task details\n2. Consult team\n3. Execute plan".to_string()
    }
}
