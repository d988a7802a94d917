// Public API - what other modules can use
pub use client::{GeminiJudge, Judge, JudgeError};
pub use models::{JudgeEntry, JudgmentJob, JUDGE_UNAVAILABLE_SUMMARY, NO_DRAWINGS_SUMMARY};
pub use verdict::{parse_verdict, Verdict};
pub use worker::{run_judgment, start_judgment_worker, JudgmentQueue};

// Internal modules
mod client;
mod models;
mod verdict;
mod worker;
