pub const NO_DRAWINGS_SUMMARY: &str = "No drawings to judge.";
pub const CONNECTION_FAILED_SUMMARY: &str = "Could not connect to the judge.";
pub const MALFORMED_RESPONSE_SUMMARY: &str = "Error understanding the judge's response.";
pub const NO_JUDGMENT_SUMMARY: &str = "Could not get a judgment from the judge.";
pub const JUDGE_UNAVAILABLE_SUMMARY: &str = "Judging is currently unavailable.";

/// One drawing as handed to the judge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeEntry {
    pub drawer_id: String,
    pub drawer_name: String,
    pub topic: String,
    pub image_b64: String,
}

/// Work item for the judgment worker, a snapshot of one finished round
#[derive(Debug, Clone)]
pub struct JudgmentJob {
    pub room_code: String,
    pub round: u64,
    pub entries: Vec<JudgeEntry>,
}
