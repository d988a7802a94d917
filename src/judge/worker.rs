use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::client::{Judge, JudgeError};
use super::models::{
    JudgmentJob, CONNECTION_FAILED_SUMMARY, MALFORMED_RESPONSE_SUMMARY, NO_DRAWINGS_SUMMARY,
    NO_JUDGMENT_SUMMARY,
};
use super::verdict::parse_verdict;
use crate::room::models::JudgmentResult;
use crate::room::repository::RoomRepository;

/// Sending half of the judgment worker's queue
#[derive(Debug, Clone)]
pub struct JudgmentQueue {
    sender: mpsc::UnboundedSender<JudgmentJob>,
}

impl JudgmentQueue {
    /// Hands a job to the worker. Gives the job back if the worker is gone.
    pub fn enqueue(&self, job: JudgmentJob) -> Result<(), JudgmentJob> {
        debug!(room_code = %job.room_code, round = job.round, "Enqueueing judgment");
        self.sender.send(job).map_err(|err| err.0)
    }
}

/// Starts the background worker that runs judgments.
///
/// Each job runs in its own task so one slow provider call never holds up
/// other rooms. Results go back through [`RoomRepository::store_judgment`];
/// a job whose task dies is stored as a result with no winner.
pub fn start_judgment_worker(
    repository: Arc<dyn RoomRepository + Send + Sync>,
    judge: Arc<dyn Judge>,
    request_timeout: Duration,
) -> (JudgmentQueue, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::unbounded_channel::<JudgmentJob>();

    let handle = tokio::spawn(async move {
        info!("Judgment worker started");
        while let Some(job) = receiver.recv().await {
            let repository = Arc::clone(&repository);
            let judge = Arc::clone(&judge);
            tokio::spawn(async move {
                let room_code = job.room_code.clone();
                let round = job.round;

                // A panicking judge must still leave a result behind
                let judging = tokio::spawn(async move {
                    run_judgment(judge.as_ref(), &job, request_timeout).await
                });
                let result = match judging.await {
                    Ok(result) => result,
                    Err(e) => {
                        error!(room_code = %room_code, round, error = %e, "Judgment task failed");
                        JudgmentResult::without_winner(NO_JUDGMENT_SUMMARY)
                    }
                };

                if let Err(e) = repository.store_judgment(&room_code, round, result).await {
                    error!(room_code = %room_code, error = %e, "Failed to store judgment");
                }
            });
        }
        info!("Judgment worker stopped");
    });

    (JudgmentQueue { sender }, handle)
}

/// Judges one round. Never fails: every provider problem becomes a result
/// with no winner and a summary explaining what went wrong.
#[instrument(skip(judge, job), fields(room_code = %job.room_code, round = job.round))]
pub async fn run_judgment(
    judge: &dyn Judge,
    job: &JudgmentJob,
    request_timeout: Duration,
) -> JudgmentResult {
    if job.entries.is_empty() {
        return JudgmentResult::without_winner(NO_DRAWINGS_SUMMARY);
    }

    let outcome = match tokio::time::timeout(request_timeout, judge.judge(&job.entries)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(JudgeError::Timeout),
    };

    let text = match outcome {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Judge call failed");
            return JudgmentResult::without_winner(fallback_summary(&e));
        }
    };

    let verdict = parse_verdict(&text);
    if verdict.is_empty() {
        warn!(text_len = text.len(), "Judge response did not follow the verdict format");
        return JudgmentResult::without_winner(NO_JUDGMENT_SUMMARY);
    }

    let winner_id = verdict.winner_id(&job.entries);
    if winner_id.is_empty() && !verdict.winner_name.is_empty() {
        debug!(winner_name = %verdict.winner_name, "Winner name matched no drawer");
    }

    JudgmentResult {
        summary: verdict.summary,
        winner_id,
        winner_name: verdict.winner_name,
    }
}

fn fallback_summary(err: &JudgeError) -> &'static str {
    match err {
        JudgeError::Transport(_) | JudgeError::Timeout | JudgeError::Status(_) => {
            CONNECTION_FAILED_SUMMARY
        }
        JudgeError::MalformedResponse(_) => MALFORMED_RESPONSE_SUMMARY,
        JudgeError::EmptyResponse => NO_JUDGMENT_SUMMARY,
    }
}
