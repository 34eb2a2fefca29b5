//! Ingestion pipeline: uploaded CSV files to queued lookup requests.
//!
//! Every data row of every `.csv` object in a batch becomes one queue
//! message. What happens after a failure is governed by [`FailurePolicy`]:
//!
//! - `Continue` logs the failure, records it in the [`BatchResult`] and
//!   moves on to the next row (or file, when the file itself could not be
//!   fetched or parsed).
//! - `Abort` stops at the first failure and returns what was queued so far.

use std::sync::Arc;

use csv::StringRecord;
use tracing::{error, info, instrument, warn};

use crate::{
    config::FailurePolicy,
    error::PipelineError,
    model::{BatchResult, FileEvent},
    queue::MessageSender,
    storage::ObjectFetcher,
    transform::{encode_request, parse_rows, row_to_request},
};

/// Whether the batch should keep going.
enum Flow {
    Next,
    Stop,
}

pub struct IngestProcessor {
    fetcher: Arc<dyn ObjectFetcher>,
    sender: Arc<dyn MessageSender>,
    policy: FailurePolicy,
}

impl IngestProcessor {
    pub fn new(
        fetcher: Arc<dyn ObjectFetcher>,
        sender: Arc<dyn MessageSender>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            fetcher,
            sender,
            policy,
        }
    }

    #[instrument(skip_all, fields(records = events.len(), policy = %self.policy))]
    pub async fn process(&self, events: &[FileEvent]) -> BatchResult {
        let mut result = BatchResult::default();

        for event in events {
            info!(key = %event.key, "processing file event");
            if !event.is_csv() {
                warn!(key = %event.key, "skipping file extension");
                continue;
            }

            let before = result.message_ids.len();
            let flow = self.process_file(&event.key, &mut result).await;
            info!(
                key = %event.key,
                messages = ?&result.message_ids[before..],
                "messages processed"
            );

            if let Flow::Stop = flow {
                break;
            }
        }

        result
    }

    async fn process_file(&self, key: &str, result: &mut BatchResult) -> Flow {
        let rows = match self.read_rows(key).await {
            Ok(rows) => rows,
            Err(err) => {
                error!(key, error = %err, "unable to process file");
                return self.fail(result, err);
            }
        };

        if rows.len() <= 1 {
            info!(
                key,
                "file content empty (first row reserved for column heading)"
            );
            return Flow::Next;
        }

        info!(key, rows = rows.len(), "processing CSV file");
        for (idx, row) in rows.iter().enumerate().skip(1) {
            match self.enqueue_row(row).await {
                Ok(message_id) => result.message_ids.push(message_id),
                Err(err) => {
                    // Line numbers are 1-based and include the header.
                    error!(key, line = idx + 1, error = %err, "unable to queue row");
                    if let Flow::Stop = self.fail(result, err) {
                        return Flow::Stop;
                    }
                }
            }
        }

        Flow::Next
    }

    async fn read_rows(&self, key: &str) -> Result<Vec<StringRecord>, PipelineError> {
        let content = self.fetcher.fetch(key).await?;
        parse_rows(&content).map_err(|source| PipelineError::Csv {
            key: key.to_string(),
            source,
        })
    }

    async fn enqueue_row(&self, row: &StringRecord) -> Result<String, PipelineError> {
        let request = row_to_request(row)?;
        let payload = encode_request(&request)?;
        let message_id = self.sender.send(&payload).await?;
        info!(%message_id, body = %payload, "message queued");
        Ok(message_id)
    }

    fn fail(&self, result: &mut BatchResult, err: PipelineError) -> Flow {
        result.record_failure(err);
        match self.policy {
            FailurePolicy::Continue => Flow::Next,
            FailurePolicy::Abort => Flow::Stop,
        }
    }
}
