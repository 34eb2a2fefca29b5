use aws_lambda_events::event::{s3::S3Event, sqs::SqsEvent};
use loader_core::{FileEvent, QueueMessage};
use percent_encoding::percent_decode_str;
use tracing::warn;

/// One `FileEvent` per record that names an object, in record order.
pub fn file_events(event: &S3Event) -> Vec<FileEvent> {
    event
        .records
        .iter()
        .filter_map(|record| {
            let key = record.s3.object.key.as_deref();
            if key.is_none() {
                warn!("skipping S3 record without object key");
            }
            key
        })
        .map(|key| FileEvent::new(decode_key(key)))
        .collect()
}

pub fn queue_messages(event: &SqsEvent) -> Vec<QueueMessage> {
    event
        .records
        .iter()
        .map(|record| QueueMessage {
            message_id: record.message_id.clone().unwrap_or_default(),
            body: record.body.clone().unwrap_or_default(),
        })
        .collect()
}

/// S3 notifications carry form-encoded keys (`+` for spaces).
fn decode_key(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    match percent_decode_str(&plus_decoded).decode_utf8() {
        Ok(key) => key.into_owned(),
        Err(_) => raw.to_string(),
    }
}
