//! Lambda triggered by S3 "object created" notifications.
//!
//! Every data row of each uploaded `.csv` file becomes one message on the
//! weather data queue.

use std::sync::Arc;

use anyhow::Context;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use loader_core::{IngestConfig, IngestProcessor};
use loader_lambda::{
    S3ObjectFetcher, SqsMessageSender, events::file_events, load_aws_config, logging,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let config = IngestConfig::from_env()
        .inspect_err(|err| error!(error = %err, "invalid configuration"))
        .context("unable to load ingestion configuration")?;
    info!(
        bucket = %config.bucket,
        policy = %config.failure_policy,
        delay_seconds = config.queue_delay_seconds,
        "starting ingestion handler"
    );

    let aws = load_aws_config().await;
    let fetcher = S3ObjectFetcher::new(&aws, config.bucket.as_str());
    let sender = SqsMessageSender::new(&aws, config.queue_url.as_str(), config.queue_delay_seconds);
    let processor = IngestProcessor::new(
        Arc::new(fetcher),
        Arc::new(sender),
        config.failure_policy,
    );

    let processor = &processor;
    run(service_fn(move |event: LambdaEvent<S3Event>| async move {
        handle(processor, event).await
    }))
    .await
}

async fn handle(processor: &IngestProcessor, event: LambdaEvent<S3Event>) -> Result<(), Error> {
    let events = file_events(&event.payload);
    info!(records = events.len(), "processing weather data");

    let result = processor.process(&events).await;
    info!(
        messages = result.message_ids.len(),
        failed = result.failed(),
        "event processing completed"
    );

    // Only transient failures go back to the runtime.
    if !result.is_ok() && !result.has_transient_failure() {
        warn!(
            failed = result.failed(),
            "dropping rows that can never be processed"
        );
    }
    result.into_retry_result()?;
    Ok(())
}
