//! Lambda triggered by the weather data queue.
//!
//! Looks up the current weather for each queued coordinate pair and logs it.

use std::sync::Arc;

use anyhow::Context;
use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use loader_core::{EnrichProcessor, LookupConfig, OpenWeatherClient};
use loader_lambda::{events::queue_messages, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let config = LookupConfig::from_env()
        .inspect_err(|err| error!(error = %err, "invalid configuration"))
        .context("unable to load weather API configuration")?;
    info!(endpoint = %config.endpoint, "starting enrichment handler");

    let client = OpenWeatherClient::new(&config).context("unable to build weather API client")?;
    let processor = EnrichProcessor::new(Arc::new(client));

    let processor = &processor;
    run(service_fn(move |event: LambdaEvent<SqsEvent>| async move {
        handle(processor, event).await
    }))
    .await
}

async fn handle(processor: &EnrichProcessor, event: LambdaEvent<SqsEvent>) -> Result<(), Error> {
    let messages = queue_messages(&event.payload);
    info!(records = messages.len(), "starting handler");

    processor.process_batch(&messages).await?;
    Ok(())
}
