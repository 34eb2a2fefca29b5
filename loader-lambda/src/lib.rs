//! AWS side of the weather data loader.
//!
//! This crate focuses on:
//! - Adapting S3 and SQS to the `loader-core` collaborator traits
//! - Turning Lambda event payloads into pipeline inputs
//! - Logging setup shared by both Lambda binaries

pub mod events;
pub mod logging;
pub mod s3;
pub mod sqs;

pub use s3::S3ObjectFetcher;
pub use sqs::SqsMessageSender;

/// Shared AWS configuration from the Lambda environment.
pub async fn load_aws_config() -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest()).load().await
}
