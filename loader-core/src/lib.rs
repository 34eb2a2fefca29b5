//! Core library for the weather data loader.
//!
//! This crate defines:
//! - The ingestion pipeline (uploaded CSV files to queued lookup requests)
//! - The enrichment pipeline (queued lookup requests to weather reports)
//! - Narrow interfaces to object storage, the message queue and the weather API
//! - Configuration, errors and shared domain models
//!
//! It has no AWS dependency; `loader-lambda` supplies the adapters and entry points.

pub mod config;
pub mod enrich;
pub mod error;
pub mod ingest;
pub mod lookup;
pub mod model;
pub mod queue;
pub mod storage;
pub mod transform;

pub use config::{FailurePolicy, IngestConfig, LookupConfig};
pub use enrich::EnrichProcessor;
pub use error::{ConfigError, DeliveryError, FetchError, LookupError, PipelineError};
pub use ingest::IngestProcessor;
pub use lookup::{LookupClient, OpenWeatherClient};
pub use model::{BatchResult, FileEvent, LookupRequest, LookupResponse, QueueMessage, WeatherReport};
pub use queue::MessageSender;
pub use storage::ObjectFetcher;
