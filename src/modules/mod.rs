pub mod metrics;
pub mod transcode;
