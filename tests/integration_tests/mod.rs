//! Integration tests module
//!
//! End-to-end tests for the crawler against wiremock servers:
//! - Article pipeline ordering and skips
//! - Complete listing → pipeline → CSV/gallery run
//! - Error handling and recovery scenarios

pub mod error_scenarios;
pub mod job_test;
pub mod pipeline_test;
