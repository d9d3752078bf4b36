//! Application services - Use case implementations
//!
//! The sheet pipeline service implements the sheet use cases on top of the
//! domain stage calculators, the rule tables and the outbound ports.

pub mod features_generator;
pub mod llm;
pub mod sheet_pipeline_service;

pub use features_generator::FeaturesGenerator;
pub use sheet_pipeline_service::SheetPipelineService;
