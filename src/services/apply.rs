pub mod apply_engine;
pub mod apply_report;
