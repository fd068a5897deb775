pub mod artifact_record;
pub mod engine_config;
pub mod output_asset;
pub mod package_json;
pub mod resolved_task;
pub mod watch_event;
