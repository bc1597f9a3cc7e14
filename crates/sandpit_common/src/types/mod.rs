pub mod bundle_output;
pub mod console_bridge;
pub mod file_set;
pub mod import_map;
pub mod lockfile;
pub mod package_manager;
pub mod package_manifest;
pub mod preview_strategy;
pub mod resolved_id;
pub mod source_joiner;
