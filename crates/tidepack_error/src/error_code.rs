// Configuration
pub const NO_MATCHED_FILES: &str = "NO_MATCHED_FILES";
pub const UNSUPPORTED_FORMAT: &str = "UNSUPPORTED_FORMAT";
pub const MISSING_PLUGIN: &str = "MISSING_PLUGIN";
pub const FILENAME_CONFLICT: &str = "FILENAME_CONFLICT";
pub const INVALID_OPTIONS: &str = "INVALID_OPTIONS";

// Plugin
pub const PLUGIN_INIT: &str = "PLUGIN_INIT";

// Engine
pub const ENGINE_ERROR: &str = "ENGINE_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";
