pub mod banner;
pub mod import_specifiers;
pub mod normalize_options;
pub mod resolve_inputs;
