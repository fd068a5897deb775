pub mod camel_case;
pub mod indexmap;
pub mod json_merge;
pub mod path_ext;
