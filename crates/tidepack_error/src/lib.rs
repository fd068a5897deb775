mod error;
mod error_code;
mod error_kind;

pub use crate::{error::Error, error_kind::ErrorKind};

pub type Result<T> = std::result::Result<T, Error>;

pub use anyhow;
