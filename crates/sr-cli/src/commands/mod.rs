//! CLI command implementations

pub(crate) mod common;
pub(crate) mod init;
pub(crate) mod parse;
pub(crate) mod repair;
pub(crate) mod status;
