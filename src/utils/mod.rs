pub mod config;
pub mod confirm;
pub mod fd_limit;
pub mod logger;
pub(crate) mod pdfsift_toml;

pub use config::*;
pub use confirm::{AssumeYes, Confirm, StdinConfirm};
pub use fd_limit::{FDS_PER_EXTRACTION, max_extractions_by_fd_limit, max_open_fds};
pub use logger::setup_logging;
