//! CLI command implementations

mod access;
mod context;
mod handle;
mod preview;
mod style;

pub use access::{run_check_access, run_is_owner};
pub use handle::run_handle;
pub use preview::run_preview;
