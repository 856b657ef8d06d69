//! Reusable widget components.

pub mod pager;
pub mod status;

pub use pager::PagerStrip;
pub use status::StatusIndicator;
