//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `SessionState`: the `Running → Draining → Done` lifecycle driven by the
//!   outstanding-work counter and the page cap

mod session_state;

pub use session_state::SessionState;
