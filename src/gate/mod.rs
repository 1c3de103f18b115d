//! Request gating: which paths need a session and where to send callers who
//! are on the wrong side of that line.

pub mod paths;
pub mod policy;

pub use paths::{is_public, is_static_asset};
pub use policy::{decide, GateDecision, DASHBOARD_PATH, LOGIN_PATH};
