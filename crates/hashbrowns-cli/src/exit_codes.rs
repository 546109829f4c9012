//! Process exit codes. Part of the CLI contract; CI pipelines branch on them.

pub const SUCCESS: i32 = 0;
pub const POLICY_VIOLATION: i32 = 1; // Server reported the Failure policy action
pub const AUDIT_ERROR: i32 = 2; // Transport/remote error, incomplete audit, bad input or config
