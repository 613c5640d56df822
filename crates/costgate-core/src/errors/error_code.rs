//! Stable error codes shared by every error type in the workspace.

/// Maps an error to a stable, machine-readable code.
pub trait GovernanceErrorCode {
    fn error_code(&self) -> &'static str;
}

// ── Configuration ──────────────────────────────────────────
pub const CONFIG_PARSE_FAILED: &str = "CONFIG_PARSE_FAILED";
pub const CONFIG_IO_FAILED: &str = "CONFIG_IO_FAILED";
pub const CONFIG_INVALID_LIMIT: &str = "CONFIG_INVALID_LIMIT";
pub const CONFIG_INVALID_PAGINATION_CAP: &str = "CONFIG_INVALID_PAGINATION_CAP";
pub const CONFIG_INVALID_COST_TAG: &str = "CONFIG_INVALID_COST_TAG";
pub const CONFIG_UNKNOWN_TYPE: &str = "CONFIG_UNKNOWN_TYPE";

// ── Licensing ──────────────────────────────────────────────
pub const LICENSE_MISSING: &str = "LICENSE_MISSING";
pub const LICENSE_MALFORMED: &str = "LICENSE_MALFORMED";
pub const LICENSE_UNSUPPORTED_VERSION: &str = "LICENSE_UNSUPPORTED_VERSION";
pub const LICENSE_BAD_SIGNATURE: &str = "LICENSE_BAD_SIGNATURE";
pub const LICENSE_CORRUPT: &str = "LICENSE_CORRUPT";
pub const LICENSE_FEATURE_NOT_COVERED: &str = "LICENSE_FEATURE_NOT_COVERED";
pub const LICENSE_EXPIRED: &str = "LICENSE_EXPIRED";

// ── Validation ─────────────────────────────────────────────
pub const PAGINATION_ARGUMENT_MISSING: &str = "PAGINATION_ARGUMENT_MISSING";
pub const PAGINATION_ARGUMENT_INVALID: &str = "PAGINATION_ARGUMENT_INVALID";
pub const PAGINATION_CAP_EXCEEDED: &str = "PAGINATION_CAP_EXCEEDED";
pub const COST_LIMIT_EXCEEDED: &str = "COST_LIMIT_EXCEEDED";
pub const COST_FUNCTION_FAILED: &str = "COST_FUNCTION_FAILED";
pub const DEPTH_LIMIT_EXCEEDED: &str = "DEPTH_LIMIT_EXCEEDED";
pub const BATCH_LIMIT_EXCEEDED: &str = "BATCH_LIMIT_EXCEEDED";
pub const OPERATION_NOT_FOUND: &str = "OPERATION_NOT_FOUND";
