//! License verification errors. Non-fatal: each one disables protections.

use super::error_code::{self, GovernanceErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LicenseError {
    #[error("no license key configured")]
    Missing,

    #[error("license key is malformed: {0}")]
    Malformed(String),

    #[error("license format version {0} is not supported")]
    UnsupportedVersion(u8),

    #[error("license signature verification failed")]
    BadSignature,

    #[error("license payload is corrupt: {0}")]
    Corrupt(String),

    #[error("license does not cover GraphQL protections")]
    FeatureNotCovered,

    #[error("license expired at {expired_at_ms} ms (now {now_ms} ms)")]
    Expired { expired_at_ms: u64, now_ms: u64 },
}

impl GovernanceErrorCode for LicenseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing => error_code::LICENSE_MISSING,
            Self::Malformed(_) => error_code::LICENSE_MALFORMED,
            Self::UnsupportedVersion(_) => error_code::LICENSE_UNSUPPORTED_VERSION,
            Self::BadSignature => error_code::LICENSE_BAD_SIGNATURE,
            Self::Corrupt(_) => error_code::LICENSE_CORRUPT,
            Self::FeatureNotCovered => error_code::LICENSE_FEATURE_NOT_COVERED,
            Self::Expired { .. } => error_code::LICENSE_EXPIRED,
        }
    }
}
