//! LicenseGate and GovernanceState: compute once at startup, consult on every request.

use tracing::{error, info, warn};

use super::blob::{self, LicenseClaims};
use super::features::GatedFeature;
use crate::errors::LicenseError;

/// Licenses expiring within this many days produce a standing warning.
pub const EXPIRY_WARNING_DAYS: u64 = 90;

const MILLIS_PER_HOUR: u64 = 3_600_000;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Ed25519 verifying key for licenses issued by the vendor.
const EMBEDDED_PUBLIC_KEY: [u8; 32] = [
    0x05, 0xa6, 0x73, 0x6f, 0x05, 0x3e, 0x9d, 0x3f, 0x52, 0x31, 0xde, 0x71, 0x0e, 0x2b, 0x65, 0xda,
    0xe7, 0x1c, 0x75, 0xb7, 0x25, 0x28, 0xcc, 0x65, 0x1e, 0xcc, 0x0c, 0x41, 0x17, 0xdc, 0x70, 0x29,
];

/// Outcome of a license check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseStatus {
    Active {
        licensed_to: String,
    },
    ExpiringSoon {
        licensed_to: String,
        days: u64,
        hours: u64,
    },
    Inactive {
        reason: LicenseError,
    },
}

impl LicenseStatus {
    pub fn protections_active(&self) -> bool {
        !matches!(self, Self::Inactive { .. })
    }

    /// One-line human-readable status.
    pub fn status_line(&self) -> String {
        match self {
            Self::Active { licensed_to } => {
                format!("GraphQL protections active (licensed to {})", licensed_to)
            }
            Self::ExpiringSoon {
                licensed_to,
                days,
                hours,
            } => format!(
                "GraphQL protections active (licensed to {}); license expires in {} day(s) {} hour(s)",
                licensed_to, days, hours
            ),
            Self::Inactive { reason } => {
                format!("GraphQL protections DISABLED: {}", reason)
            }
        }
    }
}

/// Verifies license blobs offline against a fixed public key.
#[derive(Debug, Clone)]
pub struct LicenseGate {
    public_key: [u8; 32],
    required: GatedFeature,
}

impl Default for LicenseGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LicenseGate {
    /// Gate using the embedded vendor key.
    pub fn new() -> Self {
        Self::with_public_key(EMBEDDED_PUBLIC_KEY)
    }

    pub fn with_public_key(public_key: [u8; 32]) -> Self {
        Self {
            public_key,
            required: GatedFeature::GraphqlProtections,
        }
    }

    /// Run the full check chain: decode → signature → payload → feature → expiry.
    /// `now_ms` is Unix epoch milliseconds.
    pub fn verify(&self, key: Option<&str>, now_ms: u64) -> Result<LicenseClaims, LicenseError> {
        let key = key.filter(|k| !k.trim().is_empty()).ok_or(LicenseError::Missing)?;
        let claims = blob::verify_license_key(key, &self.public_key)?;

        if !claims.granted_features.contains(self.required) {
            return Err(LicenseError::FeatureNotCovered);
        }
        if claims.expires_at_ms < now_ms {
            return Err(LicenseError::Expired {
                expired_at_ms: claims.expires_at_ms,
                now_ms,
            });
        }
        Ok(claims)
    }

    /// Check a key and classify the result. Never fails.
    pub fn status(&self, key: Option<&str>, now_ms: u64) -> (LicenseStatus, Option<LicenseClaims>) {
        match self.verify(key, now_ms) {
            Ok(claims) => {
                let remaining = claims.expires_at_ms.saturating_sub(now_ms);
                let status = if remaining < EXPIRY_WARNING_DAYS * MILLIS_PER_DAY {
                    LicenseStatus::ExpiringSoon {
                        licensed_to: claims.licensed_to.clone(),
                        days: remaining / MILLIS_PER_DAY,
                        hours: (remaining % MILLIS_PER_DAY) / MILLIS_PER_HOUR,
                    }
                } else {
                    LicenseStatus::Active {
                        licensed_to: claims.licensed_to.clone(),
                    }
                };
                (status, Some(claims))
            }
            Err(reason) => (LicenseStatus::Inactive { reason }, None),
        }
    }
}

/// Process-wide governance switch, produced once and passed by reference into
/// every validation call. Immutable after construction.
#[derive(Debug, Clone)]
pub struct GovernanceState {
    status: LicenseStatus,
    claims: Option<LicenseClaims>,
}

impl GovernanceState {
    /// Establish state from a license key using the embedded vendor key.
    pub fn establish(key: Option<&str>) -> Self {
        Self::establish_with(&LicenseGate::new(), key, current_unix_millis())
    }

    /// Establish state with an explicit gate and clock (epoch milliseconds).
    /// Logs the outcome once.
    pub fn establish_with(gate: &LicenseGate, key: Option<&str>, now_ms: u64) -> Self {
        let (status, claims) = gate.status(key, now_ms);
        match &status {
            LicenseStatus::Active { licensed_to } => {
                info!(licensed_to = %licensed_to, "{}", status.status_line());
            }
            LicenseStatus::ExpiringSoon { days, hours, .. } => {
                warn!(days_remaining = *days, hours_remaining = *hours, "{}", status.status_line());
            }
            LicenseStatus::Inactive { reason } => {
                error!(
                    code = crate::errors::GovernanceErrorCode::error_code(reason),
                    "{}; cost, pagination and depth limits will NOT be enforced",
                    status.status_line()
                );
            }
        }
        Self { status, claims }
    }

    /// State with protections forced on, for embedding hosts that license out of band.
    pub fn enforced(licensed_to: impl Into<String>) -> Self {
        Self {
            status: LicenseStatus::Active {
                licensed_to: licensed_to.into(),
            },
            claims: None,
        }
    }

    pub fn protections_active(&self) -> bool {
        self.status.protections_active()
    }

    pub fn status(&self) -> &LicenseStatus {
        &self.status
    }

    pub fn status_line(&self) -> String {
        self.status.status_line()
    }

    pub fn claims(&self) -> Option<&LicenseClaims> {
        self.claims.as_ref()
    }
}

/// Wall clock in epoch milliseconds, as license expiry is stored.
pub fn current_unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_inactive() {
        let (status, claims) = LicenseGate::new().status(None, 0);
        assert_eq!(
            status,
            LicenseStatus::Inactive {
                reason: LicenseError::Missing
            }
        );
        assert!(claims.is_none());
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        let err = LicenseGate::new().verify(Some("   "), 0).unwrap_err();
        assert_eq!(err, LicenseError::Missing);
    }

    #[test]
    fn status_line_names_the_reason() {
        let status = LicenseStatus::Inactive {
            reason: LicenseError::FeatureNotCovered,
        };
        assert!(status.status_line().contains("DISABLED"));
        assert!(status.status_line().contains("does not cover"));
    }

    #[test]
    fn enforced_state_is_active() {
        assert!(GovernanceState::enforced("tests").protections_active());
    }
}
