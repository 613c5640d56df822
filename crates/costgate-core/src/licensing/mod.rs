//! Licensing: offline verification of a signed license blob.
//!
//! ## Components
//! - **features**: granted-feature bitset
//! - **blob**: binary layout decoding, signature verification, payload parsing
//! - **gate**: LicenseGate checks and the process-wide `GovernanceState`
//!
//! A failed check never aborts the process. It yields a `GovernanceState` with
//! protections inactive, and every validation pass is skipped.

pub mod blob;
pub mod features;
pub mod gate;

pub use blob::{encode_license_blob, LicenseClaims};
pub use features::{FeatureSet, GatedFeature};
pub use gate::{current_unix_millis, GovernanceState, LicenseGate, LicenseStatus, EXPIRY_WARNING_DAYS};
