//! Fatal errors surfaced to the operator.
//!
//! Everything else degrades to "unknown" in the rendered report.

#[derive(Debug, thiserror::Error)]
pub enum ZtpError {
    #[error("Root privileges required for this operation")]
    Unauthorized,

    #[error("ZTP is administratively disabled.")]
    AdminDisabled,

    #[error("rollback command `{command}` failed: {details}")]
    RollbackFailed { command: String, details: String },
}
