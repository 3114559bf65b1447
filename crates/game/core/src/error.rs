//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`RegistryError`, `ActionError`, `OracleError`) are
//! defined next to the code that produces them. This module only provides the
//! shared classification used for logging and recovery decisions.
//!
//! Resolution-time data problems (unknown tags, malformed overrides) are
//! logged and defaulted rather than returned; only load-time validation,
//! orchestrator preconditions and missing collaborator data produce errors.

/// How a caller should treat an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// The same request may succeed on a later frame (attacker stunned).
    Recoverable,
    /// The request or data is wrong and must change before a retry.
    Validation,
    /// State that should be impossible was observed.
    Internal,
    /// A collaborator the subsystem depends on is missing.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Internal and fatal errors point at a bug or a broken deployment.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Shared classification implemented by every error enum of this crate.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for telemetry and tests, e.g. `REGISTRY_DUPLICATE_TAG`.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
