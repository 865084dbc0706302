//! Shared error classification.
//!
//! Each module owns its error enum ([`GateRefusal`](crate::action::GateRefusal),
//! [`RegistryError`](crate::ability::RegistryError), ...). They all implement
//! [`CombatFault`] so outer layers can route them without knowing the type.
//!
//! The engine itself never produces [`ErrorSeverity::Fatal`]; refusals come
//! back as values and unknown ids become diagnostics.

/// How a caller should treat an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retry later: cooldown, low resource, paused combat.
    Recoverable,
    /// Bad request: unknown id, acting while dying.
    Validation,
    /// Broken invariant inside the engine.
    Internal,
    /// Reserved for embedding layers.
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

    /// True when the error points at a bug rather than a bad request.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

impl core::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every error enum in the combat crates.
pub trait CombatFault: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable SCREAMING_CASE code for logs and clients.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert_eq!(ErrorSeverity::Internal.to_string(), "internal");
    }
}
