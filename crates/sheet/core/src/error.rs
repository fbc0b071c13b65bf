//! Severity classification shared by the crate's error enums.
//!
//! Each module owns its error type (`FxpError`, `DefinitionError`,
//! `PrereqError`) and implements [`SheetError`] so loaders and front ends can
//! decide how to react without matching on every variant.
//!
//! A reference to an attribute that does not exist is not an error anywhere
//! in the crate. It resolves to [`Fxp::MIN`](crate::fxp::Fxp::MIN).

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// A default value can stand in and work continues.
    Recoverable,

    /// The input is wrong: malformed number text, a duplicate attribute ID.
    Validation,

    /// Valid settings never produce this, e.g. a formula dividing by zero.
    Internal,

    /// The data is corrupt and the load that produced it is abandoned,
    /// e.g. a prerequisite tree nested past the recursion ceiling.
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

    /// True for bugs and corrupted data, as opposed to bad user input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every error enum in the crate.
pub trait SheetError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier such as `"FXP_DIVISION_BY_ZERO"`; defaults to the
    /// type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fxp::FxpError;
    use crate::prereq::PrereqError;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
    }

    #[test]
    fn crate_errors_carry_codes_and_severities() {
        let malformed = FxpError::MalformedNumber { text: "x".into() };
        assert_eq!(malformed.severity(), ErrorSeverity::Validation);
        assert_eq!(malformed.error_code(), "FXP_MALFORMED_NUMBER");

        let deep = PrereqError::TreeTooDeep { limit: 64 };
        assert_eq!(deep.severity(), ErrorSeverity::Fatal);
        assert!(deep.severity().is_internal());
    }
}
