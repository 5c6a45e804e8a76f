// SPDX-License-Identifier: MPL-2.0
//! Best-effort diagnostic sink for per-key lookup errors.

use crate::error::LookupError;

/// Receives the non-fatal lookup errors that trigger fallback steps.
///
/// Reporting is best-effort: implementations must not panic, and the engine
/// behaves identically whether a sink is installed or not.
pub trait ErrorReporter: Send + Sync + 'static {
    fn report_errors(&self, errors: Vec<LookupError>);
}

/// Default sink: warnings through the `log` facade.
///
/// With no logger installed the records go nowhere, which is exactly the
/// contract: absence of a logging facility never changes control flow.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report_errors(&self, errors: Vec<LookupError>) {
        for error in errors {
            log::warn!("{}", error);
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ErrorReporter for NullReporter {
    fn report_errors(&self, _errors: Vec<LookupError>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporters_accept_errors_without_panicking() {
        let errors = vec![LookupError::missing_message(
            "greeting",
            &"pl".parse().expect("valid language tag"),
        )];
        LogReporter.report_errors(errors.clone());
        NullReporter.report_errors(errors);
    }
}
