//! Per-call accumulator for warnings and applied rules.

use tracing::debug;

use crate::dialect::DialectPair;
use crate::types::{ConversionOptions, ConversionResult, ConversionWarning, Severity};

/// State owned by exactly one conversion call.
///
/// Created at call entry, threaded by `&mut` through each rewrite step and
/// consumed by [`finish`](Self::finish). Never shared between calls.
#[derive(Debug)]
pub struct ConversionContext<'a> {
    pub pair: DialectPair,
    pub options: &'a ConversionOptions,
    warnings: Vec<ConversionWarning>,
    applied_rules: Vec<String>,
}

impl<'a> ConversionContext<'a> {
    pub fn new(pair: DialectPair, options: &'a ConversionOptions) -> Self {
        Self {
            pair,
            options,
            warnings: Vec::new(),
            applied_rules: Vec::new(),
        }
    }

    /// Record a rule that changed the output.
    pub fn rule(&mut self, label: impl Into<String>) {
        let label = label.into();
        debug!(pair = %self.pair, rule = %label, "rule applied");
        self.applied_rules.push(label);
    }

    /// Record an informational entry for something left as-is on purpose.
    pub fn unchanged(&mut self, label: impl Into<String>) {
        if self.options.record_unchanged {
            self.applied_rules.push(label.into());
        }
    }

    pub fn warn(&mut self, warning: ConversionWarning) {
        if warning.severity == Severity::Info && !self.options.include_info {
            return;
        }
        self.warnings.push(warning);
    }

    /// Mutable access to the audit trail, for whole-fragment text transforms.
    pub fn audit_log(&mut self) -> &mut Vec<String> {
        &mut self.applied_rules
    }

    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    pub fn applied_rules(&self) -> &[String] {
        &self.applied_rules
    }

    pub fn finish(self, converted_sql: String) -> ConversionResult {
        ConversionResult {
            converted_sql,
            warnings: self.warnings,
            applied_rules: self.applied_rules,
        }
    }
}
