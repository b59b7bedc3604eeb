//! Dialect-pair rule registry.
//!
//! A [`RuleRegistry`] maps an ordered `(source, target)` pair to the rules
//! registered for it, in registration order. It is generic over the rule kind:
//! the converters keep function mappings, data-type mappings and text rules
//! in separate registries with the same lookup contract.
//!
//! Registries are filled once while the process starts (see the `Lazy`
//! statics in [`crate::converter`]) and are only read afterwards, so a shared
//! reference can be used from any number of threads.

use regex::{Captures, NoExpand, Regex};
use std::collections::HashMap;

use crate::dialect::DialectPair;

/// Ordered rule lists keyed by dialect pair.
#[derive(Debug)]
pub struct RuleRegistry<R> {
    rules: HashMap<DialectPair, Vec<R>>,
}

impl<R> Default for RuleRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RuleRegistry<R> {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Append a rule to the pair's pipeline.
    pub fn register(&mut self, pair: DialectPair, rule: R) -> &mut Self {
        self.rules.entry(pair).or_default().push(rule);
        self
    }

    pub fn register_all(&mut self, pair: DialectPair, rules: impl IntoIterator<Item = R>) -> &mut Self {
        self.rules.entry(pair).or_default().extend(rules);
        self
    }

    /// Rules for a pair, in registration order. Identity pairs have none.
    pub fn rules(&self, pair: DialectPair) -> &[R] {
        if pair.is_identity() {
            return &[];
        }
        self.rules.get(&pair).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First rule for the pair matching `pred`.
    pub fn find(&self, pair: DialectPair, pred: impl Fn(&R) -> bool) -> Option<&R> {
        self.rules(pair).iter().find(|r| pred(r))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.values().all(Vec::is_empty)
    }

    pub fn pairs(&self) -> impl Iterator<Item = &DialectPair> {
        self.rules.keys()
    }
}

/// A rule that rewrites SQL text.
pub trait TextRewrite {
    /// Provenance label recorded when the rule changes the text.
    fn label(&self) -> &str;

    /// Rewrite `input`. Whole-fragment rules may append detail to `log`.
    fn rewrite(&self, input: &str, log: &mut Vec<String>) -> String;
}

impl<R: TextRewrite> RuleRegistry<R> {
    /// Run the pair's rules as a pipeline, each consuming the previous output.
    ///
    /// A rule is recorded in `log` only if it changed the text; anything a
    /// no-op rule wrote to the log is discarded.
    pub fn apply(&self, pair: DialectPair, input: &str, log: &mut Vec<String>) -> String {
        let mut text = input.to_string();
        for rule in self.rules(pair) {
            let mark = log.len();
            let out = rule.rewrite(&text, log);
            if out == text {
                log.truncate(mark);
                continue;
            }
            log.push(rule.label().to_string());
            text = out;
        }
        text
    }
}

/// Run `f` over the text between `'...'` string literals.
///
/// Literals, including `''` escapes, are copied through untouched. An
/// unterminated literal runs to the end of the input.
pub fn outside_literals(input: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('\'') {
        out.push_str(&f(&rest[..start]));
        let body = &rest[start + 1..];
        match body.find('\'') {
            Some(end) => {
                out.push_str(&rest[start..start + end + 2]);
                rest = &body[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(&f(rest));
    out
}

/// The three text rule shapes.
///
/// `Replace` and `Dynamic` patterns only match outside string literals.
#[derive(Debug, Clone)]
pub enum TextRule {
    /// Pattern to a fixed replacement (no capture expansion).
    Replace {
        label: String,
        pattern: Regex,
        replacement: String,
    },
    /// Pattern to a function of the captured groups.
    Dynamic {
        label: String,
        pattern: Regex,
        rewrite: fn(&Captures<'_>) -> String,
    },
    /// Arbitrary text-to-text function with access to the audit log.
    Transform {
        label: String,
        apply: fn(&str, &mut Vec<String>) -> String,
    },
}

impl TextRule {
    pub fn replace(
        label: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(TextRule::Replace {
            label: label.into(),
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    pub fn dynamic(
        label: impl Into<String>,
        pattern: &str,
        rewrite: fn(&Captures<'_>) -> String,
    ) -> Result<Self, regex::Error> {
        Ok(TextRule::Dynamic {
            label: label.into(),
            pattern: Regex::new(pattern)?,
            rewrite,
        })
    }

    pub fn transform(label: impl Into<String>, apply: fn(&str, &mut Vec<String>) -> String) -> Self {
        TextRule::Transform {
            label: label.into(),
            apply,
        }
    }
}

impl TextRewrite for TextRule {
    fn label(&self) -> &str {
        match self {
            TextRule::Replace { label, .. }
            | TextRule::Dynamic { label, .. }
            | TextRule::Transform { label, .. } => label,
        }
    }

    fn rewrite(&self, input: &str, log: &mut Vec<String>) -> String {
        match self {
            TextRule::Replace {
                pattern,
                replacement,
                ..
            } => outside_literals(input, |code| {
                pattern
                    .replace_all(code, NoExpand(replacement.as_str()))
                    .into_owned()
            }),
            TextRule::Dynamic {
                pattern, rewrite, ..
            } => outside_literals(input, |code| {
                pattern
                    .replace_all(code, |caps: &Captures<'_>| rewrite(caps))
                    .into_owned()
            }),
            TextRule::Transform { apply, .. } => apply(input, log),
        }
    }
}
