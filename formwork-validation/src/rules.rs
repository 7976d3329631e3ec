// Rule trait, catalog and registry

use crate::clock::Clock;
use crate::errors::{EngineError, Result};
use crate::field::{FieldDescriptor, FieldSnapshot, Snapshots};
use crate::result::Violation;
use crate::rule_config::{RuleConfig, RuleKind, RuleSpec};
use crate::validators;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only data a rule may consult besides its own field.
pub struct RuleContext<'a> {
    pub snapshots: &'a Snapshots,
    pub character_encoding: &'a str,
    /// Locale-default short date pattern.
    pub date_pattern: &'a str,
    pub clock: &'a dyn Clock,
}

/// Look up an encoding whose byte widths can be measured.
///
/// Labels that encoding_rs can only decode (the replacement encodings) are
/// rejected; UTF-16 widths are computed without an encoder.
pub fn measurable_encoding(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes()).filter(|encoding| {
        encoding.output_encoding() == *encoding || *encoding == UTF_16LE || *encoding == UTF_16BE
    })
}

impl RuleContext<'_> {
    /// Resolve the configured character encoding.
    pub fn encoding(&self) -> Result<&'static Encoding> {
        measurable_encoding(self.character_encoding)
            .ok_or_else(|| EngineError::UnsupportedEncoding(self.character_encoding.to_string()))
    }
}

/// A check run against one field.
///
/// `evaluate` receives the configuration whose kind matched [`Rule::kind`].
/// Returning `Ok(None)` means the value passed or the rule does not apply to
/// it; `Err` is reserved for configuration failures.
pub trait Rule: Send + Sync {
    fn kind(&self) -> RuleKind;

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>>;
}

type RuleFactory = Arc<dyn Fn() -> Arc<dyn Rule> + Send + Sync>;

/// Name → factory table used to resolve configured rule lists.
#[derive(Clone)]
pub struct RuleCatalog {
    factories: HashMap<String, RuleFactory>,
}

impl RuleCatalog {
    /// Catalog holding every built-in rule under its [`RuleKind::name`].
    pub fn builtin() -> Self {
        let mut catalog = Self {
            factories: HashMap::new(),
        };
        for kind in RuleKind::BUILTIN {
            if let Some(rule) = validators::builtin(&kind) {
                catalog.register(kind.name(), move || rule.clone());
            }
        }
        catalog
    }

    /// Register or replace a factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn Rule> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Option<Arc<dyn Rule>> {
        self.factories.get(name).map(|factory| factory())
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Ordered rules of one engine: standard rules, then custom rules.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    standard: Vec<Arc<dyn Rule>>,
    custom: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// Resolve rule names through `catalog`. Unknown names are a caller error.
    pub fn from_names<S: AsRef<str>>(
        catalog: &RuleCatalog,
        standard: &[S],
        custom: &[S],
    ) -> Result<Self> {
        let resolve = |names: &[S]| -> Result<Vec<Arc<dyn Rule>>> {
            names
                .iter()
                .map(|name| {
                    let name = name.as_ref();
                    catalog.create(name).ok_or_else(|| {
                        EngineError::illegal_usage(format!("no rule registered as {:?}", name))
                    })
                })
                .collect()
        };

        Ok(Self {
            standard: resolve(standard)?,
            custom: resolve(custom)?,
        })
    }

    pub fn push_standard(&mut self, rule: Arc<dyn Rule>) {
        self.standard.push(rule);
    }

    pub fn push_custom(&mut self, rule: Arc<dyn Rule>) {
        self.custom.push(rule);
    }

    /// All rules in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.standard.iter().chain(self.custom.iter())
    }

    pub fn len(&self) -> usize {
        self.standard.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn handles(&self, kind: &RuleKind) -> bool {
        self.iter().any(|rule| &rule.kind() == kind)
    }

    /// Rules that apply to `descriptor`, in registry order. A field declaring
    /// the same kind twice gets both configurations, in declaration order.
    pub fn applicable<'a>(
        &'a self,
        descriptor: &'a FieldDescriptor,
    ) -> Vec<(&'a dyn Rule, &'a RuleSpec)> {
        let mut applicable = Vec::new();
        for rule in self.iter() {
            let kind = rule.kind();
            for spec in descriptor.rules.iter().filter(|spec| spec.kind() == kind) {
                applicable.push((rule.as_ref(), spec));
            }
        }
        applicable
    }
}
