//! In-memory dependency rule registry.
//!
//! Built once from a rule catalogue and shared read-only (wrap it in an
//! `Arc` to hand it to several services). All ordering is deterministic:
//! descending priority, then ascending id.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::domain::{
    entities::DependencyRule,
    error::DomainError,
    value_objects::RuleCategory,
};

/// Two rules setting the same runtime property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyCollision {
    pub key: String,
    /// Rule whose value was replaced.
    pub overridden_by: String,
    pub previous_rule: String,
    pub previous_value: String,
    pub value: String,
}

/// Result of merging runtime properties across rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyAggregation {
    pub properties: BTreeMap<String, String>,
    pub collisions: Vec<PropertyCollision>,
}

#[derive(Debug, Clone)]
pub struct DependencyRegistry {
    rules: HashMap<String, DependencyRule>,
    aliases: HashMap<String, String>,
}

impl DependencyRegistry {
    /// Build a registry, rejecting invalid rules and duplicate ids or aliases.
    pub fn new(rules: impl IntoIterator<Item = DependencyRule>) -> Result<Self, DomainError> {
        let mut by_id: HashMap<String, DependencyRule> = HashMap::new();
        let mut aliases: HashMap<String, String> = HashMap::new();

        for rule in rules {
            rule.validate()?;
            if by_id.contains_key(&rule.id) || aliases.contains_key(&rule.id) {
                return Err(DomainError::DuplicateRule { id: rule.id });
            }
            for alias in &rule.aliases {
                let alias = alias.to_ascii_lowercase();
                if by_id.contains_key(&alias) || aliases.contains_key(&alias) || alias == rule.id {
                    return Err(DomainError::InvalidRule {
                        id: rule.id.clone(),
                        reason: format!("alias '{alias}' is already taken"),
                    });
                }
                aliases.insert(alias, rule.id.clone());
            }
            by_id.insert(rule.id.clone(), rule);
        }

        debug!(rules = by_id.len(), aliases = aliases.len(), "Dependency registry built");
        Ok(Self {
            rules: by_id,
            aliases,
        })
    }

    /// Canonical id for an id or alias.
    pub fn canonical_id<'a>(&'a self, id: &'a str) -> Option<&'a str> {
        if let Some((key, _)) = self.rules.get_key_value(id) {
            return Some(key.as_str());
        }
        self.aliases.get(id).map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&DependencyRule> {
        self.canonical_id(id).and_then(|c| self.rules.get(c))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every rule, in priority order.
    pub fn all(&self) -> Vec<&DependencyRule> {
        let mut rules: Vec<_> = self.rules.values().collect();
        sort_by_priority(&mut rules);
        rules
    }

    pub fn by_category(&self, category: RuleCategory) -> Vec<&DependencyRule> {
        self.all()
            .into_iter()
            .filter(|r| r.category == category)
            .collect()
    }

    /// Rules for the given ids, deduplicated and in priority order.
    ///
    /// Unknown ids are skipped; they have no generation effect.
    pub fn rules_for<I, S>(&self, ids: I) -> Vec<&DependencyRule>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut rules = Vec::new();

        for id in ids {
            let id = id.as_ref();
            match self.get(id) {
                Some(rule) => {
                    if seen.insert(rule.id.as_str()) {
                        rules.push(rule);
                    }
                }
                None => debug!(id, "Unknown dependency id ignored"),
            }
        }

        sort_by_priority(&mut rules);
        rules
    }

    /// Canonical ids of the known entries in `ids`, in priority order.
    pub fn resolve_ids<I, S>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rules_for(ids).into_iter().map(|r| r.id.clone()).collect()
    }

    /// Union of runtime properties. Rules are applied in priority order and
    /// the last writer wins; every overwrite is logged and reported.
    pub fn aggregate_properties<I, S>(&self, ids: I) -> PropertyAggregation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut properties = BTreeMap::new();
        let mut owners: BTreeMap<String, String> = BTreeMap::new();
        let mut collisions = Vec::new();

        for rule in self.rules_for(ids) {
            for (key, value) in &rule.runtime.properties {
                if let Some(previous) = properties.insert(key.clone(), value.clone()) {
                    let previous_rule = owners.get(key).cloned().unwrap_or_default();
                    if previous != *value {
                        warn!(
                            key = %key,
                            previous_rule = %previous_rule,
                            rule = %rule.id,
                            "Runtime property overridden by lower-priority rule"
                        );
                        collisions.push(PropertyCollision {
                            key: key.clone(),
                            overridden_by: rule.id.clone(),
                            previous_rule,
                            previous_value: previous,
                            value: value.clone(),
                        });
                    }
                }
                owners.insert(key.clone(), rule.id.clone());
            }
        }

        PropertyAggregation {
            properties,
            collisions,
        }
    }
}

fn sort_by_priority(rules: &mut [&DependencyRule]) {
    rules.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
}
