//! An explicit, immutable list of rules handed to the engines.

use std::fmt;
use std::sync::Arc;

use crate::result::{ResultDescription, RuleMetadata};
use crate::rule::ValidationRule;
use crate::rules;

/// An ordered set of rules.
///
/// Cloning is cheap; rules are shared behind [`Arc`].
#[derive(Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<Arc<dyn ValidationRule>>,
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.metadata().name.as_ref()))
            .finish()
    }
}

impl RuleCatalog {
    pub fn new(rules: Vec<Arc<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    /// Every local rule.
    pub fn local() -> Self {
        Self::new(rules::local_rules())
    }

    /// Every remote rule.
    pub fn remote() -> Self {
        Self::new(rules::remote_rules())
    }

    /// Local rules followed by remote rules.
    pub fn all() -> Self {
        let mut rules = rules::local_rules();
        rules.extend(rules::remote_rules());
        Self::new(rules)
    }

    /// Append a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ValidationRule>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look a rule up by its metadata name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ValidationRule>> {
        self.rules.iter().find(|rule| rule.metadata().name == name)
    }

    /// Metadata and result catalog of every rule, for documentation.
    pub fn describe(&self) -> Vec<(&RuleMetadata, &'static [ResultDescription])> {
        self.rules
            .iter()
            .map(|rule| (rule.metadata(), rule.result_descriptions()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::RuleCategory;
    use crate::rules::ValidScope;

    #[test]
    fn test_catalog_categories() {
        assert!(
            RuleCatalog::local()
                .iter()
                .all(|rule| rule.metadata().category == RuleCategory::Local)
        );
        assert!(
            RuleCatalog::remote()
                .iter()
                .all(|rule| rule.metadata().category == RuleCategory::Remote)
        );
        assert_eq!(
            RuleCatalog::all().len(),
            RuleCatalog::local().len() + RuleCatalog::remote().len()
        );
    }

    #[test]
    fn test_partial_catalog() {
        let catalog = RuleCatalog::default().with_rule(ValidScope);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("validScope").is_some());
        assert!(catalog.get("validContext").is_none());
    }

    #[test]
    fn test_describe_lists_results() {
        let catalog = RuleCatalog::local();
        let described = catalog.describe();
        let (metadata, results) = described
            .iter()
            .find(|(metadata, _)| metadata.name == "validScope")
            .unwrap();
        assert_eq!(metadata.category, RuleCategory::Local);
        assert!(results.iter().any(|result| result.title == "Missing openid scope"));
    }
}
