//! Execution planner - pairs declared resources with observed state

use crate::diff::ResourceDiff;
use crate::error::Result;
use crate::resource::Resource;
use std::collections::BTreeMap;

/// One keyed resource instance
///
/// `observed` is the last persisted state, `desired` the declaration.
/// A missing declaration means the instance should be deleted.
#[derive(Debug, Clone)]
pub struct Instance<R> {
    pub key: String,
    pub observed: Option<R>,
    pub desired: Option<R>,
}

/// All instances of one resource kind
#[derive(Debug, Clone)]
pub struct ExecutionPlan<R> {
    pub instances: Vec<Instance<R>>,
}

impl<R: Resource> ExecutionPlan<R> {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    /// Pair observed and desired models by key
    ///
    /// Observed entries without an identifier are dropped, so a planned
    /// resource that was never created is created from its declaration.
    pub fn pair(observed: BTreeMap<String, R>, desired: BTreeMap<String, R>) -> Self {
        let mut observed: BTreeMap<String, R> = observed
            .into_iter()
            .filter(|(_, r)| !r.id().is_empty())
            .collect();

        let mut instances: Vec<Instance<R>> = desired
            .into_iter()
            .map(|(key, desired)| Instance {
                observed: observed.remove(&key),
                key,
                desired: Some(desired),
            })
            .collect();

        instances.extend(observed.into_iter().map(|(key, observed)| Instance {
            key,
            observed: Some(observed),
            desired: None,
        }));

        Self { instances }
    }

    /// Filter plan to only include instances matching a target
    ///
    /// Target format: "kind" or "kind.key". The kind matches either the
    /// resource kind or the manifest table name passed as `section`.
    pub fn filter_by_target(self, section: &str, target: Option<&str>) -> Self {
        let Some(target) = target else {
            return self;
        };
        let (kind, key) = parse_target(target);

        if let Some(kind) = kind.as_deref()
            && kind != R::KIND
            && kind != section
        {
            return Self::new();
        }

        match key {
            None => self,
            Some(key) => Self {
                instances: self
                    .instances
                    .into_iter()
                    .filter(|i| i.key == key)
                    .collect(),
            },
        }
    }

    /// Diff every instance, keyed by instance key
    ///
    /// # Errors
    ///
    /// Fails on the first model that cannot be request-mapped.
    pub fn diffs(&self) -> Result<Vec<(String, ResourceDiff)>> {
        let mut diffs = Vec::with_capacity(self.instances.len());
        for instance in &self.instances {
            let diff = match (&instance.observed, &instance.desired) {
                (observed, Some(desired)) => ResourceDiff::compute(observed.as_ref(), desired)?,
                (Some(observed), None) => ResourceDiff::removal(observed)?,
                (None, None) => continue,
            };
            diffs.push((instance.key.clone(), diff));
        }
        Ok(diffs)
    }

    /// Total number of instances in the plan
    pub fn total_resources(&self) -> usize {
        self.instances.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<R: Resource> Default for ExecutionPlan<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a target string like "kind.key" into (kind, key)
pub fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    match target.split_once('.') {
        None => (Some(target.to_string()), None),
        Some((kind, key)) if !kind.is_empty() => (Some(kind.to_string()), Some(key.to_string())),
        Some(_) => (None, Some(target.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Widget;
    use crate::types::Action;

    fn bound(name: &str, id: &str) -> Widget {
        let mut w = Widget::named(name);
        w.id = id.to_string();
        w
    }

    fn sample() -> ExecutionPlan<Widget> {
        let observed = BTreeMap::from([
            ("kept".to_string(), bound("kept", "w-1")),
            ("gone".to_string(), bound("gone", "w-2")),
            ("never".to_string(), Widget::named("never")),
        ]);
        let desired = BTreeMap::from([
            ("kept".to_string(), Widget::named("kept")),
            ("new".to_string(), Widget::named("new")),
            ("never".to_string(), Widget::named("never")),
        ]);
        ExecutionPlan::pair(observed, desired)
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("assistants"), (Some("assistants".to_string()), None));
        assert_eq!(
            parse_target("assistants.support"),
            (Some("assistants".to_string()), Some("support".to_string()))
        );
        assert_eq!(
            parse_target("tools.lookup.v2"),
            (Some("tools".to_string()), Some("lookup.v2".to_string()))
        );
        assert_eq!(parse_target(".x"), (None, Some(".x".to_string())));
    }

    #[test]
    fn test_pair_instances() {
        let plan = sample();
        assert_eq!(plan.total_resources(), 4);

        let by_key = |k: &str| plan.instances.iter().find(|i| i.key == k).unwrap();
        assert!(by_key("kept").observed.is_some());
        assert!(by_key("new").observed.is_none());
        assert!(by_key("never").observed.is_none());
        assert!(by_key("gone").desired.is_none());
    }

    #[test]
    fn test_diffs() {
        let diffs = sample().diffs().unwrap();
        let action = |k: &str| diffs.iter().find(|(key, _)| key == k).unwrap().1.action;
        assert_eq!(action("kept"), Action::NoChange);
        assert_eq!(action("new"), Action::Create);
        assert_eq!(action("never"), Action::Create);
        assert_eq!(action("gone"), Action::Delete);
    }

    #[test]
    fn test_filter_by_target() {
        assert_eq!(sample().filter_by_target("widgets", None).total_resources(), 4);
        assert_eq!(sample().filter_by_target("widgets", Some("widgets")).total_resources(), 4);
        assert_eq!(sample().filter_by_target("widgets", Some("widget")).total_resources(), 4);
        assert_eq!(sample().filter_by_target("widgets", Some("tools")).total_resources(), 0);

        let one = sample().filter_by_target("widgets", Some("widgets.gone"));
        assert_eq!(one.total_resources(), 1);
        assert_eq!(one.instances[0].key, "gone");
    }
}
