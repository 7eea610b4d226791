//! Planner configuration.

use serde::{Deserialize, Serialize};

use crate::models::OrderKey;

/// How the "first task is independent" rule is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstTaskPolicy {
    /// After every operation the first task is independent; edits that
    /// would make it dependent are rejected.
    #[default]
    Strict,
    /// Moves (drag and drop) leave a dependent task that lands first as
    /// it is. Direct edits remain strict.
    PreserveOnDrag,
}

/// Planner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// First-task rule enforcement.
    #[serde(default)]
    pub first_task_policy: FirstTaskPolicy,

    /// Renumber the location and retry when no order key fits.
    #[serde(default = "default_auto_renumber")]
    pub auto_renumber: bool,

    /// Gap between keys after renumbering.
    #[serde(default = "default_renumber_step")]
    pub renumber_step: OrderKey,
}

fn default_auto_renumber() -> bool {
    true
}

fn default_renumber_step() -> OrderKey {
    OrderKey::ONE
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            first_task_policy: FirstTaskPolicy::default(),
            auto_renumber: default_auto_renumber(),
            renumber_step: default_renumber_step(),
        }
    }
}

impl PlannerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first-task policy.
    pub fn with_first_task_policy(mut self, policy: FirstTaskPolicy) -> Self {
        self.first_task_policy = policy;
        self
    }

    /// Enables or disables automatic renumbering.
    pub fn with_auto_renumber(mut self, enabled: bool) -> Self {
        self.auto_renumber = enabled;
        self
    }

    /// Sets the renumbering step. Non-positive steps fall back to `1.00`.
    pub fn with_renumber_step(mut self, step: OrderKey) -> Self {
        self.renumber_step = if step > OrderKey::ZERO {
            step
        } else {
            OrderKey::ONE
        };
        self
    }

    /// Renumbering step, guarded against non-positive values.
    pub(crate) fn step(&self) -> OrderKey {
        if self.renumber_step > OrderKey::ZERO {
            self.renumber_step
        } else {
            OrderKey::ONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.first_task_policy, FirstTaskPolicy::Strict);
        assert!(config.auto_renumber);
        assert_eq!(config.renumber_step, OrderKey::ONE);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{ "first_task_policy": "preserve_on_drag" }"#).unwrap();
        assert_eq!(config.first_task_policy, FirstTaskPolicy::PreserveOnDrag);
        assert!(config.auto_renumber);

        let config: PlannerConfig =
            serde_json::from_str(r#"{ "auto_renumber": false, "renumber_step": 10.0 }"#).unwrap();
        assert!(!config.auto_renumber);
        assert_eq!(config.renumber_step, OrderKey::from_units(10));
    }

    #[test]
    fn test_step_guard() {
        let config = PlannerConfig::new().with_renumber_step(OrderKey::ZERO);
        assert_eq!(config.step(), OrderKey::ONE);

        let mut raw = PlannerConfig::new();
        raw.renumber_step = OrderKey::from_hundredths(-5);
        assert_eq!(raw.step(), OrderKey::ONE);
    }
}
