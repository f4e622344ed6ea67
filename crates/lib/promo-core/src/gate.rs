//! Selective tool enablement driven by environment switches.

use std::collections::BTreeMap;
use std::fmt;

/// Prefix for switches that enable a single tool by name.
pub const TOOL_FLAG_PREFIX: &str = "PROMO_MCP_TOOL_";

/// Prefix for switches that enable a whole tool group.
pub const GROUP_FLAG_PREFIX: &str = "PROMO_MCP_GROUP_";

/// Switch that turns on debug logging and the diagnostic tool.
pub const DEBUG_FLAG: &str = "PROMO_MCP_DEBUG";

// A switch counts only when set to exactly this value.
const ENABLED_VALUE: &str = "true";

/// Functional grouping of tools, each with its own enablement switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolGroup {
    Launch,
    Scaffolding,
    Diagnostics,
    ContentGenerators,
    Research,
    Notion,
    Slack,
    Linear,
    Artifacts,
    AssetGenerators,
}

impl ToolGroup {
    pub const ALL: [Self; 10] = [
        Self::Launch,
        Self::Scaffolding,
        Self::Diagnostics,
        Self::ContentGenerators,
        Self::Research,
        Self::Notion,
        Self::Slack,
        Self::Linear,
        Self::Artifacts,
        Self::AssetGenerators,
    ];

    /// Environment variable that enables every tool in this group.
    #[must_use]
    pub const fn switch_name(self) -> &'static str {
        match self {
            Self::Launch => "PROMO_MCP_GROUP_LAUNCH",
            Self::Scaffolding => "PROMO_MCP_GROUP_SCAFFOLDING",
            Self::Diagnostics => "PROMO_MCP_GROUP_DIAGNOSTICS",
            Self::ContentGenerators => "PROMO_MCP_GROUP_CONTENT_GENERATORS",
            Self::Research => "PROMO_MCP_GROUP_RESEARCH",
            Self::Notion => "PROMO_MCP_GROUP_NOTION",
            Self::Slack => "PROMO_MCP_GROUP_SLACK",
            Self::Linear => "PROMO_MCP_GROUP_LINEAR",
            Self::Artifacts => "PROMO_MCP_GROUP_ARTIFACTS",
            Self::AssetGenerators => "PROMO_MCP_GROUP_ASSET_GENERATORS",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Scaffolding => "scaffolding",
            Self::Diagnostics => "diagnostics",
            Self::ContentGenerators => "content generators",
            Self::Research => "research",
            Self::Notion => "notion",
            Self::Slack => "slack",
            Self::Linear => "linear",
            Self::Artifacts => "artifacts",
            Self::AssetGenerators => "asset generators",
        }
    }
}

impl fmt::Display for ToolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable capture of environment variables taken at startup.
///
/// The gate reads only from a snapshot, so registration decisions are
/// reproducible and testable without touching the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Whether the debug switch is set to exactly `true`.
    #[must_use]
    pub fn debug_enabled(&self) -> bool {
        self.get(DEBUG_FLAG) == Some(ENABLED_VALUE)
    }

    /// All captured variables in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

/// Decides which tools to register based on environment switches.
///
/// With no switches set, every tool is registered. Setting any
/// `PROMO_MCP_TOOL_*` or `PROMO_MCP_GROUP_*` variable to exactly
/// `true` activates selective mode, where a tool is registered when
/// its own switch or any of its groups' switches is on.
#[derive(Debug, Clone)]
pub struct EnablementGate {
    snapshot: EnvSnapshot,
}

impl EnablementGate {
    #[must_use]
    pub const fn new(snapshot: EnvSnapshot) -> Self {
        Self { snapshot }
    }

    #[must_use]
    pub fn from_process_env() -> Self {
        Self::new(EnvSnapshot::from_process_env())
    }

    /// Whether any enablement switch is on, which narrows registration
    /// to explicitly enabled tools and groups.
    #[must_use]
    pub fn selective_mode_active(&self) -> bool {
        self.snapshot.entries().any(|(name, value)| {
            (name.starts_with(TOOL_FLAG_PREFIX) || name.starts_with(GROUP_FLAG_PREFIX))
                && value == ENABLED_VALUE
        })
    }

    #[must_use]
    pub fn group_enabled(&self, group: ToolGroup) -> bool {
        self.switch_on(group.switch_name())
    }

    #[must_use]
    pub fn tool_enabled(&self, flag: &str) -> bool {
        self.switch_on(flag)
    }

    /// Registration decision for a tool with the given switch and groups.
    #[must_use]
    pub fn should_register(&self, flag: &str, groups: &[ToolGroup]) -> bool {
        if !self.selective_mode_active() {
            return true;
        }
        self.switch_on(flag) || groups.iter().any(|group| self.group_enabled(*group))
    }

    /// Groups whose tools currently register, for diagnostic reports.
    #[must_use]
    pub fn enabled_groups(&self) -> Vec<ToolGroup> {
        if self.selective_mode_active() {
            ToolGroup::ALL
                .into_iter()
                .filter(|group| self.group_enabled(*group))
                .collect()
        } else {
            ToolGroup::ALL.to_vec()
        }
    }

    fn switch_on(&self, name: &str) -> bool {
        self.snapshot.get(name) == Some(ENABLED_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn open_mode_registers_everything() {
        let gate = EnablementGate::new(snapshot(&[]));

        assert!(!gate.selective_mode_active());
        assert!(gate.should_register("PROMO_MCP_TOOL_USE_PERPLEXITY", &[ToolGroup::Research]));
        assert!(gate.should_register("PROMO_MCP_TOOL_DOCTOR", &[]));
        assert_eq!(gate.enabled_groups().len(), ToolGroup::ALL.len());
    }

    #[test]
    fn unrelated_variables_do_not_activate_selective_mode() {
        let gate = EnablementGate::new(snapshot(&[
            ("PATH", "/usr/bin"),
            ("PROMO_API_TOKEN", "secret"),
            ("PROMO_MCP_DEBUG", "true"),
        ]));

        assert!(!gate.selective_mode_active());
        assert!(gate.should_register("PROMO_MCP_TOOL_NOTION_FETCH_DATA", &[ToolGroup::Notion]));
    }

    #[test]
    fn only_the_exact_value_true_counts() {
        for value in ["TRUE", "True", "1", "yes", "", " true"] {
            let gate = EnablementGate::new(snapshot(&[("PROMO_MCP_GROUP_RESEARCH", value)]));
            assert!(
                !gate.selective_mode_active(),
                "value {value:?} must not activate selective mode"
            );
            assert!(gate.should_register("PROMO_MCP_TOOL_LIST_REDDIT", &[ToolGroup::Slack]));
        }
    }

    #[test]
    fn group_switch_narrows_registration_to_that_group() {
        let gate = EnablementGate::new(snapshot(&[("PROMO_MCP_GROUP_RESEARCH", "true")]));

        assert!(gate.selective_mode_active());
        assert!(gate.should_register("PROMO_MCP_TOOL_USE_PERPLEXITY", &[ToolGroup::Research]));
        assert!(!gate.should_register("PROMO_MCP_TOOL_SEND_SLACK_MESSAGE", &[ToolGroup::Slack]));
        assert!(!gate.should_register("PROMO_MCP_TOOL_LAUNCH_APP", &[ToolGroup::Launch]));
    }

    #[test]
    fn tool_in_several_groups_registers_when_any_group_is_on() {
        let gate = EnablementGate::new(snapshot(&[("PROMO_MCP_GROUP_ARTIFACTS", "true")]));

        let groups = [ToolGroup::ContentGenerators, ToolGroup::Artifacts];
        assert!(gate.should_register("PROMO_MCP_TOOL_CREATE_POST_ARTIFACT", &groups));
    }

    #[test]
    fn individual_switch_registers_only_that_tool() {
        let gate = EnablementGate::new(snapshot(&[(
            "PROMO_MCP_TOOL_USE_PERPLEXITY",
            "true",
        )]));

        assert!(gate.selective_mode_active());
        assert!(gate.should_register("PROMO_MCP_TOOL_USE_PERPLEXITY", &[ToolGroup::Research]));
        assert!(!gate.should_register("PROMO_MCP_TOOL_DEEP_RESEARCH", &[ToolGroup::Research]));
        assert_eq!(gate.enabled_groups(), Vec::new());
    }

    #[test]
    fn tool_without_groups_needs_its_own_switch_in_selective_mode() {
        let gate = EnablementGate::new(snapshot(&[("PROMO_MCP_GROUP_NOTION", "true")]));
        assert!(!gate.should_register("PROMO_MCP_TOOL_STANDALONE", &[]));

        let gate = EnablementGate::new(snapshot(&[
            ("PROMO_MCP_GROUP_NOTION", "true"),
            ("PROMO_MCP_TOOL_STANDALONE", "true"),
        ]));
        assert!(gate.should_register("PROMO_MCP_TOOL_STANDALONE", &[]));
    }

    #[test]
    fn tool_and_group_switches_combine_inclusively() {
        let gate = EnablementGate::new(snapshot(&[
            ("PROMO_MCP_GROUP_SLACK", "true"),
            ("PROMO_MCP_TOOL_USE_PERPLEXITY", "true"),
        ]));

        assert!(gate.should_register("PROMO_MCP_TOOL_USE_PERPLEXITY", &[ToolGroup::Research]));
        assert!(gate.should_register("PROMO_MCP_TOOL_SEND_SLACK_MESSAGE", &[ToolGroup::Slack]));
        assert!(!gate.should_register("PROMO_MCP_TOOL_NOTION_FETCH_DATA", &[ToolGroup::Notion]));
        assert_eq!(gate.enabled_groups(), [ToolGroup::Slack]);
    }

    #[test]
    fn group_switch_names_follow_the_prefix() {
        for group in ToolGroup::ALL {
            assert!(group.switch_name().starts_with(GROUP_FLAG_PREFIX));
        }
    }

    #[test]
    fn debug_switch_requires_the_exact_value() {
        assert!(snapshot(&[("PROMO_MCP_DEBUG", "true")]).debug_enabled());
        assert!(!snapshot(&[("PROMO_MCP_DEBUG", "TRUE")]).debug_enabled());
        assert!(!snapshot(&[("PROMO_MCP_DEBUG", "1")]).debug_enabled());
        assert!(!snapshot(&[]).debug_enabled());
    }
}
