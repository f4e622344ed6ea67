//! Tool registrations, one module per tool group.

pub mod artifacts;
pub mod assets;
pub mod content;
pub mod diagnostics;
pub mod launch;
pub mod linear;
pub mod notion;
pub mod research;
pub mod scaffold;
pub mod slack;

use promo_core::gate::EnvSnapshot;
use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::catalog::ToolDescriptor;

/// Parameters for tools that take no arguments.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct EmptyParams {}

/// Full descriptor set for one server instance.
///
/// The diagnostic tool joins the set only when the debug switch is on;
/// everything else is handed to the enablement gate at registration.
pub fn registry(snapshot: &EnvSnapshot) -> Vec<ToolDescriptor> {
    let mut descriptors = Vec::new();
    descriptors.extend(launch::tools());
    descriptors.extend(scaffold::tools());
    descriptors.extend(content::tools());
    descriptors.extend(research::tools());
    descriptors.extend(notion::tools());
    descriptors.extend(slack::tools());
    descriptors.extend(linear::tools());
    descriptors.extend(artifacts::tools());
    descriptors.extend(assets::tools());
    if snapshot.debug_enabled() {
        descriptors.push(diagnostics::tool());
    }
    descriptors
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn registry_covers_every_group_once() {
        let descriptors = registry(&snapshot(&[]));
        assert_eq!(descriptors.len(), 47);

        let names: HashSet<&str> = descriptors
            .iter()
            .map(crate::catalog::ToolDescriptor::name)
            .collect();
        assert_eq!(names.len(), descriptors.len(), "tool names must be unique");
    }

    #[test]
    fn the_diagnostic_tool_rides_on_the_debug_switch() {
        let without = registry(&snapshot(&[]));
        assert!(!without.iter().any(|d| d.name() == "diagnostic"));

        let with = registry(&snapshot(&[("PROMO_MCP_DEBUG", "true")]));
        assert!(with.iter().any(|d| d.name() == "diagnostic"));
        assert_eq!(with.len(), 48);

        let uppercase = registry(&snapshot(&[("PROMO_MCP_DEBUG", "TRUE")]));
        assert_eq!(uppercase.len(), 47);
    }
}
