//! Analysis engine: branch rule evaluation and version arithmetic

pub mod rule_matcher;
pub mod version_calculator;

pub use rule_matcher::{BranchRuleSet, RuleCategory, RuleMatcher};
pub use version_calculator::{parse_commit_count, Calculation, VersionCalculator};
