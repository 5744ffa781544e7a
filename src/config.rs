//! Centralized runtime constants for rulesync.
//!
//! All fixed names, separators, and channel capacities are collected here so
//! they can be found and adjusted in a single place rather than scattered
//! across modules.

/// Key under which the full rule set is persisted in the synchronized store.
pub const RULES_STORE_KEY: &str = "rules";

/// Separator between the primary and secondary pattern in a rule key.
pub const RULE_KEY_SEPARATOR: char = ';';

/// Pattern an absent secondary pattern contributes to the rule key
/// ("match anything").
pub const MATCH_ALL_PATTERN: &str = "*";

/// Capacity of the store change-notification broadcast channel. A listener
/// that falls further behind than this reloads from the store instead of
/// replaying missed events.
pub const CHANGE_FEED_CAPACITY: usize = 64;
