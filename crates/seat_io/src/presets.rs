//! Built-in presets and their file-backed equivalents.
//!
//! `eu2024` ships the European Parliament 2024 rules (31 constituencies,
//! 720 seats) and the group display table used by the half-circle chart.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use seat_core::ids::GroupLabel;
use seat_core::variables::PolicyTable;

use crate::{IoError, IoResult};

const EU2024_POLICY: &str = include_str!("../../../data/eu2024/policy.json");
const EU2024_GROUPS: &str = include_str!("../../../data/eu2024/groups.json");

/// Category used for groups missing from the display table. Sorts last,
/// just before the chart filler.
pub const UNSTYLED_CATEGORY: u8 = 0;
/// Color used for unstyled groups and the chart filler.
pub const FALLBACK_COLOR: &str = "#FFFFFF";

/// Built-in policy table by name.
pub fn policy_preset(name: &str) -> IoResult<PolicyTable> {
    match name {
        "eu2024" => parse_policy_table(EU2024_POLICY),
        other => Err(IoError::UnknownPreset(other.to_string())),
    }
}

/// Built-in group display table by name.
pub fn group_styles_preset(name: &str) -> IoResult<GroupStyles> {
    match name {
        "eu2024" => parse_group_styles(EU2024_GROUPS),
        other => Err(IoError::UnknownPreset(other.to_string())),
    }
}

pub fn parse_policy_table(s: &str) -> IoResult<PolicyTable> {
    Ok(serde_json::from_str(s)?)
}

pub fn load_policy_table(path: &Path) -> IoResult<PolicyTable> {
    let s = fs::read_to_string(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    parse_policy_table(&s)
}

pub fn parse_group_styles(s: &str) -> IoResult<GroupStyles> {
    let file: GroupStylesFile = serde_json::from_str(s)?;
    GroupStyles::from_file(file)
}

pub fn load_group_styles(path: &Path) -> IoResult<GroupStyles> {
    let s = fs::read_to_string(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    parse_group_styles(&s)
}

/* ------------------------------ group styles ------------------------------ */

/// Wire shape: a category → color palette plus group → category rows.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupStylesFile {
    pub categories: BTreeMap<u8, String>,
    pub groups: Vec<GroupCategoryRow>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupCategoryRow {
    pub group: GroupLabel,
    pub category: u8,
}

/// Display attributes of one political group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupStyle {
    /// Chart ordering key (slices are drawn in descending category).
    pub category: u8,
    /// `#RRGGBB`.
    pub color: String,
}

/// Resolved group → style table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupStyles {
    styles: BTreeMap<GroupLabel, GroupStyle>,
}

impl GroupStyles {
    fn from_file(file: GroupStylesFile) -> IoResult<Self> {
        for (cat, color) in &file.categories {
            if *cat == UNSTYLED_CATEGORY {
                return Err(IoError::Invalid(format!("category {UNSTYLED_CATEGORY} is reserved")));
            }
            if !is_hex_color(color) {
                return Err(IoError::Invalid(format!("category {cat}: bad color {color:?}")));
            }
        }
        let mut styles = BTreeMap::new();
        for row in file.groups {
            let color = file
                .categories
                .get(&row.category)
                .cloned()
                .ok_or_else(|| {
                    IoError::Invalid(format!("group {}: unknown category {}", row.group, row.category))
                })?;
            if styles.contains_key(&row.group) {
                return Err(IoError::Invalid(format!("duplicate group {}", row.group)));
            }
            styles.insert(row.group, GroupStyle { category: row.category, color });
        }
        Ok(Self { styles })
    }

    /// Style for `group`, or the fallback for groups not in the table.
    pub fn style(&self, group: &GroupLabel) -> GroupStyle {
        self.styles.get(group).cloned().unwrap_or_else(|| GroupStyle {
            category: UNSTYLED_CATEGORY,
            color: FALLBACK_COLOR.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].bytes().all(|b| b.is_ascii_hexdigit())
}
