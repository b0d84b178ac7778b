//! Shared option lists and status labels.

use std::fmt;
use std::str::FromStr;

use portal_model::{Role, SelectOption};
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// The 56 officially recognised nationalities, Han first.
pub const NATIONS: [&str; 56] = [
    "汉族", "蒙古族", "回族", "藏族", "维吾尔族", "苗族", "彝族", "壮族",
    "布依族", "朝鲜族", "满族", "侗族", "瑶族", "白族", "土家族", "哈尼族",
    "哈萨克族", "傣族", "黎族", "傈僳族", "佤族", "畲族", "高山族", "拉祜族",
    "水族", "东乡族", "纳西族", "景颇族", "柯尔克孜族", "土族", "达斡尔族", "仫佬族",
    "羌族", "布朗族", "撒拉族", "毛南族", "仡佬族", "锡伯族", "阿昌族", "普米族",
    "塔吉克族", "怒族", "乌孜别克族", "俄罗斯族", "鄂温克族", "德昂族", "保安族", "裕固族",
    "京族", "塔塔尔族", "独龙族", "鄂伦春族", "赫哲族", "门巴族", "珞巴族", "基诺族",
];

pub const STAGES: [&str; 2] = ["本科", "专科"];
pub const YES_NO: [&str; 2] = ["是", "否"];

fn same_options(values: &[&str]) -> Vec<SelectOption> {
    values.iter().copied().map(SelectOption::same).collect()
}

/// Gender options whose value is the label itself, used by the
/// information templates.
pub fn gender_options() -> Vec<SelectOption> {
    same_options(&["男", "女"])
}

/// Gender options used by the roster grids, stored as `male` / `female`.
pub fn roster_gender_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("男", "male"),
        SelectOption::new("女", "female"),
    ]
}

pub fn batch_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("第一批次", "1"),
        SelectOption::new("第二批次", "2"),
    ]
}

pub fn stage_options() -> Vec<SelectOption> {
    same_options(&STAGES)
}

pub fn yes_no_options() -> Vec<SelectOption> {
    same_options(&YES_NO)
}

pub fn nation_options() -> Vec<SelectOption> {
    same_options(&NATIONS)
}

/// Role options labelled for display, valued by role name.
pub fn role_options() -> Vec<SelectOption> {
    Role::ALL
        .into_iter()
        .map(|role| SelectOption::new(role.label(), role.as_str()))
        .collect()
}

/// Review status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
    #[default]
    Draft,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
        SubmissionStatus::Draft,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Draft => "draft",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "待审核",
            Self::Approved => "已通过",
            Self::Rejected => "已拒绝",
            Self::Draft => "草稿",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RosterError::UnknownStatus(trimmed.to_string()))
    }
}

/// Display label for a raw status value; unknown values are shown as-is.
pub fn status_label(value: &str) -> &str {
    value
        .parse::<SubmissionStatus>()
        .map_or(value, |status| status.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nation_list_is_complete_and_unique() {
        let mut sorted = NATIONS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 56);
        assert_eq!(nation_options()[0], SelectOption::same("汉族"));
    }

    #[test]
    fn status_labels() {
        assert_eq!(status_label("approved"), "已通过");
        assert_eq!(status_label("PENDING"), "待审核");
        assert_eq!(status_label("archived"), "archived");
    }

    #[test]
    fn role_options_follow_role_order() {
        let options = role_options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[5], SelectOption::new("日志审计员", "logaudit"));
    }
}
