//! Default field values of the entry forms and the category tree of the
//! school art education entry.

use serde::Serialize;
use serde_json::{Map, Value, json};

/// Entry forms with declared defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryForm {
    /// Film and television works catalog.
    Film,
    /// School art education achievements (OAAER), with the cascading
    /// category picker.
    SchoolArtEducation,
}

impl EntryForm {
    pub const ALL: [EntryForm; 2] = [EntryForm::Film, EntryForm::SchoolArtEducation];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Film => "film",
            Self::SchoolArtEducation => "school-art-education",
        }
    }

    /// Field defaults used both to seed the form and by `clear_form`.
    pub fn defaults(self) -> Map<String, Value> {
        let value = match self {
            Self::Film => json!({
                "performanceType": "",
                "artworkName": "",
                "creationTime": "",
                "song1": "",
                "song2": "",
                "song1HasChinese": true,
                "song1IsOriginal": false,
                "song2HasChinese": true,
                "song2IsOriginal": false,
                "contact": "",
                "phone": "",
                "address": "",
                "group": "",
                "leader": "",
                "tutor": "",
                "notice": false
            }),
            Self::SchoolArtEducation => json!({
                "performanceType": "",
                "categoryPath": [],
                "artworkName": "",
                "performerCount": null,
                "creationTime": "",
                "song1": "",
                "song2": "",
                "minutes": 0,
                "seconds": 0,
                "song1HasChinese": true,
                "song1IsOriginal": false,
                "song2HasChinese": true,
                "song2IsOriginal": false,
                "contact": "",
                "phone": "",
                "address": "",
                "group": "",
                "leader": "",
                "tutor": "",
                "conductor": "",
                "notice": false,
                "contactUnit": "",
                "contactPosition": "",
                "email": "",
                "intro": ""
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// A node of a cascading picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub label: &'static str,
    pub value: &'static str,
    #[serde(skip_serializing_if = "is_leaf")]
    pub children: &'static [CategoryNode],
}

impl CategoryNode {
    const fn leaf(label: &'static str, value: &'static str) -> Self {
        Self {
            label,
            value,
            children: &[],
        }
    }

    const fn branch(
        label: &'static str,
        value: &'static str,
        children: &'static [CategoryNode],
    ) -> Self {
        Self {
            label,
            value,
            children,
        }
    }
}

fn is_leaf(children: &&'static [CategoryNode]) -> bool {
    children.is_empty()
}

const TEACHING_CASE: &[CategoryNode] = &[
    CategoryNode::leaf("1. 艺术课程活力课堂", "1"),
    CategoryNode::leaf("2. 跨学科美育教学课例", "2"),
    CategoryNode::leaf("3. 数字技术在美育教学中的应用", "3"),
    CategoryNode::leaf("4. 美育课后服务教学实践", "4"),
];

const TEACHING_RESEARCH: &[CategoryNode] = &[
    CategoryNode::leaf("1. 传承中华优秀传统文化教育实践研究", "1"),
    CategoryNode::leaf("2. 艺术课程教学方法创新方法", "2"),
];

const PRACTICE_ACTIVITY: &[CategoryNode] = &[
    CategoryNode::leaf("2. 中小学美育浸润行动实践", "2"),
    CategoryNode::leaf("3. 常态化学生全员艺术展演实践", "3"),
    CategoryNode::leaf("4. 城乡中小学美育交流帮扶实践", "4"),
];

const CAMPUS_CULTURE: &[CategoryNode] = &[
    CategoryNode::leaf("1. 中华传统传统文化艺术传承学校建设", "1"),
    CategoryNode::leaf("2. 中小学艺术团建设", "2"),
    CategoryNode::leaf("3. 最美校园建设", "3"),
    CategoryNode::leaf("4. 社会资源整合与美育条件保障", "4"),
];

/// Categories of the school art education entry. Child values repeat
/// across branches, so a selection is always the full path.
pub const SCHOOL_ART_CATEGORIES: &[CategoryNode] = &[
    CategoryNode::branch("（一）教学案例", "teachingCase", TEACHING_CASE),
    CategoryNode::branch("（二）教学研究", "teachingResearch", TEACHING_RESEARCH),
    CategoryNode::branch("（三）实践活动", "practiceActivity", PRACTICE_ACTIVITY),
    CategoryNode::branch("（四）校园文化", "campusCulture", CAMPUS_CULTURE),
];

/// Resolves a value path to its labels.
///
/// Returns `None` for an empty path or when any step has no matching node.
pub fn category_labels<S: AsRef<str>>(
    tree: &'static [CategoryNode],
    path: &[S],
) -> Option<Vec<&'static str>> {
    if path.is_empty() {
        return None;
    }
    let mut level = tree;
    let mut labels = Vec::with_capacity(path.len());
    for step in path {
        let node = level.iter().find(|node| node.value == step.as_ref())?;
        labels.push(node.label);
        level = node.children;
    }
    Some(labels)
}

/// Reads a `categoryPath` form value into strings; non-string steps are
/// skipped.
pub fn category_path(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|steps| {
            steps
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_full_paths_only_through_matching_branches() {
        assert_eq!(
            category_labels(SCHOOL_ART_CATEGORIES, &["practiceActivity", "3"]),
            Some(vec!["（三）实践活动", "3. 常态化学生全员艺术展演实践"])
        );
        assert_eq!(
            category_labels(SCHOOL_ART_CATEGORIES, &["practiceActivity", "1"]),
            None
        );
        assert_eq!(category_labels::<&str>(SCHOOL_ART_CATEGORIES, &[]), None);
    }

    #[test]
    fn defaults_are_objects() {
        let film = EntryForm::Film.defaults();
        assert_eq!(film.len(), 16);
        assert_eq!(film.get("song1HasChinese"), Some(&Value::Bool(true)));
        let school = EntryForm::SchoolArtEducation.defaults();
        assert_eq!(school.get("categoryPath"), Some(&json!([])));
        assert_eq!(school.get("performerCount"), Some(&Value::Null));
    }
}
