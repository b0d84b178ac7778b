//! Column layouts of the participant rosters.

use std::fmt;
use std::str::FromStr;

use portal_model::ColumnDescriptor;

use crate::error::RosterError;
use crate::options::{batch_options, roster_gender_options};

/// Every roster grid the entry forms embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Roster {
    InstrumentalMembers,
    InstrumentalTeachers,
    ArtworkMembers,
    ArtPracticeMembers,
    ArtPracticeTeachers,
    VocalTeachers,
    VocalMembers,
    VocalConductors,
    VocalAccompanists,
}

impl Roster {
    pub const ALL: [Roster; 9] = [
        Roster::InstrumentalMembers,
        Roster::InstrumentalTeachers,
        Roster::ArtworkMembers,
        Roster::ArtPracticeMembers,
        Roster::ArtPracticeTeachers,
        Roster::VocalTeachers,
        Roster::VocalMembers,
        Roster::VocalConductors,
        Roster::VocalAccompanists,
    ];

    /// Stable command-line name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::InstrumentalMembers => "instrumental-members",
            Self::InstrumentalTeachers => "instrumental-teachers",
            Self::ArtworkMembers => "artwork-members",
            Self::ArtPracticeMembers => "art-practice-members",
            Self::ArtPracticeTeachers => "art-practice-teachers",
            Self::VocalTeachers => "vocal-teachers",
            Self::VocalMembers => "vocal-members",
            Self::VocalConductors => "vocal-conductors",
            Self::VocalAccompanists => "vocal-accompanists",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::InstrumentalMembers => "器乐作品参赛学生",
            Self::InstrumentalTeachers => "器乐作品指导教师",
            Self::ArtworkMembers => "美术作品作者",
            Self::ArtPracticeMembers => "艺术实践工作坊学生",
            Self::ArtPracticeTeachers => "艺术实践工作坊教师",
            Self::VocalTeachers => "声乐作品指导教师",
            Self::VocalMembers => "声乐作品参赛学生",
            Self::VocalConductors => "声乐作品指挥",
            Self::VocalAccompanists => "声乐作品伴奏",
        }
    }

    pub fn columns(self) -> Vec<ColumnDescriptor> {
        match self {
            Self::InstrumentalMembers => vec![
                name_column("作者姓名"),
                id_no_column(),
                gender_column(),
                student_id_column(),
                phone_column(),
            ],
            Self::InstrumentalTeachers
            | Self::VocalTeachers
            | Self::VocalConductors
            | Self::VocalAccompanists => staff_columns(),
            Self::ArtworkMembers => vec![
                ColumnDescriptor::text("name", "作者姓名").width(100),
                ColumnDescriptor::text("id_card", "身份证号")
                    .width(180)
                    .max_length(18),
                ColumnDescriptor::select("gender", "性别", roster_gender_options()).width(80),
                ColumnDescriptor::text("ethnicity", "民族").width(80),
                age_column().width(80),
                ColumnDescriptor::text("student_id", "学籍号").width(140),
                ColumnDescriptor::text("contact", "联系方式")
                    .width(120)
                    .max_length(11),
                ColumnDescriptor::text("school", "学校").width(140),
                ColumnDescriptor::text("grade", "年级").width(100),
            ],
            Self::ArtPracticeMembers => vec![
                name_column("姓名"),
                id_no_column(),
                nation_column(),
                age_column(),
                gender_column(),
                school_column(),
                student_id_column(),
                phone_column(),
                batch_column(),
            ],
            Self::ArtPracticeTeachers => vec![
                name_column("姓名"),
                id_no_column(),
                nation_column(),
                age_column(),
                gender_column(),
                school_column(),
                phone_column(),
                batch_column(),
            ],
            Self::VocalMembers => vec![
                name_column("姓名"),
                id_no_column(),
                nation_column(),
                age_column(),
                gender_column(),
                ColumnDescriptor::text("grade", "年级").width(100),
                student_id_column(),
                phone_column(),
            ],
        }
    }
}

impl fmt::Display for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Roster {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|roster| roster.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RosterError::UnknownRoster(trimmed.to_string()))
    }
}

/// Teacher, conductor and accompanist rows share one layout.
fn staff_columns() -> Vec<ColumnDescriptor> {
    vec![
        name_column("姓名"),
        id_no_column(),
        nation_column(),
        age_column(),
        gender_column(),
        phone_column(),
    ]
}

fn name_column(label: &str) -> ColumnDescriptor {
    ColumnDescriptor::text("name", label).width(120)
}

fn id_no_column() -> ColumnDescriptor {
    ColumnDescriptor::text("idNo", "身份证号").width(200).max_length(18)
}

fn nation_column() -> ColumnDescriptor {
    ColumnDescriptor::text("nation", "民族").width(100)
}

fn age_column() -> ColumnDescriptor {
    ColumnDescriptor::number("age", "年龄").width(100).min(1.0).max(120.0)
}

fn gender_column() -> ColumnDescriptor {
    ColumnDescriptor::select("gender", "性别", roster_gender_options()).width(150)
}

fn school_column() -> ColumnDescriptor {
    ColumnDescriptor::text("school", "学校").width(100)
}

fn student_id_column() -> ColumnDescriptor {
    ColumnDescriptor::text("studentId", "学籍号").width(160)
}

fn phone_column() -> ColumnDescriptor {
    ColumnDescriptor::text("phone", "联系方式").width(160).max_length(11)
}

fn batch_column() -> ColumnDescriptor {
    ColumnDescriptor::select("batch", "批次", batch_options()).width(180)
}
