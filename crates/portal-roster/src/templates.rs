//! Spreadsheet templates for bulk participant upload.
//!
//! The portal hands these out as header-only workbooks; here they are
//! written as CSV and read back through [`crate::import_csv`].

use portal_model::ColumnDescriptor;

use crate::error::Result;
use crate::options::{gender_options, stage_options, yes_no_options};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    StudentInfo,
    TeacherInfo,
}

impl Template {
    pub const ALL: [Template; 2] = [Template::StudentInfo, Template::TeacherInfo];

    pub const fn title(self) -> &'static str {
        match self {
            Self::StudentInfo => "学生基本信息模板",
            Self::TeacherInfo => "教师基本信息模板",
        }
    }

    pub fn filename(self) -> String {
        format!("{}.csv", self.title())
    }

    /// Columns in header order. Labels are the template headers.
    pub fn columns(self) -> Vec<ColumnDescriptor> {
        let mut columns = vec![
            ColumnDescriptor::text("name", "姓名"),
            ColumnDescriptor::select("gender", "性别", gender_options()),
            ColumnDescriptor::text("nation", "民族"),
            ColumnDescriptor::text("idNo", "身份证号码").max_length(18),
        ];
        match self {
            Self::StudentInfo => columns.extend([
                ColumnDescriptor::text("className", "班级"),
                ColumnDescriptor::text("studentNo", "学籍号"),
            ]),
            Self::TeacherInfo => columns.extend([
                ColumnDescriptor::text("department", "院系"),
                ColumnDescriptor::text("title", "职务"),
                ColumnDescriptor::text("phone", "手机").max_length(11),
                ColumnDescriptor::text("email", "邮箱"),
            ]),
        }
        columns.extend([
            ColumnDescriptor::select("stage", "学段", stage_options()),
            ColumnDescriptor::select("isSeed", "是否为种子选手", yes_no_options()),
            ColumnDescriptor::text("remark", "备注"),
        ]);
        columns
    }

    pub fn headers(self) -> Vec<String> {
        self.columns().into_iter().map(|c| c.label).collect()
    }

    /// The header row as CSV text.
    pub fn to_csv(self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(self.headers())?;
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teacher_headers() {
        assert_eq!(
            Template::TeacherInfo.headers(),
            vec![
                "姓名",
                "性别",
                "民族",
                "身份证号码",
                "院系",
                "职务",
                "手机",
                "邮箱",
                "学段",
                "是否为种子选手",
                "备注"
            ]
        );
    }

    #[test]
    fn header_row_csv() {
        assert_eq!(
            Template::StudentInfo.to_csv().unwrap(),
            "姓名,性别,民族,身份证号码,班级,学籍号,学段,是否为种子选手,备注\n"
        );
    }
}
