//! Terminal tables.

use std::collections::BTreeSet;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use portal_auth::MenuItem;
use portal_model::{
    CellValue, ColumnDescriptor, ColumnKind, Notice, NoticeLevel, Notifier, Record, RowId, Session,
};
use portal_roster::RowIssue;
use portal_store::TokenState;

/// Prints notices to stderr, where a person running the command sees them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let marker = match notice.level {
            NoticeLevel::Success => "✔",
            NoticeLevel::Info => "i",
            NoticeLevel::Warning => "!",
            NoticeLevel::Error => "✘",
        };
        eprintln!("{marker} {}", notice.message);
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Dim)
}

/// Text shown for a cell; select values show their option label.
pub fn cell_text(column: &ColumnDescriptor, value: &CellValue) -> String {
    let text = value.display();
    match column.kind {
        ColumnKind::Select => column
            .option_for_value(&text)
            .map_or_else(|| text.into_owned(), |option| option.label.clone()),
        ColumnKind::Text | ColumnKind::Number => text.into_owned(),
    }
}

fn describe_constraints(column: &ColumnDescriptor) -> String {
    let c = &column.constraints;
    let mut parts = Vec::new();
    if let Some(min) = c.min {
        parts.push(format!("min {}", CellValue::Number(min)));
    }
    if let Some(max) = c.max {
        parts.push(format!("max {}", CellValue::Number(max)));
    }
    if let Some(max_length) = c.max_length {
        parts.push(format!("≤ {max_length} chars"));
    }
    parts.join(", ")
}

pub fn columns_table(columns: &[ColumnDescriptor]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Kind"),
        header_cell("Constraints"),
        header_cell("Options"),
    ]);
    apply_table_style(&mut table);
    for column in columns {
        let kind = match column.kind {
            ColumnKind::Text => "text",
            ColumnKind::Select => "select",
            ColumnKind::Number => "number",
        };
        let options = column
            .options
            .iter()
            .map(|o| {
                if o.label == o.value {
                    o.label.clone()
                } else {
                    format!("{}={}", o.label, o.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(vec![
            Cell::new(&column.key),
            Cell::new(&column.label),
            Cell::new(kind),
            Cell::new(describe_constraints(column)),
            Cell::new(options),
        ]);
    }
    table
}

/// One page of rows. Cells with an issue are highlighted.
pub fn records_table(
    columns: &[ColumnDescriptor],
    rows: &[&Record],
    issues: &[(RowId, RowIssue)],
) -> Table {
    let flagged: BTreeSet<(RowId, &str)> = issues
        .iter()
        .map(|(id, issue)| (*id, issue.field()))
        .collect();

    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(columns.iter().map(|c| header_cell(&c.label)));
    table.set_header(header);
    apply_table_style(&mut table);
    if let Some(first) = table.column_mut(0) {
        first.set_cell_alignment(CellAlignment::Right);
    }

    for row in rows {
        let mut cells = vec![dim_cell(&row.id.to_string())];
        for column in columns {
            let text = row
                .get(&column.key)
                .map(|value| cell_text(column, value))
                .unwrap_or_default();
            let cell = Cell::new(text);
            cells.push(if flagged.contains(&(row.id, column.key.as_str())) {
                cell.fg(Color::Red).add_attribute(Attribute::Bold)
            } else {
                cell
            });
        }
        table.add_row(cells);
    }
    table
}

pub fn issues_table(columns: &[ColumnDescriptor], issues: &[(RowId, RowIssue)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Row"), header_cell("Column"), header_cell("Problem")]);
    apply_table_style(&mut table);
    for (id, issue) in issues {
        let label = columns
            .iter()
            .find(|c| c.key == issue.field())
            .map_or(issue.field(), |c| c.label.as_str());
        table.add_row(vec![
            Cell::new(id),
            Cell::new(label),
            Cell::new(issue.message(label)).fg(Color::Red),
        ]);
    }
    table
}

pub fn session_table(session: &Session, token: &TokenState) -> Table {
    let token_state = match token {
        TokenState::Valid(_) => "valid",
        TokenState::Expired => "expired",
        TokenState::Absent => "no expiry",
    };
    let permissions = if session.permissions.is_empty() {
        "-".to_string()
    } else {
        session.permissions.join(", ")
    };

    let mut table = Table::new();
    apply_table_style(&mut table);
    table.add_row(vec![header_cell("User"), Cell::new(&session.user_id)]);
    table.add_row(vec![
        header_cell("Role"),
        Cell::new(format!("{} ({})", session.role, session.role.label())),
    ]);
    table.add_row(vec![header_cell("Token"), Cell::new(token_state)]);
    table.add_row(vec![header_cell("Permissions"), Cell::new(permissions)]);
    table
}

pub fn menu_table(items: &[MenuItem]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Route"), header_cell("Menu")]);
    apply_table_style(&mut table);
    for item in items {
        table.add_row(vec![item.path, item.title]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_model::SelectOption;

    fn gender() -> ColumnDescriptor {
        ColumnDescriptor::select(
            "gender",
            "性别",
            vec![SelectOption::new("男", "male"), SelectOption::new("女", "female")],
        )
    }

    #[test]
    fn test_select_cells_show_labels() {
        assert_eq!(cell_text(&gender(), &CellValue::text("female")), "女");
        assert_eq!(cell_text(&gender(), &CellValue::text("其他")), "其他");
    }

    #[test]
    fn test_columns_table_lists_constraints() {
        let columns = vec![
            ColumnDescriptor::number("age", "年龄").min(1.0).max(120.0),
            gender(),
        ];
        let rendered = columns_table(&columns).to_string();
        assert!(rendered.contains("min 1, max 120"));
        assert!(rendered.contains("男=male"));
    }

    #[test]
    fn test_records_table_has_one_line_per_row() {
        let columns = vec![ColumnDescriptor::text("name", "姓名"), gender()];
        let rows = [
            Record::new(1).with("name", "张三").with("gender", "male"),
            Record::new(2).with("name", "李四"),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let mut table = records_table(&columns, &refs, &[]);
        table.force_no_tty();
        let rendered = table.to_string();
        assert!(rendered.contains("张三"));
        assert!(rendered.contains("男"));
        assert_eq!(table.row_iter().count(), 2);
    }
}
