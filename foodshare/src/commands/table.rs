// foodshare/src/commands/table.rs
//
// Terminal rendering of result sets (comfy-table).

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use foodshare_core::domain::report::{Cell, ResultSet};

pub fn new_table<I, T>(header: I) -> Table
where
    I: IntoIterator<Item = T>,
    T: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn render(rs: &ResultSet) -> Table {
    let mut table = new_table(rs.columns.iter().map(String::as_str));
    for row in &rs.rows {
        table.add_row(row.iter().map(display_cell));
    }
    table
}

/// NULL shows as "-", floats with two decimals.
pub fn display_cell(cell: &Cell) -> String {
    match cell {
        Cell::Null => "-".to_string(),
        Cell::Float(v) => format!("{:.2}", v),
        other => other.to_string(),
    }
}
