use tabled::{settings::Style, Table, Tabled};

use crate::state::GameStateView;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            field: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn game_state_table(view: &GameStateView) -> String {
    let path = view
        .path
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" → ");

    let mut builder = TableBuilder::new();
    builder.add_row("Username", &view.username);
    builder.add_row("Level", &view.current_level_name);
    builder.add_row("Map size", &view.map_size.to_string());
    builder.add_row("Health", &view.health.to_string());
    builder.add_row("Position", &view.current_position.to_string());
    builder.add_row("Path", &path);
    builder.build()
}
