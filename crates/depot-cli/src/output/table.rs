//! Table formatting for solution summaries.

use comfy_table::{Attribute, Cell, ContentArrangement, Table as ComfyTable};

/// A minimal-bordered table, colored when the terminal supports it.
pub struct Table {
    inner: ComfyTable,
    colors_enabled: bool,
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        let colors_enabled = crate::output::colors_enabled();
        let mut inner = ComfyTable::new();
        inner.load_preset(comfy_table::presets::UTF8_BORDERS_ONLY);
        inner.set_content_arrangement(ContentArrangement::Dynamic);
        Self { inner, colors_enabled }
    }

    pub fn headers<I, T>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| {
                let mut cell = Cell::new(h.as_ref());
                if self.colors_enabled {
                    cell = cell.add_attribute(Attribute::Bold);
                }
                cell
            })
            .collect();
        self.inner.set_header(cells);
        self
    }

    pub fn row<I, T>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        self.inner.add_row(row);
        self
    }

    pub fn print(&self) {
        println!("{}", self.inner);
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
