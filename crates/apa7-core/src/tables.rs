//! APA table layout
//!
//! Three horizontal rules and nothing else: above the header row, below the
//! header row, below the last row. Border sets are rebuilt from scratch on
//! every run, never merged with what the document already had.

use apa7_ooxml::{points_to_twips, Border, BorderSide, LineSpacing, Table};
use tracing::debug;

use crate::config::FormatConfig;

/// Normalises table borders and cell text
#[derive(Debug, Clone)]
pub struct TableFormatter {
    font: String,
    size_pt: f32,
    rule: Border,
    cell_spacing_pt: f32,
    margin_vertical: i32,
    margin_horizontal: i32,
}

impl TableFormatter {
    pub fn new(config: &FormatConfig) -> Self {
        let table = &config.table;
        Self {
            font: config.body_font.clone(),
            size_pt: config.body_size_pt,
            rule: Border::single(table.border_weight_eighths, table.border_color.as_str()),
            cell_spacing_pt: table.cell_spacing_pt,
            margin_vertical: points_to_twips(table.cell_margin_vertical_pt),
            margin_horizontal: points_to_twips(table.cell_margin_horizontal_pt),
        }
    }

    /// Format one table
    pub fn format(&self, table: &mut Table<'_>) {
        table.clear_borders();
        if table.row_count() == 0 {
            return;
        }
        table.set_cell_margins(self.margin_vertical, self.margin_horizontal);

        let mut rows = table.rows();
        let last = rows.len().saturating_sub(1);
        debug!(rows = rows.len(), "formatting table");

        for (r, row) in rows.iter_mut().enumerate() {
            for mut cell in row.cells() {
                cell.clear_borders();
                cell.clear_shading();
                if r == 0 {
                    cell.set_border(&[BorderSide::Top, BorderSide::Bottom], &self.rule);
                }
                if r == last {
                    cell.set_border(&[BorderSide::Bottom], &self.rule);
                }

                for mut paragraph in cell.paragraphs() {
                    paragraph.set_default_font(&self.font, self.size_pt);
                    paragraph.set_spacing(
                        LineSpacing::Single,
                        self.cell_spacing_pt,
                        self.cell_spacing_pt,
                    );
                    paragraph.clear_indent();
                    paragraph.clear_shading();
                    for mut run in paragraph.runs() {
                        run.set_color("000000");
                        if r == 0 {
                            run.set_bold(true);
                            run.set_italic(false);
                        }
                    }
                }
            }
        }
    }
}
