// cdmqc/src/render.rs
//
// Terminal rendering of report tables. The sections have already classified
// every cell; this module only maps highlights to colours (red = hard
// exception, blue = flagged drift) and never recomputes check logic.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell as TableCell, Color, ContentArrangement, Table};

use cdmqc_core::domain::report::{Cell, Highlight, ReportTable};

pub fn print_report(report: &ReportTable) {
    println!("\n📋 {}", report.title);
    if !report.description.is_empty() {
        println!("   {}", report.description);
    }
    if report.rows.is_empty() {
        println!("   (no applicable tables in this schema)");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        report
            .columns
            .iter()
            .map(|c| TableCell::new(c).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for row in &report.rows {
        table.add_row(row.iter().map(render_cell).collect::<Vec<_>>());
    }

    println!("{table}");
}

fn render_cell(cell: &Cell) -> TableCell {
    let mut out = TableCell::new(&cell.text);
    match cell.highlight {
        Highlight::Red => out = out.fg(Color::Red),
        Highlight::Blue => out = out.fg(Color::Blue),
        Highlight::None => {}
    }
    if cell.bold {
        out = out.add_attribute(Attribute::Bold);
    }
    out
}
