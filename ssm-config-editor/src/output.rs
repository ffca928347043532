use crate::domain::ParameterMetadata;

const COLUMN_PADDING: usize = 2;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HEADERS: [&str; 3] = ["Name", "Version", "Last Modified"];

/// Renders a left-aligned table of parameters, header first.
pub fn render_parameter_table(parameters: &[ParameterMetadata]) -> String {
    let rows: Vec<[String; 3]> = parameters
        .iter()
        .map(|p| {
            [
                p.name.to_string(),
                p.version.to_string(),
                p.last_modified
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let last = cells.len() - 1;
    for (i, cell) in cells.iter().enumerate() {
        out.push_str(cell);
        if i < last {
            let pad = widths[i] - cell.chars().count() + COLUMN_PADDING;
            out.extend(std::iter::repeat_n(' ', pad));
        }
    }
    out.push('\n');
}
