use serde::Serialize;

/// `--json` output: the value pretty-printed on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Plain-text listing used by `spotlight product list`.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", format_table(headers, &rows));
}

/// Left-aligned columns separated by two spaces, a dashed rule under the
/// header, trailing padding trimmed. Cells beyond the header count are kept
/// unpadded.
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let render = |cells: Vec<String>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{cell:w$}")
            })
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = render(headers.iter().map(|h| h.to_string()).collect());
    out.push_str(&render(widths.iter().map(|&w| "-".repeat(w)).collect()));
    for row in rows {
        out.push_str(&render(row.clone()));
    }
    out
}
