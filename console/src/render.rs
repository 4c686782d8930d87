//! Plain-text tables for list commands.

use std::io::{self, Write};

use fleet_app::labels::Badge;

/// Column-aligned table written to any `Write` sink.
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the table followed by the record count line.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        if self.is_empty() {
            writeln!(out, "No se encontraron registros")?;
            return writeln!(out, "{}", count_line(0));
        }

        let widths = self.widths();
        let header: Vec<String> = self.headers.iter().map(|h| (*h).to_string()).collect();
        write_line(out, &header, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(out, &rule, &widths)?;
        for row in &self.rows {
            write_line(out, row, &widths)?;
        }
        writeln!(out, "{}", count_line(self.len()))
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

/// Cell text with its badge class; the neutral classes stay unmarked.
pub fn badge(text: &str, badge: Badge) -> String {
    match badge {
        Badge::Success => text.to_string(),
        Badge::Info | Badge::Warning | Badge::Danger | Badge::Secondary => {
            format!("{text} [{}]", badge.as_str())
        }
    }
}

pub fn count_line(count: usize) -> String {
    format!("Mostrando {count} registro(s)")
}

fn write_line(out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map_or("", String::as_str);
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: &Table) -> String {
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_columns_align_on_widest_cell() {
        let mut table = Table::new(&["ID", "Placa"]);
        table.row(vec!["1".into(), "ABC123".into()]);
        table.row(vec!["200".into(), "X".into()]);
        let text = render(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID   Placa");
        assert_eq!(lines[1], "---  ------");
        assert_eq!(lines[2], "1    ABC123");
        assert_eq!(lines[3], "200  X");
        assert_eq!(lines[4], "Mostrando 2 registro(s)");
    }

    #[test]
    fn test_multibyte_text_counts_characters() {
        let mut table = Table::new(&["Ruta"]);
        table.row(vec!["Quito → Ibarra".into()]);
        let text = render(&table);
        assert_eq!(
            text.lines().nth(1).unwrap().chars().count(),
            "Quito → Ibarra".chars().count()
        );
    }

    #[test]
    fn test_badge_marks_only_non_success() {
        assert_eq!(badge("Activo", Badge::Success), "Activo");
        assert_eq!(badge("Alto", Badge::Danger), "Alto [danger]");
        assert_eq!(badge("Bajo", Badge::Info), "Bajo [info]");
    }

    #[test]
    fn test_empty_table_reports_zero() {
        let table = Table::new(&["ID"]);
        let text = render(&table);
        assert!(text.contains("No se encontraron registros"));
        assert!(text.contains("Mostrando 0 registro(s)"));
    }
}
