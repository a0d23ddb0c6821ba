//! Plain-text drawing of render descriptions for the terminal.

use std::fmt::{self, Write};

use crime_risk_dashboard_models::{Bar, Marker, Panel, Render, SeriesPoint};

/// Widest bar drawn for chart panels.
const BAR_WIDTH: usize = 40;

/// Text form of a [`Render`], drawn through [`fmt::Display`].
pub struct TextRender<'a>(pub &'a Render);

impl fmt::Display for TextRender<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = self.0;
        writeln!(f, "{}", render.title)?;
        writeln!(f, "{}", "=".repeat(render.title.chars().count()))?;

        for panel in &render.panels {
            f.write_char('\n')?;
            write_panel(f, panel)?;
        }
        Ok(())
    }
}

/// Draws a whole render as text.
#[must_use]
pub fn render_text(render: &Render) -> String {
    TextRender(render).to_string()
}

fn write_panel(out: &mut impl Write, panel: &Panel) -> fmt::Result {
    match panel {
        Panel::Text { text } => writeln!(out, "{text}"),
        Panel::Metric {
            label,
            value,
            detail,
        } => match detail {
            Some(detail) => writeln!(out, "{label}: {value} ({detail})"),
            None => writeln!(out, "{label}: {value}"),
        },
        Panel::LineChart {
            title,
            y_label,
            points,
        } => write_series(out, title, y_label, points),
        Panel::BarChart { title, bars } => write_bars(out, title, bars),
        Panel::MarkerMap {
            center,
            radius_km,
            markers,
        } => {
            match radius_km {
                Some(r) => writeln!(out, "Map centred on {center}, radius {r:.1} km")?,
                None => writeln!(out, "Map centred on {center}")?,
            }
            write_markers(out, markers)
        }
        Panel::Table { columns, rows } => write_table(out, columns, rows),
        Panel::Warning { message } => writeln!(out, "WARNING: {message}"),
        Panel::Error { message } => writeln!(out, "ERROR: {message}"),
    }
}

/// Number of `#` characters for `value` on a scale where `max` fills
/// [`BAR_WIDTH`].
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar_len(value: f64, max: f64) -> usize {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    ((value / max) * BAR_WIDTH as f64).round() as usize
}

fn write_series(
    out: &mut impl Write,
    title: &str,
    y_label: &str,
    points: &[SeriesPoint],
) -> fmt::Result {
    writeln!(out, "{title} ({y_label})")?;
    let max = points.iter().map(|p| p.value).fold(0.0, f64::max);
    for point in points {
        writeln!(
            out,
            "  {:>4} {:>10.2} {}",
            point.year,
            point.value,
            "#".repeat(bar_len(point.value, max))
        )?;
    }
    Ok(())
}

fn write_bars(out: &mut impl Write, title: &str, bars: &[Bar]) -> fmt::Result {
    writeln!(out, "{title}")?;
    let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    let max = bars.iter().map(|b| b.value).fold(0.0, f64::max);
    for bar in bars {
        writeln!(
            out,
            "  {:<label_width$} {:>10.2} {}",
            bar.label,
            bar.value,
            "#".repeat(bar_len(bar.value, max))
        )?;
    }
    Ok(())
}

fn write_markers(out: &mut impl Write, markers: &[Marker]) -> fmt::Result {
    for marker in markers {
        match marker.tier {
            Some(tier) => writeln!(
                out,
                "  * {} [{}] at {}",
                marker.label,
                tier.label(),
                marker.location
            ),
            None => writeln!(out, "  * {} at {}", marker.label, marker.location),
        }?;
    }
    Ok(())
}

fn write_table(out: &mut impl Write, columns: &[String], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(columns))?;
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(out, "{}", "-".repeat(total))?;
    for row in rows {
        writeln!(out, "{}", line(row))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crime_risk_geography_models::Coordinate;

    #[test]
    fn draws_title_and_metric() {
        let mut render = Render::new("Demo");
        render.push(Panel::Metric {
            label: "Cases".to_string(),
            value: "210".to_string(),
            detail: Some("2021".to_string()),
        });
        let text = render_text(&render);
        assert!(text.starts_with("Demo\n====\n"));
        assert!(text.contains("Cases: 210 (2021)"));
    }

    #[test]
    fn bars_scale_to_largest_value() {
        assert_eq!(bar_len(10.0, 10.0), BAR_WIDTH);
        assert_eq!(bar_len(5.0, 10.0), BAR_WIDTH / 2);
        assert_eq!(bar_len(0.0, 10.0), 0);
        assert_eq!(bar_len(-3.0, 10.0), 0);
        assert_eq!(bar_len(3.0, 0.0), 0);
    }

    #[test]
    fn tables_align_columns() {
        let mut out = String::new();
        write_table(
            &mut out,
            &["District".to_string(), "Km".to_string()],
            &[
                vec!["Pune".to_string(), "0.0".to_string()],
                vec!["Pimpri".to_string(), "13.6".to_string()],
            ],
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "District  Km");
        assert_eq!(lines[1], "-".repeat(14));
        assert_eq!(lines[2], "Pune      0.0");
        assert_eq!(lines[3], "Pimpri    13.6");
    }

    #[test]
    fn warnings_and_errors_are_prefixed() {
        let mut render = Render::new("T");
        render.warning("no coordinate");
        render.error("model offline");
        render.push(Panel::MarkerMap {
            center: Coordinate::new(1.0, 2.0),
            radius_km: Some(5.0),
            markers: Vec::new(),
        });
        let text = render_text(&render);
        assert!(text.contains("WARNING: no coordinate"));
        assert!(text.contains("ERROR: model offline"));
        assert!(text.contains("Map centred on 1.0000, 2.0000, radius 5.0 km"));
    }

    /// Sink that refuses every write.
    struct Refusing;

    impl Write for Refusing {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn write_failures_propagate() {
        let panel = Panel::Table {
            columns: vec!["District".to_string()],
            rows: vec![vec!["Pune".to_string()]],
        };
        assert!(write_panel(&mut Refusing, &panel).is_err());
        assert!(write!(Refusing, "{}", TextRender(&Render::new("T"))).is_err());
    }
}
