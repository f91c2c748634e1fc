use crate::error::Result;
use crate::utils::constants::{PREVIEW_HEIGHT, PREVIEW_SERIES, PREVIEW_WIDTH};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const MARGIN: f64 = 50.0;
const MARKER_SIZE: f64 = 20.0;
const MARKER_EDGE_WIDTH: f64 = 5.0;

/// Static line chart with square markers, rendered as an HTML page.
pub struct ChartPreview {
    values: Vec<f64>,
    width: u32,
    height: u32,
}

impl ChartPreview {
    pub fn new() -> Self {
        Self::with_values(PREVIEW_SERIES.to_vec())
    }

    pub fn with_values(values: Vec<f64>) -> Self {
        Self {
            values,
            width: PREVIEW_WIDTH,
            height: PREVIEW_HEIGHT,
        }
    }

    /// Pixel coordinates of every value, x by index, y scaled to the data range.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let plot_width = f64::from(self.width) - 2.0 * MARGIN;
        let plot_height = f64::from(self.height) - 2.0 * MARGIN;

        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = if max > min { max - min } else { 1.0 };
        let steps = self.values.len().saturating_sub(1).max(1) as f64;

        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let x = MARGIN + plot_width * i as f64 / steps;
                let y = MARGIN + plot_height * (1.0 - (v - min) / range);
                (x, y)
            })
            .collect()
    }

    pub fn render_svg(&self) -> String {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let mut svg = String::new();

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r##"  <path d="M{m} {m} V{b} H{r}" fill="none" stroke="#444" stroke-width="1"/>"##,
            m = MARGIN,
            b = h - MARGIN,
            r = w - MARGIN
        );

        let points = self.points();
        if !points.is_empty() {
            let polyline: Vec<String> = points
                .iter()
                .map(|(x, y)| format!("{:.1},{:.1}", x, y))
                .collect();
            let _ = writeln!(
                svg,
                r#"  <polyline points="{}" fill="none" stroke="black" stroke-width="2"/>"#,
                polyline.join(" ")
            );
        }

        for ((x, y), value) in points.iter().zip(&self.values) {
            let _ = writeln!(
                svg,
                r#"  <rect x="{:.1}" y="{:.1}" width="{s}" height="{s}" fill="black" stroke="white" stroke-width="{e}"><title>{}</title></rect>"#,
                x - MARKER_SIZE / 2.0,
                y - MARKER_SIZE / 2.0,
                value,
                s = MARKER_SIZE,
                e = MARKER_EDGE_WIDTH
            );
        }

        svg.push_str("</svg>\n");
        svg
    }

    pub fn render_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>airsense preview</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            self.render_svg()
        )
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render_html())?;
        debug!(path = %path.display(), "chart written");
        Ok(())
    }

    /// Write the page to a temporary file that outlives the process so a
    /// browser can still load it.
    pub fn write_temp(&self) -> Result<PathBuf> {
        let file = tempfile::Builder::new()
            .prefix("airsense-graph-")
            .suffix(".html")
            .tempfile()?;
        let (_, path) = file.keep().map_err(io::Error::from)?;
        self.write_to(&path)?;
        Ok(path)
    }
}

impl Default for ChartPreview {
    fn default() -> Self {
        Self::new()
    }
}

/// Hand `path` to the platform's default viewer.
pub fn open_in_viewer(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };

    let status = command.arg(path).status()?;
    if !status.success() {
        return Err(io::Error::other(format!("viewer exited with {}", status)).into());
    }
    Ok(())
}
