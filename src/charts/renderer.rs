//! Static Chart Renderer
//! Writes dashboard charts as PNG files with plotters.
//!
//! Layout follows the interactive dashboard:
//! - donuts for distributions, labelled with share and count
//! - year-over-year lines with markers
//! - grouped Passed/Failed bars per department

use crate::charts::{format_count, PALETTE};
use crate::data::Department;
use crate::stats::{Distribution, Status, StatusCount};
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;

type DrawResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const FONT: &str = "sans-serif";
/// Width of one department slot on the bar chart's integer x axis.
const SLOT: i32 = 10;

pub struct StaticChartRenderer {
    width: u32,
    height: u32,
}

impl StaticChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn series_rgb(index: usize) -> RGBColor {
        let [r, g, b] = PALETTE[index % PALETTE.len()];
        RGBColor(r, g, b)
    }

    /// Render a distribution as a donut chart.
    pub fn render_donut(&self, dist: &Distribution, path: &Path) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(&dist.title, (FONT, 26))?;
        let (w, h) = area.dim_in_pixel();

        if dist.total() <= 0 {
            area.draw(&Text::new(
                "No data",
                (w as i32 / 2 - 30, h as i32 / 2),
                (FONT, 20).into_font(),
            ))?;
            root.present()?;
            return Ok(());
        }

        let sizes: Vec<f64> = dist.slices.iter().map(|s| s.count.max(0) as f64).collect();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.35;
        let colors: Vec<RGBColor> = (0..sizes.len()).map(Self::series_rgb).collect();
        let labels: Vec<String> = dist
            .slices
            .iter()
            .map(|s| format!("{} ({})", s.label, format_count(s.count)))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.donut_hole(radius * 0.3);
        pie.label_style((FONT, 18).into_font().color(&BLACK));
        pie.percentages((FONT, 16).into_font().color(&WHITE));
        area.draw(&pie)?;

        root.present()?;
        Ok(())
    }

    /// Render (year, value) points as a line with markers.
    pub fn render_trend(
        &self,
        title: &str,
        points: &[[f64; 2]],
        y_desc: &str,
        path: &Path,
    ) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_min, x_max) = Self::bounds(points.iter().map(|p| p[0]));
        let (y_min, y_max) = Self::bounds(points.iter().map(|p| p[1]));
        let pad = ((y_max - y_min) * 0.1).max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 26))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((x_min - 0.5)..(x_max + 0.5), (y_min - pad)..(y_max + pad))?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc(y_desc)
            .x_labels(points.len().max(2))
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()?;

        let color = Self::series_rgb(0);
        chart.draw_series(LineSeries::new(
            points.iter().map(|p| (p[0], p[1])),
            color.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|p| Circle::new((p[0], p[1]), 4, color.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    /// Render Passed and Failed bars side by side per department.
    pub fn render_grouped_bars(&self, title: &str, pivot: &[StatusCount], path: &Path) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let max = pivot.iter().map(|e| e.count).max().unwrap_or(0).max(1) as f64;
        let slots = Department::ALL.len() as i32 * SLOT;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 26))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..slots, 0f64..max * 1.15)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots as usize + 1)
            .x_label_formatter(&|x| Self::slot_label(*x))
            .y_desc("Count")
            .draw()?;

        for (i, status) in [Status::Passed, Status::Failed].into_iter().enumerate() {
            let color = Self::series_rgb(i);
            let offset = 1 + i as i32 * 4;
            chart
                .draw_series(pivot.iter().filter(|e| e.status == status).filter_map(|e| {
                    let slot = Department::ALL.iter().position(|d| *d == e.department)? as i32;
                    let x0 = slot * SLOT + offset;
                    Some(Rectangle::new(
                        [(x0, 0.0), (x0 + 4, e.count as f64)],
                        color.filled(),
                    ))
                }))?
                .label(status.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// Render one bar per slice of a distribution.
    pub fn render_bars(&self, dist: &Distribution, y_desc: &str, path: &Path) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let max = dist.slices.iter().map(|s| s.count).max().unwrap_or(0).max(1) as f64;
        let slots = dist.slices.len() as i32 * SLOT;
        let labels: Vec<&str> = dist.slices.iter().map(|s| s.label.as_str()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(&dist.title, (FONT, 26))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..slots.max(SLOT), 0f64..max * 1.15)?;

        let label_at = |x: &i32| {
            if x % SLOT == SLOT / 2 {
                labels.get((x / SLOT) as usize).map(|s| s.to_string()).unwrap_or_default()
            } else {
                String::new()
            }
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots as usize + 1)
            .x_label_formatter(&label_at)
            .y_desc(y_desc)
            .draw()?;

        chart.draw_series(dist.slices.iter().enumerate().map(|(i, s)| {
            let x0 = i as i32 * SLOT + 2;
            Rectangle::new(
                [(x0, 0.0), (x0 + SLOT - 4, s.count as f64)],
                Self::series_rgb(i).filled(),
            )
        }))?;

        root.present()?;
        Ok(())
    }

    /// Department name at the centre of its slot, blank elsewhere.
    fn slot_label(x: i32) -> String {
        if x % SLOT != SLOT / 2 {
            return String::new();
        }
        Department::ALL
            .get((x / SLOT) as usize)
            .map(|d| d.label().to_string())
            .unwrap_or_default()
    }

    fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if min.is_infinite() {
            (0.0, 1.0)
        } else {
            (min, max)
        }
    }
}
