#![cfg(feature = "web")]
use crate::analytics::{Category, SoftwareUsage, TypeBreakdown};
use crate::error::{Result, ShowcaseError};
use plotters::prelude::*;
use std::io::Cursor;

/// Configuration options for chart generation
///
/// Shared by both analytics charts; only the title and size differ between them.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl ChartOptions {
    pub fn types() -> Self {
        Self {
            title: "Projects by Category".to_string(),
            y_label: "Projects".to_string(),
            ..Self::default()
        }
    }

    pub fn software() -> Self {
        Self {
            title: "Top Technologies".to_string(),
            y_label: "Usage Count".to_string(),
            ..Self::default()
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            y_label: "Count".to_string(),
            width: 640,
            height: 400,
        }
    }
}

/// Bar color of each category
pub fn category_color(category: Category) -> RGBColor {
    match category {
        Category::Robotics => RGBColor(0x3b, 0x82, 0xf6),
        Category::Automation => RGBColor(0x10, 0xb9, 0x81),
        Category::ThreeDModeling => RGBColor(0x63, 0x66, 0xf1),
        Category::Other => RGBColor(0x94, 0xa3, 0xb8),
    }
}

/// Bar color of the technologies chart
pub const SOFTWARE_COLOR: RGBColor = RGBColor(0x8b, 0x5c, 0xf6);

/// One labelled bar
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: u32,
    pub color: RGBColor,
}

/// Bars for the category chart, labelled like `"Robotics (5)"`
pub fn type_bars(breakdown: &TypeBreakdown) -> Vec<Bar> {
    breakdown
        .iter()
        .zip(breakdown.labels_with_counts())
        .map(|((category, count), label)| Bar {
            label,
            value: count as u32,
            color: category_color(category),
        })
        .collect()
}

/// Bars for the technologies chart, most used first
pub fn software_bars(usage: &[SoftwareUsage]) -> Vec<Bar> {
    usage
        .iter()
        .map(|u| Bar {
            label: u.name.clone(),
            value: u.count as u32,
            color: SOFTWARE_COLOR,
        })
        .collect()
}

/// Exclusive upper bound of the Y axis. Never below 1 so an empty chart still has an axis.
pub fn y_axis_end(bars: &[Bar]) -> u32 {
    bars.iter().map(|b| b.value).max().unwrap_or(0).max(1) + 1
}

/// Renders the category breakdown chart as PNG bytes
pub fn type_chart_png(breakdown: &TypeBreakdown, options: &ChartOptions) -> Result<Vec<u8>> {
    render_bar_chart(&type_bars(breakdown), options)
}

/// Renders the top technologies chart as PNG bytes
pub fn software_chart_png(usage: &[SoftwareUsage], options: &ChartOptions) -> Result<Vec<u8>> {
    render_bar_chart(&software_bars(usage), options)
}

fn chart_err(e: impl std::fmt::Display) -> ShowcaseError {
    ShowcaseError::Chart(e.to_string())
}

/// Draws the bars into an RGB buffer and encodes it as PNG
///
/// # Implementation Notes
/// * Counts are integers, so the Y axis uses integer ticks starting at zero
/// * Each bar is drawn as its own histogram series to give it its own color
fn render_bar_chart(bars: &[Bar], options: &ChartOptions) -> Result<Vec<u8>> {
    let (width, height) = (options.width, options.height);
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let slots = (bars.len() as u32).max(1);
        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d((0u32..slots).into_segmented(), 0u32..y_axis_end(bars))
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc(&options.y_label)
            .y_label_formatter(&|v| v.to_string())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => bars
                    .get(*i as usize)
                    .map(|b| b.label.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(chart_err)?;

        for (i, bar) in bars.iter().enumerate() {
            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(bar.color.filled())
                        .margin(12)
                        .data(std::iter::once((i as u32, bar.value))),
                )
                .map_err(chart_err)?;
        }

        root.present().map_err(chart_err)?;
    }

    encode_png(pixels, width, height)
}

fn encode_png(pixels: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = image::RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| ShowcaseError::Chart("pixel buffer does not match chart size".into()))?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .map_err(chart_err)?;
    Ok(png)
}
