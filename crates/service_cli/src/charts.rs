//! Chart export.
//!
//! Each chart is written twice: a Chart.js configuration (`*.json`) that can
//! be handed straight to `new Chart(ctx, config)`, and the underlying series
//! as CSV for spreadsheets or other plotting tools.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use options_mc::distribution::{grid_over, net_payoff_curve, Histogram, LognormalFit};
use options_mc::PnlSeries;
use serde::Serialize;

use crate::config::ChartSettings;
use crate::Result;

const CALL_COLOUR: &str = "rgba(31, 119, 180, 1)";
const PUT_COLOUR: &str = "rgba(255, 127, 14, 1)";
const HIST_COLOUR: &str = "rgba(128, 128, 128, 0.5)";
const FIT_COLOUR: &str = "rgba(214, 39, 40, 1)";
const REFERENCE_COLOUR: &str = "rgba(0, 0, 0, 1)";

// =============================================================================
// Chart.js structures
// =============================================================================

/// An (x, y) data point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    /// X value.
    pub x: f64,
    /// Y value.
    pub y: f64,
}

/// Chart.js dataset.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartJsDataset {
    /// Legend label.
    pub label: String,
    /// Dataset type when it differs from the chart type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,
    /// Points.
    pub data: Vec<Point>,
    /// Line colour.
    pub border_color: String,
    /// Fill colour.
    pub background_color: String,
    /// Line width in pixels.
    pub border_width: f64,
    /// Dash pattern; solid when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<Vec<u32>>,
    /// Marker radius.
    pub point_radius: f64,
    /// Whether to fill under the line.
    pub fill: bool,
    /// Y axis the dataset is plotted against.
    #[serde(rename = "yAxisID")]
    pub y_axis_id: String,
}

impl ChartJsDataset {
    fn line(label: impl Into<String>, data: Vec<Point>, colour: &str) -> Self {
        Self {
            label: label.into(),
            dataset_type: None,
            data,
            border_color: colour.to_string(),
            background_color: colour.to_string(),
            border_width: 1.5,
            border_dash: None,
            point_radius: 0.0,
            fill: false,
            y_axis_id: "y".to_string(),
        }
    }

    fn dashed(mut self) -> Self {
        self.border_dash = Some(vec![6, 4]);
        self.border_width = 1.0;
        self
    }

    fn bars(label: impl Into<String>, data: Vec<Point>) -> Self {
        Self {
            dataset_type: Some("bar".to_string()),
            background_color: HIST_COLOUR.to_string(),
            border_width: 0.0,
            fill: true,
            ..Self::line(label, data, HIST_COLOUR)
        }
    }

    fn on_axis(mut self, axis: &str) -> Self {
        self.y_axis_id = axis.to_string();
        self
    }
}

/// Chart.js data block.
#[derive(Clone, Debug, Serialize)]
pub struct ChartJsData {
    /// Datasets.
    pub datasets: Vec<ChartJsDataset>,
}

/// Chart.js title options.
#[derive(Clone, Debug, Serialize)]
pub struct ChartJsTitleOptions {
    /// Whether the title is shown.
    pub display: bool,
    /// Title text.
    pub text: String,
}

impl ChartJsTitleOptions {
    fn new(text: impl Into<String>) -> Self {
        Self {
            display: true,
            text: text.into(),
        }
    }
}

/// Chart.js plugin options.
#[derive(Clone, Debug, Serialize)]
pub struct ChartJsPlugins {
    /// Chart title.
    pub title: ChartJsTitleOptions,
}

/// Chart.js axis.
#[derive(Clone, Debug, Serialize)]
pub struct ChartJsScale {
    /// Axis type.
    #[serde(rename = "type")]
    pub scale_type: String,
    /// Axis side.
    pub position: String,
    /// Axis title.
    pub title: ChartJsTitleOptions,
}

impl ChartJsScale {
    fn linear(position: &str, title: &str) -> Self {
        Self {
            scale_type: "linear".to_string(),
            position: position.to_string(),
            title: ChartJsTitleOptions::new(title),
        }
    }
}

/// Chart.js options.
#[derive(Clone, Debug, Serialize)]
pub struct ChartJsOptions {
    /// Plugin settings.
    pub plugins: ChartJsPlugins,
    /// Axes keyed by id.
    pub scales: BTreeMap<String, ChartJsScale>,
}

/// Chart.js configuration.
#[derive(Clone, Debug, Serialize)]
pub struct ChartJsChart {
    /// Chart type.
    #[serde(rename = "type")]
    pub chart_type: String,
    /// Chart data.
    pub data: ChartJsData,
    /// Chart options.
    pub options: ChartJsOptions,
}

impl ChartJsChart {
    fn line(title: &str, datasets: Vec<ChartJsDataset>, scales: Vec<(&str, ChartJsScale)>) -> Self {
        Self {
            chart_type: "line".to_string(),
            data: ChartJsData { datasets },
            options: ChartJsOptions {
                plugins: ChartJsPlugins {
                    title: ChartJsTitleOptions::new(title),
                },
                scales: scales
                    .into_iter()
                    .map(|(id, scale)| (id.to_string(), scale))
                    .collect(),
            },
        }
    }
}

// =============================================================================
// Series helpers
// =============================================================================

fn points(xs: &[f64], ys: &[f64]) -> Vec<Point> {
    xs.iter().zip(ys).map(|(&x, &y)| Point { x, y }).collect()
}

/// Indices of at most `max_points` evenly spaced samples, always keeping the
/// first and last.
pub fn sample_indices(len: usize, max_points: usize) -> Vec<usize> {
    if len <= max_points || max_points < 2 {
        return (0..len).collect();
    }
    let stride = (len - 1) as f64 / (max_points - 1) as f64;
    let mut indices: Vec<usize> = (0..max_points)
        .map(|i| (i as f64 * stride).round() as usize)
        .collect();
    indices.dedup();
    if let Some(last) = indices.last_mut() {
        *last = len - 1;
    }
    indices
}

fn vertical_line(x: f64, top: f64) -> Vec<Point> {
    vec![Point { x, y: 0.0 }, Point { x, y: top }]
}

fn horizontal_line(from: f64, to: f64, y: f64) -> Vec<Point> {
    vec![Point { x: from, y }, Point { x: to, y }]
}

fn max_of(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

// =============================================================================
// Chart builders
// =============================================================================

#[derive(Serialize)]
struct CumulativePnlRow {
    simulation: usize,
    call_pnl: f64,
    put_pnl: f64,
    cumulative_call: f64,
    cumulative_put: f64,
}

/// Cumulative call and put PnL against simulation number, with a
/// break-even line.
pub fn cumulative_pnl_chart(series: &PnlSeries, max_points: usize) -> ChartJsChart {
    let cum_call = series.cumulative_call();
    let cum_put = series.cumulative_put();
    let n = series.len();

    let sampled = sample_indices(n, max_points);
    let xs: Vec<f64> = sampled.iter().map(|&i| (i + 1) as f64).collect();
    let call: Vec<f64> = sampled.iter().map(|&i| cum_call[i]).collect();
    let put: Vec<f64> = sampled.iter().map(|&i| cum_put[i]).collect();

    ChartJsChart::line(
        &format!("Monte Carlo Cumulative PnL ({})", series.convention()),
        vec![
            ChartJsDataset::line("Call Cumulative PnL", points(&xs, &call), CALL_COLOUR),
            ChartJsDataset::line("Put Cumulative PnL", points(&xs, &put), PUT_COLOUR),
            ChartJsDataset::line(
                "Break-even",
                horizontal_line(1.0, n.max(1) as f64, 0.0),
                REFERENCE_COLOUR,
            )
            .dashed(),
        ],
        vec![
            ("x", ChartJsScale::linear("bottom", "Simulation #")),
            ("y", ChartJsScale::linear("left", "Cumulative PnL")),
        ],
    )
}

fn write_cumulative_pnl_csv(path: &Path, series: &PnlSeries) -> Result<()> {
    let cum_call = series.cumulative_call();
    let cum_put = series.cumulative_put();

    let mut writer = csv::Writer::from_path(path)?;
    for i in 0..series.len() {
        writer.serialize(CumulativePnlRow {
            simulation: i + 1,
            call_pnl: series.call()[i],
            put_pnl: series.put()[i],
            cumulative_call: cum_call[i],
            cumulative_put: cum_put[i],
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct DistributionRow {
    bin_left: f64,
    bin_right: f64,
    count: usize,
    density: f64,
    lognormal_pdf: f64,
}

/// Terminal price histogram with the fitted lognormal density and the strike.
///
/// # Errors
///
/// `CliError::Simulation` on empty terminals or non-positive prices.
pub fn terminal_distribution_chart(
    terminals: &[f64],
    strike: f64,
    settings: &ChartSettings,
) -> Result<(ChartJsChart, Histogram, LognormalFit)> {
    let hist = Histogram::density(terminals, settings.histogram_bins)?;
    let fit = LognormalFit::fit(terminals)?;

    let grid = grid_over(terminals, settings.density_points)?;
    let pdf: Vec<f64> = grid.iter().map(|&x| fit.pdf(x)).collect();
    let top = max_of(&hist.densities).max(max_of(&pdf)) * 1.05;

    let chart = ChartJsChart::line(
        "Distribution of Terminal Prices",
        vec![
            ChartJsDataset::bars(
                "Simulated S_T",
                points(&hist.centres(), &hist.densities),
            ),
            ChartJsDataset::line(
                format!("Lognormal fit (shape={:.4}, scale={:.2})", fit.shape, fit.scale),
                points(&grid, &pdf),
                FIT_COLOUR,
            ),
            ChartJsDataset::line(
                format!("Strike K={:.2}", strike),
                vertical_line(strike, top),
                REFERENCE_COLOUR,
            )
            .dashed(),
        ],
        vec![
            ("x", ChartJsScale::linear("bottom", "Terminal price S_T")),
            ("y", ChartJsScale::linear("left", "Density")),
        ],
    );

    Ok((chart, hist, fit))
}

fn write_distribution_csv(path: &Path, hist: &Histogram, fit: &LognormalFit) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for (i, centre) in hist.centres().into_iter().enumerate() {
        writer.serialize(DistributionRow {
            bin_left: hist.edges[i],
            bin_right: hist.edges[i + 1],
            count: hist.counts[i],
            density: hist.densities[i],
            lognormal_pdf: fit.pdf(centre),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Net call and put payoffs at expiry over the simulated price range, with
/// the terminal price density on a secondary axis.
///
/// # Errors
///
/// `CliError::Simulation` on empty or non-finite terminals.
pub fn payoff_vs_distribution_chart(
    terminals: &[f64],
    strike: f64,
    call_premium: f64,
    put_premium: f64,
    settings: &ChartSettings,
) -> Result<(ChartJsChart, Vec<PayoffRow>)> {
    let grid = grid_over(terminals, settings.payoff_points)?;
    let curve = net_payoff_curve(&grid, strike, call_premium, put_premium);
    let hist = Histogram::density(terminals, settings.histogram_bins)?;

    let low = grid.first().copied().unwrap_or(strike).min(strike);
    let high = grid.last().copied().unwrap_or(strike).max(strike);
    let payoff_top = max_of(&curve.call).max(max_of(&curve.put));

    let chart = ChartJsChart::line(
        "Option Payoff vs Simulated Price Distribution",
        vec![
            ChartJsDataset::line("Call net payoff", points(&grid, &curve.call), CALL_COLOUR),
            ChartJsDataset::line("Put net payoff", points(&grid, &curve.put), PUT_COLOUR),
            ChartJsDataset::bars("S_T density", points(&hist.centres(), &hist.densities))
                .on_axis("y1"),
            ChartJsDataset::line(
                format!("Strike K={:.2}", strike),
                vertical_line(strike, payoff_top.max(1.0)),
                REFERENCE_COLOUR,
            )
            .dashed(),
            ChartJsDataset::line("Zero", horizontal_line(low, high, 0.0), REFERENCE_COLOUR)
                .dashed(),
        ],
        vec![
            ("x", ChartJsScale::linear("bottom", "Terminal price S_T")),
            ("y", ChartJsScale::linear("left", "Net payoff at expiry")),
            ("y1", ChartJsScale::linear("right", "Density")),
        ],
    );

    let rows = grid
        .iter()
        .zip(curve.call.iter().zip(&curve.put))
        .map(|(&price, (&call, &put))| PayoffRow {
            price,
            call_net_payoff: call,
            put_net_payoff: put,
        })
        .collect();

    Ok((chart, rows))
}

/// One row of the payoff CSV.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PayoffRow {
    /// Terminal price.
    pub price: f64,
    /// Net call payoff.
    pub call_net_payoff: f64,
    /// Net put payoff.
    pub put_net_payoff: f64,
}

fn write_payoff_csv(path: &Path, rows: &[PayoffRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, chart: &ChartJsChart) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(chart)?)?;
    Ok(())
}

/// Everything the charts are drawn from.
pub struct ChartInputs<'a> {
    /// Simulated terminal prices.
    pub terminals: &'a [f64],
    /// Per-path PnL.
    pub pnl: &'a PnlSeries,
    /// Strike.
    pub strike: f64,
    /// Call premium.
    pub call_premium: f64,
    /// Put premium.
    pub put_premium: f64,
}

/// Writes all three charts to `dir`, creating it if needed.
///
/// Returns the paths written.
///
/// # Errors
///
/// I/O, CSV or JSON errors while writing, or simulation errors on degenerate
/// inputs.
pub fn write_all(
    dir: &Path,
    inputs: &ChartInputs<'_>,
    settings: &ChartSettings,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(6);

    let cumulative = cumulative_pnl_chart(inputs.pnl, settings.max_points);
    let path = dir.join("cumulative_pnl.json");
    write_json(&path, &cumulative)?;
    written.push(path);
    let path = dir.join("cumulative_pnl.csv");
    write_cumulative_pnl_csv(&path, inputs.pnl)?;
    written.push(path);

    let (distribution, hist, fit) =
        terminal_distribution_chart(inputs.terminals, inputs.strike, settings)?;
    let path = dir.join("terminal_distribution.json");
    write_json(&path, &distribution)?;
    written.push(path);
    let path = dir.join("terminal_distribution.csv");
    write_distribution_csv(&path, &hist, &fit)?;
    written.push(path);

    let (payoff, rows) = payoff_vs_distribution_chart(
        inputs.terminals,
        inputs.strike,
        inputs.call_premium,
        inputs.put_premium,
        settings,
    )?;
    let path = dir.join("payoff_vs_distribution.json");
    write_json(&path, &payoff)?;
    written.push(path);
    let path = dir.join("payoff_vs_distribution.csv");
    write_payoff_csv(&path, &rows)?;
    written.push(path);

    tracing::info!(dir = %dir.display(), files = written.len(), "Charts written");
    Ok(written)
}
