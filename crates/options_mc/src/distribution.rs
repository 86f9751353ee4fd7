//! Statistics on simulated terminal price distributions.
//!
//! - [`linspace`]: evenly spaced grids for plotting
//! - [`Histogram`]: density-normalised equal-width histogram
//! - [`LognormalFit`]: maximum-likelihood lognormal fit with location 0
//! - [`net_payoff_curve`]: call and put payoff net of premium over a grid

use crate::error::SimulationError;

/// `n` evenly spaced values from `start` to `end`, both inclusive.
///
/// Returns `[start]` for `n == 1` and an empty vector for `n == 0`. The
/// last element is exactly `end`.
///
/// # Examples
///
/// ```
/// use options_mc::distribution::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut grid: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            grid[n - 1] = end;
            grid
        }
    }
}

/// Smallest and largest finite value.
fn finite_range(values: &[f64], context: &'static str) -> Result<(f64, f64), SimulationError> {
    if values.is_empty() {
        return Err(SimulationError::EmptyInput(context));
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if !v.is_finite() {
            return Err(SimulationError::InvalidSample { context, value: v });
        }
        min = min.min(v);
        max = max.max(v);
    }
    Ok((min, max))
}

/// Grid of `n` points spanning the range of `values`.
///
/// # Errors
///
/// `SimulationError` on empty input or non-finite values.
pub fn grid_over(values: &[f64], n: usize) -> Result<Vec<f64>, SimulationError> {
    let (min, max) = finite_range(values, "grid range")?;
    Ok(linspace(min, max, n))
}

/// Equal-width histogram normalised to unit area.
///
/// Bins span `[min, max]` of the data; the last bin is closed on the
/// right. When every value is identical the range is widened to
/// `[v - 0.5, v + 0.5]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Histogram {
    /// Bin edges, `bins + 1` values.
    pub edges: Vec<f64>,
    /// Density per bin, `count / (n · width)`.
    pub densities: Vec<f64>,
    /// Raw count per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Builds a density histogram with `bins` equal-width bins.
    ///
    /// # Errors
    ///
    /// - `SimulationError::EmptyInput` if `values` is empty or `bins == 0`
    /// - `SimulationError::InvalidSample` on a non-finite value
    ///
    /// # Examples
    ///
    /// ```
    /// use options_mc::distribution::Histogram;
    ///
    /// let hist = Histogram::density(&[1.0, 2.0, 2.0, 3.0], 2).unwrap();
    /// assert_eq!(hist.counts, vec![1, 3]);
    /// assert!((hist.area() - 1.0).abs() < 1e-12);
    /// ```
    pub fn density(values: &[f64], bins: usize) -> Result<Self, SimulationError> {
        if bins == 0 {
            return Err(SimulationError::EmptyInput("histogram bins"));
        }
        let (mut min, mut max) = finite_range(values, "histogram")?;
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0_usize; bins];
        for &v in values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let norm = values.len() as f64 * width;
        let densities = counts.iter().map(|&c| c as f64 / norm).collect();

        Ok(Self {
            edges: linspace(min, max, bins + 1),
            densities,
            counts,
        })
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Bin midpoints.
    pub fn centres(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Total area under the histogram; 1 up to rounding.
    pub fn area(&self) -> f64 {
        self.edges
            .windows(2)
            .zip(&self.densities)
            .map(|(w, d)| (w[1] - w[0]) * d)
            .sum()
    }
}

/// Lognormal distribution fitted with location fixed at zero.
///
/// `shape` is the standard deviation of `ln X` and `scale = exp(μ)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LognormalFit {
    /// Standard deviation of the log-values (σ).
    pub shape: f64,
    /// `exp(μ)`, the median of the distribution.
    pub scale: f64,
}

impl LognormalFit {
    /// Maximum-likelihood fit.
    ///
    /// `μ = mean(ln x)`, `shape = sqrt(mean((ln x - μ)²))`.
    ///
    /// # Errors
    ///
    /// - `SimulationError::EmptyInput` on empty input
    /// - `SimulationError::InvalidSample` on a non-positive or non-finite value
    ///
    /// # Examples
    ///
    /// ```
    /// use options_mc::distribution::LognormalFit;
    ///
    /// let e = std::f64::consts::E;
    /// let fit = LognormalFit::fit(&[1.0 / e, e]).unwrap();
    /// assert!((fit.scale - 1.0).abs() < 1e-12);
    /// assert!((fit.shape - 1.0).abs() < 1e-12);
    /// ```
    pub fn fit(values: &[f64]) -> Result<Self, SimulationError> {
        if values.is_empty() {
            return Err(SimulationError::EmptyInput("lognormal fit"));
        }
        let mut logs = Vec::with_capacity(values.len());
        for &v in values {
            if !(v > 0.0 && v.is_finite()) {
                return Err(SimulationError::InvalidSample {
                    context: "lognormal fit",
                    value: v,
                });
            }
            logs.push(v.ln());
        }

        let n = logs.len() as f64;
        let mu = logs.iter().sum::<f64>() / n;
        let var = logs.iter().map(|l| (l - mu).powi(2)).sum::<f64>() / n;

        Ok(Self {
            shape: var.sqrt(),
            scale: mu.exp(),
        })
    }

    /// Mean of the log-values.
    pub fn mu(&self) -> f64 {
        self.scale.ln()
    }

    /// Probability density at `x`; zero for `x <= 0`.
    ///
    /// A degenerate fit (`shape == 0`) has no density and returns NaN.
    pub fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if !(self.shape > 0.0) {
            return f64::NAN;
        }
        let z = (x.ln() - self.mu()) / self.shape;
        (-0.5 * z * z).exp() / (x * self.shape * (2.0 * std::f64::consts::PI).sqrt())
    }

    /// Mean of the distribution, `scale · exp(shape² / 2)`.
    pub fn mean(&self) -> f64 {
        self.scale * (0.5 * self.shape * self.shape).exp()
    }
}

/// Net payoff of a long call and a long put across a price grid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayoffCurve {
    /// Terminal prices.
    pub prices: Vec<f64>,
    /// `max(S - K, 0) - call_premium` at each price.
    pub call: Vec<f64>,
    /// `max(K - S, 0) - put_premium` at each price.
    pub put: Vec<f64>,
}

/// Evaluates net call and put payoffs on `prices`.
///
/// # Examples
///
/// ```
/// use options_mc::distribution::net_payoff_curve;
///
/// let curve = net_payoff_curve(&[90.0, 100.0, 110.0], 100.0, 2.0, 3.0);
/// assert_eq!(curve.call, vec![-2.0, -2.0, 8.0]);
/// assert_eq!(curve.put, vec![7.0, -3.0, -3.0]);
/// ```
pub fn net_payoff_curve(
    prices: &[f64],
    strike: f64,
    call_premium: f64,
    put_premium: f64,
) -> PayoffCurve {
    PayoffCurve {
        prices: prices.to_vec(),
        call: prices
            .iter()
            .map(|&s| (s - strike).max(0.0) - call_premium)
            .collect(),
        put: prices
            .iter()
            .map(|&s| (strike - s).max(0.0) - put_premium)
            .collect(),
    }
}
