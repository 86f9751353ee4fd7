//! Profit and loss of long European options against simulated prices.
//!
//! Three conventions are supported for a long call and a long put bought
//! at a premium today and held to expiry `T`:
//!
//! | Convention        | Call PnL                          |
//! |-------------------|-----------------------------------|
//! | `Expiry`          | `max(S_T - K, 0) - C`             |
//! | `PresentValue`    | `max(S_T - K, 0)·e^(-rT) - C`     |
//! | `OpportunityCost` | `max(S_T - K, 0) - C·e^(rT)`      |
//!
//! and symmetrically for the put with `max(K - S_T, 0)` and `P`.

use std::fmt;
use std::str::FromStr;

use crate::error::SimulationError;

/// How payoffs and premiums are brought to a common date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PnlConvention {
    /// Undiscounted payoff minus premium.
    Expiry,
    /// Payoff discounted to today minus premium.
    #[default]
    PresentValue,
    /// Payoff minus premium grown at the risk-free rate.
    OpportunityCost,
}

impl PnlConvention {
    /// Returns the convention name as used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            PnlConvention::Expiry => "expiry",
            PnlConvention::PresentValue => "present-value",
            PnlConvention::OpportunityCost => "opportunity-cost",
        }
    }

    /// PnL of both legs for one terminal price.
    #[inline]
    pub fn apply(&self, terminal: f64, params: &PnlParams) -> OptionPnl {
        let call_payoff = (terminal - params.strike).max(0.0);
        let put_payoff = (params.strike - terminal).max(0.0);

        match self {
            PnlConvention::Expiry => OptionPnl {
                call: call_payoff - params.call_premium,
                put: put_payoff - params.put_premium,
            },
            PnlConvention::PresentValue => {
                let discount = params.discount_factor();
                OptionPnl {
                    call: call_payoff * discount - params.call_premium,
                    put: put_payoff * discount - params.put_premium,
                }
            }
            PnlConvention::OpportunityCost => {
                let growth = params.growth_factor();
                OptionPnl {
                    call: call_payoff - params.call_premium * growth,
                    put: put_payoff - params.put_premium * growth,
                }
            }
        }
    }
}

impl fmt::Display for PnlConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PnlConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "expiry" => Ok(PnlConvention::Expiry),
            "present-value" | "pv" => Ok(PnlConvention::PresentValue),
            "opportunity-cost" | "oc" => Ok(PnlConvention::OpportunityCost),
            _ => Err(format!(
                "Invalid PnL convention: {}. Valid values: expiry, present-value, opportunity-cost",
                s
            )),
        }
    }
}

/// Contract terms and premiums shared by every path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PnlParams {
    /// Strike (K).
    pub strike: f64,
    /// Risk-free rate (r).
    pub rate: f64,
    /// Time to expiry in years (T).
    pub expiry: f64,
    /// Premium paid for the call (C).
    pub call_premium: f64,
    /// Premium paid for the put (P).
    pub put_premium: f64,
}

impl PnlParams {
    /// Creates PnL parameters.
    pub fn new(strike: f64, rate: f64, expiry: f64, call_premium: f64, put_premium: f64) -> Self {
        Self {
            strike,
            rate,
            expiry,
            call_premium,
            put_premium,
        }
    }

    /// `e^(-rT)`
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.expiry).exp()
    }

    /// `e^(rT)`
    #[inline]
    pub fn growth_factor(&self) -> f64 {
        (self.rate * self.expiry).exp()
    }
}

/// Call and put PnL for one scenario.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionPnl {
    /// Long call PnL.
    pub call: f64,
    /// Long put PnL.
    pub put: f64,
}

fn terminal_of(path: &[f64]) -> Result<f64, SimulationError> {
    path.last().copied().ok_or(SimulationError::EmptyInput("price path"))
}

/// PnL at expiry, undiscounted, using the last price of `path`.
///
/// # Errors
///
/// `SimulationError::EmptyInput` if `path` is empty.
///
/// # Examples
///
/// ```
/// use options_mc::pnl::pnl_at_expiry;
///
/// let pnl = pnl_at_expiry(&[100.0, 104.0, 112.0], 105.0, 3.0, 2.5).unwrap();
/// assert_eq!(pnl.call, 4.0);
/// assert_eq!(pnl.put, -2.5);
/// ```
pub fn pnl_at_expiry(
    path: &[f64],
    strike: f64,
    call_premium: f64,
    put_premium: f64,
) -> Result<OptionPnl, SimulationError> {
    let params = PnlParams::new(strike, 0.0, 0.0, call_premium, put_premium);
    Ok(PnlConvention::Expiry.apply(terminal_of(path)?, &params))
}

/// PnL with the payoff discounted to today, using the last price of `path`.
///
/// # Errors
///
/// `SimulationError::EmptyInput` if `path` is empty.
pub fn pnl_present_value(
    path: &[f64],
    strike: f64,
    rate: f64,
    expiry: f64,
    call_premium: f64,
    put_premium: f64,
) -> Result<OptionPnl, SimulationError> {
    let params = PnlParams::new(strike, rate, expiry, call_premium, put_premium);
    Ok(PnlConvention::PresentValue.apply(terminal_of(path)?, &params))
}

/// PnL with the premiums grown at the risk-free rate, using the last price
/// of `path`.
///
/// # Errors
///
/// `SimulationError::EmptyInput` if `path` is empty.
pub fn pnl_opportunity_cost(
    path: &[f64],
    strike: f64,
    rate: f64,
    expiry: f64,
    call_premium: f64,
    put_premium: f64,
) -> Result<OptionPnl, SimulationError> {
    let params = PnlParams::new(strike, rate, expiry, call_premium, put_premium);
    Ok(PnlConvention::OpportunityCost.apply(terminal_of(path)?, &params))
}

/// Expected PnL in present-value terms given a fair price:
/// `(fair_price - premium)·e^(-rT)`.
///
/// # Examples
///
/// ```
/// use options_mc::pnl::expected_pnl;
///
/// assert_eq!(expected_pnl(10.0, 8.0, 0.0, 1.0), 2.0);
/// assert!(expected_pnl(10.0, 12.0, 0.05, 1.0) < 0.0);
/// ```
#[inline]
pub fn expected_pnl(fair_price: f64, premium: f64, rate: f64, expiry: f64) -> f64 {
    (fair_price - premium) * (-rate * expiry).exp()
}

/// Running sum of `values`.
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Summary statistics of one leg's PnL across paths.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PnlSummary {
    /// Sample mean.
    pub mean: f64,
    /// Standard error of the mean (sample std / √n); zero for one path.
    pub std_error: f64,
    /// Fraction of paths with strictly positive PnL.
    pub win_rate: f64,
    /// Sum across paths.
    pub total: f64,
}

impl PnlSummary {
    /// Summarises `values`.
    ///
    /// # Errors
    ///
    /// `SimulationError::EmptyInput` if `values` is empty.
    pub fn from_values(values: &[f64]) -> Result<Self, SimulationError> {
        if values.is_empty() {
            return Err(SimulationError::EmptyInput("PnL values"));
        }
        let n = values.len() as f64;
        let total: f64 = values.iter().sum();
        let mean = total / n;

        let std_error = if values.len() > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            (var / n).sqrt()
        } else {
            0.0
        };

        let wins = values.iter().filter(|&&v| v > 0.0).count();

        Ok(Self {
            mean,
            std_error,
            win_rate: wins as f64 / n,
            total,
        })
    }
}

/// Per-path call and put PnL from a batch of terminal prices.
///
/// # Examples
///
/// ```
/// use options_mc::pnl::{PnlConvention, PnlParams, PnlSeries};
///
/// let params = PnlParams::new(100.0, 0.0, 1.0, 5.0, 5.0);
/// let series = PnlSeries::from_terminal_prices(&[90.0, 110.0], &params, PnlConvention::Expiry);
///
/// assert_eq!(series.call(), &[-5.0, 5.0]);
/// assert_eq!(series.put(), &[5.0, -5.0]);
/// assert_eq!(series.cumulative_call(), vec![-5.0, 0.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PnlSeries {
    convention: PnlConvention,
    call: Vec<f64>,
    put: Vec<f64>,
}

impl PnlSeries {
    /// Evaluates both legs at every terminal price.
    pub fn from_terminal_prices(
        terminals: &[f64],
        params: &PnlParams,
        convention: PnlConvention,
    ) -> Self {
        let (call, put) = terminals
            .iter()
            .map(|&s| {
                let pnl = convention.apply(s, params);
                (pnl.call, pnl.put)
            })
            .unzip();

        Self {
            convention,
            call,
            put,
        }
    }

    /// Convention used.
    pub fn convention(&self) -> PnlConvention {
        self.convention
    }

    /// Number of paths.
    pub fn len(&self) -> usize {
        self.call.len()
    }

    /// Whether there are no paths.
    pub fn is_empty(&self) -> bool {
        self.call.is_empty()
    }

    /// Call PnL per path.
    pub fn call(&self) -> &[f64] {
        &self.call
    }

    /// Put PnL per path.
    pub fn put(&self) -> &[f64] {
        &self.put
    }

    /// Running total of call PnL.
    pub fn cumulative_call(&self) -> Vec<f64> {
        cumulative_sum(&self.call)
    }

    /// Running total of put PnL.
    pub fn cumulative_put(&self) -> Vec<f64> {
        cumulative_sum(&self.put)
    }

    /// Call leg statistics.
    ///
    /// # Errors
    ///
    /// `SimulationError::EmptyInput` if the series is empty.
    pub fn call_summary(&self) -> Result<PnlSummary, SimulationError> {
        PnlSummary::from_values(&self.call)
    }

    /// Put leg statistics.
    ///
    /// # Errors
    ///
    /// `SimulationError::EmptyInput` if the series is empty.
    pub fn put_summary(&self) -> Result<PnlSummary, SimulationError> {
        PnlSummary::from_values(&self.put)
    }
}
