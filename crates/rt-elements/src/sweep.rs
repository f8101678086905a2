//! Characteristic sweeps: one measured quantity stepped across a range.
//!
//! Produces the time-versus-quantity table a protection engineer plots when
//! grading relays. Points are independent, so they are evaluated in parallel
//! and returned in input order.

use crate::error::ElementError;
use crate::traits::ProtectionElement;
use rayon::prelude::*;
use rt_eval::{ElementInput, Measured, Outcome, Status};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Spacing of the generated points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepSpacing {
    /// Uniformly spaced points
    Linear,
    /// Uniform in `ln(x)`; both bounds must be positive
    Logarithmic,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("sweep needs at least 2 points, got {num_points}")]
    TooFewPoints { num_points: usize },

    #[error("sweep bound is not finite: {value}")]
    NonFiniteBound { value: f64 },

    #[error("sweep start and end are identical: {value}")]
    IdenticalBounds { value: f64 },

    #[error("logarithmic sweep bound must be positive: {value}")]
    NonPositiveLogBound { value: f64 },

    #[error(transparent)]
    Element(#[from] ElementError),
}

/// A validated sweep range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepDefinition {
    start: f64,
    end: f64,
    num_points: usize,
    spacing: SweepSpacing,
}

impl SweepDefinition {
    pub fn new(
        start: f64,
        end: f64,
        num_points: usize,
        spacing: SweepSpacing,
    ) -> Result<Self, SweepError> {
        if num_points < 2 {
            return Err(SweepError::TooFewPoints { num_points });
        }
        for value in [start, end] {
            if !value.is_finite() {
                return Err(SweepError::NonFiniteBound { value });
            }
        }
        if start == end {
            return Err(SweepError::IdenticalBounds { value: start });
        }
        if spacing == SweepSpacing::Logarithmic {
            for value in [start, end] {
                if value <= 0.0 {
                    return Err(SweepError::NonPositiveLogBound { value });
                }
            }
        }

        Ok(Self {
            start,
            end,
            num_points,
            spacing,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn spacing(&self) -> SweepSpacing {
        self.spacing
    }

    /// All sweep points; the last one is exactly `end`.
    pub fn generate_points(&self) -> Vec<f64> {
        let steps = (self.num_points - 1) as f64;
        let mut points: Vec<f64> = match self.spacing {
            SweepSpacing::Linear => {
                let delta = (self.end - self.start) / steps;
                (0..self.num_points)
                    .map(|i| self.start + i as f64 * delta)
                    .collect()
            }
            SweepSpacing::Logarithmic => {
                let log_start = self.start.ln();
                let log_delta = (self.end.ln() - log_start) / steps;
                (0..self.num_points)
                    .map(|i| (log_start + i as f64 * log_delta).exp())
                    .collect()
            }
        };

        points[0] = self.start;
        points[self.num_points - 1] = self.end;
        points
    }
}

impl fmt::Display for SweepSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Logarithmic => write!(f, "logarithmic"),
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {} ({} points, {})",
            self.start, self.end, self.num_points, self.spacing
        )
    }
}

/// One evaluated point of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    /// Value of the swept quantity (SI units)
    pub x: f64,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub curve_id: &'static str,
    pub quantity: Measured,
    pub points: Vec<SweepPoint>,
    pub num_tripped: usize,
    pub num_not_operated: usize,
    pub num_invalid: usize,
}

impl SweepResult {
    fn from_points(curve_id: &'static str, quantity: Measured, points: Vec<SweepPoint>) -> Self {
        let count = |status: Status| {
            points
                .iter()
                .filter(|p| p.outcome.status() == status)
                .count()
        };
        Self {
            curve_id,
            quantity,
            num_tripped: count(Status::Tripped),
            num_not_operated: count(Status::NotOperated),
            num_invalid: count(Status::Invalid),
            points,
        }
    }

    /// Points where the element tripped, as `(x, seconds)` pairs.
    pub fn trip_curve(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.outcome.trip_time_s().map(|t| (p.x, t)))
            .collect()
    }
}

/// Evaluate `element` on `curve_id` with `quantity` stepped across `definition`.
///
/// Every other setting comes from `base`. A point whose value fails input
/// validation (e.g. a negative current) aborts the sweep.
pub fn run_sweep<E>(
    element: &E,
    curve_id: &str,
    base: &ElementInput,
    quantity: Measured,
    definition: &SweepDefinition,
) -> Result<SweepResult, SweepError>
where
    E: ProtectionElement + ?Sized,
{
    let curve = element.resolve(curve_id)?;
    debug!(
        element = element.name(),
        curve = curve.id,
        quantity = %quantity,
        sweep = %definition,
        "running sweep"
    );

    let points = definition
        .generate_points()
        .into_par_iter()
        .map(|x| {
            let input = base.with_measured(quantity, x).map_err(ElementError::from)?;
            let outcome = element.evaluate_curve(curve, &input)?;
            Ok(SweepPoint { x, outcome })
        })
        .collect::<Result<Vec<_>, ElementError>>()?;

    for point in points.iter().filter(|p| p.outcome.status() == Status::Invalid) {
        warn!(
            element = element.name(),
            curve = curve.id,
            x = point.x,
            reason = ?point.outcome.reason(),
            "invalid sweep point"
        );
    }

    Ok(SweepResult::from_points(curve.id, quantity, points))
}
