//! Core trait for protection element facades.

use crate::error::ElementResult;
use rt_curves::{CurveError, CurveFamily, CurveSpec, lookup_in};
use rt_eval::{ElementInput, Outcome};
use tracing::debug;

/// A relay element bound to one curve family.
///
/// Elements are stateless and deterministic: the same curve and input always
/// give the same outcome, so they can be shared across threads.
pub trait ProtectionElement: Send + Sync {
    /// Element designation for logs and reports (e.g. `51V`).
    fn name(&self) -> &str;

    /// The catalog namespace this element resolves curve identifiers in.
    fn family(&self) -> CurveFamily;

    /// Evaluate against an already resolved curve.
    ///
    /// Fails with `WrongFamily` when `curve` belongs to another family, or when
    /// the input lacks a quantity the element needs.
    fn evaluate_curve(&self, curve: &CurveSpec, input: &ElementInput) -> ElementResult<Outcome>;

    /// Resolve a curve identifier (canonical id or family alias).
    fn resolve(&self, curve_id: &str) -> ElementResult<&'static CurveSpec> {
        Ok(lookup_in(self.family(), curve_id)?)
    }

    /// Resolve `curve_id` and evaluate `input` against it.
    fn evaluate(&self, curve_id: &str, input: &ElementInput) -> ElementResult<Outcome> {
        let curve = self.resolve(curve_id)?;
        let outcome = self.evaluate_curve(curve, input)?;
        debug!(
            element = self.name(),
            curve = curve.id,
            status = %outcome.status(),
            trip_time_s = ?outcome.trip_time_s(),
            reason = ?outcome.reason(),
            "element evaluated"
        );
        Ok(outcome)
    }

    /// Reject curves from another family.
    fn ensure_family(&self, curve: &CurveSpec) -> ElementResult<()> {
        if curve.family() == self.family() {
            Ok(())
        } else {
            Err(CurveError::WrongFamily {
                id: curve.id.to_string(),
                expected: self.family(),
                found: curve.family(),
            }
            .into())
        }
    }
}
