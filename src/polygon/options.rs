//! Per-call configuration of the regularization and boolean engines.

use crate::error::{PolyError, Result};
use crate::tolerance::{AbortCheck, NeverAbort, Tolerance};
use std::fmt;

/// Rule turning a winding number into inside/outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillingMethod {
    /// Even-odd: odd winding numbers are inside.
    #[default]
    Alternative,
    /// Non-zero winding numbers are inside.
    NonZero,
    /// Strictly positive winding numbers are inside.
    Positive,
}

impl FillingMethod {
    /// Returns `true` if a point with winding number `winding` is filled.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::FillingMethod;
    ///
    /// assert!(FillingMethod::Alternative.is_inside(-1));
    /// assert!(!FillingMethod::Alternative.is_inside(2));
    /// assert!(FillingMethod::NonZero.is_inside(2));
    /// assert!(!FillingMethod::Positive.is_inside(-1));
    /// ```
    #[inline]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillingMethod::Alternative => winding % 2 != 0,
            FillingMethod::NonZero => winding != 0,
            FillingMethod::Positive => winding > 0,
        }
    }
}

/// What the engines do with holes of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolyHoleHandling {
    /// Holes are kept in their enclosing polygons.
    #[default]
    ReturnHoles,
    /// Holes are dropped, together with anything nested inside them.
    WithoutHoles,
}

static NEVER: NeverAbort = NeverAbort;

/// Tolerance, fill rule, hole handling and cancellation for one operation.
///
/// # Example
///
/// ```
/// use regpoly::polygon::{FillingMethod, OperationOptions};
/// use std::sync::atomic::AtomicBool;
///
/// let stop = AtomicBool::new(false);
/// let options = OperationOptions::default()
///     .with_filling(FillingMethod::NonZero)
///     .with_abort(&stop);
/// assert_eq!(options.filling, FillingMethod::NonZero);
/// ```
#[derive(Clone, Copy)]
pub struct OperationOptions<'a> {
    /// Distance and angle tolerances.
    pub tolerance: Tolerance,
    /// Rule deciding which regions are filled.
    pub filling: FillingMethod,
    /// Whether result holes are kept.
    pub holes: PolyHoleHandling,
    /// Cancellation hook polled by long passes.
    pub abort: &'a dyn AbortCheck,
}

impl<'a> OperationOptions<'a> {
    /// Replaces the tolerance.
    #[inline]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Replaces the fill rule.
    #[inline]
    pub fn with_filling(mut self, filling: FillingMethod) -> Self {
        self.filling = filling;
        self
    }

    /// Replaces the hole handling.
    #[inline]
    pub fn with_holes(mut self, holes: PolyHoleHandling) -> Self {
        self.holes = holes;
        self
    }

    /// Replaces the cancellation hook.
    #[inline]
    pub fn with_abort<'b>(self, abort: &'b dyn AbortCheck) -> OperationOptions<'b> {
        OperationOptions {
            tolerance: self.tolerance,
            filling: self.filling,
            holes: self.holes,
            abort,
        }
    }

    /// Fails with [`PolyError::Cancelled`] if the abort hook fired.
    #[inline]
    pub fn check_abort(&self, operation: &'static str) -> Result<()> {
        if self.abort.should_abort() {
            log::debug!("{operation}: abort requested");
            return Err(PolyError::Cancelled { operation });
        }
        Ok(())
    }
}

impl Default for OperationOptions<'_> {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            filling: FillingMethod::default(),
            holes: PolyHoleHandling::default(),
            abort: &NEVER,
        }
    }
}

impl fmt::Debug for OperationOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationOptions")
            .field("tolerance", &self.tolerance)
            .field("filling", &self.filling)
            .field("holes", &self.holes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::AbortFn;

    #[test]
    fn test_filling_rules() {
        for w in -3..=3 {
            assert_eq!(FillingMethod::Alternative.is_inside(w), w % 2 != 0);
            assert_eq!(FillingMethod::NonZero.is_inside(w), w != 0);
            assert_eq!(FillingMethod::Positive.is_inside(w), w > 0);
        }
    }

    #[test]
    fn test_defaults() {
        let o = OperationOptions::default();
        assert_eq!(o.tolerance, Tolerance::default());
        assert_eq!(o.filling, FillingMethod::Alternative);
        assert_eq!(o.holes, PolyHoleHandling::ReturnHoles);
        assert!(o.check_abort("test").is_ok());
    }

    #[test]
    fn test_check_abort_fires() {
        let stop = AbortFn(|| true);
        let o = OperationOptions::default().with_abort(&stop);
        assert_eq!(
            o.check_abort("union"),
            Err(PolyError::Cancelled { operation: "union" })
        );
    }
}
