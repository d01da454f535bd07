//! One-dimensional space distribution for fixed and fill siblings.
//!
//! Fill entries share the space left after fixed entries. Each pass sums
//! how far the violating entries sit from the even share. A positive total
//! pins the minimum violators, a negative one the maximum violators, zero
//! pins both. The rest is shared again until a pass pins nothing.

use crate::error::{Error, Result};
use crate::types::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    Fixed(f64),
    Fill { min: Option<f64>, max: Option<f64> },
}

impl SizeSpec {
    pub fn fill() -> Self {
        Self::Fill {
            min: None,
            max: None,
        }
    }

    pub fn fixed(&self) -> Option<f64> {
        match *self {
            Self::Fixed(v) => Some(v),
            Self::Fill { .. } => None,
        }
    }

    /// Bound a fill entry must be pinned to when offered `share`.
    fn pin(&self, share: f64) -> Option<f64> {
        let Self::Fill { min, max } = *self else {
            return None;
        };
        let min = min.unwrap_or(0.0);
        if share < min - EPSILON {
            Some(min)
        } else if let Some(max) = max
            && share > max + EPSILON
        {
            Some(max)
        } else {
            None
        }
    }

    fn validate(&self, subject: &str, idx: usize) -> Result<()> {
        match *self {
            Self::Fixed(v) if v <= 0.0 || !v.is_finite() => Err(Error::invalid(
                subject,
                format!("entry {} has non-positive fixed size {v}", idx + 1),
            )),
            Self::Fill { min, max } => {
                if let Some(min) = min
                    && (min < 0.0 || !min.is_finite())
                {
                    return Err(Error::invalid(
                        subject,
                        format!("entry {} has invalid minimum {min}", idx + 1),
                    ));
                }
                if let Some(max) = max
                    && max < min.unwrap_or(0.0)
                {
                    return Err(Error::invalid(
                        subject,
                        format!("entry {} has maximum {max} below its minimum", idx + 1),
                    ));
                }
                Ok(())
            }
            Self::Fixed(_) => Ok(()),
        }
    }
}

/// Resolve `specs` so that they tile `available` exactly.
///
/// Fixed values are returned verbatim. Fill values end up within their
/// bounds and strictly positive, or the call fails.
pub fn resolve(subject: &str, available: f64, specs: &[SizeSpec]) -> Result<Vec<f64>> {
    for (idx, spec) in specs.iter().enumerate() {
        spec.validate(subject, idx)?;
    }

    let fixed: f64 = specs.iter().filter_map(SizeSpec::fixed).sum();
    let mut remaining = available - fixed;
    if remaining < -EPSILON {
        return Err(Error::overconstrained(
            subject,
            format!("fixed sizes total {fixed}in but only {available}in is available"),
        ));
    }

    let mut values: Vec<Option<f64>> = specs.iter().map(SizeSpec::fixed).collect();
    let mut open: Vec<usize> = (0..specs.len()).filter(|&i| values[i].is_none()).collect();

    if open.is_empty() {
        if remaining > EPSILON {
            return Err(Error::overconstrained(
                subject,
                format!("fixed sizes total {fixed}in, leaving {remaining}in of {available}in unfilled"),
            ));
        }
        return Ok(values.into_iter().flatten().collect());
    }

    // Every pass either pins at least one entry or finishes, so this
    // terminates within specs.len() passes.
    while !open.is_empty() {
        let share = remaining / open.len() as f64;
        let violators: Vec<(usize, f64)> = open
            .iter()
            .filter_map(|&i| specs[i].pin(share).map(|v| (i, v)))
            .collect();

        if violators.is_empty() {
            for &i in &open {
                values[i] = Some(share);
            }
            remaining = 0.0;
            break;
        }

        // Only the side with the larger total violation is pinned this pass.
        let violation: f64 = violators.iter().map(|&(_, v)| v - share).sum();
        let pinned = violators.into_iter().filter(|&(_, v)| {
            if violation > EPSILON {
                v > share
            } else if violation < -EPSILON {
                v < share
            } else {
                true
            }
        });

        for (i, v) in pinned {
            values[i] = Some(v);
            remaining -= v;
        }
        open.retain(|&i| values[i].is_none());
    }

    if remaining < -EPSILON {
        return Err(Error::insufficient_space(
            subject,
            format!(
                "fill minimums need {}in more than the {available}in available",
                -remaining
            ),
        ));
    }
    if remaining > EPSILON {
        return Err(Error::overconstrained(
            subject,
            format!("fill maximums leave {remaining}in of {available}in unallocated"),
        ));
    }

    let values: Vec<f64> = values.into_iter().flatten().collect();
    if let Some(idx) = values.iter().position(|&v| v <= EPSILON) {
        return Err(Error::insufficient_space(
            subject,
            format!("entry {} resolves to {}in", idx + 1, values[idx]),
        ));
    }

    tracing::debug!(subject, available, ?values, "resolved sizes");
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn fill_min(min: f64) -> SizeSpec {
        SizeSpec::Fill {
            min: Some(min),
            max: None,
        }
    }

    fn fill_max(max: f64) -> SizeSpec {
        SizeSpec::Fill {
            min: None,
            max: Some(max),
        }
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "expected {expected:?}, got {actual:?}");
        }
    }

    #[test]
    fn test_fixed_and_two_fills() {
        let specs = [SizeSpec::Fixed(24.0), SizeSpec::fill(), SizeSpec::fill()];
        let values = resolve("cabinet", 72.0, &specs).unwrap();
        assert_close(&values, &[24.0, 24.0, 24.0]);
    }

    #[test]
    fn test_single_fill_above_min() {
        let specs = [SizeSpec::Fixed(10.0), fill_min(20.0)];
        let values = resolve("cabinet", 40.0, &specs).unwrap();
        assert_close(&values, &[10.0, 30.0]);
    }

    #[test]
    fn test_minimums_exceed_span() {
        let specs = [fill_min(10.0), fill_min(10.0), fill_min(10.0)];
        let err = resolve("cabinet", 24.0, &specs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientSpace);
        assert_eq!(err.subject(), "cabinet");
    }

    #[test]
    fn test_fixed_exceeds_span() {
        let specs = [SizeSpec::Fixed(30.0), SizeSpec::Fixed(20.0), SizeSpec::fill()];
        let err = resolve("cabinet", 40.0, &specs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overconstrained);
    }

    #[test]
    fn test_fixed_only_must_tile_span() {
        let exact = resolve("rows", 30.0, &[SizeSpec::Fixed(10.0), SizeSpec::Fixed(20.0)]);
        assert_close(&exact.unwrap(), &[10.0, 20.0]);

        let short = resolve("rows", 35.0, &[SizeSpec::Fixed(10.0), SizeSpec::Fixed(20.0)]);
        assert_eq!(short.unwrap_err().kind(), ErrorKind::Overconstrained);
    }

    #[test]
    fn test_max_pin_redistributes() {
        let specs = [fill_max(10.0), SizeSpec::fill(), SizeSpec::fill()];
        let values = resolve("cabinet", 60.0, &specs).unwrap();
        assert_close(&values, &[10.0, 25.0, 25.0]);
    }

    #[test]
    fn test_min_pin_redistributes() {
        let specs = [SizeSpec::fill(), fill_min(20.0), SizeSpec::fill()];
        let values = resolve("cabinet", 30.0, &specs).unwrap();
        assert_close(&values, &[5.0, 20.0, 5.0]);
    }

    #[test]
    fn test_batch_pins_are_order_independent() {
        let a = resolve(
            "cabinet",
            100.0,
            &[fill_max(5.0), fill_max(8.0), SizeSpec::fill(), SizeSpec::fill()],
        )
        .unwrap();
        let b = resolve(
            "cabinet",
            100.0,
            &[SizeSpec::fill(), fill_max(8.0), SizeSpec::fill(), fill_max(5.0)],
        )
        .unwrap();
        assert_close(&a, &[5.0, 8.0, 43.5, 43.5]);
        assert_close(&b, &[43.5, 8.0, 43.5, 5.0]);
    }

    #[test]
    fn test_pin_cascades_over_passes() {
        // Share 40 pins the first entry; share 45 then pins the second.
        let specs = [fill_max(30.0), fill_max(42.0), fill_min(5.0)];
        let values = resolve("cabinet", 120.0, &specs).unwrap();
        assert_close(&values, &[30.0, 42.0, 48.0]);
    }

    #[test]
    fn test_capped_fill_hands_space_to_min_fill() {
        // Share 35 breaks both bounds; the cap wins and the min fill takes the rest.
        let specs = [fill_max(10.0), fill_min(50.0)];
        let values = resolve("cabinet", 70.0, &specs).unwrap();
        assert_close(&values, &[10.0, 60.0]);

        let specs = [fill_min(50.0), SizeSpec::fill(), fill_max(4.0)];
        let values = resolve("cabinet", 90.0, &specs).unwrap();
        assert_close(&values, &[50.0, 36.0, 4.0]);
    }

    #[test]
    fn test_raised_min_fill_pins_before_caps() {
        // Share 20: the min fill needs 25 more, the caps only give back 10.
        let specs = [fill_min(45.0), fill_max(15.0), fill_max(15.0)];
        let values = resolve("cabinet", 60.0, &specs).unwrap();
        assert_close(&values, &[45.0, 7.5, 7.5]);
    }

    #[test]
    fn test_all_fills_at_max_leave_gap() {
        let err = resolve("cabinet", 40.0, &[fill_max(10.0), fill_max(10.0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overconstrained);
    }

    #[test]
    fn test_zero_width_fill_is_rejected() {
        let err = resolve("cabinet", 10.0, &[SizeSpec::Fixed(10.0), SizeSpec::fill()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientSpace);
    }

    #[test]
    fn test_invalid_bounds() {
        let specs = [SizeSpec::Fill {
            min: Some(20.0),
            max: Some(10.0),
        }];
        let err = resolve("cabinet", 15.0, &specs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpec);

        let err = resolve("cabinet", 15.0, &[SizeSpec::Fixed(-1.0), SizeSpec::fill()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpec);
    }

    #[test]
    fn test_resolving_resolved_values_is_idempotent() {
        let specs = [SizeSpec::Fixed(7.5), fill_min(12.0), fill_max(9.0), SizeSpec::fill()];
        let first = resolve("cabinet", 61.25, &specs).unwrap();
        let fixed: Vec<SizeSpec> = first.iter().map(|&v| SizeSpec::Fixed(v)).collect();
        let second = resolve("cabinet", 61.25, &fixed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sum_and_bounds_hold_across_generated_cases() {
        // Small deterministic LCG so the cases are reproducible.
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as f64 / (1u64 << 31) as f64
        };

        for _ in 0..500 {
            let count = 1 + (next() * 6.0) as usize;
            let available = 20.0 + next() * 100.0;
            let specs: Vec<SizeSpec> = (0..count)
                .map(|_| match (next() * 4.0) as u32 {
                    0 => SizeSpec::Fixed(1.0 + next() * 10.0),
                    1 => fill_min(next() * 15.0),
                    2 => fill_max(1.0 + next() * 30.0),
                    _ => SizeSpec::fill(),
                })
                .collect();

            let fixed: f64 = specs.iter().filter_map(SizeSpec::fixed).sum();
            let fills: Vec<(f64, f64)> = specs
                .iter()
                .filter_map(|s| match *s {
                    SizeSpec::Fill { min, max } => Some((min.unwrap_or(0.0), max.unwrap_or(f64::INFINITY))),
                    SizeSpec::Fixed(_) => None,
                })
                .collect();
            let low = fixed + fills.iter().map(|f| f.0).sum::<f64>();
            let high = fixed + fills.iter().map(|f| f.1).sum::<f64>();

            let result = resolve("generated", available, &specs);
            let expected = if fills.is_empty() {
                ((fixed - available).abs() > EPSILON).then_some(ErrorKind::Overconstrained)
            } else if fixed > available + EPSILON || available > high + 1e-3 {
                Some(ErrorKind::Overconstrained)
            } else if available < low - 1e-3 {
                Some(ErrorKind::InsufficientSpace)
            } else if available > low + 1e-3 && available < high - 1e-3 {
                None
            } else {
                // Too close to a bound to call.
                continue;
            };

            let values = match (result, expected) {
                (Ok(values), None) => values,
                (Err(e), Some(kind)) => {
                    assert_eq!(e.kind(), kind, "{specs:?} on {available}");
                    continue;
                }
                (result, expected) => panic!("{specs:?} on {available}: got {result:?}, expected {expected:?}"),
            };
            let sum: f64 = values.iter().sum();
            assert!((sum - available).abs() < 1e-6, "{specs:?} -> {values:?}");
            for (spec, v) in specs.iter().zip(&values) {
                assert!(*v > 0.0);
                match *spec {
                    SizeSpec::Fixed(f) => assert_eq!(f, *v),
                    SizeSpec::Fill { min, max } => {
                        assert!(*v >= min.unwrap_or(0.0) - 1e-6);
                        assert!(*v <= max.unwrap_or(f64::INFINITY) + 1e-6);
                    }
                }
            }
        }
    }
}
