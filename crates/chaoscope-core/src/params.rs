//! Typed parameter records and the validator that keeps them usable.
//!
//! Every system exposes its parameters as a plain struct implementing
//! [`ParameterRecord`]. The struct carries a static table of [`ParamSpec`]
//! entries describing each field's default, its hard domain (values outside
//! it would make the equations meaningless) and an optional advisory window
//! (values outside it are legal but usually produce uninteresting or
//! numerically harsh dynamics).
//!
//! Validation never fails. Hard violations are corrected and reported as a
//! [`ParamWarning`]; advisory violations are reported and left alone.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── Domain ─────────────────────────────────────────────────────────

/// Hard constraint on a parameter value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Domain {
    /// Any finite value.
    Any,
    /// `value >= min`; violations clamp to `min`.
    AtLeast(f64),
    /// `value > 0`; violations fall back to the default.
    Positive,
    /// `lo <= value <= hi`; violations clamp to the nearest bound.
    Within(f64, f64),
}

impl Domain {
    /// Corrected value for `raw`, or `None` if `raw` already satisfies
    /// the domain.
    fn correct(self, raw: f64, default: f64) -> Option<f64> {
        match self {
            Domain::Any => None,
            Domain::AtLeast(min) => (raw < min).then_some(min),
            Domain::Positive => (raw <= 0.0).then_some(default),
            Domain::Within(lo, hi) => {
                if raw < lo {
                    Some(lo)
                } else if raw > hi {
                    Some(hi)
                } else {
                    None
                }
            }
        }
    }
}

// ── Warnings ───────────────────────────────────────────────────────

/// Why a parameter value was reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// NaN or infinite input; replaced by the default.
    NonFinite,
    /// Outside the hard domain; replaced by a bound or the default.
    OutOfDomain,
    /// Outside the advisory window; kept as given.
    Advisory,
}

/// A correction or advisory note produced by validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamWarning {
    /// Parameter name as listed in its [`ParamSpec`].
    pub parameter: String,
    /// The value that was supplied.
    pub raw: f64,
    /// The value now in effect.
    pub applied: f64,
    /// What triggered the warning.
    pub kind: WarningKind,
}

impl fmt::Display for ParamWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::NonFinite => write!(
                f,
                "{}: non-finite value {}, using default {}",
                self.parameter, self.raw, self.applied
            ),
            WarningKind::OutOfDomain => write!(
                f,
                "{}: {} is outside the valid domain, using {}",
                self.parameter, self.raw, self.applied
            ),
            WarningKind::Advisory => write!(
                f,
                "{}: {} is outside the recommended range",
                self.parameter, self.raw
            ),
        }
    }
}

// ── ParamSpec ──────────────────────────────────────────────────────

/// Static description of a single parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    /// Name used in exports, named access, and warnings.
    pub name: &'static str,
    /// Value used when none is given or the given one is unusable.
    pub default: f64,
    /// Hard constraint.
    pub domain: Domain,
    /// Recommended `[lo, hi]` window, if any.
    pub advisory: Option<(f64, f64)>,
}

/// Result of validating one value.
#[derive(Clone, Debug, PartialEq)]
pub struct Validated {
    /// The value to use.
    pub value: f64,
    /// Zero or more warnings explaining any correction.
    pub warnings: Vec<ParamWarning>,
}

impl ParamSpec {
    /// A `ParamSpec` with no advisory window.
    pub const fn new(name: &'static str, default: f64, domain: Domain) -> Self {
        Self {
            name,
            default,
            domain,
            advisory: None,
        }
    }

    /// Attach an advisory window.
    pub const fn with_advisory(mut self, lo: f64, hi: f64) -> Self {
        self.advisory = Some((lo, hi));
        self
    }

    /// Validate `raw` against this spec.
    ///
    /// Hard corrections take precedence: a corrected value is not checked
    /// against the advisory window. Every warning is also logged at `warn`.
    pub fn validate(&self, raw: f64) -> Validated {
        let (value, kind) = if !raw.is_finite() {
            (self.default, Some(WarningKind::NonFinite))
        } else if let Some(fixed) = self.domain.correct(raw, self.default) {
            (fixed, Some(WarningKind::OutOfDomain))
        } else {
            let outside = self
                .advisory
                .is_some_and(|(lo, hi)| raw < lo || raw > hi);
            (raw, outside.then_some(WarningKind::Advisory))
        };

        let warnings = match kind {
            Some(kind) => {
                let warning = ParamWarning {
                    parameter: self.name.to_string(),
                    raw,
                    applied: value,
                    kind,
                };
                tracing::warn!(
                    parameter = self.name,
                    raw,
                    applied = value,
                    kind = ?kind,
                    "parameter corrected"
                );
                vec![warning]
            }
            None => Vec::new(),
        };
        Validated { value, warnings }
    }
}

// ── ParameterRecord ────────────────────────────────────────────────

/// A typed parameter struct with a static table of `ParamSpec`s.
///
/// `SPECS[i]` describes the field reachable through `get(i)` / `set(i, _)`.
/// `Default` must produce the defaults listed in `SPECS`.
pub trait ParameterRecord: Clone + fmt::Debug + PartialEq + Default + Send + Sync + 'static {
    /// One entry per field, in declaration order.
    const SPECS: &'static [ParamSpec];

    /// Value of field `index`, or `None` past the end of [`Self::SPECS`].
    fn get(&self, index: usize) -> Option<f64>;

    /// Overwrite field `index`. Indices past the end are ignored.
    fn set(&mut self, index: usize, value: f64);

    /// Validate every field, returning the corrected record and all warnings.
    fn validated(mut self) -> (Self, Vec<ParamWarning>) {
        let mut warnings = Vec::new();
        for (i, spec) in Self::SPECS.iter().enumerate() {
            if let Some(raw) = self.get(i) {
                let v = spec.validate(raw);
                self.set(i, v.value);
                warnings.extend(v.warnings);
            }
        }
        (self, warnings)
    }

    /// Position of `name` in [`Self::SPECS`].
    fn index_of(name: &str) -> Option<usize> {
        Self::SPECS.iter().position(|s| s.name == name)
    }

    /// Ordered `name → value` map of every field.
    fn named_values(&self) -> IndexMap<String, f64> {
        Self::SPECS
            .iter()
            .enumerate()
            .filter_map(|(i, s)| self.get(i).map(|v| (s.name.to_string(), v)))
            .collect()
    }

    /// Build a record from a name/value map. Missing names keep their
    /// defaults and unknown names are returned for the caller to report.
    /// The result is not yet validated.
    fn from_named<'a, I>(values: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut record = Self::default();
        let mut unknown = Vec::new();
        for (name, value) in values {
            match Self::index_of(name) {
                Some(i) => record.set(i, value),
                None => unknown.push(name.to_string()),
            }
        }
        (record, unknown)
    }
}

/// Parameterless systems and test fixtures.
impl ParameterRecord for () {
    const SPECS: &'static [ParamSpec] = &[];

    fn get(&self, _index: usize) -> Option<f64> {
        None
    }

    fn set(&mut self, _index: usize, _value: f64) {}
}

// ── TimeStepPolicy ─────────────────────────────────────────────────

/// Validation policy for the integration time step.
///
/// The hard rule is `dt > 0` (otherwise `default_dt`). Values outside
/// `[advisory_min, advisory_max]` are kept with an advisory warning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeStepPolicy {
    /// Fallback time step. Default: 0.01.
    pub default_dt: f64,
    /// Lower edge of the advisory window. Default: 1e-4.
    pub advisory_min: f64,
    /// Upper edge of the advisory window. Default: 0.1.
    pub advisory_max: f64,
}

impl Default for TimeStepPolicy {
    fn default() -> Self {
        Self {
            default_dt: 0.01,
            advisory_min: 1e-4,
            advisory_max: 0.1,
        }
    }
}

impl TimeStepPolicy {
    /// The `ParamSpec` used to validate `dt`.
    pub fn spec(&self) -> ParamSpec {
        ParamSpec::new("dt", self.default_dt, Domain::Positive)
            .with_advisory(self.advisory_min, self.advisory_max)
    }

    /// Validate a proposed time step.
    pub fn validate(&self, dt: f64) -> Validated {
        self.spec().validate(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    #[derive(Clone, Debug, PartialEq)]
    struct Pair {
        gain: f64,
        mix: f64,
    }

    impl Default for Pair {
        fn default() -> Self {
            Self { gain: 2.0, mix: 0.5 }
        }
    }

    impl ParameterRecord for Pair {
        const SPECS: &'static [ParamSpec] = &[
            ParamSpec::new("gain", 2.0, Domain::Positive).with_advisory(1.0, 10.0),
            ParamSpec::new("mix", 0.5, Domain::Within(0.0, 1.0)),
        ];

        fn get(&self, index: usize) -> Option<f64> {
            match index {
                0 => Some(self.gain),
                1 => Some(self.mix),
                _ => None,
            }
        }

        fn set(&mut self, index: usize, value: f64) {
            match index {
                0 => self.gain = value,
                1 => self.mix = value,
                _ => {}
            }
        }
    }

    #[test]
    fn in_domain_value_passes_untouched() {
        let v = Pair::SPECS[0].validate(3.0);
        assert_eq!(v.value, 3.0);
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn non_finite_falls_back_to_default() {
        for raw in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let v = Pair::SPECS[1].validate(raw);
            assert_eq!(v.value, 0.5);
            assert_eq!(v.warnings.len(), 1);
            assert_eq!(v.warnings[0].kind, WarningKind::NonFinite);
        }
    }

    #[test]
    fn positive_domain_uses_default() {
        let v = Pair::SPECS[0].validate(-1.0);
        assert_eq!(v.value, 2.0);
        assert_eq!(v.warnings[0].kind, WarningKind::OutOfDomain);
    }

    #[test]
    fn at_least_domain_clamps() {
        let spec = ParamSpec::new("sigma", 10.0, Domain::AtLeast(0.1));
        let v = spec.validate(0.01);
        assert_eq!(v.value, 0.1);
        assert_eq!(v.warnings[0].applied, 0.1);
        assert_eq!(v.warnings[0].raw, 0.01);
    }

    #[test]
    fn within_domain_clamps_to_nearest_bound() {
        assert_eq!(Pair::SPECS[1].validate(1.7).value, 1.0);
        assert_eq!(Pair::SPECS[1].validate(-0.2).value, 0.0);
    }

    #[test]
    fn advisory_keeps_value() {
        let v = Pair::SPECS[0].validate(50.0);
        assert_eq!(v.value, 50.0);
        assert_eq!(v.warnings[0].kind, WarningKind::Advisory);
    }

    #[test]
    fn record_validation_collects_all_warnings() {
        let raw = Pair {
            gain: f64::NAN,
            mix: 3.0,
        };
        let (fixed, warnings) = raw.validated();
        assert_eq!(fixed, Pair { gain: 2.0, mix: 1.0 });
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].parameter, "gain");
        assert_eq!(warnings[1].parameter, "mix");
    }

    #[test]
    fn named_access() {
        assert_eq!(Pair::index_of("mix"), Some(1));
        assert_eq!(Pair::index_of("nope"), None);
        let names: Vec<_> = Pair::default().named_values().into_keys().collect();
        assert_eq!(names, ["gain", "mix"]);

        let (rec, unknown) = Pair::from_named([("mix", 0.25), ("bogus", 1.0)]);
        assert_eq!(rec.mix, 0.25);
        assert_eq!(rec.gain, 2.0);
        assert_eq!(unknown, ["bogus"]);
    }

    #[test]
    fn time_step_policy() {
        let policy = TimeStepPolicy::default();
        assert_eq!(policy.validate(0.0).value, 0.01);
        assert_eq!(policy.validate(-0.5).value, 0.01);
        let tiny = policy.validate(1e-6);
        assert_eq!(tiny.value, 1e-6);
        assert_eq!(tiny.warnings[0].kind, WarningKind::Advisory);
        assert!(policy.validate(0.005).warnings.is_empty());
    }

    #[test]
    fn warning_display_mentions_parameter() {
        let v = Pair::SPECS[1].validate(4.0);
        let text = v.warnings[0].to_string();
        assert!(text.starts_with("mix:"), "{text}");
        assert!(text.contains("using 1"), "{text}");
    }

    #[test]
    #[traced_test]
    fn corrections_are_logged() {
        let _ = Pair::SPECS[0].validate(-3.0);
        assert!(logs_contain("parameter corrected"));
    }

    proptest! {
        #[test]
        fn validated_value_is_always_in_domain(raw in prop::num::f64::ANY) {
            let v = Pair::SPECS[1].validate(raw);
            prop_assert!(v.value.is_finite());
            prop_assert!((0.0..=1.0).contains(&v.value));

            let g = Pair::SPECS[0].validate(raw);
            prop_assert!(g.value > 0.0 && g.value.is_finite());
        }
    }
}
