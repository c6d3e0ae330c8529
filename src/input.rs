//! Input surface checks.
//!
//! The prediction service forwards whatever record it is given. Collectors
//! (the CLI here) use [`InputSurface`] to apply the same constraints an
//! interactive form would: numeric fields within their range and on their
//! step grid, categorical fields drawn from the reference domains.

use thiserror::Error;
use tracing::warn;

use crate::config::DomainPolicy;
use crate::record::{Column, FieldValue, LaptopRecord};
use crate::reference::CategoricalDomains;

/// One constraint a record field does not satisfy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputViolation {
    #[error("{column} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        column: Column,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{column} = {value} is not a multiple of {step} from {min}")]
    OffStep {
        column: Column,
        value: f64,
        min: f64,
        step: f64,
    },

    #[error("{column} = {value:?} was not seen in the reference dataset")]
    OutOfDomain { column: Column, value: String },
}

impl InputViolation {
    pub fn column(&self) -> Column {
        match self {
            InputViolation::OutOfRange { column, .. }
            | InputViolation::OffStep { column, .. }
            | InputViolation::OutOfDomain { column, .. } => *column,
        }
    }

    /// Whether this is a categorical domain miss rather than a numeric one.
    pub fn is_domain(&self) -> bool {
        matches!(self, InputViolation::OutOfDomain { .. })
    }
}

/// A record refused by the input surface.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid input: {}", join(.violations))]
pub struct InputError {
    pub violations: Vec<InputViolation>,
}

fn join(violations: &[InputViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Field constraints derived from the reference domains.
#[derive(Debug, Clone, Copy)]
pub struct InputSurface<'a> {
    domains: &'a CategoricalDomains,
    policy: DomainPolicy,
}

impl<'a> InputSurface<'a> {
    pub fn new(domains: &'a CategoricalDomains, policy: DomainPolicy) -> Self {
        Self { domains, policy }
    }

    /// Every violation in `record`, in column order.
    pub fn check(&self, record: &LaptopRecord) -> Vec<InputViolation> {
        Column::ALL
            .into_iter()
            .filter_map(|column| self.check_field(column, record.value(column)))
            .collect()
    }

    fn check_field(&self, column: Column, value: FieldValue<'_>) -> Option<InputViolation> {
        match value {
            FieldValue::Text(text) => (!self.domains.contains(column, text)).then(|| {
                InputViolation::OutOfDomain {
                    column,
                    value: text.to_string(),
                }
            }),
            FieldValue::Float(_) | FieldValue::Integer(_) => {
                let bounds = column.bounds()?;
                let value = value.as_f64()?;
                if !bounds.contains(value) {
                    Some(InputViolation::OutOfRange {
                        column,
                        value,
                        min: bounds.min,
                        max: bounds.max,
                    })
                } else if !bounds.on_step(value) {
                    Some(InputViolation::OffStep {
                        column,
                        value,
                        min: bounds.min,
                        step: bounds.step,
                    })
                } else {
                    None
                }
            }
        }
    }

    /// Decide whether `record` may be forwarded to the model.
    ///
    /// Numeric violations always refuse the record. Domain misses refuse it
    /// under [`DomainPolicy::Reject`] and are logged under
    /// [`DomainPolicy::PassThrough`].
    pub fn admit(&self, record: &LaptopRecord) -> Result<(), InputError> {
        let (domain, numeric): (Vec<_>, Vec<_>) =
            self.check(record).into_iter().partition(InputViolation::is_domain);

        let mut refused = numeric;
        match self.policy {
            DomainPolicy::Reject => refused.extend(domain),
            DomainPolicy::PassThrough => {
                for violation in &domain {
                    warn!(column = violation.column().name(), "{violation}; forwarding to model");
                }
            }
        }

        if refused.is_empty() {
            Ok(())
        } else {
            refused.sort_by_key(InputViolation::column);
            Err(InputError { violations: refused })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::reference::read_domains;
    use crate::testing::REFERENCE_CSV;
    use rstest::rstest;

    fn domains() -> CategoricalDomains {
        read_domains(REFERENCE_CSV.as_bytes()).unwrap()
    }

    #[test]
    fn presets_are_clean() {
        let domains = domains();
        let surface = InputSurface::new(&domains, DomainPolicy::Reject);
        for record in presets::all() {
            assert!(surface.check(&record).is_empty(), "{}", record.name);
        }
    }

    #[rstest]
    #[case::ram_too_small(|r: &mut LaptopRecord| r.ram = 1, Column::Ram)]
    #[case::rom_off_grid(|r: &mut LaptopRecord| r.rom = 500, Column::Rom)]
    #[case::display_too_large(|r: &mut LaptopRecord| r.display_size = 21.0, Column::DisplaySize)]
    #[case::rating_nan(|r: &mut LaptopRecord| r.spec_rating = f64::NAN, Column::SpecRating)]
    #[case::warranty(|r: &mut LaptopRecord| r.warranty = 6, Column::Warranty)]
    #[case::width_off_grid(|r: &mut LaptopRecord| r.resolution_width = 1925.0, Column::ResolutionWidth)]
    fn numeric_violations(#[case] mutate: fn(&mut LaptopRecord), #[case] column: Column) {
        let domains = domains();
        let surface = InputSurface::new(&domains, DomainPolicy::PassThrough);
        let mut record = presets::hp_victus();
        mutate(&mut record);

        let violations = surface.check(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].column(), column);
        assert!(surface.admit(&record).is_err());
    }

    #[test]
    fn decimal_steps_accept_decimal_values() {
        let domains = domains();
        let surface = InputSurface::new(&domains, DomainPolicy::Reject);
        let mut record = presets::hp_victus();
        record.display_size = 15.6;
        record.spec_rating = 69.3;
        assert!(surface.check(&record).is_empty());
    }

    #[test]
    fn unseen_brand_follows_policy() {
        let domains = domains();
        let mut record = presets::hp_victus();
        record.brand = "Framework".into();

        let pass = InputSurface::new(&domains, DomainPolicy::PassThrough);
        assert_eq!(pass.check(&record).len(), 1);
        assert!(pass.admit(&record).is_ok());

        let reject = InputSurface::new(&domains, DomainPolicy::Reject);
        let err = reject.admit(&record).unwrap_err();
        assert_eq!(
            err.violations,
            vec![InputViolation::OutOfDomain {
                column: Column::Brand,
                value: "Framework".into()
            }]
        );
        assert!(err.to_string().contains("Framework"));
    }

    #[test]
    fn violations_are_reported_together_in_column_order() {
        let domains = domains();
        let surface = InputSurface::new(&domains, DomainPolicy::Reject);
        let mut record = presets::acer_aspire();
        record.warranty = 9;
        record.os = "Plan 9".into();
        record.ram = 100;

        let columns: Vec<Column> = surface
            .admit(&record)
            .unwrap_err()
            .violations
            .iter()
            .map(InputViolation::column)
            .collect();
        assert_eq!(columns, [Column::Ram, Column::Os, Column::Warranty]);
    }
}
