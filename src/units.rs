//! Conversion of kitchen units to a metric basis.
//!
//! Volumes become millilitres and masses become grams. Conversion is
//! best-effort: an unknown unit leaves the amount untouched.

/// Metric base a unit converts into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricBase {
    Grams,
    Milliliters,
}

impl MetricBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricBase::Grams => "g",
            MetricBase::Milliliters => "ml",
        }
    }
}

/// Known unit spellings with their factor into the metric base
pub const UNIT_TABLE: &[(&str, f64, MetricBase)] = &[
    ("cup", 240.0, MetricBase::Milliliters),
    ("cups", 240.0, MetricBase::Milliliters),
    ("tablespoon", 15.0, MetricBase::Milliliters),
    ("tablespoons", 15.0, MetricBase::Milliliters),
    ("tbsp", 15.0, MetricBase::Milliliters),
    ("teaspoon", 5.0, MetricBase::Milliliters),
    ("teaspoons", 5.0, MetricBase::Milliliters),
    ("tsp", 5.0, MetricBase::Milliliters),
    ("ounce", 28.35, MetricBase::Grams),
    ("ounces", 28.35, MetricBase::Grams),
    ("oz", 28.35, MetricBase::Grams),
    ("pound", 453.6, MetricBase::Grams),
    ("pounds", 453.6, MetricBase::Grams),
    ("lb", 453.6, MetricBase::Grams),
    ("lbs", 453.6, MetricBase::Grams),
    ("kilogram", 1000.0, MetricBase::Grams),
    ("kilograms", 1000.0, MetricBase::Grams),
    ("kg", 1000.0, MetricBase::Grams),
    ("gram", 1.0, MetricBase::Grams),
    ("grams", 1.0, MetricBase::Grams),
    ("g", 1.0, MetricBase::Grams),
    ("milliliter", 1.0, MetricBase::Milliliters),
    ("milliliters", 1.0, MetricBase::Milliliters),
    ("millilitre", 1.0, MetricBase::Milliliters),
    ("ml", 1.0, MetricBase::Milliliters),
    ("liter", 1000.0, MetricBase::Milliliters),
    ("liters", 1000.0, MetricBase::Milliliters),
    ("litre", 1000.0, MetricBase::Milliliters),
    ("l", 1000.0, MetricBase::Milliliters),
    ("fluid ounce", 29.57, MetricBase::Milliliters),
    ("fluid ounces", 29.57, MetricBase::Milliliters),
    ("fl oz", 29.57, MetricBase::Milliliters),
];

fn lookup(unit: &str) -> Option<(f64, MetricBase)> {
    let unit = unit.trim().to_lowercase();
    UNIT_TABLE
        .iter()
        .find(|(name, _, _)| *name == unit)
        .map(|(_, factor, base)| (*factor, *base))
}

/// Convert `amount` of `unit` into grams or millilitres.
///
/// Unrecognized units return `amount` unchanged. A result that is not
/// finite becomes 0 so serialized quantities are never null.
pub fn to_metric(amount: f64, unit: &str) -> f64 {
    let converted = match lookup(unit) {
        Some((factor, _)) => amount * factor,
        None => amount,
    };
    if converted.is_finite() {
        converted
    } else {
        0.0
    }
}

/// Canonical metric unit (`"g"` or `"ml"`) for a known unit string
pub fn canonical_unit(unit: &str) -> Option<&'static str> {
    lookup(unit).map(|(_, base)| base.as_str())
}

/// Metric base of a known unit string
pub fn metric_base(unit: &str) -> Option<MetricBase> {
    lookup(unit).map(|(_, base)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_applies_its_factor() {
        for (unit, factor, _) in UNIT_TABLE {
            assert_eq!(to_metric(3.0, unit), 3.0 * factor, "unit {}", unit);
        }
    }

    #[test]
    fn test_two_cups() {
        assert_eq!(to_metric(2.0, "cup"), 480.0);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(to_metric(1.0, "  TBSP "), 15.0);
        assert_eq!(to_metric(1.0, "Fl Oz"), 29.57);
        assert_eq!(canonical_unit(" Cups"), Some("ml"));
    }

    #[test]
    fn test_unknown_units_pass_through() {
        assert_eq!(to_metric(3.0, "cloves"), 3.0);
        assert_eq!(to_metric(1.5, ""), 1.5);
        assert_eq!(to_metric(7.0, "pinch"), 7.0);
        assert_eq!(canonical_unit("cloves"), None);
    }

    #[test]
    fn test_overflow_is_zeroed() {
        assert_eq!(to_metric(1e307, "cup"), 0.0);
        assert_eq!(to_metric(f64::MAX, "kg"), 0.0);
        assert_eq!(to_metric(f64::NAN, "pinch"), 0.0);
        assert_eq!(to_metric(1e300, "g"), 1e300);
    }

    #[test]
    fn test_mass_and_volume_bases() {
        assert_eq!(metric_base("oz"), Some(MetricBase::Grams));
        assert_eq!(metric_base("fl oz"), Some(MetricBase::Milliliters));
        assert_eq!(canonical_unit("lb"), Some("g"));
        assert_eq!(canonical_unit("l"), Some("ml"));
    }
}
