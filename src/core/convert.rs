//! Conversion arithmetic over a USD based rate table

use rust_decimal::{Decimal, RoundingStrategy};

use super::currency::Currency;
use super::rates::RateTable;

/// Exchange rate from `source` to `target`, pivoting through USD.
///
/// A USD source reads the target entry directly; any other source divides
/// the two entries. Missing entries yield `NaN`.
pub fn conversion_rate(rates: &RateTable, source: Currency, target: Currency) -> f64 {
    if source == Currency::USD {
        rates.rate_for(target)
    } else {
        rates.rate_for(target) / rates.rate_for(source)
    }
}

/// Converts `amount` and formats it with two fraction digits.
///
/// Returns `None` without touching anything when the amount is unset, zero
/// or not a number, so callers keep whatever result they showed before.
pub fn convert(
    amount: Option<f64>,
    source: Currency,
    target: Currency,
    rates: &RateTable,
) -> Option<String> {
    let amount = amount.filter(|a| *a != 0.0 && !a.is_nan())?;
    let rate = conversion_rate(rates, source, target);
    Some(format_fixed(amount * rate))
}

/// Magnitude from which results are shown in exponent form, e.g. `1e+21`.
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Formats with exactly two decimals, rounding ties away from zero.
///
/// Negative values keep their sign even when they round to zero ("-0.00").
/// Magnitudes of 1e21 and above are written in shortest exponent form.
pub fn format_fixed(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0.00".to_string();
    }
    if value.abs() >= EXPONENT_THRESHOLD {
        return format!("{value:e}").replacen('e', "e+", 1);
    }

    let formatted = match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded =
                exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded.to_string()
        }
        None => format!("{value:.2}"),
    };

    if value < 0.0 && !formatted.starts_with('-') {
        format!("-{formatted}")
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rates() -> RateTable {
        [
            ("USD", 1.0),
            ("EUR", 0.92),
            ("GBP", 0.78),
            ("JPY", 151.2),
            ("AUD", 1.52),
            ("CAD", 1.38),
            ("PKR", 278.5),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_usd_to_pkr() {
        let result = convert(Some(100.0), Currency::USD, Currency::PKR, &sample_rates());
        assert_eq!(result.as_deref(), Some("27850.00"));
    }

    #[test]
    fn test_cross_rate_eur_to_gbp() {
        let result = convert(Some(50.0), Currency::EUR, Currency::GBP, &sample_rates());
        assert_eq!(result.as_deref(), Some("42.39"));
    }

    #[test]
    fn test_same_currency_is_identity() {
        let rates = sample_rates();
        for currency in Currency::all() {
            assert_eq!(
                convert(Some(123.456), currency, currency, &rates).as_deref(),
                Some("123.46"),
                "identity failed for {currency}"
            );
        }
    }

    #[test]
    fn test_from_usd_multiplies_target_rate() {
        let rates = sample_rates();
        for target in Currency::all() {
            let expected = format_fixed(42.0 * rates.rate_for(target));
            assert_eq!(
                convert(Some(42.0), Currency::USD, target, &rates),
                Some(expected)
            );
        }
    }

    #[test]
    fn test_cross_rate_matches_pivot_through_usd() {
        let rates = sample_rates();
        let amount = 250.0;
        for source in Currency::all().filter(|c| *c != Currency::USD) {
            for target in Currency::all().filter(|c| *c != Currency::USD) {
                let direct = amount * conversion_rate(&rates, source, target);
                let in_usd = amount * (1.0 / rates.rate_for(source));
                let pivoted = in_usd * conversion_rate(&rates, Currency::USD, target);
                assert!(
                    (direct - pivoted).abs() < 0.005,
                    "{source}->{target}: {direct} vs {pivoted}"
                );
            }
        }
    }

    #[test]
    fn test_zero_and_missing_amount_are_skipped() {
        let rates = sample_rates();
        assert_eq!(convert(Some(0.0), Currency::USD, Currency::EUR, &rates), None);
        assert_eq!(convert(None, Currency::USD, Currency::EUR, &rates), None);
        assert_eq!(
            convert(Some(f64::NAN), Currency::USD, Currency::EUR, &rates),
            None
        );
    }

    #[test]
    fn test_missing_rate_propagates_nan() {
        let rates: RateTable = [("USD", 1.0), ("EUR", 0.92)].into_iter().collect();
        assert_eq!(
            convert(Some(10.0), Currency::EUR, Currency::PKR, &rates).as_deref(),
            Some("NaN")
        );
        assert_eq!(
            convert(Some(10.0), Currency::USD, Currency::GBP, &RateTable::default()).as_deref(),
            Some("NaN")
        );
    }

    #[test]
    fn test_format_fixed_rounding() {
        assert_eq!(format_fixed(0.125), "0.13");
        assert_eq!(format_fixed(-0.125), "-0.13");
        assert_eq!(format_fixed(1.005), "1.00");
        assert_eq!(format_fixed(2.0), "2.00");
        assert_eq!(format_fixed(1234567.891), "1234567.89");
        assert_eq!(format_fixed(f64::INFINITY), "Infinity");
        assert_eq!(format_fixed(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_format_fixed_small_negative_keeps_sign() {
        assert_eq!(format_fixed(-0.001), "-0.00");
        assert_eq!(format_fixed(-0.004999), "-0.00");
        assert_eq!(format_fixed(-0.005), "-0.01");
        assert_eq!(format_fixed(-0.0), "0.00");
        assert_eq!(format_fixed(0.001), "0.00");
    }

    #[test]
    fn test_format_fixed_huge_values_use_exponent() {
        assert_eq!(format_fixed(1e21), "1e+21");
        assert_eq!(format_fixed(1.5e21), "1.5e+21");
        assert_eq!(format_fixed(-2.5e30), "-2.5e+30");
        assert_eq!(format_fixed(9.99e20), "999000000000000000000.00");
    }

    #[test]
    fn test_divide_by_zero_rate() {
        let rates: RateTable = [("USD", 1.0), ("EUR", 0.0), ("GBP", 0.78)]
            .into_iter()
            .collect();
        assert_eq!(
            convert(Some(1.0), Currency::EUR, Currency::GBP, &rates).as_deref(),
            Some("Infinity")
        );
    }
}
