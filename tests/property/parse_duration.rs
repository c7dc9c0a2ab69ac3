use promlint::primitives::parse_duration;
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn valid_seconds(n in 1u64..=999999) {
        let input = format!("{}s", n);
        let result = parse_duration(&input);
        prop_assert!(result.is_ok(), "parse_duration({:?}) failed: {:?}", input, result);
        prop_assert_eq!(result.unwrap(), Duration::from_secs(n));
    }

    #[test]
    fn valid_minutes(n in 1u64..=999999) {
        let input = format!("{}m", n);
        prop_assert_eq!(parse_duration(&input).unwrap(), Duration::from_secs(n * 60));
    }

    #[test]
    fn valid_milliseconds(n in 1u64..=999999) {
        let input = format!("{}ms", n);
        prop_assert_eq!(parse_duration(&input).unwrap(), Duration::from_millis(n));
    }

    #[test]
    fn minutes_equal_seconds(n in 1u64..=9999) {
        let minutes = parse_duration(&format!("{}m", n)).unwrap();
        let seconds = parse_duration(&format!("{}s", n * 60)).unwrap();
        prop_assert_eq!(minutes, seconds);
    }

    #[test]
    fn weeks_equal_days(n in 1u64..=9999) {
        let weeks = parse_duration(&format!("{}w", n)).unwrap();
        let days = parse_duration(&format!("{}d", n * 7)).unwrap();
        prop_assert_eq!(weeks, days);
    }

    #[test]
    fn combined_units_add_up(
        days in 0u64..=30,
        hours in 0u64..=23,
        minutes in 0u64..=59,
        seconds in 0u64..=59,
        millis in 0u64..=999,
    ) {
        // At least one component must be nonzero
        prop_assume!(days > 0 || hours > 0 || minutes > 0 || seconds > 0 || millis > 0);

        let mut input = String::new();
        if days > 0 { input.push_str(&format!("{}d", days)); }
        if hours > 0 { input.push_str(&format!("{}h", hours)); }
        if minutes > 0 { input.push_str(&format!("{}m", minutes)); }
        if seconds > 0 { input.push_str(&format!("{}s", seconds)); }
        if millis > 0 { input.push_str(&format!("{}ms", millis)); }

        let result = parse_duration(&input);
        prop_assert!(result.is_ok(), "parse_duration({:?}) failed: {:?}", input, result);

        let expected_ms = ((days * 24 + hours) * 60 + minutes) * 60_000 + seconds * 1000 + millis;
        prop_assert_eq!(result.unwrap(), Duration::from_millis(expected_ms));
    }

    #[test]
    fn units_out_of_order_are_rejected(h in 1u64..=99, m in 1u64..=99) {
        let input = format!("{}m{}h", m, h);
        prop_assert!(parse_duration(&input).is_err(), "{:?} should be rejected", input);
    }

    #[test]
    fn arbitrary_string_never_panics(s in "\\PC{0,30}") {
        let _ = parse_duration(&s);
    }
}

#[test]
fn zero_and_empty() {
    assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    assert!(parse_duration("").is_err());
    assert!(parse_duration("5").is_err());
    assert!(parse_duration("PT5M").is_err());
    assert!(parse_duration("99999999999999999999y").is_err());
}
