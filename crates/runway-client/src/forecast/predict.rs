use chrono::NaiveDate;

use crate::forecast::date::shift_days;

/// First date on or after `today` reached by stepping `interval_days` from
/// `last_date`; the first step is always taken.
pub fn predict_next_occurrence(
    last_date: NaiveDate,
    interval_days: i64,
    today: NaiveDate,
) -> NaiveDate {
    let step = interval_days.max(1);
    let candidate = shift_days(last_date, step);
    if candidate >= today {
        return candidate;
    }

    let behind = (today - candidate).num_days();
    let steps = behind.div_euclid(step) + i64::from(behind.rem_euclid(step) != 0);
    shift_days(candidate, steps.saturating_mul(step))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::predict_next_occurrence;
    use crate::forecast::date::shift_days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap_or(NaiveDate::MIN)
    }

    #[test]
    fn stale_last_date_rolls_forward_past_today() {
        let next = predict_next_occurrence(shift_days(today(), -40), 30, today());
        assert_eq!(next, shift_days(today(), 20));
    }

    #[test]
    fn exact_landing_on_today_is_kept() {
        let next = predict_next_occurrence(shift_days(today(), -60), 30, today());
        assert_eq!(next, today());
    }

    #[test]
    fn recent_last_date_takes_a_single_step() {
        let next = predict_next_occurrence(shift_days(today(), -3), 7, today());
        assert_eq!(next, shift_days(today(), 4));
        let from_today = predict_next_occurrence(today(), 7, today());
        assert_eq!(from_today, shift_days(today(), 7));
    }

    #[test]
    fn result_never_precedes_today() {
        for interval in [5_i64, 7, 14, 30, 91, 365, 400] {
            for back in [0_i64, 1, 6, 59, 366, 2000] {
                let next = predict_next_occurrence(shift_days(today(), -back), interval, today());
                assert!(next >= today());
                assert!((next - today()).num_days() < interval.max(1) || back == 0);
            }
        }
    }

    #[test]
    fn matches_repeated_stepping() {
        let last = shift_days(today(), -1000);
        let mut stepped = shift_days(last, 13);
        while stepped < today() {
            stepped = shift_days(stepped, 13);
        }
        assert_eq!(predict_next_occurrence(last, 13, today()), stepped);
    }
}
