use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::forecast::date::shift_days;
use crate::forecast::normalize::round_cents;
use crate::forecast::types::{
    ProjectedOccurrence, ProjectionDay, ProjectionSummary, RecurringPattern,
};

/// Simulates the balance from `today` through `today + horizon_days`, both inclusive.
///
/// Hidden patterns never land. A visible pattern lands on `next_date` and on
/// every `interval_days` step after it; days before `next_date` are skipped.
pub fn project_balance(
    starting_balance: Decimal,
    patterns: &[RecurringPattern],
    horizon_days: u32,
    today: NaiveDate,
    danger_threshold: Decimal,
) -> Vec<ProjectionDay> {
    let visible = patterns
        .iter()
        .filter(|pattern| !pattern.is_hidden)
        .collect::<Vec<&RecurringPattern>>();

    let mut balance = round_cents(starting_balance);
    let mut days = Vec::with_capacity(horizon_days as usize + 1);
    for offset in 0..=i64::from(horizon_days) {
        let date = shift_days(today, offset);
        let occurring = visible
            .iter()
            .filter(|pattern| lands_on(pattern, date))
            .map(|pattern| ProjectedOccurrence {
                merchant_key: pattern.merchant_key.clone(),
                description: pattern.description.clone(),
                amount: pattern.avg_amount,
            })
            .collect::<Vec<ProjectedOccurrence>>();

        let delta = occurring
            .iter()
            .map(|occurrence| occurrence.amount)
            .sum::<Decimal>();
        balance = round_cents(balance + delta);

        days.push(ProjectionDay {
            date,
            balance,
            occurring,
            below_threshold: balance < danger_threshold,
        });
    }

    debug!(
        visible_patterns = visible.len(),
        days = days.len(),
        "projected balance timeline"
    );
    days
}

fn lands_on(pattern: &RecurringPattern, date: NaiveDate) -> bool {
    if date < pattern.next_date {
        return false;
    }
    let step = pattern.interval_days.max(1);
    (date - pattern.next_date).num_days() % step == 0
}

pub fn summarize(
    starting_balance: Decimal,
    patterns: &[RecurringPattern],
    days: &[ProjectionDay],
) -> ProjectionSummary {
    let starting_balance = round_cents(starting_balance);
    let ending_balance = days.last().map_or(starting_balance, |day| day.balance);

    // First minimum wins so the reported date is the earliest low point.
    let lowest = days.iter().fold(None::<&ProjectionDay>, |lowest, day| match lowest {
        Some(current) if current.balance <= day.balance => Some(current),
        _ => Some(day),
    });

    let mut monthly_income = Decimal::ZERO;
    let mut monthly_expense = Decimal::ZERO;
    for pattern in patterns.iter().filter(|pattern| !pattern.is_hidden) {
        let monthly = monthly_rate(pattern);
        if monthly > Decimal::ZERO {
            monthly_income += monthly;
        } else {
            monthly_expense += monthly;
        }
    }
    let monthly_income = round_cents(monthly_income);
    let monthly_expense = round_cents(monthly_expense);

    ProjectionSummary {
        starting_balance,
        ending_balance,
        lowest_balance: lowest.map_or(starting_balance, |day| day.balance),
        lowest_balance_date: lowest.map(|day| day.date),
        days_below_threshold: days.iter().filter(|day| day.below_threshold).count(),
        first_below_threshold_date: days
            .iter()
            .find(|day| day.below_threshold)
            .map(|day| day.date),
        monthly_income,
        monthly_expense,
        monthly_net: monthly_income + monthly_expense,
    }
}

/// Amount normalised to a 30-day month.
pub fn monthly_rate(pattern: &RecurringPattern) -> Decimal {
    let interval = Decimal::from(pattern.interval_days.max(1));
    pattern.avg_amount * Decimal::from(30) / interval
}
