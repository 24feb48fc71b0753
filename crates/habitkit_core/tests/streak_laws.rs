use chrono::{Days, NaiveDate};
use habitkit_core::{compute_streak, CheckInSet};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn back(n: u64) -> NaiveDate {
    today() - Days::new(n)
}

#[test]
fn empty_set_is_zero_for_any_reference_date() {
    let empty = CheckInSet::new();
    for date in [today(), back(400), NaiveDate::MIN, NaiveDate::MAX] {
        assert_eq!(compute_streak(&empty, date), 0);
    }
}

#[test]
fn repeated_add_keeps_order_and_streak() {
    let mut set: CheckInSet = [back(0), back(1)].into_iter().collect();
    let order = set.to_sorted_descending();
    let streak = compute_streak(&set, today());

    set.add(back(1));
    assert_eq!(set.to_sorted_descending(), order);
    assert_eq!(compute_streak(&set, today()), streak);
}

#[test]
fn gap_law() {
    let set: CheckInSet = [back(0), back(1), back(3)].into_iter().collect();
    assert_eq!(compute_streak(&set, today()), 2);
}

#[test]
fn disconnected_from_today_law() {
    let set: CheckInSet = [back(3), back(4), back(5)].into_iter().collect();
    assert_eq!(compute_streak(&set, today()), 0);
}

#[test]
fn four_day_scenario_and_undo() {
    let mut set = CheckInSet::new();
    set.add(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    set.add(NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
    set.add(NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
    set.add(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
    assert_eq!(compute_streak(&set, today()), 4);

    set.remove(today());
    assert_eq!(compute_streak(&set, today()), 0);
}

#[test]
fn streak_crosses_month_and_leap_day_boundaries() {
    let leap_today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let set: CheckInSet = (0..4).map(|n| leap_today - Days::new(n)).collect();
    assert!(set.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    assert_eq!(compute_streak(&set, leap_today), 4);
}

#[test]
fn calendar_minimum_does_not_underflow() {
    let set: CheckInSet = [NaiveDate::MIN].into_iter().collect();
    assert_eq!(compute_streak(&set, NaiveDate::MIN), 1);
}
