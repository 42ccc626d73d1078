//! Merges the two directional scans of a route into its report row.

use std::collections::HashMap;

use super::date_compressor::compress_days;
use crate::models::{Direction, DirectionScan, DirectionSummary, MonthWindow, Route, RouteSummary, TaxAmount};

/// Most frequent tax; ties go to the value seen first.
pub fn representative_tax(taxes: &[TaxAmount]) -> Option<TaxAmount> {
    let mut counts: HashMap<TaxAmount, usize> = HashMap::new();
    for tax in taxes {
        *counts.entry(*tax).or_insert(0) += 1;
    }

    let mut best: Option<(TaxAmount, usize)> = None;
    for tax in taxes {
        let count = counts.get(tax).copied().unwrap_or(0);
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((*tax, count)),
        }
    }
    best.map(|(tax, _)| tax)
}

/// Report view of one direction.
///
/// A direction with no floor-priced day anywhere in the window is blank,
/// even if Pass 1 found a floor.
pub fn summarize_direction(scan: &DirectionScan, window: &MonthWindow) -> DirectionSummary {
    let has_floor_days = scan.months.iter().any(|m| !m.days.is_empty());
    if !has_floor_days {
        return DirectionSummary::blank(window);
    }

    let dates = window
        .iter()
        .map(|month| {
            let text = scan
                .months
                .iter()
                .find(|m| m.month == month)
                .map(|m| compress_days(m.days.iter().copied()))
                .unwrap_or_default();
            (month, text)
        })
        .collect();

    DirectionSummary {
        points: scan.floor.floor,
        tax: representative_tax(&scan.floor_taxes),
        dates,
    }
}

/// Combine the outbound and return scans of `route`.
pub fn aggregate_route(
    route: Route,
    outbound: &DirectionScan,
    inbound: &DirectionScan,
    window: &MonthWindow,
) -> RouteSummary {
    debug_assert_eq!(outbound.floor.direction, Direction::Outbound);
    debug_assert_eq!(inbound.floor.direction, Direction::Return);

    RouteSummary {
        route,
        outbound: summarize_direction(outbound, window),
        inbound: summarize_direction(inbound, window),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FloorResult, MonthAvailability, Points, YearMonth};

    fn route() -> Route {
        Route::new("PHX".parse().unwrap(), "SEA".parse().unwrap())
    }

    fn month(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn window() -> MonthWindow {
        MonthWindow::consecutive(month("2027-01"), 2).unwrap()
    }

    fn dollars(values: &[u64]) -> Vec<TaxAmount> {
        values.iter().map(|d| TaxAmount::from_dollars(*d)).collect()
    }

    fn scan(direction: Direction, floor: Option<u32>, jan: &[u8], feb: &[u8], taxes: &[u64]) -> DirectionScan {
        let availability = |m: &str, days: &[u8]| MonthAvailability {
            route: route(),
            direction,
            month: month(m),
            days: days.iter().copied().collect(),
        };
        DirectionScan {
            floor: FloorResult {
                route: route(),
                direction,
                floor: floor.map(Points::new),
            },
            months: vec![availability("2027-01", jan), availability("2027-02", feb)],
            floor_taxes: dollars(taxes),
        }
    }

    #[test]
    fn test_representative_tax_mode() {
        assert_eq!(
            representative_tax(&dollars(&[40, 40, 45])),
            Some(TaxAmount::from_dollars(40))
        );
        assert_eq!(
            representative_tax(&dollars(&[45, 40, 40])),
            Some(TaxAmount::from_dollars(40))
        );
    }

    #[test]
    fn test_representative_tax_tie_goes_to_first_seen() {
        assert_eq!(
            representative_tax(&dollars(&[40, 45])),
            Some(TaxAmount::from_dollars(40))
        );
        assert_eq!(
            representative_tax(&dollars(&[45, 40])),
            Some(TaxAmount::from_dollars(45))
        );
        assert_eq!(
            representative_tax(&dollars(&[45, 40, 40, 45])),
            Some(TaxAmount::from_dollars(45))
        );
    }

    #[test]
    fn test_representative_tax_empty() {
        assert_eq!(representative_tax(&[]), None);
    }

    #[test]
    fn test_summarize_direction() {
        let summary = summarize_direction(
            &scan(Direction::Outbound, Some(5000), &[1, 3, 4, 5, 7], &[], &[19, 19, 25]),
            &window(),
        );

        assert_eq!(summary.points, Some(Points::new(5000)));
        assert_eq!(summary.tax, Some(TaxAmount::from_dollars(19)));
        assert_eq!(summary.dates_for(month("2027-01")), "1,3-5,7");
        assert_eq!(summary.dates_for(month("2027-02")), "");
        assert!(summary.has_inventory());
    }

    #[test]
    fn test_no_floor_days_is_blank_not_error() {
        let window = window();
        let no_floor = summarize_direction(&scan(Direction::Return, None, &[], &[], &[]), &window);
        assert_eq!(no_floor, DirectionSummary::blank(&window));
        assert!(!no_floor.has_inventory());

        // Pass 1 saw a floor but Pass 2 never did.
        let vanished =
            summarize_direction(&scan(Direction::Return, Some(4500), &[], &[], &[]), &window);
        assert_eq!(vanished.points, None);
        assert_eq!(vanished.tax, None);
        assert_eq!(vanished.dates.len(), 2);
    }

    #[test]
    fn test_floor_days_without_tax_leave_tax_blank() {
        let summary = summarize_direction(
            &scan(Direction::Outbound, Some(7500), &[2], &[], &[]),
            &window(),
        );
        assert_eq!(summary.points, Some(Points::new(7500)));
        assert_eq!(summary.tax, None);
    }

    #[test]
    fn test_aggregate_route_keeps_directions_apart() {
        let outbound = scan(Direction::Outbound, Some(5000), &[1], &[], &[19]);
        let inbound = scan(Direction::Return, Some(7500), &[], &[9, 10], &[6]);

        let summary = aggregate_route(route(), &outbound, &inbound, &window());

        assert_eq!(summary.route, route());
        assert_eq!(summary.direction(Direction::Outbound).dates_for(month("2027-01")), "1");
        assert_eq!(summary.direction(Direction::Return).dates_for(month("2027-02")), "9-10");
        assert_eq!(summary.inbound.points, Some(Points::new(7500)));
        assert_eq!(summary.inbound.tax, Some(TaxAmount::from_dollars(6)));
    }
}
