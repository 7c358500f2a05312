//! Unit tests for the position ledger

use approx::assert_relative_eq;
use elderix::models::account::Side;
use elderix::trading::ledger::{PositionLedger, SizingPolicy};

fn ladder(start_balance: f64) -> PositionLedger {
    PositionLedger::new(
        SizingPolicy::Ladder {
            base_size: 500.0,
            step_size: 20.0,
        },
        start_balance,
    )
}

fn fixed_capital() -> PositionLedger {
    PositionLedger::new(
        SizingPolicy::FixedCapital {
            base_usd: 100.0,
            step_usd: 100.0,
            max_capital: 250.0,
        },
        1000.0,
    )
}

#[test]
fn ladder_sizing_starts_at_base() {
    let mut ledger = ladder(1000.0);
    ledger.open_position(Side::Long, 100.0);
    let position = ledger.account().position.unwrap();
    assert_relative_eq!(position.used_capital, 500.0);
    assert_relative_eq!(position.quantity, 5.0);
    assert_relative_eq!(position.avg_price, 100.0);
    assert_eq!(position.add_count, 0);
}

#[test]
fn ladder_sizing_grows_with_flip_count() {
    let mut ledger = ladder(10_000.0);
    ledger.open_position(Side::Long, 100.0);
    ledger.flip(Side::Short, 100.0);
    ledger.flip(Side::Long, 100.0);
    ledger.flip(Side::Short, 100.0);
    // flip_count = 3 -> 500 + 20*3
    assert_eq!(ledger.account().flip_count, 3);
    let position = ledger.account().position.unwrap();
    assert_relative_eq!(position.used_capital, 560.0);
}

#[test]
fn ladder_sizing_never_exceeds_cash() {
    let mut ledger = ladder(300.0);
    ledger.open_position(Side::Long, 100.0);
    let position = ledger.account().position.unwrap();
    assert_relative_eq!(position.used_capital, 300.0);
    assert_relative_eq!(position.quantity, 3.0);
}

#[test]
fn close_realizes_long_pnl_into_cash() {
    let mut ledger = ladder(1000.0);
    ledger.open_position(Side::Long, 100.0);
    let pnl = ledger.close_position(110.0);
    // 5 units * 10
    assert_relative_eq!(pnl, 50.0);
    assert_relative_eq!(ledger.account().cash, 1050.0);
    assert_relative_eq!(ledger.account().realized_pnl, 50.0);
    assert_relative_eq!(ledger.account().last_close_pnl, 50.0);
    assert!(ledger.account().position.is_none());
}

#[test]
fn close_realizes_short_pnl_with_mirrored_sign() {
    let mut ledger = ladder(1000.0);
    ledger.open_position(Side::Short, 100.0);
    let pnl = ledger.close_position(110.0);
    assert_relative_eq!(pnl, -50.0);
    assert_relative_eq!(ledger.account().cash, 950.0);
}

#[test]
fn close_when_flat_is_zero() {
    let mut ledger = ladder(1000.0);
    assert_relative_eq!(ledger.close_position(123.0), 0.0);
    assert_relative_eq!(ledger.account().cash, 1000.0);
}

#[test]
fn unrealized_pnl_does_not_touch_state() {
    let mut ledger = ladder(1000.0);
    ledger.open_position(Side::Long, 100.0);
    assert_relative_eq!(ledger.unrealized_pnl(104.0), 20.0);
    assert_relative_eq!(ledger.account().cash, 1000.0);
    assert!(ledger.account().position.is_some());
}

#[test]
fn flip_closes_at_pre_flip_average_and_reopens_fresh() {
    let mut ledger = ladder(1000.0);
    ledger.open_position(Side::Long, 100.0);
    let pnl = ledger.flip(Side::Short, 110.0);
    assert_relative_eq!(pnl, 50.0);
    assert_eq!(ledger.account().flip_count, 1);
    let position = ledger.account().position.unwrap();
    assert_eq!(position.side, Side::Short);
    assert_relative_eq!(position.avg_price, 110.0);
    assert_eq!(position.add_count, 0);
    // reopened with the bumped ladder size against the new cash
    assert_relative_eq!(position.used_capital, 520.0);
}

#[test]
fn mark_equity_is_cash_plus_unrealized() {
    let mut ledger = ladder(1000.0);
    ledger.open_position(Side::Long, 100.0);
    ledger.mark_equity(104.0);
    assert_relative_eq!(ledger.account().equity, 1020.0);
    assert_eq!(ledger.account().last_price, Some(104.0));
}

#[test]
fn fixed_capital_opens_at_base_regardless_of_flips() {
    let mut ledger = fixed_capital();
    ledger.open_position(Side::Long, 100.0);
    ledger.flip(Side::Short, 100.0);
    ledger.flip(Side::Long, 100.0);
    let position = ledger.account().position.unwrap();
    assert_relative_eq!(position.used_capital, 100.0);
}

#[test]
fn add_re_averages_entry_price_by_capital_weight() {
    let mut ledger = fixed_capital();
    ledger.open_position(Side::Long, 100.0);
    assert!(ledger.add_to_position(80.0));
    let position = ledger.account().position.unwrap();
    // 1 unit @ 100 plus 1.25 units @ 80
    assert_relative_eq!(position.quantity, 2.25, epsilon = 1e-12);
    assert_relative_eq!(position.avg_price, 200.0 / 2.25, epsilon = 1e-12);
    assert_relative_eq!(position.used_capital, 200.0);
    assert_eq!(position.add_count, 1);
}

#[test]
fn adds_never_push_used_capital_past_the_cap() {
    let mut ledger = fixed_capital();
    ledger.open_position(Side::Long, 100.0);
    assert!(ledger.add_to_position(90.0)); // 200
    assert!(ledger.add_to_position(80.0)); // 250: clipped to the 50 headroom
    let position = ledger.account().position.unwrap();
    assert_relative_eq!(position.used_capital, 250.0);
    assert_eq!(position.add_count, 2);

    // zero headroom: no-op
    assert!(!ledger.add_to_position(70.0));
    let position = ledger.account().position.unwrap();
    assert_relative_eq!(position.used_capital, 250.0);
    assert_eq!(position.add_count, 2);
}

#[test]
fn add_under_ladder_policy_is_a_no_op() {
    let mut ledger = ladder(1000.0);
    ledger.open_position(Side::Long, 100.0);
    assert!(!ledger.add_to_position(90.0));
    assert_eq!(ledger.account().position.unwrap().add_count, 0);
}

#[test]
fn dca_triggers_only_on_adverse_moves() {
    let mut ledger = fixed_capital();
    ledger.open_position(Side::Long, 100.0);
    // 1% down, threshold 2%: no add
    assert!(!ledger.maybe_dca(99.0, 0.02));
    // 2% down: add
    assert!(ledger.maybe_dca(98.0, 0.02));
    // favorable move never adds
    assert!(!ledger.maybe_dca(150.0, 0.02));
}

#[test]
fn dca_on_shorts_triggers_above_entry() {
    let mut ledger = fixed_capital();
    ledger.open_position(Side::Short, 100.0);
    assert!(!ledger.maybe_dca(101.0, 0.02));
    assert!(ledger.maybe_dca(102.0, 0.02));
}
