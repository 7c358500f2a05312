//! Position ledger: sizing, averaging, and PnL accounting
//!
//! Owns the single optional position and the account bookkeeping around it.
//! Sizing is capital-denominated notional; cash is only touched when a
//! position closes and its PnL is realized.

use crate::models::account::{AccountState, Position, Side};
use chrono::{DateTime, Utc};

/// How an opening trade is sized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingPolicy {
    /// `base + step * flip_count`, never more than the available cash.
    Ladder { base_size: f64, step_size: f64 },
    /// Fixed opening notional with capital-capped averaging: adds of
    /// `step_usd` until `used_capital` reaches `max_capital`.
    FixedCapital {
        base_usd: f64,
        step_usd: f64,
        max_capital: f64,
    },
}

impl SizingPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SizingPolicy::Ladder { .. } => "ladder",
            SizingPolicy::FixedCapital { .. } => "fixed_capital",
        }
    }
}

pub struct PositionLedger {
    sizing: SizingPolicy,
    account: AccountState,
}

impl PositionLedger {
    pub fn new(sizing: SizingPolicy, start_balance: f64) -> Self {
        Self {
            sizing,
            account: AccountState::new(start_balance),
        }
    }

    pub fn account(&self) -> &AccountState {
        &self.account
    }

    pub fn sizing(&self) -> SizingPolicy {
        self.sizing
    }

    pub fn record_signal(&mut self, side: Side) {
        self.account.last_signal = Some(side);
    }

    pub fn record_action(&mut self, side: Side) {
        self.account.last_action_signal = Some(side);
    }

    pub fn record_tick(&mut self, tick_ts: DateTime<Utc>, bar_ts: Option<DateTime<Utc>>) {
        self.account.last_tick_ts = Some(tick_ts);
        if bar_ts.is_some() {
            self.account.last_bar_ts = bar_ts;
        }
    }

    /// Open a fresh position. Size follows the configured sizing policy;
    /// `add_count` starts at zero on every open, including the post-flip one.
    pub fn open_position(&mut self, side: Side, price: f64) {
        let size = match self.sizing {
            SizingPolicy::Ladder {
                base_size,
                step_size,
            } => (base_size + step_size * self.account.flip_count as f64).min(self.account.cash),
            SizingPolicy::FixedCapital { base_usd, .. } => base_usd,
        };
        let quantity = if price > 0.0 { size / price } else { 0.0 };

        self.account.position = Some(Position {
            side,
            quantity,
            avg_price: price,
            used_capital: size,
            add_count: 0,
        });
    }

    /// Add `step_usd` of notional (clipped to the remaining headroom under
    /// `max_capital`) at the given price, re-averaging the entry. No-op when
    /// there is no headroom, no position, or the sizing policy has no add
    /// mechanism. Returns whether an add occurred.
    pub fn add_to_position(&mut self, price: f64) -> bool {
        let SizingPolicy::FixedCapital {
            step_usd,
            max_capital,
            ..
        } = self.sizing
        else {
            return false;
        };
        let Some(position) = self.account.position else {
            return false;
        };
        if price <= 0.0 {
            return false;
        }

        let add_amount = step_usd.min(max_capital - position.used_capital);
        if add_amount <= 0.0 {
            return false;
        }
        let add_qty = add_amount / price;
        if add_qty <= 0.0 {
            return false;
        }

        let quantity = position.quantity + add_qty;
        let avg_price = (position.avg_price * position.quantity + price * add_qty) / quantity;
        self.account.position = Some(Position {
            quantity,
            avg_price,
            used_capital: position.used_capital + add_amount,
            add_count: position.add_count + 1,
            ..position
        });
        true
    }

    /// DCA check: add only when price has moved against the position by at
    /// least `step_pct` from the average entry.
    pub fn maybe_dca(&mut self, price: f64, step_pct: f64) -> bool {
        let Some(position) = self.account.position else {
            return false;
        };
        let adverse = match position.side {
            Side::Long => price <= position.avg_price * (1.0 - step_pct),
            Side::Short => price >= position.avg_price * (1.0 + step_pct),
        };
        if adverse {
            self.add_to_position(price)
        } else {
            false
        }
    }

    /// Close the position at `price`, realizing its PnL into cash. Returns
    /// the realized PnL (zero when flat).
    pub fn close_position(&mut self, price: f64) -> f64 {
        let pnl = self.unrealized_pnl(price);
        self.account.cash += pnl;
        self.account.realized_pnl += pnl;
        self.account.last_close_pnl = pnl;
        self.account.position = None;
        pnl
    }

    /// Mark-to-market PnL of the open position at `price`, without touching
    /// any state.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.account.position {
            Some(position) => match position.side {
                Side::Long => (price - position.avg_price) * position.quantity,
                Side::Short => (position.avg_price - price) * position.quantity,
            },
            None => 0.0,
        }
    }

    /// Close, bump the flip counter, and reopen on the opposite side at the
    /// same price tick. The only path that increments `flip_count`.
    pub fn flip(&mut self, side: Side, price: f64) -> f64 {
        let pnl = self.close_position(price);
        self.account.flip_count += 1;
        self.open_position(side, price);
        pnl
    }

    /// Re-mark equity as cash plus unrealized PnL at `price`.
    pub fn mark_equity(&mut self, price: f64) {
        self.account.equity = self.account.cash + self.unrealized_pnl(price);
        self.account.last_price = Some(price);
    }
}
