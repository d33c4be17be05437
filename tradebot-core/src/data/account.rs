//! Futures account summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balance of a single margin asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    /// Asset name, e.g. `USDT`
    pub asset: String,
    /// Wallet balance
    pub wallet_balance: Decimal,
    /// Unrealized profit and loss
    pub unrealized_pnl: Decimal,
    /// Balance available for new orders
    pub available_balance: Decimal,
}

/// Account-wide totals plus the assets with a non-zero wallet balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Total wallet balance
    pub total_wallet_balance: Decimal,
    /// Balance available for new orders
    pub available_balance: Decimal,
    /// Total unrealized profit and loss
    pub total_unrealized_pnl: Decimal,
    /// Wallet balance plus unrealized profit and loss
    pub total_margin_balance: Decimal,
    /// Per-asset balances
    pub assets: Vec<AssetBalance>,
}
