//! Display-only currency conversions. Balances are always held in USD; nothing
//! in here touches an account. Every conversion returns `None` when the result
//! does not fit in a `Decimal`.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use thiserror::Error;

pub const USD_TO_EUR: Decimal = dec!(0.79);
pub const USD_TO_YEN: Decimal = dec!(94.1);

/// Digits kept when converting back to USD.
pub const USD_DIGITS: u32 = 2;

pub fn usd_to_eur(amount: Decimal) -> Option<Decimal> {
    amount.checked_mul(USD_TO_EUR)
}

pub fn usd_to_yen(amount: Decimal) -> Option<Decimal> {
    amount.checked_mul(USD_TO_YEN)
}

pub fn eur_to_usd(amount: Decimal) -> Option<Decimal> {
    to_usd(amount, USD_TO_EUR)
}

pub fn yen_to_usd(amount: Decimal) -> Option<Decimal> {
    to_usd(amount, USD_TO_YEN)
}

// Half-up to cents, with two fractional digits whenever they fit.
fn to_usd(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    let mut usd = amount
        .checked_div(rate)?
        .round_dp_with_strategy(USD_DIGITS, RoundingStrategy::MidpointAwayFromZero);
    usd.rescale(USD_DIGITS);
    Some(usd)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Jpy,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Jpy => "¥",
        }
    }

    pub fn from_usd(self, amount: Decimal) -> Option<Decimal> {
        match self {
            Currency::Usd => Some(amount),
            Currency::Eur => usd_to_eur(amount),
            Currency::Jpy => usd_to_yen(amount),
        }
    }

    /// Formats a USD amount in this currency: symbol, then at most two
    /// fractional digits (half-even), trailing zeros dropped.
    pub fn display(self, amount: Decimal) -> Option<String> {
        let converted = self.from_usd(amount)?.round_dp(USD_DIGITS).normalize();
        Some(format!("{}{converted}", self.symbol()))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown currency {0:?} (expected usd, eur or jpy)")]
pub struct UnknownCurrency(String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "usd" | "$" => Ok(Currency::Usd),
            "eur" | "€" => Ok(Currency::Eur),
            "jpy" | "yen" | "¥" => Ok(Currency::Jpy),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Jpy => "JPY",
        };
        f.write_str(code)
    }
}
