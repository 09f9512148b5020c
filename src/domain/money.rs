use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every stored amount carries.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest amount a single expense may carry (one billion).
/// Keeps every sum of stored amounts far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Round an amount half-up to two decimal places and fix its scale at two.
/// Example: 3.456 -> 3.46, 3.445 -> 3.45, 5 -> 5.00
/// Values too large to hold two decimals keep a smaller scale.
pub fn round_amount(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    rounded
}

/// Format an amount as a plain two-decimal string.
/// Example: 3.46 -> "3.46", 0 -> "0.00"
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_amount(amount))
}

/// Format an amount with a currency symbol in front.
/// Example: ("$", 3.46) -> "$3.46", ("$", -1) -> "-$1.00"
pub fn format_money(symbol: &str, amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-{}{}", symbol, format_amount(amount.abs()))
    } else {
        format!("{}{}", symbol, format_amount(amount))
    }
}

/// Parse user input into a decimal amount. A leading currency symbol and
/// surrounding whitespace are ignored; no rounding happens here.
/// Example: "3.456" -> 3.456, "$12" -> 12, ".5" -> 0.5
pub fn parse_amount(input: &str) -> Result<Decimal, ParseAmountError> {
    let input = input.trim();
    let input = input.strip_prefix('$').unwrap_or(input).trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    Decimal::from_str(input).map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is empty"),
            ParseAmountError::InvalidFormat(input) => write!(f, "invalid amount: {}", input),
        }
    }
}

impl std::error::Error for ParseAmountError {}
