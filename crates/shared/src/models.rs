use alloy::primitives::U256;
use std::fmt;

/// Fractional digits used for every rendered amount in the report and summary
pub const DISPLAY_DECIMALS: u8 = 18;

/// Largest power of ten representable in a `U256`
const MAX_U256_POW10: u8 = 77;

// Token amounts
/// A raw on-chain integer balance paired with the token's decimals exponent.
/// The human-readable value is `raw / 10^decimals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::ZERO, decimals)
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_positive(&self) -> bool {
        !self.raw.is_zero()
    }

    /// Add another amount of the same token. Amounts with a different
    /// exponent are rejected rather than silently rescaled.
    pub fn checked_add(&self, other: &TokenAmount) -> Option<TokenAmount> {
        if self.decimals != other.decimals {
            return None;
        }
        self.raw
            .checked_add(other.raw)
            .map(|raw| TokenAmount::new(raw, self.decimals))
    }

    /// Render as `1,234.500000000000000000`: thousands separators in the
    /// integer part and exactly `DISPLAY_DECIMALS` fractional digits.
    /// Tokens with more than 18 decimals are rounded half-up.
    pub fn to_display_string(&self) -> String {
        let (whole, frac) = split_scaled(self.raw, self.decimals);
        format!(
            "{}.{:0>width$}",
            group_thousands(&whole.to_string()),
            frac.to_string(),
            width = DISPLAY_DECIMALS as usize
        )
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

fn pow10(exp: u8) -> U256 {
    U256::from(10u8).pow(U256::from(exp))
}

/// Split `raw / 10^decimals` into its integer part and an 18-digit fraction.
fn split_scaled(raw: U256, decimals: u8) -> (U256, U256) {
    if decimals <= DISPLAY_DECIMALS {
        let unit = pow10(decimals);
        let frac = (raw % unit) * pow10(DISPLAY_DECIMALS - decimals);
        return (raw / unit, frac);
    }

    let excess = decimals - DISPLAY_DECIMALS;
    let scaled = if excess > MAX_U256_POW10 {
        // 10^excess exceeds any U256, so the value rounds to zero
        U256::ZERO
    } else {
        let divisor = pow10(excess);
        let quotient = raw / divisor;
        let remainder = raw % divisor;
        if remainder >= divisor - remainder {
            quotient + U256::from(1u8)
        } else {
            quotient
        }
    };

    let display_scale = pow10(DISPLAY_DECIMALS);
    (scaled / display_scale, scaled % display_scale)
}

/// Insert `,` every three digits from the right of an unsigned integer string.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// Per-address results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidAddress,
    BalanceRetrievalFailed,
}

impl FailureReason {
    /// Status text written in place of a value in the report
    pub fn report_label(&self) -> &'static str {
        match self {
            FailureReason::InvalidAddress => "Invalid address",
            FailureReason::BalanceRetrievalFailed => "Failed to retrieve balance",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            FailureReason::InvalidAddress => "invalid address",
            FailureReason::BalanceRetrievalFailed => "balance retrieval failed",
        }
    }
}

/// Outcome for one input line, produced exactly once and in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressResult {
    Success {
        /// EIP-55 checksum rendering of the address
        address: String,
        amount: TokenAmount,
    },
    Failure {
        /// Checksum address when the input parsed, otherwise the trimmed input
        address: String,
        reason: FailureReason,
    },
}

impl AddressResult {
    /// The `<address> | <value-or-status>` line written to the report
    pub fn report_row(&self) -> String {
        match self {
            AddressResult::Success { address, amount } => format!("{} | {}", address, amount),
            AddressResult::Failure { address, reason } => {
                format!("{} | {}", address, reason.report_label())
            }
        }
    }
}

// Run summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_addresses: usize,
    pub addresses_with_tokens: usize,
    pub total_tokens: TokenAmount,
}

impl RunSummary {
    pub fn new(decimals: u8) -> Self {
        Self {
            total_addresses: 0,
            addresses_with_tokens: 0,
            total_tokens: TokenAmount::zero(decimals),
        }
    }

    /// Fold one address result into the running totals. Failures count
    /// towards `total_addresses` only.
    pub fn record(&mut self, result: &AddressResult) {
        self.total_addresses += 1;

        if let AddressResult::Success { amount, .. } = result {
            if amount.is_positive() {
                self.addresses_with_tokens += 1;
            }
            self.total_tokens = self.total_tokens.checked_add(amount).unwrap_or_else(|| {
                TokenAmount::new(U256::MAX, self.total_tokens.decimals())
            });
        }
    }
}
