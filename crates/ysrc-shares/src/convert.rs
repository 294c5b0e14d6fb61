//! Token/share and token/yShare conversions.
//!
//! ## Internal shares
//!
//! ```text
//! total_supply == 0:  shares = amount                      (bootstrap rate)
//! otherwise:          shares = amount * total_supply / total_pooled_tokens
//!                     amount = shares * total_pooled_tokens / total_supply
//! ```
//!
//! ## Vault shares
//!
//! ```text
//! y_shares = amount * 10^decimals / price_per_y_share
//! amount   = y_shares * price_per_y_share / 10^decimals
//! ```
//!
//! Products are taken in 512 bits, so only a quotient that does not fit back
//! into 256 bits is reported as [`ShareError::Overflow`]. Every quotient is
//! floored, which means a deposit followed by a redemption can only lose
//! value to truncation, never gain it. The one exception is
//! [`token_to_shares_rounding_up`], which prices the shares burned on a
//! redemption so that the pool never pays out more than it takes back.

use ethereum_types::{U256, U512};

use crate::{Result, ShareError};

/// Compute `floor(a * b / denominator)` without intermediate overflow.
///
/// # Errors
///
/// - [`ShareError::DivisionByZero`] if `denominator` is zero
/// - [`ShareError::Overflow`] if the quotient exceeds `U256::MAX`
pub fn mul_div(a: U256, b: U256, denominator: U256, what: &'static str) -> Result<U256> {
    if denominator.is_zero() {
        return Err(ShareError::DivisionByZero(what));
    }
    let quotient: U512 = a.full_mul(b) / U512::from(denominator);
    U256::try_from(quotient).map_err(|_| ShareError::Overflow)
}

/// Compute `ceil(a * b / denominator)` without intermediate overflow.
///
/// # Errors
///
/// - [`ShareError::DivisionByZero`] if `denominator` is zero
/// - [`ShareError::Overflow`] if the quotient exceeds `U256::MAX`
pub fn mul_div_ceil(a: U256, b: U256, denominator: U256, what: &'static str) -> Result<U256> {
    if denominator.is_zero() {
        return Err(ShareError::DivisionByZero(what));
    }
    let product = a.full_mul(b);
    let denominator = U512::from(denominator);
    let mut quotient = product / denominator;
    if !(product % denominator).is_zero() {
        quotient += U512::one();
    }
    U256::try_from(quotient).map_err(|_| ShareError::Overflow)
}

/// Return `10^decimals` as a [`U256`].
///
/// # Errors
///
/// - [`ShareError::Overflow`] if `decimals` is larger than 77
pub fn scale(decimals: u8) -> Result<U256> {
    U256::from(10u8)
        .checked_pow(U256::from(decimals))
        .ok_or(ShareError::Overflow)
}

/// Convert a token amount into internal shares.
///
/// When no shares exist yet the bootstrap rate of one share per token unit
/// applies, whatever the pooled balance.
///
/// # Errors
///
/// - [`ShareError::DivisionByZero`] if shares exist but `total_pooled_tokens` is zero
/// - [`ShareError::Overflow`] if the result exceeds `U256::MAX`
///
/// # Examples
///
/// ```
/// use ysrc_shares::{convert::token_to_shares, U256};
///
/// let shares = token_to_shares(U256::from(500), U256::from(1000), U256::from(2000)).unwrap();
/// assert_eq!(shares, U256::from(250));
/// ```
pub fn token_to_shares(
    amount: U256,
    total_supply: U256,
    total_pooled_tokens: U256,
) -> Result<U256> {
    if total_supply.is_zero() {
        return Ok(amount);
    }
    let shares = mul_div(amount, total_supply, total_pooled_tokens, "pooled token balance")?;
    tracing::trace!(%amount, %shares, %total_supply, %total_pooled_tokens, "token to shares");
    Ok(shares)
}

/// Convert internal shares into a token amount.
///
/// # Errors
///
/// - [`ShareError::Overflow`] if the result exceeds `U256::MAX`
pub fn shares_to_token(
    shares: U256,
    total_supply: U256,
    total_pooled_tokens: U256,
) -> Result<U256> {
    if total_supply.is_zero() {
        return Ok(shares);
    }
    let amount = mul_div(shares, total_pooled_tokens, total_supply, "share supply")?;
    tracing::trace!(%shares, %amount, %total_supply, %total_pooled_tokens, "shares to token");
    Ok(amount)
}

/// Shares that must be burned to take `amount` tokens out of the pool.
///
/// Same as [`token_to_shares`] but rounded up, so any non-zero `amount`
/// against an existing supply costs at least one share.
///
/// # Errors
///
/// - [`ShareError::DivisionByZero`] if shares exist but `total_pooled_tokens` is zero
/// - [`ShareError::Overflow`] if the result exceeds `U256::MAX`
pub fn token_to_shares_rounding_up(
    amount: U256,
    total_supply: U256,
    total_pooled_tokens: U256,
) -> Result<U256> {
    if total_supply.is_zero() {
        return Ok(amount);
    }
    let shares = mul_div_ceil(amount, total_supply, total_pooled_tokens, "pooled token balance")?;
    tracing::trace!(
        %amount,
        %shares,
        %total_supply,
        %total_pooled_tokens,
        "token to shares, rounded up"
    );
    Ok(shares)
}

/// Convert a token amount into vault shares at the vault's price.
///
/// `price_per_y_share` is the token value of one whole vault share, scaled
/// by `10^decimals`.
///
/// # Errors
///
/// - [`ShareError::DivisionByZero`] if `price_per_y_share` is zero
/// - [`ShareError::Overflow`] if the result exceeds `U256::MAX`
pub fn token_to_y_shares(amount: U256, price_per_y_share: U256, decimals: u8) -> Result<U256> {
    mul_div(amount, scale(decimals)?, price_per_y_share, "price per share")
}

/// Convert vault shares into a token amount at the vault's price.
///
/// # Errors
///
/// - [`ShareError::Overflow`] if the result exceeds `U256::MAX`
pub fn y_shares_to_token(y_shares: U256, price_per_y_share: U256, decimals: u8) -> Result<U256> {
    mul_div(y_shares, price_per_y_share, scale(decimals)?, "decimals scale")
}
