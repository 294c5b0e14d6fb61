//! Basis-point arithmetic.
//!
//! Loss limits on vault withdrawals are expressed in basis points, where
//! [`MAX_BPS`] (10,000) is 100%.

use ethereum_types::U256;

use crate::convert::mul_div;
use crate::{Result, ShareError};

/// 100% in basis points.
pub const MAX_BPS: u16 = 10_000;

/// Check that `bps` does not exceed [`MAX_BPS`].
///
/// # Errors
///
/// - [`ShareError::BpsOutOfRange`] if `bps > MAX_BPS`
pub fn validate_bps(bps: u16) -> Result<u16> {
    if bps > MAX_BPS {
        return Err(ShareError::BpsOutOfRange { bps, max: MAX_BPS });
    }
    Ok(bps)
}

/// Return `floor(amount * bps / MAX_BPS)`.
///
/// # Errors
///
/// - [`ShareError::BpsOutOfRange`] if `bps > MAX_BPS`
pub fn bps_of(amount: U256, bps: u16) -> Result<U256> {
    validate_bps(bps)?;
    mul_div(amount, U256::from(bps), U256::from(MAX_BPS), "max bps")
}
