//! Shared primitive types used across the calculator.

use crate::error::{ReimburseError, ReimburseResult};
use serde::Serialize;

/// Trip duration in whole days.
pub type Days = u32;

/// One reimbursement request. Construct through [`TripInput::new`] so the
/// arithmetic below never sees a zero day count or a negative amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripInput {
    pub days:     Days,
    pub miles:    f64,
    pub receipts: f64,
}

impl TripInput {
    pub fn new(days: i64, miles: f64, receipts: f64) -> ReimburseResult<Self> {
        if days < 1 {
            return Err(ReimburseError::InvalidInput {
                field:  "days",
                reason: format!("must be at least 1, got {days}"),
            });
        }
        let days = Days::try_from(days).map_err(|_| ReimburseError::InvalidInput {
            field:  "days",
            reason: format!("{days} is out of range"),
        })?;
        check_amount("miles", miles)?;
        check_amount("receipts", receipts)?;
        Ok(Self { days, miles, receipts })
    }

    pub fn days_f64(&self) -> f64 {
        f64::from(self.days)
    }

    pub fn miles_per_day(&self) -> f64 {
        self.miles / self.days_f64()
    }

    pub fn receipts_per_day(&self) -> f64 {
        self.receipts / self.days_f64()
    }
}

fn check_amount(field: &'static str, value: f64) -> ReimburseResult<()> {
    if !value.is_finite() {
        return Err(ReimburseError::InvalidInput {
            field,
            reason: format!("must be a finite number, got {value}"),
        });
    }
    if value < 0.0 {
        return Err(ReimburseError::InvalidInput {
            field,
            reason: format!("must not be negative, got {value}"),
        });
    }
    Ok(())
}

/// Round to cent precision on the exact decimal value of `amount`.
///
/// Ties (only reachable when the binary value is exactly half a cent) go
/// to the even cent. Scaling by 100 first would round the product instead
/// and can carry a value sitting just below a half cent over the edge.
pub fn round_cents(amount: f64) -> f64 {
    if !amount.is_finite() {
        return amount;
    }
    // `{:.2}` formats from the exact binary expansion.
    format!("{amount:.2}").parse().unwrap_or(amount)
}
