// 💰 Fee Account - per-student balance with a no-overpayment guarantee
//
// Two states:
//   outstanding  amount_paid <  total_due
//   settled      amount_paid >= total_due
//
// The only transition is make_payment(). amount_paid never decreases (no refunds)
// and never exceeds total_due. Amounts are Decimal.

use crate::error::RecordError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeState {
    Outstanding,
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredFeeAccount")]
pub struct FeeAccount {
    total_due: Decimal,
    amount_paid: Decimal,
}

/// Wire shape of a FeeAccount; converted through the same checks as new()
#[derive(Deserialize)]
struct StoredFeeAccount {
    total_due: Decimal,
    amount_paid: Decimal,
}

impl TryFrom<StoredFeeAccount> for FeeAccount {
    type Error = RecordError;

    fn try_from(stored: StoredFeeAccount) -> Result<Self, Self::Error> {
        let mut account = FeeAccount::new(stored.total_due)?;
        account.make_payment(stored.amount_paid)?;
        Ok(account)
    }
}

impl FeeAccount {
    /// Open an account with nothing paid yet.
    ///
    /// Rejects a negative total.
    pub fn new(total_due: Decimal) -> Result<Self, RecordError> {
        if total_due.is_sign_negative() && !total_due.is_zero() {
            return Err(RecordError::InvalidAmount { amount: total_due });
        }
        Ok(FeeAccount {
            total_due,
            amount_paid: Decimal::ZERO,
        })
    }

    pub fn total_due(&self) -> Decimal {
        self.total_due
    }

    pub fn amount_paid(&self) -> Decimal {
        self.amount_paid
    }

    /// Outstanding balance, recomputed on every call
    pub fn amount_due(&self) -> Decimal {
        self.total_due - self.amount_paid
    }

    pub fn is_settled(&self) -> bool {
        self.amount_paid >= self.total_due
    }

    pub fn state(&self) -> FeeState {
        if self.is_settled() {
            FeeState::Settled
        } else {
            FeeState::Outstanding
        }
    }

    /// Apply a payment.
    ///
    /// Accepted iff `amount_paid + amount <= total_due`; otherwise nothing changes.
    /// Returns the new amount paid.
    pub fn make_payment(&mut self, amount: Decimal) -> Result<Decimal, RecordError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(RecordError::InvalidAmount { amount });
        }
        let paid = self
            .amount_paid
            .checked_add(amount)
            .ok_or(RecordError::InvalidAmount { amount })?;
        if paid > self.total_due {
            return Err(RecordError::Overpayment {
                attempted: amount,
                outstanding: self.amount_due(),
            });
        }
        self.amount_paid = paid;
        Ok(paid)
    }

    /// Render the fee summary shown by "View Fees"
    pub fn fee_report(&self) -> String {
        format!(
            "Total Amount: ${}, Amount Paid: ${}\nAmount Due: ${}\n",
            self.total_due,
            self.amount_paid,
            self.amount_due()
        )
    }
}
