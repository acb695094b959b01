//! Balance Ledger
//!
//! Account balances with atomic, all-or-nothing transfers. Hosts supply
//! their own bank; [`MemoryLedger`] backs tests and the demo.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::{AccountId, Coins};

/// Ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Source account cannot cover the amount.
    #[error("insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        /// Paying account.
        account: AccountId,
        /// Requested amount.
        required: Coins,
        /// Balance at the time of the request.
        available: Coins,
    },

    /// Amount is empty or carries a malformed denom.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Receiving balance would overflow.
    #[error("balance overflow in {account}")]
    Overflow {
        /// Receiving account.
        account: AccountId,
    },
}

/// Account-balance store.
pub trait Ledger {
    /// Current balance of `account`.
    fn balance(&self, account: &AccountId) -> Coins;

    /// Move `amount` from `from` to `to`.
    ///
    /// Either both balances change or neither does.
    fn send_coins(&mut self, from: &AccountId, to: &AccountId, amount: &Coins) -> Result<(), LedgerError>;
}

impl<L: Ledger + ?Sized> Ledger for &mut L {
    fn balance(&self, account: &AccountId) -> Coins {
        (**self).balance(account)
    }

    fn send_coins(&mut self, from: &AccountId, to: &AccountId, amount: &Coins) -> Result<(), LedgerError> {
        (**self).send_coins(from, to, amount)
    }
}

/// In-memory ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: BTreeMap<AccountId, Coins>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into `account` (genesis funding).
    pub fn credit(&mut self, account: AccountId, amount: &Coins) -> Result<(), LedgerError> {
        let current = self.balance(&account);
        let updated = current
            .checked_add(amount)
            .ok_or(LedgerError::Overflow { account })?;
        self.store_balance(account, updated);
        Ok(())
    }

    /// Builder-style funding for tests.
    pub fn with_balance(mut self, account: AccountId, amount: Coins) -> Self {
        self.balances.insert(account, amount);
        self
    }

    /// Sum of all balances in one denom.
    pub fn total_supply(&self, denom: &str) -> u128 {
        self.balances.values().map(|c| c.amount_of(denom)).sum()
    }

    fn store_balance(&mut self, account: AccountId, coins: Coins) {
        if coins.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, coins);
        }
    }
}

impl Ledger for MemoryLedger {
    fn balance(&self, account: &AccountId) -> Coins {
        self.balances.get(account).cloned().unwrap_or_default()
    }

    fn send_coins(&mut self, from: &AccountId, to: &AccountId, amount: &Coins) -> Result<(), LedgerError> {
        if !amount.is_positive() || !amount.has_valid_denoms() {
            return Err(LedgerError::InvalidAmount(amount.to_string()));
        }

        let available = self.balance(from);
        let from_after = available
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientFunds {
                account: *from,
                required: amount.clone(),
                available: available.clone(),
            })?;

        if from == to {
            return Ok(());
        }

        let to_after = self
            .balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow { account: *to })?;

        // Both sides computed; commit together
        self.store_balance(*from, from_after);
        self.store_balance(*to, to_after);

        debug!(from = %from.short(), to = %to.short(), amount = %amount, "Coins transferred");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    #[test]
    fn test_transfer_moves_balance() {
        let a = AccountId::from_label("a");
        let b = AccountId::from_label("b");
        let mut ledger = MemoryLedger::new().with_balance(a, coins("100token"));

        ledger.send_coins(&a, &b, &coins("30token")).unwrap();

        assert_eq!(ledger.balance(&a), coins("70token"));
        assert_eq!(ledger.balance(&b), coins("30token"));
        assert_eq!(ledger.total_supply("token"), 100);
    }

    #[test]
    fn test_insufficient_funds_is_atomic() {
        let a = AccountId::from_label("a");
        let b = AccountId::from_label("b");
        let mut ledger = MemoryLedger::new().with_balance(a, coins("100token"));

        // One denom is covered, the other is not: nothing moves
        let err = ledger.send_coins(&a, &b, &coins("10token,1stake")).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(ledger.balance(&a), coins("100token"));
        assert!(ledger.balance(&b).is_zero());
    }

    #[test]
    fn test_rejects_empty_amount() {
        let a = AccountId::from_label("a");
        let b = AccountId::from_label("b");
        let mut ledger = MemoryLedger::new().with_balance(a, coins("100token"));

        assert!(matches!(
            ledger.send_coins(&a, &b, &Coins::new()),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_receiver_overflow_is_atomic() {
        let a = AccountId::from_label("a");
        let b = AccountId::from_label("b");
        let mut ledger = MemoryLedger::new()
            .with_balance(a, coins("10token"))
            .with_balance(b, Coins::single("token", u128::MAX));

        assert_eq!(
            ledger.send_coins(&a, &b, &coins("1token")),
            Err(LedgerError::Overflow { account: b })
        );
        assert_eq!(ledger.balance(&a), coins("10token"));
    }

    #[test]
    fn test_credit_and_self_transfer() {
        let a = AccountId::from_label("a");
        let mut ledger = MemoryLedger::new();
        ledger.credit(a, &coins("5token")).unwrap();
        ledger.credit(a, &coins("5token")).unwrap();
        ledger.send_coins(&a, &a, &coins("10token")).unwrap();
        assert_eq!(ledger.balance(&a), coins("10token"));
    }
}
