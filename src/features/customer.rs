use std::fmt;

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use super::account::{Account, AccountError, AccountResult, SavingsAccount};

/// Which of the customer's two account collections a selection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountClass {
    Regular,
    Savings,
}

impl AccountClass {
    fn other(self) -> Self {
        match self {
            AccountClass::Regular => AccountClass::Savings,
            AccountClass::Savings => AccountClass::Regular,
        }
    }
}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccountClass::Regular => "Regular",
            AccountClass::Savings => "Savings",
        })
    }
}

/// One slot in one of the two collections, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRef {
    pub(crate) class: AccountClass,
    pub(crate) index: usize,
}

impl AccountRef {
    pub(crate) fn new(class: AccountClass, index: usize) -> Self {
        Self { class, index }
    }
}

/// Inputs for opening an account, gathered in full before any mutation.
pub(crate) enum NewAccount {
    Regular {
        number: String,
        owner_name: String,
    },
    Savings {
        number: String,
        owner_name: String,
        interest_rate: Decimal,
    },
}

/// Owns the customer's accounts and routes the aggregate operations: opening
/// accounts, balance totals, transfers, and balance comparison. Accounts are
/// created here (or seeded) and never deleted.
pub struct Customer {
    name: String,
    id: String,
    pub(crate) regular_accounts: Vec<Account>,
    pub(crate) savings_accounts: Vec<SavingsAccount>,
}

impl Customer {
    pub(crate) fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        regular_accounts: Vec<Account>,
        savings_accounts: Vec<SavingsAccount>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            regular_accounts,
            savings_accounts,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    /// Creates the account with zero balance and empty history and appends it
    /// to the matching collection. Account numbers are not checked for
    /// uniqueness.
    pub(crate) fn open_new_account(&mut self, request: NewAccount) -> AccountRef {
        match request {
            NewAccount::Regular { number, owner_name } => {
                self.regular_accounts.push(Account::new(number, owner_name));
                AccountRef::new(AccountClass::Regular, self.regular_accounts.len() - 1)
            }
            NewAccount::Savings {
                number,
                owner_name,
                interest_rate,
            } => {
                debug!("opening savings account at {interest_rate}%");
                self.savings_accounts
                    .push(SavingsAccount::new(number, owner_name, interest_rate));
                AccountRef::new(AccountClass::Savings, self.savings_accounts.len() - 1)
            }
        }
    }

    /// Sum of balances across both collections.
    pub(crate) fn total_balance(&self) -> Decimal {
        let regular: Decimal = self.regular_accounts.iter().map(Account::balance).sum();
        let savings: Decimal = self.savings_accounts.iter().map(SavingsAccount::balance).sum();
        regular + savings
    }

    pub(crate) fn class_len(&self, class: AccountClass) -> usize {
        match class {
            AccountClass::Regular => self.regular_accounts.len(),
            AccountClass::Savings => self.savings_accounts.len(),
        }
    }

    /// Read-only record behind a slot; savings accounts resolve to their
    /// embedded record.
    pub(crate) fn record(&self, slot: AccountRef) -> AccountResult<&Account> {
        let record = match slot.class {
            AccountClass::Regular => self.regular_accounts.get(slot.index),
            AccountClass::Savings => self.savings_accounts.get(slot.index).map(SavingsAccount::record),
        };

        record.ok_or(AccountError::NoSuchAccount {
            class: slot.class,
            index: slot.index,
        })
    }

    /// The classes offered by a source-selection menu, in display order:
    /// Regular first when present, then Savings. The 1-based menu labels are
    /// positions in this list, so a customer holding only one kind gets that
    /// kind as the sole choice under label "1".
    pub(crate) fn available_classes(&self) -> Vec<AccountClass> {
        let mut classes = Vec::new();
        if !self.regular_accounts.is_empty() {
            classes.push(AccountClass::Regular);
        }
        if !self.savings_accounts.is_empty() {
            classes.push(AccountClass::Savings);
        }
        classes
    }

    /// The classes offered as transfer/comparison destinations out of
    /// `source`. The source's own class is listed first while it still has
    /// candidates once the source slot is excluded; an empty result means no
    /// destination exists at all.
    pub(crate) fn destination_classes(&self, source: AccountRef) -> Vec<AccountClass> {
        let mut classes = Vec::new();
        if !self.destination_candidates(source, source.class).is_empty() {
            classes.push(source.class);
        }
        let other = source.class.other();
        if self.class_len(other) > 0 {
            classes.push(other);
        }
        classes
    }

    /// Actual indices offered as destinations in `class`. The source slot is
    /// excluded by index, not identity, when the class is its own.
    pub(crate) fn destination_candidates(
        &self,
        source: AccountRef,
        class: AccountClass,
    ) -> Vec<usize> {
        (0..self.class_len(class))
            .filter(|&index| !(class == source.class && index == source.index))
            .collect()
    }

    /// Moves `amount` from `source` to `dest`, recording a `-amount` transfer
    /// entry on the source and a `+amount` entry on the destination. Savings
    /// rules do not apply here: no interest accrues and the minimum balance
    /// is not checked.
    pub(crate) fn transfer(
        &mut self,
        source: AccountRef,
        dest: AccountRef,
        amount: Decimal,
        date: &str,
    ) -> AccountResult<()> {
        let available = self.record(source)?.balance();
        self.record(dest)?;

        if source == dest {
            return Err(AccountError::SelfTransfer);
        }
        if amount <= dec!(0) {
            return Err(AccountError::InvalidAmount(amount));
        }
        if amount > available {
            return Err(AccountError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        self.apply_leg(source, -amount, date);
        self.apply_leg(dest, amount, date);
        Ok(())
    }

    fn apply_leg(&mut self, slot: AccountRef, signed_amount: Decimal, date: &str) {
        match slot.class {
            AccountClass::Regular => {
                self.regular_accounts[slot.index].apply_transfer(signed_amount, date)
            }
            AccountClass::Savings => {
                self.savings_accounts[slot.index].apply_transfer(signed_amount, date)
            }
        }
    }

    /// Equal iff the two balances are exactly equal.
    pub(crate) fn compare_accounts(
        &self,
        first: AccountRef,
        second: AccountRef,
    ) -> AccountResult<bool> {
        Ok(self.record(first)?.has_same_balance(self.record(second)?))
    }
}
