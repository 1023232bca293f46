use std::fmt;
use std::ops::AddAssign;

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use thiserror::Error;

use super::customer::AccountClass;
use super::transaction::{Transaction, TransactionKind};

#[derive(Error, Debug)]
pub(crate) enum AccountError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Insufficient balance! You cannot move {requested} with {available} available")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("You must keep at least {min_balance} VND")]
    MinBalanceBreached { min_balance: Decimal },

    #[error("No account at position {index} in the {class} list")]
    NoSuchAccount { class: AccountClass, index: usize },

    #[error("Source and destination are the same account")]
    SelfTransfer,
}

pub(crate) type AccountResult<T> = anyhow::Result<T, AccountError>;

/// Balance-holding ledger entity. The history is append-only and insertion
/// order is chronological; `+=` with a [`Transaction`] is the only way to
/// extend it.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique within a customer, though uniqueness is not enforced.
    number: String,

    balance: Decimal,

    owner_name: String,

    history: Vec<Transaction>,
}

impl Account {
    /// A freshly opened account: zero balance, empty history.
    pub(crate) fn new(number: impl Into<String>, owner_name: impl Into<String>) -> Self {
        Self::with_history(number, dec!(0), owner_name, Vec::new())
    }

    pub(crate) fn with_history(
        number: impl Into<String>,
        balance: Decimal,
        owner_name: impl Into<String>,
        history: Vec<Transaction>,
    ) -> Self {
        Self {
            number: number.into(),
            balance,
            owner_name: owner_name.into(),
            history,
        }
    }

    pub(crate) fn number(&self) -> &str {
        &self.number
    }

    pub(crate) fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub(crate) fn balance(&self) -> Decimal {
        self.balance
    }

    pub(crate) fn history(&self) -> &[Transaction] {
        &self.history
    }

    /// Credits `amount` and records a [`TransactionKind::Deposit`] entry.
    /// Zero is accepted; only negative amounts are rejected.
    pub(crate) fn deposit(&mut self, amount: Decimal, date: &str) -> AccountResult<()> {
        if amount < dec!(0) {
            return Err(AccountError::InvalidAmount(amount));
        }

        self.balance += amount;
        *self += Transaction::new(amount, TransactionKind::Deposit, date);
        Ok(())
    }

    /// Debits `amount` and records a [`TransactionKind::Withdraw`] entry of
    /// `-amount`. The balance is untouched on rejection.
    pub(crate) fn withdraw(&mut self, amount: Decimal, date: &str) -> AccountResult<()> {
        if amount < dec!(0) {
            return Err(AccountError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        *self += Transaction::new(-amount, TransactionKind::Withdraw, date);
        Ok(())
    }

    /// One validated leg of a transfer: `signed_amount` lands on the balance
    /// and is recorded as a [`TransactionKind::Transfer`] entry. Validation is
    /// the caller's job; see `Customer::transfer`.
    pub(crate) fn apply_transfer(&mut self, signed_amount: Decimal, date: &str) {
        self.balance += signed_amount;
        *self += Transaction::new(signed_amount, TransactionKind::Transfer, date);
    }

    /// Read-only report of account number and current balance.
    pub(crate) fn balance_inquiry(&self) -> BalanceInquiry<'_> {
        BalanceInquiry {
            number: &self.number,
            balance: self.balance,
        }
    }

    /// Exact numeric comparison of the two balances, no tolerance.
    pub(crate) fn has_same_balance(&self, other: &Account) -> bool {
        self.balance == other.balance
    }
}

impl AddAssign<Transaction> for Account {
    fn add_assign(&mut self, transaction: Transaction) {
        debug!(
            "{}: {:?} of {} recorded on {}",
            self.number,
            transaction.kind(),
            transaction.amount(),
            transaction.date()
        );
        self.history.push(transaction);
    }
}

pub(crate) struct BalanceInquiry<'a> {
    number: &'a str,
    balance: Decimal,
}

impl fmt::Display for BalanceInquiry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account number: {}", self.number)?;
        write!(f, "Current balance: {} VND", self.balance.normalize())
    }
}

/// Account variant with interest accrual on withdrawal and an enforced
/// minimum balance. The shared balance/history record is the embedded
/// [`Account`]; only `withdraw` behaves differently.
#[derive(Debug, Clone)]
pub struct SavingsAccount {
    account: Account,

    /// Percentage applied to the whole balance on every withdrawal attempt.
    interest_rate: Decimal,
}

/// What a savings withdrawal did to the balance before the request itself was
/// accepted or rejected. Interest lands on every call, so the credit is
/// reported even when the withdrawal fails.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InterestCredit {
    pub(crate) credited: Decimal,
    pub(crate) balance_after: Decimal,
}

impl SavingsAccount {
    /// Every withdrawal must leave at least this much on the balance.
    pub(crate) const MIN_BALANCE: Decimal = dec!(100_000);

    pub(crate) fn new(
        number: impl Into<String>,
        owner_name: impl Into<String>,
        interest_rate: Decimal,
    ) -> Self {
        Self {
            account: Account::new(number, owner_name),
            interest_rate,
        }
    }

    pub(crate) fn with_history(
        number: impl Into<String>,
        balance: Decimal,
        owner_name: impl Into<String>,
        interest_rate: Decimal,
        history: Vec<Transaction>,
    ) -> Self {
        Self {
            account: Account::with_history(number, balance, owner_name, history),
            interest_rate,
        }
    }

    /// Read-only view of the shared balance/history record.
    pub(crate) fn record(&self) -> &Account {
        &self.account
    }

    pub(crate) fn balance(&self) -> Decimal {
        self.account.balance
    }

    pub(crate) fn deposit(&mut self, amount: Decimal, date: &str) -> AccountResult<()> {
        self.account.deposit(amount, date)
    }

    pub(crate) fn apply_transfer(&mut self, signed_amount: Decimal, date: &str) {
        self.account.apply_transfer(signed_amount, date);
    }

    /// Credits `balance * rate / 100` and returns the credited interest.
    /// The credit changes the balance only; nothing is recorded in the
    /// history.
    pub(crate) fn accrue_interest(&mut self) -> Decimal {
        let interest = self.account.balance * self.interest_rate / dec!(100);
        self.account.balance += interest;
        interest
    }

    /// The withdraw override. Interest accrues before the request is
    /// evaluated, so the balance moves even when the withdrawal is rejected;
    /// the returned [`InterestCredit`] reports that movement on both paths.
    /// A rejected request leaves the balance at the post-interest value.
    pub(crate) fn withdraw(
        &mut self,
        amount: Decimal,
        date: &str,
    ) -> (InterestCredit, AccountResult<()>) {
        let credited = self.accrue_interest();
        let credit = InterestCredit {
            credited,
            balance_after: self.account.balance,
        };

        (credit, self.withdraw_accrued(amount, date))
    }

    fn withdraw_accrued(&mut self, amount: Decimal, date: &str) -> AccountResult<()> {
        if amount <= dec!(0) {
            return Err(AccountError::InvalidAmount(amount));
        }
        if amount > self.account.balance - Self::MIN_BALANCE {
            return Err(AccountError::MinBalanceBreached {
                min_balance: Self::MIN_BALANCE,
            });
        }

        self.account.balance -= amount;
        self.account += Transaction::new(-amount, TransactionKind::Withdraw, date);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const DATE: &str = "16/9/2025";

    fn account(balance: Decimal) -> Account {
        Account::with_history("ACC001", balance, "Nguyen Khanh Hung", Vec::new())
    }

    fn savings(balance: Decimal, rate: Decimal) -> SavingsAccount {
        SavingsAccount::with_history("SAV001", balance, "Nguyen Khanh Hung", rate, Vec::new())
    }

    fn signed_sum(account: &Account) -> Decimal {
        account.history().iter().map(Transaction::amount).sum()
    }

    #[test]
    fn deposit_credits_balance_and_appends_history() {
        let mut account = account(dec!(150_000));

        account.deposit(dec!(200_000), DATE).unwrap();

        assert_eq!(account.balance(), dec!(350_000));
        assert_eq!(account.history().len(), 1);
        let entry = &account.history()[0];
        assert_eq!(entry.kind(), TransactionKind::Deposit);
        assert_eq!(entry.amount(), dec!(200_000));
        assert_eq!(entry.date(), DATE);
    }

    #[test]
    fn deposit_of_zero_is_accepted() {
        let mut account = account(dec!(100));

        account.deposit(dec!(0), DATE).unwrap();

        assert_eq!(account.balance(), dec!(100));
        assert_eq!(account.history().len(), 1);
    }

    #[test]
    fn negative_deposit_is_rejected_untouched() {
        let mut account = account(dec!(100));

        let err = account.deposit(dec!(-1), DATE).unwrap_err();

        assert!(matches!(err, AccountError::InvalidAmount(_)));
        assert_eq!(account.balance(), dec!(100));
        assert!(account.history().is_empty());
    }

    #[test_case(dec!(100), dec!(100) ; "entire balance")]
    #[test_case(dec!(100), dec!(40) ; "partial")]
    #[test_case(dec!(100), dec!(0) ; "zero")]
    fn withdraw_within_balance_succeeds(balance: Decimal, amount: Decimal) {
        let mut account = account(balance);

        account.withdraw(amount, DATE).unwrap();

        assert_eq!(account.balance(), balance - amount);
        let entry = &account.history()[0];
        assert_eq!(entry.kind(), TransactionKind::Withdraw);
        assert_eq!(entry.amount(), -amount);
    }

    #[test]
    fn overdrawing_is_rejected_untouched() {
        let mut account = account(dec!(100));

        let err = account.withdraw(dec!(100.01), DATE).unwrap_err();

        assert!(matches!(err, AccountError::InsufficientFunds { .. }));
        assert_eq!(account.balance(), dec!(100));
        assert!(account.history().is_empty());
    }

    #[test]
    fn negative_withdrawal_is_rejected() {
        let mut account = account(dec!(100));

        let err = account.withdraw(dec!(-5), DATE).unwrap_err();

        assert!(matches!(err, AccountError::InvalidAmount(_)));
        assert_eq!(account.balance(), dec!(100));
    }

    #[test]
    fn balance_tracks_signed_sum_of_history() {
        let mut account = account(dec!(0));

        account.deposit(dec!(500), DATE).unwrap();
        account.withdraw(dec!(120), DATE).unwrap();
        account.apply_transfer(dec!(-80), DATE);
        account.apply_transfer(dec!(200), DATE);

        assert_eq!(account.history().len(), 4);
        assert_eq!(account.balance(), signed_sum(&account));
    }

    #[test]
    fn savings_withdraw_accrues_interest_then_settles() {
        let mut account = savings(dec!(510_000), dec!(5.0));

        let (credit, outcome) = account.withdraw(dec!(100_000), DATE);

        outcome.unwrap();
        assert_eq!(credit.credited, dec!(25_500));
        assert_eq!(credit.balance_after, dec!(535_500));
        assert_eq!(account.balance(), dec!(435_500));
        let history = account.record().history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind(), TransactionKind::Withdraw);
        assert_eq!(history[0].amount(), dec!(-100_000));
    }

    #[test]
    fn savings_rejection_keeps_post_interest_balance() {
        let mut account = savings(dec!(200_000), dec!(5.0));

        // 10_000 interest lands first; 150_000 would breach the minimum
        let (credit, outcome) = account.withdraw(dec!(150_000), DATE);

        assert_eq!(credit.credited, dec!(10_000));
        assert_eq!(credit.balance_after, dec!(210_000));
        assert!(matches!(
            outcome.unwrap_err(),
            AccountError::MinBalanceBreached { .. }
        ));
        assert_eq!(account.balance(), dec!(210_000));
        assert!(account.record().history().is_empty());
    }

    #[test_case(dec!(0) ; "zero")]
    #[test_case(dec!(-50) ; "negative")]
    fn savings_withdraw_rejects_non_positive_amounts(amount: Decimal) {
        let mut account = savings(dec!(200_000), dec!(4.5));

        let (credit, outcome) = account.withdraw(amount, DATE);

        assert!(matches!(
            outcome.unwrap_err(),
            AccountError::InvalidAmount(_)
        ));
        // the interest credit still landed
        assert_eq!(account.balance(), dec!(200_000) + credit.credited);
        assert!(account.record().history().is_empty());
    }

    #[test]
    fn savings_withdraw_to_exact_minimum_is_allowed() {
        let mut account = savings(dec!(200_000), dec!(0));

        let (credit, outcome) = account.withdraw(dec!(100_000), DATE);

        assert_eq!(credit.credited, dec!(0));
        outcome.unwrap();
        assert_eq!(account.balance(), SavingsAccount::MIN_BALANCE);
    }

    #[test]
    fn interest_credit_is_never_recorded_in_history() {
        let mut account = savings(dec!(300_000), dec!(10));

        let interest = account.accrue_interest();

        assert_eq!(interest, dec!(30_000));
        assert_eq!(account.balance(), dec!(330_000));
        assert!(account.record().history().is_empty());
    }

    #[test]
    fn balance_comparison_is_exact_and_scale_blind() {
        let a = account(dec!(100.00));
        let b = account(dec!(100));
        let c = account(dec!(100.01));

        assert!(a.has_same_balance(&b));
        assert!(!a.has_same_balance(&c));
    }

    #[test]
    fn balance_inquiry_normalizes_trailing_zeros() {
        let report = account(dec!(535_500.00)).balance_inquiry().to_string();

        assert_eq!(
            report,
            "Account number: ACC001\nCurrent balance: 535500 VND"
        );
    }
}
