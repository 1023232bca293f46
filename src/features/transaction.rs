use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// A credit to the account, recorded with a positive amount.
    Deposit,

    /// A debit from the account, recorded with a negative amount.
    Withdraw,

    /// One leg of a transfer between two accounts: negative on the source,
    /// positive on the destination.
    Transfer,
}

/// Immutable record of one ledger event. A transaction is owned by the account
/// whose history it sits in and is never edited after it has been appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Signed amount applied to the balance.
    amount: Decimal,

    kind: TransactionKind,

    /// d/m/yyyy stamp.
    date: String,
}

impl Transaction {
    pub(crate) fn new(amount: Decimal, kind: TransactionKind, date: impl Into<String>) -> Self {
        Self {
            amount,
            kind,
            date: date.into(),
        }
    }

    /// Get the transaction's signed amount.
    pub(crate) fn amount(&self) -> Decimal {
        self.amount
    }

    /// Get the transaction's kind.
    pub(crate) fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Get the transaction's date stamp.
    pub(crate) fn date(&self) -> &str {
        &self.date
    }
}
