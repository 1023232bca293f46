mod account;
mod customer;
mod transaction;

pub use self::{
    account::{Account, SavingsAccount},
    customer::{AccountClass, AccountRef, Customer},
    transaction::{Transaction, TransactionKind},
};

pub(crate) use self::customer::NewAccount;
