use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Context;
use rust_decimal::Decimal;

use crate::features::{AccountClass, AccountRef, Customer, NewAccount};

/// One-pass interactive driver: reads a single top-level action, applies it
/// to the customer, and returns. Generic over reader/writer so whole sessions
/// are scriptable in tests; invalid user input aborts the action with a
/// message rather than an error.
pub(crate) struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub(crate) fn run(&mut self, customer: &mut Customer, date: &str) -> anyhow::Result<()> {
        writeln!(self.output, "Name: {}", customer.name())?;
        writeln!(self.output, "ID: {}", customer.id())?;
        writeln!(self.output)?;

        writeln!(self.output, "Choose function:")?;
        writeln!(self.output, "1. Open new account")?;
        writeln!(self.output, "2. Deposit")?;
        writeln!(self.output, "3. Withdraw")?;
        writeln!(self.output, "4. Transfer")?;
        writeln!(self.output, "5. Show total balances")?;
        writeln!(self.output, "6. Compare 2 accounts")?;
        let choice = self.prompt_parse::<u32>("Choose: ")?;
        writeln!(self.output, "======================")?;

        info!("customer {}: menu choice {:?}", customer.id(), choice);

        match choice {
            Some(1) => self.open_new_account(customer),
            Some(2) => self.deposit(customer, date),
            Some(3) => self.withdraw(customer, date),
            Some(4) => self.transfer(customer, date),
            Some(5) => self.show_total_balances(customer),
            Some(6) => self.compare_accounts(customer),
            _ => self.invalid(),
        }
    }

    fn open_new_account(&mut self, customer: &mut Customer) -> anyhow::Result<()> {
        let kind = self.prompt("Enter account type (Regular / Savings): ")?;
        let request = match kind.as_str() {
            "Regular" => {
                let number = self.prompt("Enter account number: ")?;
                let owner_name = self.prompt("Enter owner name: ")?;
                NewAccount::Regular { number, owner_name }
            }
            "Savings" => {
                let number = self.prompt("Enter account number: ")?;
                let owner_name = self.prompt("Enter owner name: ")?;
                let interest_rate = match self.prompt_parse::<Decimal>("Enter interest rate: ")? {
                    Some(rate) => rate,
                    None => return self.invalid(),
                };
                NewAccount::Savings {
                    number,
                    owner_name,
                    interest_rate,
                }
            }
            _ => return self.invalid(),
        };

        let slot = customer.open_new_account(request);
        let record = customer.record(slot)?;
        info!("opened account {} for {}", record.number(), record.owner_name());

        writeln!(self.output, "Open new account successful!")?;
        writeln!(self.output)?;
        writeln!(self.output, "{}", record.balance_inquiry())?;
        Ok(())
    }

    fn deposit(&mut self, customer: &mut Customer, date: &str) -> anyhow::Result<()> {
        let target = match self.choose_account(customer, "Choose type of account:")? {
            Some(slot) => slot,
            None => return Ok(()),
        };
        let amount = match self.prompt_parse::<Decimal>("Enter the amount you want to deposit: ")? {
            Some(amount) => amount,
            None => return self.invalid(),
        };

        let outcome = match target.class {
            AccountClass::Regular => customer.regular_accounts[target.index].deposit(amount, date),
            AccountClass::Savings => customer.savings_accounts[target.index].deposit(amount, date),
        };

        match outcome {
            Ok(()) => {
                writeln!(self.output, "Deposit successful!")?;
                writeln!(self.output, "{}", customer.record(target)?.balance_inquiry())?;
            }
            Err(e) => {
                warn!("deposit rejected: {e}");
                writeln!(self.output, "{e}")?;
            }
        }
        Ok(())
    }

    fn withdraw(&mut self, customer: &mut Customer, date: &str) -> anyhow::Result<()> {
        let target = match self.choose_account(customer, "Choose type of account:")? {
            Some(slot) => slot,
            None => return Ok(()),
        };
        let amount = match self.prompt_parse::<Decimal>("Enter the amount you want to withdraw: ")? {
            Some(amount) => amount,
            None => return self.invalid(),
        };

        match target.class {
            AccountClass::Regular => {
                match customer.regular_accounts[target.index].withdraw(amount, date) {
                    Ok(()) => {
                        writeln!(self.output, "Withdraw successful")?;
                        writeln!(self.output, "{}", customer.record(target)?.balance_inquiry())?;
                    }
                    Err(e) => {
                        warn!("withdraw rejected: {e}");
                        writeln!(self.output, "{e}")?;
                    }
                }
            }
            AccountClass::Savings => {
                let before = customer.savings_accounts[target.index].balance();
                writeln!(
                    self.output,
                    "Current balance (before interest): {} VND",
                    before.normalize()
                )?;

                let (credit, outcome) =
                    customer.savings_accounts[target.index].withdraw(amount, date);
                writeln!(self.output, "Interest added: {} VND", credit.credited.normalize())?;
                writeln!(
                    self.output,
                    "Balance after interest: {} VND",
                    credit.balance_after.normalize()
                )?;

                match outcome {
                    Ok(()) => {
                        writeln!(self.output, "Withdraw successful")?;
                        writeln!(self.output, "{}", customer.record(target)?.balance_inquiry())?;
                    }
                    Err(e) => {
                        warn!("savings withdraw rejected: {e}");
                        writeln!(self.output, "{e}")?;
                    }
                }
            }
        }
        Ok(())
    }

    fn transfer(&mut self, customer: &mut Customer, date: &str) -> anyhow::Result<()> {
        let source = match self.choose_account(customer, "Choose type of source account:")? {
            Some(slot) => slot,
            None => return Ok(()),
        };
        let dest = match self.choose_destination(customer, source)? {
            Some(slot) => slot,
            None => return Ok(()),
        };
        let amount = match self.prompt_parse::<Decimal>("Enter amount of money you want to transfer: ")? {
            Some(amount) => amount,
            None => return self.invalid(),
        };

        match customer.transfer(source, dest, amount, date) {
            Ok(()) => {
                writeln!(self.output, "Transfer successful!")?;
                writeln!(self.output)?;
                writeln!(self.output, "{}", customer.record(dest)?.balance_inquiry())?;
            }
            Err(e) => {
                warn!("transfer rejected: {e}");
                writeln!(self.output, "{e}")?;
            }
        }
        Ok(())
    }

    fn show_total_balances(&mut self, customer: &Customer) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "Total Balance: {}",
            customer.total_balance().normalize()
        )?;

        writeln!(self.output, "Regular Accounts:")?;
        for account in &customer.regular_accounts {
            writeln!(self.output, "{}", account.balance_inquiry())?;
            writeln!(self.output)?;
        }

        writeln!(self.output, "Savings Accounts:")?;
        for account in &customer.savings_accounts {
            writeln!(self.output, "{}", account.record().balance_inquiry())?;
            writeln!(self.output)?;
        }
        Ok(())
    }

    fn compare_accounts(&mut self, customer: &Customer) -> anyhow::Result<()> {
        let first = match self.choose_account(customer, "Choose type of source account:")? {
            Some(slot) => slot,
            None => return Ok(()),
        };
        let second = match self.choose_destination(customer, first)? {
            Some(slot) => slot,
            None => return Ok(()),
        };

        if customer.compare_accounts(first, second)? {
            writeln!(self.output, "The two accounts have the same balance")?;
        } else {
            writeln!(self.output, "The two accounts don't have the same balance")?;
        }
        Ok(())
    }

    /// Class menu followed by the account-number menu. `None` means the
    /// selection was aborted and a message has already been written.
    fn choose_account(
        &mut self,
        customer: &Customer,
        heading: &str,
    ) -> anyhow::Result<Option<AccountRef>> {
        writeln!(self.output, "{heading}")?;
        let class = match self.choose_class(&customer.available_classes())? {
            Some(class) => class,
            None => return Ok(None),
        };

        let candidates: Vec<usize> = (0..customer.class_len(class)).collect();
        let index = match self.choose_from(customer, class, &candidates)? {
            Some(index) => index,
            None => return Ok(None),
        };
        Ok(Some(AccountRef::new(class, index)))
    }

    /// Destination selection out of `source`: the candidate lists exclude the
    /// source slot by index, which also relabels the class menu when the
    /// source's own class has no other account left.
    fn choose_destination(
        &mut self,
        customer: &Customer,
        source: AccountRef,
    ) -> anyhow::Result<Option<AccountRef>> {
        writeln!(self.output, "Choose type of destination account:")?;
        let classes = customer.destination_classes(source);
        if classes.is_empty() {
            writeln!(self.output, "No destination accounts are available!")?;
            return Ok(None);
        }

        let class = match self.choose_class(&classes)? {
            Some(class) => class,
            None => return Ok(None),
        };

        let candidates = customer.destination_candidates(source, class);
        let index = match self.choose_from(customer, class, &candidates)? {
            Some(index) => index,
            None => return Ok(None),
        };
        Ok(Some(AccountRef::new(class, index)))
    }

    fn choose_class(&mut self, classes: &[AccountClass]) -> anyhow::Result<Option<AccountClass>> {
        for (position, class) in classes.iter().enumerate() {
            writeln!(self.output, "{}. {}", position + 1, class)?;
        }
        let choice = match self.prompt_parse::<usize>("Choose: ")? {
            Some(choice) => choice,
            None => return self.invalid().map(|_| None),
        };
        writeln!(self.output)?;

        match choice.checked_sub(1).and_then(|i| classes.get(i)) {
            Some(&class) => Ok(Some(class)),
            None => self.invalid().map(|_| None),
        }
    }

    /// Account-number pick over an explicit candidate list of actual indices;
    /// the displayed labels are 1-based positions in that list.
    fn choose_from(
        &mut self,
        customer: &Customer,
        class: AccountClass,
        candidates: &[usize],
    ) -> anyhow::Result<Option<usize>> {
        writeln!(self.output, "Choose one of account numbers below:")?;
        for (position, &index) in candidates.iter().enumerate() {
            let number = customer.record(AccountRef::new(class, index))?.number();
            writeln!(self.output, "{}. {}", position + 1, number)?;
        }
        let choice = match self.prompt_parse::<usize>("Choose: ")? {
            Some(choice) => choice,
            None => return self.invalid().map(|_| None),
        };
        writeln!(self.output)?;

        match choice.checked_sub(1).and_then(|i| candidates.get(i)) {
            Some(&index) => Ok(Some(index)),
            None => self.invalid().map(|_| None),
        }
    }

    fn prompt(&mut self, text: &str) -> anyhow::Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("failed to read from input")?;
        Ok(line.trim().to_string())
    }

    /// `None` when the entry does not parse; there is no retry.
    fn prompt_parse<T: FromStr>(&mut self, text: &str) -> anyhow::Result<Option<T>> {
        Ok(self.prompt(text)?.parse().ok())
    }

    fn invalid(&mut self) -> anyhow::Result<()> {
        warn!("aborting action: invalid input");
        writeln!(self.output, "Invalid")?;
        Ok(())
    }
}
