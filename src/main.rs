use std::io;
use std::process;
#[macro_use]
extern crate log;

mod features;
mod menu;

use clap::Parser;
use rust_decimal_macros::dec;

use features::{Account, Customer, SavingsAccount, Transaction, TransactionKind};
use menu::Menu;

#[derive(Parser, Debug)]
#[clap(name = "bank-ledger", version, about = "Single-pass interactive bank account ledger")]
struct Cli {
    /// Date stamped on transactions recorded this run (d/m/yyyy)
    #[clap(long, default_value = "16/9/2025")]
    date: String,
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut customer = seed_customer();

    let prior_transactions: usize = customer
        .regular_accounts
        .iter()
        .map(|account| account.history().len())
        .sum::<usize>()
        + customer
            .savings_accounts
            .iter()
            .map(|account| account.record().history().len())
            .sum::<usize>();
    info!(
        "seeded customer {} ({} regular / {} savings accounts, {} prior transactions)",
        customer.id(),
        customer.regular_accounts.len(),
        customer.savings_accounts.len(),
        prior_transactions
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(stdin.lock(), stdout.lock());
    menu.run(&mut customer, &cli.date)
}

fn seed_customer() -> Customer {
    let acc_history1 = vec![
        Transaction::new(dec!(200_000), TransactionKind::Deposit, "01/09/2025"),
        Transaction::new(dec!(-50_000), TransactionKind::Withdraw, "05/09/2025"),
    ];
    let acc_history2 = vec![
        Transaction::new(dec!(100_000), TransactionKind::Deposit, "02/09/2025"),
        Transaction::new(dec!(-30_000), TransactionKind::Withdraw, "06/09/2025"),
    ];
    let sav_history1 = vec![
        Transaction::new(dec!(500_000), TransactionKind::Deposit, "03/09/2025"),
        Transaction::new(dec!(10_000), TransactionKind::Transfer, "10/09/2025"),
    ];
    let sav_history2 = vec![
        Transaction::new(dec!(700_000), TransactionKind::Deposit, "04/09/2025"),
        Transaction::new(dec!(12_000), TransactionKind::Withdraw, "11/09/2025"),
    ];

    Customer::new(
        "Nguyen Khanh Hung",
        "C001",
        vec![
            Account::with_history("ACC001", dec!(150_000), "Nguyen Khanh Hung", acc_history1),
            Account::with_history("ACC002", dec!(70_000), "Nguyen Khanh Hung", acc_history2),
        ],
        vec![
            SavingsAccount::with_history(
                "SAV001",
                dec!(510_000),
                "Nguyen Khanh Hung",
                dec!(5.0),
                sav_history1,
            ),
            SavingsAccount::with_history(
                "SAV002",
                dec!(712_000),
                "Nguyen Khanh Hung",
                dec!(4.5),
                sav_history2,
            ),
        ],
    )
}
