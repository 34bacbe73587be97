use acct_mgr::{parse_amount, Account, AccountList, Currency, Model, ModelEvent};
use anyhow::{bail, Context};
use rust_decimal::Decimal;
use tracing::info;

const USAGE: &str = "accounts.txt [deposit|withdraw <id> <amount>] [--currency usd|eur|jpy]";

fn main() -> Result<(), anyhow::Error> {
    init_tracing();
    let mut args: Vec<String> = std::env::args().collect();
    let currency = match args.iter().position(|arg| arg == "--currency") {
        Some(index) => {
            let Some(value) = args.get(index + 1) else {
                bail!("--currency needs a value");
            };
            let currency = value.parse::<Currency>()?;
            args.drain(index..=index + 1);
            currency
        }
        None => Currency::default(),
    };

    let mut accounts = AccountList::new();
    accounts.add_model_listener(Box::new(|event: &ModelEvent| {
        info!(kind = ?event.kind, balance = %event.balance, "account views updated")
    }));

    match args.as_slice() {
        [_, path] => {
            accounts
                .load_accounts(path)
                .with_context(|| format!("Failed to load accounts from {path}"))?;
            for account in accounts.accounts() {
                println!("{account}: {}", show(currency, account.balance()));
            }
        }
        [_, path, command, id, amount] => {
            let amount = parse_amount(amount).with_context(|| format!("Invalid amount {amount:?}"))?;
            accounts
                .load_accounts(path)
                .with_context(|| format!("Failed to load accounts from {path}"))?;
            let account = accounts
                .account_mut(id)
                .with_context(|| format!("No account with id {id:?}"))?;
            account.add_listener(move |account: &Account| {
                println!("{account}: {}", show(currency, account.balance()))
            });
            match command.as_str() {
                "deposit" => {
                    account.deposit(amount)?;
                }
                "withdraw" => {
                    account.withdraw(amount)?;
                }
                _ => bail!("Unknown command {command:?} (expected deposit or withdraw)"),
            }
            accounts.update_account_views(id);
            accounts
                .save_accounts(path)
                .with_context(|| format!("Failed to save accounts to {path}"))?;
        }
        _ => {
            let program = args.first().map_or("acct-mgr", String::as_str);
            bail!("usage: {program} {USAGE}");
        }
    }
    Ok(())
}

fn show(currency: Currency, balance: Decimal) -> String {
    currency
        .display(balance)
        .unwrap_or_else(|| format!("{balance} USD (too large for {currency})"))
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("acct_mgr=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
