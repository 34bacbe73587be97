use std::str::FromStr;

use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::warn;

use crate::{
    account::Account,
    data::{Error, RecordError},
};

/// Importer for `name,id,balance` lines. There is no header and no quoting:
/// every comma separates fields, and fields past the third are ignored.
///
/// Lines that cannot be turned into an account are logged and skipped, so the
/// only errors returned here come from the underlying reader.
pub(crate) fn read_accounts<R: std::io::Read>(reader: R) -> Result<Vec<Account>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut accounts = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable line: {e}");
                continue;
            }
        };
        if record.len() <= 1 && record.iter().all(str::is_empty) {
            continue;
        }
        match parse_record(&record) {
            Ok(account) => accounts.push(account),
            Err(e) => {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                warn!(line, record = %record.iter().collect::<Vec<_>>().join(","), "{e}");
            }
        }
    }
    Ok(accounts)
}

// Trailing empty fields don't count: `name,id,` is missing its balance.
fn parse_record(record: &StringRecord) -> Result<Account, RecordError> {
    let found = record
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.is_empty())
        .last()
        .map_or(0, |(last, _)| last + 1);
    if found < 3 {
        return Err(RecordError::MissingFields { found });
    }
    let balance = parse_balance(&record[2])?;
    Ok(Account::new(&record[0], &record[1], balance))
}

fn parse_balance(value: &str) -> Result<Decimal, RecordError> {
    parse_amount(value).map_err(|_| RecordError::InvalidBalance {
        value: value.to_owned(),
    })
}

/// Parses an amount written either plainly (`12.50`) or in scientific
/// notation (`1.25E+1`).
pub fn parse_amount(value: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(value).or_else(|_| Decimal::from_scientific(value))
}
