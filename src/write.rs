use crate::{
    account::Account,
    data::{AccountRecord, Error},
};

/// Basic exporter for `Account`s, one `name,id,balance` line each. Fields are
/// written verbatim: a comma inside a name will not survive a reload.
pub(crate) fn write_accounts<W: std::io::Write>(
    writer: W,
    accounts: &[Account],
) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    for account in accounts {
        wtr.serialize(AccountRecord::from(account))?;
    }
    wtr.flush()?;
    Ok(())
}
