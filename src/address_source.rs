use std::path::Path;

use tracing::info;

use crate::error::InputError;
use crate::models::WalletAddress;

const ADDRESS_COLUMN: &str = "wallet_address";
const LABEL_COLUMN: &str = "hardwarewallet";

/// Read wallet addresses from a file, preserving order and duplicates.
///
/// Plain files hold one address per line. A file whose first line is a
/// header with a `wallet_address` column is read as CSV instead, taking the
/// label from an optional `hardwarewallet` column.
pub fn read_addresses(path: impl AsRef<Path>) -> Result<Vec<WalletAddress>, InputError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    // spreadsheet exports often start with a byte order mark
    let text = content.strip_prefix('\u{feff}').unwrap_or(content.as_str());
    let addresses = parse_addresses(text, path)?;
    if addresses.is_empty() {
        return Err(InputError::Empty {
            path: path.to_path_buf(),
        });
    }

    info!("Loaded {} addresses from {}", addresses.len(), path.display());
    Ok(addresses)
}

fn parse_addresses(content: &str, path: &Path) -> Result<Vec<WalletAddress>, InputError> {
    let header = content.lines().map(str::trim).find(|line| !line.is_empty());
    match header {
        Some(line) if is_csv_header(line) => parse_csv(content, path),
        _ => Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(WalletAddress::new)
            .collect()),
    }
}

fn is_csv_header(line: &str) -> bool {
    line.split(',')
        .any(|cell| cell.trim().trim_matches('"') == ADDRESS_COLUMN)
}

fn parse_csv(content: &str, path: &Path) -> Result<Vec<WalletAddress>, InputError> {
    let csv_err = |source: csv::Error| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(csv_err)?.clone();
    let address_idx = headers
        .iter()
        .position(|h| h == ADDRESS_COLUMN)
        .ok_or_else(|| InputError::MissingColumn {
            path: path.to_path_buf(),
        })?;
    let label_idx = headers.iter().position(|h| h == LABEL_COLUMN);

    let mut addresses = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let address = record.get(address_idx).unwrap_or_default();
        if address.is_empty() {
            continue;
        }
        let label = label_idx
            .and_then(|idx| record.get(idx))
            .unwrap_or_default();
        addresses.push(WalletAddress::new(address).with_label(label));
    }

    Ok(addresses)
}
