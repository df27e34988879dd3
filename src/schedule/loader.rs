//! CSV-based anchor point loaders
//!
//! Schedules are declared sparsely in small CSV files with a header row:
//! `payment,rate` for a rate forecast, `payment,amount` for overpayments.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;

use super::series::AnchorPoint;

/// Loads rate forecast anchors from a `payment,rate` CSV file.
pub fn load_rate_anchors(path: &Path) -> anyhow::Result<Vec<AnchorPoint>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_anchors(file).with_context(|| format!("parsing rate forecast {}", path.display()))
}

/// Loads overpayment anchors from a `payment,amount` CSV file. Amounts are
/// raw decimals; the scenario layer tags them with the ledger currency.
pub fn load_overpayment_anchors(path: &Path) -> anyhow::Result<Vec<AnchorPoint>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_anchors(file).with_context(|| format!("parsing overpayments {}", path.display()))
}

/// Reads `payment,value` anchor records from any reader.
pub fn read_anchors<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<AnchorPoint>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut anchors = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let payment: u32 = record
            .get(0)
            .context("missing payment column")?
            .trim()
            .parse()?;
        let value: Decimal = record
            .get(1)
            .context("missing value column")?
            .trim()
            .parse()?;
        anchors.push(AnchorPoint { payment, value });
    }

    Ok(anchors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_read_anchor_records() {
        let csv = "payment,rate\n1,0.06\n24,0.05\n300,0.05\n";
        let anchors = read_anchors(csv.as_bytes()).unwrap();

        assert_eq!(anchors.len(), 3);
        assert_eq!(anchors[0].payment, 1);
        assert_eq!(anchors[0].value, dec!(0.06));
        assert_eq!(anchors[2].payment, 300);
    }

    #[test]
    fn test_read_rejects_malformed_rows() {
        let csv = "payment,amount\nnot-a-number,500\n";
        assert!(read_anchors(csv.as_bytes()).is_err());

        let csv = "payment,amount\n1\n";
        assert!(read_anchors(csv.as_bytes()).is_err());
    }
}
