use crate::domain::escrow::EscrowRecord;
use crate::error::Result;
use std::io::Write;

/// Writes the final escrow log as CSV, one row per record.
pub struct EscrowWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> EscrowWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_escrows(&mut self, escrows: &[EscrowRecord]) -> Result<()> {
        for record in escrows {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::{Address, Balance};
    use rust_decimal_macros::dec;

    #[test]
    fn test_writer_output_format() {
        let record = EscrowRecord {
            id: 0,
            initiator: Address::from_low_u64(0x11),
            beneficiary: Address::from_low_u64(0x22),
            deposit_asset: Address::from_low_u64(10),
            deposit_amount: Balance::new(dec!(1000)),
            reference_value: Balance::new(dec!(500)),
            payout_asset: None,
            deadline: 5,
            completed: true,
        };

        let mut buf = Vec::new();
        EscrowWriter::new(&mut buf)
            .write_escrows(std::slice::from_ref(&record))
            .unwrap();
        let output = String::from_utf8(buf).unwrap();

        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,initiator,beneficiary,deposit_asset,deposit_amount,reference_value,payout_asset,deadline,completed"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("0,0x"));
        assert!(row.ends_with("1000,500,,5,true"));
    }
}
