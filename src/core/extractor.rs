//! Address Extractor
//! Collects every distinct address referenced by a batch of records

use std::collections::BTreeSet;

use crate::models::types::{Address, TransactionRecord, TransferRecord};

/// Distinct addresses appearing as transfer source/destination or transaction signer.
///
/// Missing and empty addresses are dropped.
pub fn extract_addresses(
    transfers: &[TransferRecord],
    transactions: &[TransactionRecord],
) -> BTreeSet<Address> {
    let mut addresses: BTreeSet<Address> = transfers
        .iter()
        .flat_map(|t| t.touched())
        .cloned()
        .collect();

    addresses.extend(
        transactions
            .iter()
            .flat_map(|tx| tx.signers.iter())
            .filter(|s| !s.is_empty())
            .cloned(),
    );

    addresses
}
