//! Provenance Indexer
//!
//! Maps every address seen in the source's transfers to the earliest block
//! it appeared in. The earliest-seen address among look-alikes is taken to
//! be the genuine one.

use std::collections::HashMap;
use tracing::debug;

use crate::models::types::{Address, ProvenanceEntry, TransferRecord};

/// Address -> earliest sighting
pub type ProvenanceIndex = HashMap<Address, ProvenanceEntry>;

/// Build the provenance index from one address's transfer history.
///
/// An entry is replaced only by a transfer with a strictly smaller block id.
/// Among transfers sharing the minimal block, the one first in
/// [`TransferRecord::canonical_cmp`] order is kept, so the result does not
/// depend on input order.
pub fn build_provenance(transfers: &[TransferRecord]) -> ProvenanceIndex {
    let mut index = ProvenanceIndex::new();

    for transfer in transfers {
        for address in transfer.touched() {
            match index.get_mut(address) {
                Some(entry) => {
                    if transfer.block_id < entry.earliest_block
                        || (transfer.block_id == entry.earliest_block
                            && transfer.canonical_cmp(&entry.originating_transfer).is_lt())
                    {
                        *entry = ProvenanceEntry::from_transfer(transfer);
                    }
                }
                None => {
                    index.insert(address.clone(), ProvenanceEntry::from_transfer(transfer));
                }
            }
        }
    }

    debug!(
        "Provenance index: {} addresses from {} transfers",
        index.len(),
        transfers.len()
    );

    index
}
