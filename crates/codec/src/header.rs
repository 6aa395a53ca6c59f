use crate::{
    decoding::{get_bytes, get_int, get_seq_len, get_u64, get_ubig, get_uint},
    delta,
    encoding::{put_bigint, put_bytes, put_int, put_seq_len, put_u64, put_uint},
    CodecError,
};

use alloy_primitives::{bytes::Buf, Address, B256, U256};
use std::collections::HashSet;
use veil_primitives::{from_slice_and_advance_buf, Batch, BatchHeader};

/// The compressed rollup metadata, published as calldata after sealing.
///
/// Carries the bare minimum needed to recreate every batch header in the rollup: implicit
/// positions, deltas and exceptions. Anything recomputable on the receiving side (transaction
/// roots, parent hashes, state roots) is omitted and recovered by executing the batches.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CalldataRollupHeader {
    /// The sequence number of the batch at index 0.
    pub first_batch_seq_no: u64,
    /// The height of the first batch in the rollup that is not a reorg.
    pub first_canon_height: u64,
    /// The parent hash of that same batch, anchoring the rollup into the existing chain.
    pub first_canon_parent_hash: B256,
    /// The timestamp of the batch at index 0.
    pub start_time: u64,
    /// Per-batch time deltas. Entry 0 is a placeholder of zero.
    pub batch_time_deltas: Vec<i64>,
    /// Per-batch reorg exceptions: the full header for every non-canonical batch, nothing for
    /// canonical ones. Absent altogether when the rollup holds no reorged batch.
    pub reorgs: Option<Vec<Option<BatchHeader>>>,
    /// Per-batch L1 proof heights: entry 0 absolute, later entries signed deltas.
    pub l1_height_deltas: Vec<i64>,
    /// The coinbase shared by all batches in the rollup.
    pub coinbase: Address,
    /// The base fee shared by all batches in the rollup.
    pub base_fee: U256,
    /// The gas limit shared by all batches in the rollup.
    pub gas_limit: u64,
}

impl CalldataRollupHeader {
    /// Assembles the calldata header for the given batches.
    ///
    /// `l1_heights` holds the height of every batch's L1 proof block, index-aligned with
    /// `batches`; `reorg_seqs` holds the sequence numbers known to be non-canonical. When no
    /// batch in the rollup is canonical, the height and parent anchors fall back to batch 0.
    pub fn from_batches(
        batches: &[Batch],
        l1_heights: &[u64],
        reorg_seqs: &HashSet<u64>,
    ) -> Result<Self, CodecError> {
        let first = batches.first().ok_or(CodecError::EmptyInput)?;
        if batches.len() != l1_heights.len() {
            return Err(CodecError::LengthMismatch {
                expected: batches.len(),
                got: l1_heights.len(),
            });
        }

        let times = batches.iter().map(|b| b.header.time).collect::<Vec<_>>();
        let batch_time_deltas = delta::time_deltas(&times)?;
        let l1_height_deltas = delta::l1_height_deltas(l1_heights)?;

        let is_reorg = |batch: &Batch| reorg_seqs.contains(&batch.header.seq_no);
        let reorgs = batches.iter().any(is_reorg).then(|| {
            batches.iter().map(|b| is_reorg(b).then(|| b.header.clone())).collect::<Vec<_>>()
        });

        let first_canon = batches.iter().find(|b| !is_reorg(b)).unwrap_or(first);

        Ok(Self {
            first_batch_seq_no: first.header.seq_no,
            first_canon_height: first_canon.header.height,
            first_canon_parent_hash: first_canon.header.parent_hash,
            start_time: times[0],
            batch_time_deltas,
            reorgs,
            l1_height_deltas,
            coinbase: first.header.coinbase,
            base_fee: first.header.base_fee,
            gas_limit: first.header.gas_limit,
        })
    }

    /// The number of batches described by the header.
    pub fn batch_count(&self) -> usize {
        self.batch_time_deltas.len()
    }

    /// Encodes the header into its canonical representation.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();

        put_uint(&mut buf, self.first_batch_seq_no)?;
        put_uint(&mut buf, self.first_canon_height)?;
        buf.extend_from_slice(&self.first_canon_parent_hash.0);
        put_u64(&mut buf, self.start_time);

        put_seq_len(&mut buf, self.batch_time_deltas.len())?;
        for &delta in &self.batch_time_deltas {
            put_int(&mut buf, delta)?;
        }

        match &self.reorgs {
            None => buf.push(0),
            Some(entries) => {
                buf.push(1);
                put_seq_len(&mut buf, entries.len())?;
                for entry in entries {
                    match entry {
                        Some(header) => put_bytes(&mut buf, &header.encode())?,
                        None => put_bytes(&mut buf, &[])?,
                    }
                }
            }
        }

        put_seq_len(&mut buf, self.l1_height_deltas.len())?;
        for &delta in &self.l1_height_deltas {
            put_int(&mut buf, delta)?;
        }

        buf.extend_from_slice(self.coinbase.as_slice());
        put_bigint(&mut buf, false, self.base_fee)?;
        put_u64(&mut buf, self.gas_limit);

        Ok(buf)
    }

    /// Tries to read from the input buffer into the [`CalldataRollupHeader`], advancing the
    /// buffer past it.
    pub fn try_from_buf(buf: &mut &[u8]) -> Result<Self, CodecError> {
        let first_batch_seq_no = get_uint(buf)?;
        let first_canon_height = get_uint(buf)?;
        if buf.len() < 32 {
            return Err(CodecError::Eof);
        }
        let first_canon_parent_hash = from_slice_and_advance_buf!(B256, buf);
        let start_time = get_u64(buf)?;

        let delta_count = get_seq_len(buf)?;
        let mut batch_time_deltas = Vec::with_capacity(delta_count.min(1024));
        for _ in 0..delta_count {
            batch_time_deltas.push(get_int(buf)?);
        }

        let reorgs = match buf.first().copied() {
            None => return Err(CodecError::Eof),
            Some(0) => {
                buf.advance(1);
                None
            }
            Some(1) => {
                buf.advance(1);
                let count = get_seq_len(buf)?;
                if count == 0 {
                    return Err(CodecError::EmptyReorgs);
                }
                let mut entries = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let bytes = get_bytes(buf)?;
                    entries.push(decode_reorg_entry(bytes)?);
                }
                Some(entries)
            }
            Some(marker) => return Err(CodecError::InvalidReorgMarker(marker)),
        };

        let delta_count = get_seq_len(buf)?;
        let mut l1_height_deltas = Vec::with_capacity(delta_count.min(1024));
        for _ in 0..delta_count {
            l1_height_deltas.push(get_int(buf)?);
        }

        if buf.len() < 20 {
            return Err(CodecError::Eof);
        }
        let coinbase = from_slice_and_advance_buf!(Address, buf);
        let base_fee = get_ubig(buf)?;
        let gas_limit = get_u64(buf)?;

        Ok(Self {
            first_batch_seq_no,
            first_canon_height,
            first_canon_parent_hash,
            start_time,
            batch_time_deltas,
            reorgs,
            l1_height_deltas,
            coinbase,
            base_fee,
            gas_limit,
        })
    }

    /// Decodes a header from a standalone byte string, rejecting trailing bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut buf = bytes;
        let header = Self::try_from_buf(&mut buf)?;
        if !buf.is_empty() {
            return Err(CodecError::TrailingBytes);
        }
        Ok(header)
    }
}

fn decode_reorg_entry(bytes: &[u8]) -> Result<Option<BatchHeader>, CodecError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let mut buf = bytes;
    let header = BatchHeader::try_from_buf(&mut buf).ok_or(CodecError::InvalidReorgHeader)?;
    if !buf.is_empty() {
        return Err(CodecError::InvalidReorgHeader);
    }
    Ok(Some(header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    fn header() -> CalldataRollupHeader {
        CalldataRollupHeader {
            first_batch_seq_no: 10,
            first_canon_height: 4,
            first_canon_parent_hash: b256!(
                "c0173d7e3561501cf57913763c7c34716216092a222a99fe8b85dcb466730f56"
            ),
            start_time: 2000,
            batch_time_deltas: vec![0, 2, 1],
            reorgs: None,
            l1_height_deltas: vec![7, 1, -1],
            coinbase: address!("d8da6bf26964af9d7eed9e03e53415d37aa96045"),
            base_fee: U256::from(1_000_000_000u64),
            gas_limit: 30_000_000,
        }
    }

    fn reorg_header() -> BatchHeader {
        BatchHeader {
            seq_no: 11,
            height: 5,
            time: 2002,
            base_fee: U256::from(7u64),
            ..Default::default()
        }
    }

    #[test]
    fn test_should_roundtrip_without_reorgs() -> eyre::Result<()> {
        let header = header();
        let decoded = CalldataRollupHeader::decode(&header.encode()?)?;
        assert_eq!(decoded, header);
        Ok(())
    }

    #[test]
    fn test_should_roundtrip_with_reorgs() -> eyre::Result<()> {
        let mut header = header();
        header.reorgs = Some(vec![None, Some(reorg_header()), None]);

        let decoded = CalldataRollupHeader::decode(&header.encode()?)?;
        assert_eq!(decoded, header);
        Ok(())
    }

    #[test]
    fn test_should_reject_present_empty_reorg_vector() -> eyre::Result<()> {
        let mut header = header();
        header.reorgs = Some(vec![]);

        let encoded = header.encode()?;
        assert_eq!(CalldataRollupHeader::decode(&encoded), Err(CodecError::EmptyReorgs));
        Ok(())
    }

    #[test]
    fn test_should_reject_trailing_bytes() -> eyre::Result<()> {
        let mut encoded = header().encode()?;
        encoded.push(0xff);
        assert_eq!(CalldataRollupHeader::decode(&encoded), Err(CodecError::TrailingBytes));
        Ok(())
    }

    #[test]
    fn test_should_reject_truncated_reorg_header() -> eyre::Result<()> {
        let mut header = header();
        header.reorgs = Some(vec![Some(reorg_header()), None, None]);
        let encoded = header.encode()?;

        // Shorten the first reorg entry by one byte. The entry's length prefix sits right
        // after the presence and count bytes; locate it by re-encoding the preceding fields.
        let mut tampered = encoded.clone();
        let mut prefix = Vec::new();
        put_uint(&mut prefix, header.first_batch_seq_no)?;
        put_uint(&mut prefix, header.first_canon_height)?;
        prefix.extend_from_slice(&header.first_canon_parent_hash.0);
        put_u64(&mut prefix, header.start_time);
        put_seq_len(&mut prefix, header.batch_time_deltas.len())?;
        for &delta in &header.batch_time_deltas {
            put_int(&mut prefix, delta)?;
        }
        prefix.push(1);
        put_seq_len(&mut prefix, 3)?;
        let len_pos = prefix.len();
        let old_len =
            u32::from_be_bytes(tampered[len_pos..len_pos + 4].try_into().unwrap()) as usize;
        tampered[len_pos..len_pos + 4].copy_from_slice(&((old_len - 1) as u32).to_be_bytes());
        tampered.remove(len_pos + 4 + old_len - 1);

        assert_eq!(
            CalldataRollupHeader::decode(&tampered),
            Err(CodecError::InvalidReorgHeader)
        );
        Ok(())
    }

    #[test]
    fn test_from_batches_omits_reorg_vector_when_all_canonical() -> eyre::Result<()> {
        let batches = vec![
            Batch::new(BatchHeader { seq_no: 10, height: 4, time: 2000, ..Default::default() }, vec![]),
            Batch::new(BatchHeader { seq_no: 11, height: 5, time: 2002, ..Default::default() }, vec![]),
        ];
        let header = CalldataRollupHeader::from_batches(&batches, &[7, 8], &HashSet::new())?;

        assert!(header.reorgs.is_none());
        assert_eq!(header.batch_time_deltas, [0, 2]);
        assert_eq!(header.l1_height_deltas, [7, 1]);
        assert_eq!(header.first_batch_seq_no, 10);
        assert_eq!(header.first_canon_height, 4);
        Ok(())
    }

    #[test]
    fn test_from_batches_anchors_on_first_canonical_batch() -> eyre::Result<()> {
        let reorged = BatchHeader { seq_no: 10, height: 4, time: 2000, ..Default::default() };
        let canonical = BatchHeader {
            seq_no: 11,
            height: 4,
            time: 2001,
            parent_hash: b256!("2aa3eeb5adebb96a49736583c744b89b0b3be45056e8e178106a42ab2cd1a063"),
            ..Default::default()
        };
        let batches =
            vec![Batch::new(reorged.clone(), vec![]), Batch::new(canonical.clone(), vec![])];
        let header =
            CalldataRollupHeader::from_batches(&batches, &[7, 7], &HashSet::from([10u64]))?;

        assert_eq!(header.first_canon_height, canonical.height);
        assert_eq!(header.first_canon_parent_hash, canonical.parent_hash);
        assert_eq!(header.reorgs, Some(vec![Some(reorged), None]));
        Ok(())
    }

    #[test]
    fn test_from_batches_falls_back_to_batch_zero_when_all_reorged() -> eyre::Result<()> {
        let first = BatchHeader {
            seq_no: 10,
            height: 4,
            time: 2000,
            parent_hash: b256!("2aa3eeb5adebb96a49736583c744b89b0b3be45056e8e178106a42ab2cd1a063"),
            ..Default::default()
        };
        let second = BatchHeader { seq_no: 11, height: 5, time: 2001, ..Default::default() };
        let batches = vec![Batch::new(first.clone(), vec![]), Batch::new(second, vec![])];
        let header =
            CalldataRollupHeader::from_batches(&batches, &[7, 7], &HashSet::from([10u64, 11]))?;

        assert_eq!(header.first_canon_height, first.height);
        assert_eq!(header.first_canon_parent_hash, first.parent_hash);
        Ok(())
    }
}
