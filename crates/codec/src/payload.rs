//! The codec for the per-batch transaction payloads of a rollup.

use crate::{
    decoding::{get_bytes, get_seq_len},
    encoding::{put_bytes, put_seq_len},
    CodecError,
};

use veil_primitives::Transaction;

/// Encodes the per-batch transaction lists. The outer index is the batch index within the
/// rollup.
pub fn encode_batch_payloads(payloads: &[Vec<Transaction>]) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    put_seq_len(&mut buf, payloads.len())?;
    for transactions in payloads {
        put_seq_len(&mut buf, transactions.len())?;
        for tx in transactions {
            put_bytes(&mut buf, tx.as_ref())?;
        }
    }
    Ok(buf)
}

/// Decodes the per-batch transaction lists, rejecting trailing bytes.
pub fn decode_batch_payloads(bytes: &[u8]) -> Result<Vec<Vec<Transaction>>, CodecError> {
    let mut buf = bytes;
    let batch_count = get_seq_len(&mut buf)?;
    let mut payloads = Vec::with_capacity(batch_count.min(1024));
    for _ in 0..batch_count {
        let tx_count = get_seq_len(&mut buf)?;
        let mut transactions = Vec::with_capacity(tx_count.min(1024));
        for _ in 0..tx_count {
            transactions.push(Transaction::new(get_bytes(&mut buf)?.to_vec()));
        }
        payloads.push(transactions);
    }
    if !buf.is_empty() {
        return Err(CodecError::TrailingBytes);
    }
    Ok(payloads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_roundtrip_payloads() -> eyre::Result<()> {
        let payloads = vec![
            vec![Transaction::new(vec![0xde, 0xad]), Transaction::new(vec![0xbe, 0xef])],
            vec![],
            vec![Transaction::new(vec![0x01])],
        ];

        let decoded = decode_batch_payloads(&encode_batch_payloads(&payloads)?)?;
        assert_eq!(decoded, payloads);
        Ok(())
    }

    #[test]
    fn test_should_roundtrip_empty_rollup_payloads() -> eyre::Result<()> {
        let decoded = decode_batch_payloads(&encode_batch_payloads(&[])?)?;
        assert!(decoded.is_empty());
        Ok(())
    }

    #[test]
    fn test_should_reject_trailing_bytes() -> eyre::Result<()> {
        let mut encoded = encode_batch_payloads(&[vec![Transaction::new(vec![0x01])]])?;
        encoded.push(0);
        assert_eq!(decode_batch_payloads(&encoded), Err(CodecError::TrailingBytes));
        Ok(())
    }

    #[test]
    fn test_should_reject_truncated_payloads() -> eyre::Result<()> {
        let encoded = encode_batch_payloads(&[vec![Transaction::new(vec![0x01, 0x02])]])?;
        assert_eq!(
            decode_batch_payloads(&encoded[..encoded.len() - 1]),
            Err(CodecError::Eof)
        );
        Ok(())
    }
}
