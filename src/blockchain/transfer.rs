use std::str::FromStr;

use log::debug;
use solana_sdk::{
    hash::Hash, message::Message, pubkey::Pubkey, system_instruction, transaction::Transaction,
};

use super::connection::Connection;
use crate::{Error, Result};

/// A native SOL transfer ready to be handed to a signer.
///
/// Every field is set when the value is built, including the blockhash, so
/// there is no partially initialised state to patch later. Build a fresh one
/// for each attempt: the blockhash expires and a stale transfer is rejected by
/// the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTransaction {
    source: Pubkey,
    destination: Pubkey,
    lamports: u64,
    fee_payer: Pubkey,
    recent_blockhash: Hash,
}

impl TransferTransaction {
    pub fn source(&self) -> &Pubkey {
        &self.source
    }

    pub fn destination(&self) -> &Pubkey {
        &self.destination
    }

    pub fn lamports(&self) -> u64 {
        self.lamports
    }

    pub fn fee_payer(&self) -> &Pubkey {
        &self.fee_payer
    }

    pub fn recent_blockhash(&self) -> &Hash {
        &self.recent_blockhash
    }

    /// Unsigned transaction carrying the single system transfer instruction
    pub fn to_transaction(&self) -> Transaction {
        let instruction =
            system_instruction::transfer(&self.source, &self.destination, self.lamports);
        let message = Message::new_with_blockhash(
            &[instruction],
            Some(&self.fee_payer),
            &self.recent_blockhash,
        );
        Transaction::new_unsigned(message)
    }
}

/// Parse a base58 Solana address
pub fn parse_address(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address.trim())
        .map_err(|e| Error::InvalidAddress(format!("{}: {}", address, e)))
}

/// Build a transfer of `lamports` from `payer` to `destination`.
///
/// The destination and amount are checked before the connection is touched;
/// only then is the latest blockhash fetched. The payer also pays the fee.
/// Connection failures are returned as they are, without retrying.
pub async fn build_transfer(
    lamports: u64, payer: &Pubkey, destination: &str, connection: &dyn Connection,
) -> Result<TransferTransaction> {
    let destination = parse_address(destination)?;
    if lamports == 0 {
        return Err(Error::InvalidAmount("transfer amount must be greater than zero".to_string()));
    }

    let recent_blockhash = connection.get_latest_blockhash().await?;
    debug!(
        "built transfer of {} lamports {} -> {} at blockhash {}",
        lamports, payer, destination, recent_blockhash
    );

    Ok(TransferTransaction {
        source: *payer,
        destination,
        lamports,
        fee_payer: *payer,
        recent_blockhash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::connection::MockConnection;
    use assert_matches::assert_matches;

    const RECIPIENT: &str = "9u92hBMxYgcGNi1JYSbRsuEM1CsLVW48G7jKG6rRhXr8";

    fn connection_returning(blockhash: Hash) -> MockConnection {
        let mut connection = MockConnection::new();
        connection.expect_get_latest_blockhash().times(1).returning(move || Ok(blockhash));
        connection
    }

    #[tokio::test]
    async fn test_build_transfer_one_sol() {
        let payer = Pubkey::new_unique();
        let blockhash = Hash::new_unique();
        let connection = connection_returning(blockhash);

        let transfer = build_transfer(1_000_000_000, &payer, RECIPIENT, &connection).await.unwrap();

        assert_eq!(transfer.source(), &payer);
        assert_eq!(transfer.destination(), &Pubkey::from_str(RECIPIENT).unwrap());
        assert_eq!(transfer.lamports(), 1_000_000_000);
        assert_eq!(transfer.fee_payer(), &payer);
        assert_eq!(transfer.recent_blockhash(), &blockhash);
    }

    #[tokio::test]
    async fn test_to_transaction_matches_system_transfer() {
        let payer = Pubkey::new_unique();
        let blockhash = Hash::new_unique();
        let connection = connection_returning(blockhash);
        let destination = Pubkey::from_str(RECIPIENT).unwrap();

        let tx = build_transfer(42, &payer, RECIPIENT, &connection).await.unwrap().to_transaction();

        let mut expected = Transaction::new_with_payer(
            &[system_instruction::transfer(&payer, &destination, 42)],
            Some(&payer),
        );
        expected.message.recent_blockhash = blockhash;

        assert_eq!(tx, expected);
        assert_eq!(tx.message.instructions.len(), 1);
        assert_eq!(tx.message.account_keys[0], payer);
        assert_eq!(tx.message.recent_blockhash, blockhash);
        assert!(!tx.is_signed());
    }

    #[tokio::test]
    async fn test_invalid_destination_never_fetches() {
        let payer = Pubkey::new_unique();
        let mut connection = MockConnection::new();
        connection.expect_get_latest_blockhash().times(0);

        let result = build_transfer(1_000_000_000, &payer, "not-a-valid-address", &connection).await;

        assert_matches!(result, Err(Error::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn test_zero_amount_never_fetches() {
        let payer = Pubkey::new_unique();
        let mut connection = MockConnection::new();
        connection.expect_get_latest_blockhash().times(0);

        let result = build_transfer(0, &payer, RECIPIENT, &connection).await;

        assert_matches!(result, Err(Error::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_blockhash_failure_propagates() {
        let payer = Pubkey::new_unique();
        let mut connection = MockConnection::new();
        connection
            .expect_get_latest_blockhash()
            .times(1)
            .returning(|| Err(Error::ConnectionError("request timed out".to_string())));

        let result = build_transfer(5, &payer, RECIPIENT, &connection).await;

        assert_matches!(result, Err(Error::ConnectionError(msg)) if msg == "request timed out");
    }

    #[tokio::test]
    async fn test_each_build_fetches_a_fresh_blockhash() {
        let payer = Pubkey::new_unique();
        let first = Hash::new_unique();
        let second = Hash::new_unique();
        let mut connection = MockConnection::new();
        let mut seq = mockall::Sequence::new();
        connection
            .expect_get_latest_blockhash()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(first));
        connection
            .expect_get_latest_blockhash()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(second));

        let a = build_transfer(7, &payer, RECIPIENT, &connection).await.unwrap();
        let b = build_transfer(7, &payer, RECIPIENT, &connection).await.unwrap();

        assert_eq!(a.recent_blockhash(), &first);
        assert_eq!(b.recent_blockhash(), &second);
    }

    #[test]
    fn test_parse_address_trims() {
        let parsed = parse_address(&format!("  {}\n", RECIPIENT)).unwrap();
        assert_eq!(parsed.to_string(), RECIPIENT);
        assert!(parse_address("").is_err());
    }
}
