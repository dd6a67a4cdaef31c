use crate::actions::{BuildRequest, TransactionDraft, Utxo, NATIVE_ASSET_ID};
use crate::merge_utils::utxo_filter::MIN_MERGE_UTXOS;
use crate::rpc::{NodeApi, RpcError};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("at least two UTXOs are needed to merge, got {0}")]
    TooFewUtxos(usize),
    #[error("total amount of the selected UTXOs overflows")]
    AmountOverflow,
    #[error("selected UTXOs total {total} cannot cover fee {fee}")]
    FeeExceedsAmount { total: u64, fee: u64 },
    #[error("Sign not complete")]
    SignIncomplete,
    #[error("signed transaction carries no raw transaction")]
    MissingRawTransaction,
}

#[derive(Clone, Debug)]
pub struct MergeSettings {
    /// Pause between fee estimation and the second build.
    pub rebuild_delay: Duration,
    pub ttl: u64,
    pub asset_id: String,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            rebuild_delay: Duration::from_secs(1),
            ttl: 1,
            asset_id: NATIVE_ASSET_ID.to_string(),
        }
    }
}

/// Spends every UTXO in `merge_set` into one output at `address`, paying the estimated
/// fee out of that output, and returns the id of the submitted transaction.
pub async fn merge_utxos<Node: NodeApi>(
    node: &Node,
    merge_set: &[Utxo],
    address: &str,
    password: &str,
    settings: &MergeSettings,
) -> Result<String, MergeError> {
    if merge_set.len() < MIN_MERGE_UTXOS {
        return Err(MergeError::TooFewUtxos(merge_set.len()));
    }

    let mut draft = TransactionDraft::consolidate(merge_set, address, &settings.asset_id)
        .ok_or(MergeError::AmountOverflow)?;
    let total = draft.output_amount();
    tracing::info!("building transaction of {} inputs, total {}", merge_set.len(), total);

    let template = node
        .build_transaction(&BuildRequest::new(&draft, settings.ttl))
        .await?;
    let fee = node.estimate_transaction_gas(&template).await?.total_neu;
    if !draft.deduct_fee(fee) {
        return Err(MergeError::FeeExceedsAmount { total, fee });
    }
    tracing::info!("estimated fee {}, output amount {}", fee, draft.output_amount());

    tokio::time::sleep(settings.rebuild_delay).await;

    let template = node
        .build_transaction(&BuildRequest::new(&draft, settings.ttl))
        .await?;
    let signed = node.sign_transaction(&template, password).await?;
    if !signed.sign_complete {
        return Err(MergeError::SignIncomplete);
    }
    let raw_transaction = signed
        .transaction
        .and_then(|transaction| transaction.raw_transaction)
        .ok_or(MergeError::MissingRawTransaction)?;

    let tx_id = node.submit_transaction(&raw_transaction).await?;
    tracing::info!("submitted transaction {}", tx_id);
    Ok(tx_id)
}
