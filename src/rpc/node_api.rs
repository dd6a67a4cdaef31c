use crate::actions::{BuildRequest, SignedTransaction, TransactionTemplate, Utxo};
use crate::rpc::client::{RpcClient, RpcError};
use crate::rpc::method::RpcMethod;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone, Debug, Deserialize)]
struct BlockCount {
    block_count: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GasEstimate {
    pub total_neu: u64,
}

#[derive(Clone, Debug, Deserialize)]
struct Submitted {
    tx_id: String,
}

#[derive(Serialize)]
struct EstimateRequest<'a> {
    transaction_template: &'a TransactionTemplate,
}

#[derive(Serialize)]
struct SignRequest<'a> {
    transaction: &'a TransactionTemplate,
    password: &'a str,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    raw_transaction: &'a str,
}

/// Typed view of the node operations the merge run depends on.
#[allow(async_fn_in_trait)]
pub trait NodeApi {
    async fn list_unspent_outputs(&self) -> Result<Vec<Utxo>, RpcError>;

    async fn get_block_count(&self) -> Result<u64, RpcError>;

    async fn build_transaction(
        &self,
        request: &BuildRequest,
    ) -> Result<TransactionTemplate, RpcError>;

    async fn estimate_transaction_gas(
        &self,
        template: &TransactionTemplate,
    ) -> Result<GasEstimate, RpcError>;

    async fn sign_transaction(
        &self,
        template: &TransactionTemplate,
        password: &str,
    ) -> Result<SignedTransaction, RpcError>;

    async fn submit_transaction(&self, raw_transaction: &str) -> Result<String, RpcError>;
}

impl NodeApi for RpcClient {
    async fn list_unspent_outputs(&self) -> Result<Vec<Utxo>, RpcError> {
        self.call(RpcMethod::ListUnspentOutputs, &json!({})).await
    }

    async fn get_block_count(&self) -> Result<u64, RpcError> {
        let count: BlockCount = self.call(RpcMethod::GetBlockCount, &json!({})).await?;
        Ok(count.block_count)
    }

    async fn build_transaction(
        &self,
        request: &BuildRequest,
    ) -> Result<TransactionTemplate, RpcError> {
        self.call(RpcMethod::BuildTransaction, request).await
    }

    async fn estimate_transaction_gas(
        &self,
        template: &TransactionTemplate,
    ) -> Result<GasEstimate, RpcError> {
        let request = EstimateRequest {
            transaction_template: template,
        };
        self.call(RpcMethod::EstimateTransactionGas, &request).await
    }

    async fn sign_transaction(
        &self,
        template: &TransactionTemplate,
        password: &str,
    ) -> Result<SignedTransaction, RpcError> {
        let request = SignRequest {
            transaction: template,
            password,
        };
        self.call(RpcMethod::SignTransaction, &request).await
    }

    async fn submit_transaction(&self, raw_transaction: &str) -> Result<String, RpcError> {
        let submitted: Submitted = self
            .call(RpcMethod::SubmitTransaction, &SubmitRequest { raw_transaction })
            .await?;
        Ok(submitted.tx_id)
    }
}
