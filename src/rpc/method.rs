use std::fmt;

/// Remote operations the node exposes to this tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    ListUnspentOutputs,
    GetBlockCount,
    BuildTransaction,
    EstimateTransactionGas,
    SignTransaction,
    SubmitTransaction,
}

impl RpcMethod {
    pub const ALL: [RpcMethod; 6] = [
        RpcMethod::ListUnspentOutputs,
        RpcMethod::GetBlockCount,
        RpcMethod::BuildTransaction,
        RpcMethod::EstimateTransactionGas,
        RpcMethod::SignTransaction,
        RpcMethod::SubmitTransaction,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            RpcMethod::ListUnspentOutputs => "list_unspent_outputs",
            RpcMethod::GetBlockCount => "get_block_count",
            RpcMethod::BuildTransaction => "build_transaction",
            RpcMethod::EstimateTransactionGas => "estimate_transaction_gas",
            RpcMethod::SignTransaction => "sign_transaction",
            RpcMethod::SubmitTransaction => "submit_transaction",
        }
    }

    /// Name used in the request path, e.g. `list-unspent-outputs`.
    pub fn wire_name(&self) -> String {
        self.identifier().replace('_', "-")
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire_name())
    }
}
