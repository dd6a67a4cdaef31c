pub mod client;
pub mod method;
pub mod node_api;

pub use client::{ClientCert, RpcClient, RpcConfig, RpcError};
pub use method::RpcMethod;
pub use node_api::{GasEstimate, NodeApi};
