//! Chain backend abstraction
//!
//! One implementation per chain family: account-based chains sign contract
//! calls, instruction-based chains restamp and re-sign serialized
//! transactions. The orchestrator only sees this trait.

use async_trait::async_trait;

use crate::dln::order::Order;
use crate::error::BridgeResult;
use crate::types::{ChainFamily, TxId};

/// Signs and broadcasts an executable order on one chain.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    /// The family this backend signs for.
    fn family(&self) -> ChainFamily;

    /// The DLN chain ID this backend is connected to.
    fn chain_id(&self) -> u64;

    /// Sign `order` and broadcast it. Returns the native transaction
    /// identifier immediately after broadcast; confirmation is a caller
    /// concern.
    async fn submit(&self, order: &Order) -> BridgeResult<TxId>;
}
