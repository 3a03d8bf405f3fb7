//! Call data and return decoding for the two ERC-20 reads the checker needs.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};
use shared::{Error, Result};

sol! {
    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address owner) external view returns (uint256);
    }
}

pub use IERC20::{balanceOfCall, decimalsCall};

pub fn encode_decimals() -> Bytes {
    decimalsCall {}.abi_encode().into()
}

pub fn encode_balance_of(owner: Address) -> Bytes {
    balanceOfCall { owner }.abi_encode().into()
}

pub fn decode_decimals(data: &[u8]) -> Result<u8> {
    decimalsCall::abi_decode_returns(data)
        .map_err(|e| Error::EvmRpc(format!("Failed to decode decimals(): {}", e)))
}

pub fn decode_balance(data: &[u8]) -> Result<U256> {
    balanceOfCall::abi_decode_returns(data)
        .map_err(|e| Error::EvmRpc(format!("Failed to decode balanceOf(): {}", e)))
}
