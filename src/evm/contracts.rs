//! ERC-20 ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the token
//! surface the allowance guard needs.

use alloy::sol;

sol! {
    /// Standard ERC20 interface, allowance/approve subset
    #[sol(rpc)]
    contract ERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);

        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}
