//! Solidity bindings for the contracts a preparation run touches.

use alloy::primitives::{keccak256, B256};
use alloy::sol;

sol! {
    /// OpenZeppelin ERC20 preset with minter and pauser roles.
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20PresetMinterPauser {
        function mint(address to, uint256 amount) external;
    }

    /// Root-chain ERC20 bridge with flow-rate control.
    #[derive(Debug, PartialEq, Eq)]
    interface IRootERC20BridgeFlowRate {
        function setRateControlThreshold(
            address token,
            uint256 capacity,
            uint256 refillRate,
            uint256 largeTransferThreshold
        ) external;
        function revokeRole(bytes32 role, address account) external;
        function hasRole(bytes32 role, address account) external view returns (bool);
        function DEFAULT_ADMIN_ROLE() external view returns (bytes32);
    }
}

/// Access-control role identifier for a role name (`keccak256(name)`).
pub fn role_id(name: &str) -> B256 {
    keccak256(name.as_bytes())
}
