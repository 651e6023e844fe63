use alloy::sol;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }
);

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface EnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }
);

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface EnsResolver {
        function addr(bytes32 node) external view returns (address);
    }
);
