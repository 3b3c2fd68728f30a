//! Constants used in the deploy scripts

/// The default RPC URL of a local Hardhat node
pub const HARDHAT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The chain ID the Hardhat network is configured with
pub const HARDHAT_CHAIN_ID: u64 = 1337;

/// The chain ID of the Rinkeby testnet
pub const RINKEBY_CHAIN_ID: u64 = 4;

/// The private key of the first default development account, which
/// Hardhat and Anvil nodes are seeded with
pub const DEFAULT_DEVNET_PKEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The default directory containing Hardhat compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "./artifacts";

/// The subdirectory of the artifacts directory holding compiler build info
pub const BUILD_INFO_DIR: &str = "build-info";

/// The extension of an artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The name of the ERC20 demo token contract
pub const DEMO_CONTRACT: &str = "Demo";

/// The default name passed to the demo token's constructor
pub const DEFAULT_DEMO_TOKEN_NAME: &str = "Demo";

/// The default symbol passed to the demo token's constructor
pub const DEFAULT_DEMO_TOKEN_SYMBOL: &str = "DMO";

/// The name of the demo allocations contract
pub const DEMO_ALLOCATIONS_CONTRACT: &str = "DemoAllocations";
