//! Typed wrappers over the daemon's JSON-RPC methods.
//!
//! The wrappers are generated from a single table. A row names the routing
//! scope, the literal method name and, when the method takes arguments, the
//! parameter struct from [`params`]:
//!
//! - `node` rows always post to `/`.
//! - `wallet` rows take a trailing `wallet: Option<&str>` and fall back to
//!   the client's default wallet when it is `None`, unless the params name
//!   their own `wallet_name`.
//!
//! The same table is exported as [`METHODS`] and drives
//! [`RpcClient::invoke`](crate::RpcClient::invoke).

pub mod params;

use params::*;

use crate::client::{ResponseMode, RpcClient};
use crate::error::ClientError;

/// Where a method is routed when no wallet is given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Node-level method, posted to `/`.
    Node,
    /// Wallet method, posted to `/wallet/<name>` using the default wallet
    /// when none is given.
    Wallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: &'static str,
    pub scope: Scope,
    /// Name of the parameter struct, `None` for argument-less methods.
    pub params: Option<&'static str>,
}

/// Look up a method in [`METHODS`] by its RPC name.
pub fn find_method(name: &str) -> Option<&'static MethodSpec> {
    METHODS.iter().find(|spec| spec.name == name)
}

macro_rules! rpc_methods {
    (@scope node) => { Scope::Node };
    (@scope wallet) => { Scope::Wallet };

    (@params) => { None };
    (@params $params:ty) => { Some(stringify!($params)) };

    (@method [$(#[$doc:meta])*] node $name:ident) => {
        $(#[$doc])*
        pub async fn $name(&self) -> Result<M::Output, ClientError> {
            self.call(stringify!($name), NoParams {}, None).await
        }
    };
    (@method [$(#[$doc:meta])*] node $name:ident ($params:ty)) => {
        $(#[$doc])*
        pub async fn $name(&self, params: $params) -> Result<M::Output, ClientError> {
            self.call(stringify!($name), params, None).await
        }
    };
    (@method [$(#[$doc:meta])*] wallet $name:ident) => {
        $(#[$doc])*
        pub async fn $name(&self, wallet: Option<&str>) -> Result<M::Output, ClientError> {
            self.call_wallet(stringify!($name), NoParams {}, wallet).await
        }
    };
    (@method [$(#[$doc:meta])*] wallet $name:ident ($params:ty)) => {
        $(#[$doc])*
        pub async fn $name(
            &self,
            params: $params,
            wallet: Option<&str>,
        ) -> Result<M::Output, ClientError> {
            self.call_wallet(stringify!($name), params, wallet).await
        }
    };

    ($(
        $(#[$doc:meta])*
        $scope:ident $name:ident $(($params:ty))? ;
    )*) => {
        /// Every daemon method with a typed wrapper, in declaration order.
        pub const METHODS: &[MethodSpec] = &[
            $(
                MethodSpec {
                    name: stringify!($name),
                    scope: rpc_methods!(@scope $scope),
                    params: rpc_methods!(@params $($params)?),
                },
            )*
        ];

        impl<M: ResponseMode> RpcClient<M> {
            $( rpc_methods!(@method [$(#[$doc])*] $scope $name $(($params))?); )*
        }
    };
}

rpc_methods! {
    // Blockchain
    /// Hash of the tip of the most-work fully-validated chain.
    node getbestblockhash;
    /// Block by hash; `verbosity` 0 = hex, 1 = JSON with txids, 2 = JSON with transactions.
    node getblock(GetBlockParams);
    node getblockchaininfo;
    node getblockcount;
    /// BIP 157 content filter for a block.
    node getblockfilter(GetBlockFilterParams);
    node getblockhash(HeightParams);
    node getblockheader(GetBlockHeaderParams);
    node getblockstats(GetBlockStatsParams);
    node getchaintips;
    node getchaintxstats(GetChainTxStatsParams);
    node getdeploymentinfo(GetDeploymentInfoParams);
    node getdifficulty;
    node getmempoolancestors(MempoolRelativesParams);
    node getmempooldescendants(MempoolRelativesParams);
    node getmempoolentry(TxidParams);
    node getmempoolinfo;
    node getrawmempool(GetRawMempoolParams);
    /// Unspent output details, `null` when spent.
    node gettxout(GetTxOutParams);
    node gettxoutproof(GetTxOutProofParams);
    node gettxoutsetinfo;
    node preciousblock(BlockHashParams);
    node pruneblockchain(HeightParams);
    node savemempool;
    node scantxoutset(ScanTxOutSetParams);
    node verifychain(VerifyChainParams);
    node verifytxoutproof(ProofParams);

    // Control
    node getmemoryinfo(GetMemoryInfoParams);
    node getrpcinfo;
    node help(HelpParams);
    node logging(LoggingParams);
    /// Ask the daemon to shut down.
    node stop;
    node uptime;

    // Generating
    node generateblock(GenerateBlockParams);
    node generatetoaddress(GenerateToAddressParams);
    node generatetodescriptor(GenerateToDescriptorParams);

    // Mining
    node getblocktemplate(GetBlockTemplateParams);
    node getmininginfo;
    node getnetworkhashps(GetNetworkHashPsParams);
    node prioritisetransaction(PrioritiseTransactionParams);
    node submitblock(SubmitBlockParams);
    node submitheader(SubmitHeaderParams);

    // Network
    node addnode(AddNodeParams);
    node clearbanned;
    /// Disconnect a peer by address or by node id, never both.
    node disconnectnode(DisconnectNodeParams);
    node getaddednodeinfo(GetAddedNodeInfoParams);
    node getconnectioncount;
    node getnettotals;
    node getnetworkinfo;
    node getnodeaddresses(GetNodeAddressesParams);
    node getpeerinfo;
    node listbanned;
    node ping;
    node setban(SetBanParams);
    node setnetworkactive(SetNetworkActiveParams);

    // Raw transactions
    node analyzepsbt(PsbtParams);
    node combinepsbt(TxsParams);
    node combinerawtransaction(TxsParams);
    node converttopsbt(ConvertToPsbtParams);
    node createpsbt(CreateRawTransactionParams);
    node createrawtransaction(CreateRawTransactionParams);
    node decodepsbt(PsbtParams);
    node decoderawtransaction(DecodeRawTransactionParams);
    node decodescript(HexStringParams);
    node finalizepsbt(FinalizePsbtParams);
    wallet fundrawtransaction(FundRawTransactionParams);
    node getrawtransaction(GetRawTransactionParams);
    node joinpsbts(TxsParams);
    node sendrawtransaction(SendRawTransactionParams);
    node signrawtransactionwithkey(SignRawTransactionWithKeyParams);
    node testmempoolaccept(TestMempoolAcceptParams);
    node utxoupdatepsbt(PsbtParams);

    // Util
    node createmultisig(CreateMultisigParams);
    node deriveaddresses(DeriveAddressesParams);
    node estimatesmartfee(EstimateSmartFeeParams);
    node getdescriptorinfo(DescriptorParams);
    node getindexinfo(GetIndexInfoParams);
    node signmessagewithprivkey(SignMessageWithPrivKeyParams);
    node validateaddress(AddressParams);
    node verifymessage(VerifyMessageParams);

    // Wallet
    wallet abandontransaction(TxidParams);
    wallet abortrescan;
    wallet addmultisigaddress(AddMultisigAddressParams);
    wallet backupwallet(BackupWalletParams);
    wallet bumpfee(BumpFeeParams);
    node createwallet(CreateWalletParams);
    wallet dumpprivkey(AddressParams);
    wallet dumpwallet(FilenameParams);
    wallet encryptwallet(PassphraseParams);
    wallet getaddressesbylabel(LabelParams);
    wallet getaddressinfo(AddressParams);
    wallet getbalance(GetBalanceParams);
    wallet getbalances;
    wallet getnewaddress(GetNewAddressParams);
    wallet getrawchangeaddress(AddressTypeParams);
    wallet getreceivedbyaddress(GetReceivedByAddressParams);
    wallet getreceivedbylabel(GetReceivedByLabelParams);
    wallet gettransaction(GetTransactionParams);
    wallet getunconfirmedbalance;
    wallet getwalletinfo;
    wallet importaddress(ImportAddressParams);
    wallet importdescriptors(ImportDescriptorsParams);
    wallet importmulti(ImportMultiParams);
    wallet importprivkey(ImportPrivKeyParams);
    wallet importprunedfunds(ImportPrunedFundsParams);
    wallet importpubkey(ImportPubKeyParams);
    wallet importwallet(FilenameParams);
    wallet keypoolrefill(KeypoolRefillParams);
    wallet listaddressgroupings;
    wallet listdescriptors(ListDescriptorsParams);
    wallet listlabels(ListLabelsParams);
    wallet listlockunspent;
    wallet listreceivedbyaddress(ListReceivedByAddressParams);
    wallet listreceivedbylabel(ListReceivedByLabelParams);
    wallet listsinceblock(ListSinceBlockParams);
    wallet listtransactions(ListTransactionsParams);
    wallet listunspent(ListUnspentParams);
    node listwalletdir;
    node listwallets;
    node loadwallet(LoadWalletParams);
    wallet lockunspent(LockUnspentParams);
    wallet removeprunedfunds(TxidParams);
    wallet rescanblockchain(RescanBlockchainParams);
    wallet sendmany(SendManyParams);
    wallet sendtoaddress(SendToAddressParams);
    wallet sethdseed(SetHdSeedParams);
    wallet setlabel(SetLabelParams);
    wallet settxfee(SetTxFeeParams);
    wallet signmessage(SignMessageParams);
    wallet signrawtransactionwithwallet(SignRawTransactionWithWalletParams);
    /// Unloads `wallet_name` when set, posting to `/` unless `wallet` is
    /// given. Otherwise unloads the routed wallet.
    wallet unloadwallet(UnloadWalletParams);
    wallet walletcreatefundedpsbt(WalletCreateFundedPsbtParams);
    wallet walletlock;
    wallet walletpassphrase(WalletPassphraseParams);
    wallet walletpassphrasechange(WalletPassphraseChangeParams);
    wallet walletprocesspsbt(WalletProcessPsbtParams);

    // ZMQ
    node getzmqnotifications;
}
