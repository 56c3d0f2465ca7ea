//! Typed parameter objects for the daemon's named-argument calls.
//!
//! Each struct is one row of the table below: `required` members become
//! `new()` arguments, `defaults` are filled in by `new()` and always sent,
//! `optional` members are left off the wire until set. Every defaulted or
//! optional member has a same-named builder setter.

use bitcoin::{BlockHash, Txid};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ClientError;

macro_rules! rpc_params {
    ($(
        $(#[$meta:meta])*
        $name:ident {
            required { $( $req:ident : $req_ty:ty ),* $(,)? }
            defaults { $( $def:ident : $def_ty:ty = $def_val:expr ),* $(,)? }
            optional { $( $opt:ident : $opt_ty:ty ),* $(,)? }
        }
    )*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct $name {
            $( pub $req: $req_ty, )*
            $( pub $def: $def_ty, )*
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $opt: Option<$opt_ty>,
            )*
        }

        impl $name {
            #[allow(clippy::new_without_default, clippy::too_many_arguments)]
            pub fn new($( $req: $req_ty ),*) -> Self {
                Self {
                    $( $req, )*
                    $( $def: $def_val, )*
                    $( $opt: None, )*
                }
            }

            $(
                pub fn $def(mut self, $def: $def_ty) -> Self {
                    self.$def = $def;
                    self
                }
            )*

            $(
                pub fn $opt(mut self, $opt: $opt_ty) -> Self {
                    self.$opt = Some($opt);
                    self
                }
            )*
        }
    )*};
}

/// Sent as `{}` by methods that take no arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoParams {}

// ==============================================================================
// Union Parameters
// ==============================================================================

/// `disconnectnode` target: exactly one of `address` or `nodeid` goes out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DisconnectNodeParams {
    #[serde(rename = "address")]
    Address(String),
    #[serde(rename = "nodeid")]
    NodeId(u64),
}

impl DisconnectNodeParams {
    /// Build from loosely-typed input, rejecting both-or-neither before any
    /// request is made.
    pub fn from_parts(address: Option<String>, nodeid: Option<u64>) -> Result<Self, ClientError> {
        match (address, nodeid) {
            (Some(address), None) => Ok(Self::Address(address)),
            (None, Some(nodeid)) => Ok(Self::NodeId(nodeid)),
            (Some(_), Some(_)) => Err(ClientError::InvalidParams(
                "disconnectnode: `address` and `nodeid` are mutually exclusive".to_owned(),
            )),
            (None, None) => Err(ClientError::InvalidParams(
                "disconnectnode: one of `address` or `nodeid` is required".to_owned(),
            )),
        }
    }
}

/// Block selector for `getblockstats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HashOrHeight {
    Hash(BlockHash),
    Height(u64),
}

impl From<BlockHash> for HashOrHeight {
    fn from(hash: BlockHash) -> Self {
        Self::Hash(hash)
    }
}

impl From<u64> for HashOrHeight {
    fn from(height: u64) -> Self {
        Self::Height(height)
    }
}

// ==============================================================================
// Blockchain
// ==============================================================================

rpc_params! {
    GetBlockParams {
        required { blockhash: BlockHash }
        defaults { verbosity: u8 = 1 }
        optional {}
    }

    GetBlockFilterParams {
        required { blockhash: BlockHash }
        defaults { filtertype: String = "basic".to_owned() }
        optional {}
    }

    GetBlockHeaderParams {
        required { blockhash: BlockHash }
        defaults { verbose: bool = true }
        optional {}
    }

    GetBlockStatsParams {
        required { hash_or_height: HashOrHeight }
        defaults { stats: Vec<String> = Vec::new() }
        optional {}
    }

    GetChainTxStatsParams {
        required {}
        defaults {}
        optional { nblocks: u64, blockhash: BlockHash }
    }

    GetDeploymentInfoParams {
        required {}
        defaults {}
        optional { blockhash: BlockHash }
    }

    /// Shared by `getmempoolancestors` and `getmempooldescendants`.
    MempoolRelativesParams {
        required { txid: Txid }
        defaults { verbose: bool = false }
        optional {}
    }

    GetRawMempoolParams {
        required {}
        defaults { verbose: bool = false }
        optional {}
    }

    GetTxOutParams {
        required { txid: Txid, n: u32 }
        defaults { include_mempool: bool = true }
        optional {}
    }

    GetTxOutProofParams {
        required { txids: Vec<Txid> }
        defaults {}
        optional { blockhash: BlockHash }
    }

    ScanTxOutSetParams {
        required { action: String }
        defaults {}
        optional { scanobjects: Value }
    }

    VerifyChainParams {
        required {}
        defaults { checklevel: u8 = 3, nblocks: u64 = 6 }
        optional {}
    }

    ProofParams {
        required { proof: String }
        defaults {}
        optional {}
    }

    BlockHashParams {
        required { blockhash: BlockHash }
        defaults {}
        optional {}
    }

    HeightParams {
        required { height: u64 }
        defaults {}
        optional {}
    }

    TxidParams {
        required { txid: Txid }
        defaults {}
        optional {}
    }
}

// ==============================================================================
// Control, Generating, Mining
// ==============================================================================

rpc_params! {
    GetMemoryInfoParams {
        required {}
        defaults { mode: String = "stats".to_owned() }
        optional {}
    }

    HelpParams {
        required {}
        defaults {}
        optional { command: String }
    }

    LoggingParams {
        required {}
        defaults {}
        optional { include: Vec<String>, exclude: Vec<String> }
    }

    GenerateToAddressParams {
        required { nblocks: u32, address: String }
        defaults { maxtries: u64 = 1_000_000 }
        optional {}
    }

    GenerateToDescriptorParams {
        required { num_blocks: u32, descriptor: String }
        defaults { maxtries: u64 = 1_000_000 }
        optional {}
    }

    GenerateBlockParams {
        required { output: String, transactions: Vec<String> }
        defaults {}
        optional {}
    }

    GetBlockTemplateParams {
        required {}
        defaults { template_request: Value = json!({"rules": ["segwit"]}) }
        optional {}
    }

    GetNetworkHashPsParams {
        required {}
        defaults { nblocks: i64 = 120, height: i64 = -1 }
        optional {}
    }

    PrioritiseTransactionParams {
        required { txid: Txid, fee_delta: i64 }
        defaults {}
        optional {}
    }

    SubmitBlockParams {
        required { hexdata: String }
        defaults {}
        optional { dummy: String }
    }

    SubmitHeaderParams {
        required { hexdata: String }
        defaults {}
        optional {}
    }
}

// ==============================================================================
// Network
// ==============================================================================

rpc_params! {
    /// `command` is one of `add`, `remove` or `onetry`.
    AddNodeParams {
        required { node: String, command: String }
        defaults {}
        optional {}
    }

    GetAddedNodeInfoParams {
        required {}
        defaults {}
        optional { node: String }
    }

    GetNodeAddressesParams {
        required {}
        defaults { count: u32 = 1 }
        optional {}
    }

    /// `command` is `add` or `remove`.
    SetBanParams {
        required { subnet: String, command: String }
        defaults { bantime: u64 = 0, absolute: bool = false }
        optional {}
    }

    SetNetworkActiveParams {
        required { state: bool }
        defaults {}
        optional {}
    }
}

// ==============================================================================
// Raw Transactions
// ==============================================================================

rpc_params! {
    /// Shared by `analyzepsbt`, `decodepsbt` and `utxoupdatepsbt`.
    PsbtParams {
        required { psbt: String }
        defaults {}
        optional {}
    }

    /// Shared by `combinepsbt`, `combinerawtransaction` and `joinpsbts`.
    TxsParams {
        required { txs: Vec<String> }
        defaults {}
        optional {}
    }

    ConvertToPsbtParams {
        required { hexstring: String }
        defaults { permitsigdata: bool = false }
        optional { iswitness: bool }
    }

    /// Shared by `createrawtransaction` and `createpsbt`.
    CreateRawTransactionParams {
        required { inputs: Value, outputs: Value }
        defaults { locktime: u32 = 0, replaceable: bool = false }
        optional {}
    }

    DecodeRawTransactionParams {
        required { hexstring: String }
        defaults {}
        optional { iswitness: bool }
    }

    HexStringParams {
        required { hexstring: String }
        defaults {}
        optional {}
    }

    FinalizePsbtParams {
        required { psbt: String }
        defaults { extract: bool = true }
        optional {}
    }

    FundRawTransactionParams {
        required { hexstring: String }
        defaults { options: Value = json!({}) }
        optional { iswitness: bool }
    }

    GetRawTransactionParams {
        required { txid: Txid }
        defaults { verbose: bool = false }
        optional { blockhash: BlockHash }
    }

    SendRawTransactionParams {
        required { hexstring: String }
        defaults { maxfeerate: f64 = 0.1 }
        optional {}
    }

    SignRawTransactionWithKeyParams {
        required { hexstring: String, privkeys: Vec<String> }
        defaults { sighashtype: String = "ALL".to_owned() }
        optional { prevtxs: Value }
    }

    TestMempoolAcceptParams {
        required { rawtxs: Vec<String> }
        defaults { maxfeerate: f64 = 0.1 }
        optional {}
    }
}

// ==============================================================================
// Util
// ==============================================================================

rpc_params! {
    CreateMultisigParams {
        required { nrequired: u32, keys: Vec<String> }
        defaults { address_type: String = "legacy".to_owned() }
        optional {}
    }

    DeriveAddressesParams {
        required { descriptor: String }
        defaults {}
        optional { range: Value }
    }

    EstimateSmartFeeParams {
        required { conf_target: u32 }
        defaults { estimate_mode: String = "CONSERVATIVE".to_owned() }
        optional {}
    }

    DescriptorParams {
        required { descriptor: String }
        defaults {}
        optional {}
    }

    GetIndexInfoParams {
        required {}
        defaults {}
        optional { index_name: String }
    }

    SignMessageWithPrivKeyParams {
        required { privkey: String, message: String }
        defaults {}
        optional {}
    }

    /// Shared by `validateaddress`, `dumpprivkey` and `getaddressinfo`.
    AddressParams {
        required { address: String }
        defaults {}
        optional {}
    }

    VerifyMessageParams {
        required { address: String, signature: String, message: String }
        defaults {}
        optional {}
    }
}

// ==============================================================================
// Wallet
// ==============================================================================

rpc_params! {
    AddMultisigAddressParams {
        required { nrequired: u32, keys: Vec<String> }
        defaults {}
        optional { label: String, address_type: String }
    }

    BackupWalletParams {
        required { destination: String }
        defaults {}
        optional {}
    }

    BumpFeeParams {
        required { txid: Txid }
        defaults {}
        optional { options: Value }
    }

    CreateWalletParams {
        required { wallet_name: String }
        defaults { disable_private_keys: bool = false, blank: bool = false }
        optional {
            passphrase: String,
            avoid_reuse: bool,
            descriptors: bool,
            load_on_startup: bool,
        }
    }

    /// Shared by `dumpwallet` and `importwallet`.
    FilenameParams {
        required { filename: String }
        defaults {}
        optional {}
    }

    PassphraseParams {
        required { passphrase: String }
        defaults {}
        optional {}
    }

    LabelParams {
        required { label: String }
        defaults {}
        optional {}
    }

    GetBalanceParams {
        required {}
        defaults { minconf: u32 = 0, include_watchonly: bool = false }
        optional { avoid_reuse: bool }
    }

    GetNewAddressParams {
        required {}
        defaults {}
        optional { label: String, address_type: String }
    }

    AddressTypeParams {
        required {}
        defaults {}
        optional { address_type: String }
    }

    GetReceivedByAddressParams {
        required { address: String }
        defaults { minconf: u32 = 1 }
        optional {}
    }

    GetReceivedByLabelParams {
        required { label: String }
        defaults { minconf: u32 = 1 }
        optional {}
    }

    GetTransactionParams {
        required { txid: Txid }
        defaults { include_watchonly: bool = false }
        optional { verbose: bool }
    }

    ImportAddressParams {
        required { address: String }
        defaults { label: String = String::new(), rescan: bool = true, p2sh: bool = false }
        optional {}
    }

    ImportDescriptorsParams {
        required { requests: Value }
        defaults {}
        optional {}
    }

    ImportMultiParams {
        required { requests: Value }
        defaults {}
        optional { options: Value }
    }

    ImportPrivKeyParams {
        required { privkey: String }
        defaults { label: String = String::new(), rescan: bool = true }
        optional {}
    }

    ImportPrunedFundsParams {
        required { rawtransaction: String, txoutproof: String }
        defaults {}
        optional {}
    }

    ImportPubKeyParams {
        required { pubkey: String }
        defaults { label: String = String::new(), rescan: bool = true }
        optional {}
    }

    KeypoolRefillParams {
        required {}
        defaults { newsize: u32 = 100 }
        optional {}
    }

    ListDescriptorsParams {
        required {}
        defaults { private: bool = false }
        optional {}
    }

    ListLabelsParams {
        required {}
        defaults {}
        optional { purpose: String }
    }

    ListReceivedByAddressParams {
        required {}
        defaults { minconf: u32 = 1, include_empty: bool = false, include_watchonly: bool = false }
        optional { address_filter: String }
    }

    ListReceivedByLabelParams {
        required {}
        defaults { minconf: u32 = 1, include_empty: bool = false, include_watchonly: bool = false }
        optional {}
    }

    ListSinceBlockParams {
        required {}
        defaults {
            target_confirmations: u32 = 1,
            include_watchonly: bool = false,
            include_removed: bool = true,
        }
        optional { blockhash: BlockHash }
    }

    ListTransactionsParams {
        required {}
        defaults {
            label: String = "*".to_owned(),
            count: u32 = 10,
            skip: u32 = 0,
            include_watchonly: bool = false,
        }
        optional {}
    }

    ListUnspentParams {
        required {}
        defaults { minconf: u32 = 1, maxconf: u32 = 9_999_999, include_unsafe: bool = true }
        optional { addresses: Vec<String>, query_options: Value }
    }

    LoadWalletParams {
        required { filename: String }
        defaults {}
        optional { load_on_startup: bool }
    }

    LockUnspentParams {
        required { unlock: bool }
        defaults {}
        optional { transactions: Value }
    }

    RescanBlockchainParams {
        required {}
        defaults { start_height: u64 = 0 }
        optional { stop_height: u64 }
    }

    SendManyParams {
        required { amounts: Value }
        defaults { minconf: u32 = 1, estimate_mode: String = "UNSET".to_owned() }
        optional {
            comment: String,
            subtractfeefrom: Vec<String>,
            replaceable: bool,
            conf_target: u32,
        }
    }

    SendToAddressParams {
        required { address: String, amount: f64 }
        defaults { subtractfeefromamount: bool = false, estimate_mode: String = "UNSET".to_owned() }
        optional { comment: String, comment_to: String, replaceable: bool, conf_target: u32 }
    }

    SetHdSeedParams {
        required {}
        defaults { newkeypool: bool = true }
        optional { seed: String }
    }

    SetLabelParams {
        required { address: String, label: String }
        defaults {}
        optional {}
    }

    SetTxFeeParams {
        required { amount: f64 }
        defaults {}
        optional {}
    }

    SignMessageParams {
        required { address: String, message: String }
        defaults {}
        optional {}
    }

    SignRawTransactionWithWalletParams {
        required { hexstring: String }
        defaults { sighashtype: String = "ALL".to_owned() }
        optional { prevtxs: Value }
    }

    UnloadWalletParams {
        required {}
        defaults {}
        optional { wallet_name: String, load_on_startup: bool }
    }

    WalletCreateFundedPsbtParams {
        required { inputs: Value, outputs: Value }
        defaults { locktime: u32 = 0, bip32derivs: bool = true }
        optional { options: Value }
    }

    WalletPassphraseParams {
        required { passphrase: String, timeout: u64 }
        defaults {}
        optional {}
    }

    WalletPassphraseChangeParams {
        required { oldpassphrase: String, newpassphrase: String }
        defaults {}
        optional {}
    }

    WalletProcessPsbtParams {
        required { psbt: String }
        defaults { sign: bool = true, sighashtype: String = "ALL".to_owned(), bip32derivs: bool = true }
        optional {}
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::hashes::Hash;

    use super::*;

    #[test]
    fn no_params_is_empty_object() {
        assert_eq!(serde_json::to_value(NoParams {}).unwrap(), json!({}));
    }

    #[test]
    fn defaults_are_sent_and_unset_optionals_are_not() {
        let params = GetRawTransactionParams::new(Txid::all_zeros());
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"txid": Txid::all_zeros().to_string(), "verbose": false})
        );

        let params = params.verbose(true).blockhash(BlockHash::all_zeros());
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["verbose"], json!(true));
        assert_eq!(value["blockhash"], json!(BlockHash::all_zeros().to_string()));
    }

    #[test]
    fn listtransactions_defaults() {
        assert_eq!(
            serde_json::to_value(ListTransactionsParams::new()).unwrap(),
            json!({"label": "*", "count": 10, "skip": 0, "include_watchonly": false})
        );
    }

    #[test]
    fn documented_defaults_go_out_on_the_wire() {
        let hash = BlockHash::all_zeros();
        let cases = [
            (
                "getblockheader",
                serde_json::to_value(GetBlockHeaderParams::new(hash)).unwrap(),
                json!({"blockhash": hash.to_string(), "verbose": true}),
            ),
            (
                "getrawmempool",
                serde_json::to_value(GetRawMempoolParams::new()).unwrap(),
                json!({"verbose": false}),
            ),
            (
                "verifychain",
                serde_json::to_value(VerifyChainParams::new()).unwrap(),
                json!({"checklevel": 3, "nblocks": 6}),
            ),
            (
                "getnetworkhashps",
                serde_json::to_value(GetNetworkHashPsParams::new()).unwrap(),
                json!({"nblocks": 120, "height": -1}),
            ),
            (
                "getbalance",
                serde_json::to_value(GetBalanceParams::new()).unwrap(),
                json!({"minconf": 0, "include_watchonly": false}),
            ),
            (
                "listunspent",
                serde_json::to_value(ListUnspentParams::new()).unwrap(),
                json!({"minconf": 1, "maxconf": 9_999_999, "include_unsafe": true}),
            ),
            (
                "estimatesmartfee",
                serde_json::to_value(EstimateSmartFeeParams::new(6)).unwrap(),
                json!({"conf_target": 6, "estimate_mode": "CONSERVATIVE"}),
            ),
            (
                "sendrawtransaction",
                serde_json::to_value(SendRawTransactionParams::new("00".to_owned())).unwrap(),
                json!({"hexstring": "00", "maxfeerate": 0.1}),
            ),
            (
                "keypoolrefill",
                serde_json::to_value(KeypoolRefillParams::new()).unwrap(),
                json!({"newsize": 100}),
            ),
            (
                "getmemoryinfo",
                serde_json::to_value(GetMemoryInfoParams::new()).unwrap(),
                json!({"mode": "stats"}),
            ),
            (
                "getnodeaddresses",
                serde_json::to_value(GetNodeAddressesParams::new()).unwrap(),
                json!({"count": 1}),
            ),
            (
                "generatetoaddress",
                serde_json::to_value(GenerateToAddressParams::new(1, "bcrt1q".to_owned()))
                    .unwrap(),
                json!({"nblocks": 1, "address": "bcrt1q", "maxtries": 1_000_000}),
            ),
            (
                "signrawtransactionwithkey",
                serde_json::to_value(SignRawTransactionWithKeyParams::new(
                    "00".to_owned(),
                    vec!["key".to_owned()],
                ))
                .unwrap(),
                json!({"hexstring": "00", "privkeys": ["key"], "sighashtype": "ALL"}),
            ),
            (
                "signrawtransactionwithwallet",
                serde_json::to_value(SignRawTransactionWithWalletParams::new("00".to_owned()))
                    .unwrap(),
                json!({"hexstring": "00", "sighashtype": "ALL"}),
            ),
            (
                "walletprocesspsbt",
                serde_json::to_value(WalletProcessPsbtParams::new("cHNidP8=".to_owned())).unwrap(),
                json!({"psbt": "cHNidP8=", "sign": true, "sighashtype": "ALL", "bip32derivs": true}),
            ),
        ];

        for (method, actual, expected) in cases {
            assert_eq!(actual, expected, "{method} defaults");
        }
    }

    #[test]
    fn setters_override_defaults() {
        let params = VerifyChainParams::new().checklevel(4).nblocks(0);
        assert_eq!(
            serde_json::to_value(params).unwrap(),
            json!({"checklevel": 4, "nblocks": 0})
        );
        let params = EstimateSmartFeeParams::new(2).estimate_mode("ECONOMICAL".to_owned());
        assert_eq!(
            serde_json::to_value(params).unwrap()["estimate_mode"],
            json!("ECONOMICAL")
        );
    }

    #[test]
    fn disconnect_node_sends_exactly_one_key() {
        let by_address = DisconnectNodeParams::Address("1.2.3.4:8333".to_owned());
        assert_eq!(
            serde_json::to_value(&by_address).unwrap(),
            json!({"address": "1.2.3.4:8333"})
        );
        let by_id = DisconnectNodeParams::NodeId(5);
        assert_eq!(serde_json::to_value(&by_id).unwrap(), json!({"nodeid": 5}));
    }

    #[test]
    fn disconnect_node_from_parts_rejects_both_and_neither() {
        let both = DisconnectNodeParams::from_parts(Some("1.2.3.4:8333".into()), Some(5));
        assert!(matches!(both, Err(ClientError::InvalidParams(_))));
        let neither = DisconnectNodeParams::from_parts(None, None);
        assert!(matches!(neither, Err(ClientError::InvalidParams(_))));
        assert_eq!(
            DisconnectNodeParams::from_parts(None, Some(5)).unwrap(),
            DisconnectNodeParams::NodeId(5)
        );
    }

    #[test]
    fn hash_or_height_is_untagged() {
        let by_height = GetBlockStatsParams::new(HashOrHeight::from(1000u64));
        assert_eq!(
            serde_json::to_value(&by_height).unwrap(),
            json!({"hash_or_height": 1000, "stats": []})
        );
        let by_hash = GetBlockStatsParams::new(BlockHash::all_zeros().into());
        assert_eq!(
            serde_json::to_value(&by_hash).unwrap()["hash_or_height"],
            json!(BlockHash::all_zeros().to_string())
        );
    }
}
