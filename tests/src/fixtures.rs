//! # Test Fixtures
//!
//! A demo token contract, deterministic signers and a ready-to-use channel:
//! an in-memory ledger with an ACL double installed and the config stored.

use prost::Message;

use cc_01_state_cache::balance::{self, BalanceType};
use cc_01_state_cache::MockLedger;
use cc_05_method_registry::{AddressArg, Args, Context, Method, U64Arg};
use cc_06_authenticator::signing_message;
use cc_08_dispatcher::{Chaincode, Contract};
use shared_crypto::{sha3_256, Ed25519KeyPair};
use shared_types::acl::ACL_CHAINCODE;
use shared_types::proto::{
    AccountInfo, AclResponse, AddressProto, Batch, BatchResponse, SignaturePolicy, SignedAddress,
};
use shared_types::{Address, ContractError, Response, U256};

/// SKI of the driver certificate on every test channel.
pub const ROBOT_SKI: [u8; 4] = [0x0b, 0x07, 0x0a, 0x01];

/// Nonce of the first signed call in most flows (milliseconds).
pub const NONCE: u64 = 1_700_000_000_000;

// =============================================================================
// DEMO CONTRACT
// =============================================================================

/// Token contract with one signed transfer and two probes.
///
/// | Method | Kind | Behavior |
/// |--------|------|----------|
/// | `transfer(to, amount)` | batched, signed | moves channel tokens |
/// | `explode()` | batched | panics |
/// | `peek()` | query | tries to write `k` and emit an event |
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenContract;

impl Contract for TokenContract {
    fn methods(&self) -> Vec<Method> {
        vec![
            Method::batched("transfer", transfer)
                .with_auth()
                .param(AddressArg)
                .param(U64Arg),
            Method::batched("explode", explode),
            Method::query("peek", peek),
        ]
    }
}

fn transfer(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let from = ctx.sender()?.address().to_base58();
    let to = args.address(0)?.to_base58();
    if from == to {
        return Err(ContractError::business("transfer to self"));
    }
    let symbol = ctx.config.symbol().to_string();
    let amount = U256::from(args.u64(1)?);
    balance::transfer(ctx.stub, BalanceType::Token, &from, &to, &symbol, &amount, "transfer")?;
    Ok(Vec::new())
}

fn explode(_: &mut Context<'_>, _: &Args) -> Result<Vec<u8>, ContractError> {
    panic!("explode called")
}

fn peek(ctx: &mut Context<'_>, _: &Args) -> Result<Vec<u8>, ContractError> {
    ctx.stub.put_state("k", b"v".to_vec())?;
    ctx.stub.set_event("peeked", Vec::new())?;
    Ok(b"peeked".to_vec())
}

// =============================================================================
// SIGNERS
// =============================================================================

/// Single-key Ed25519 signer.
pub struct Signer {
    keys: Ed25519KeyPair,
}

impl Signer {
    pub fn new(seed: u8) -> Self {
        Self {
            keys: Ed25519KeyPair::from_seed([seed; 32]),
        }
    }

    pub fn public_key(&self) -> String {
        bs58::encode(self.keys.public_key().as_bytes()).into_string()
    }

    pub fn address(&self) -> Address {
        Address::from_public_keys(&[self.keys.public_key().as_bytes()])
    }

    /// Full signed argument list for `function` on `channel`.
    ///
    /// Layout: request id, chaincode, channel, user args, nonce, key, signature.
    pub fn sign(&self, function: &str, channel: &str, user_args: &[&str], nonce: u64) -> Vec<String> {
        let mut raw = vec![format!("req-{nonce}"), channel.to_string(), channel.to_string()];
        raw.extend(user_args.iter().map(|a| a.to_string()));
        raw.push(nonce.to_string());
        raw.push(self.public_key());
        let digest = sha3_256(&signing_message(function, &raw));
        raw.push(bs58::encode(self.keys.sign(&digest).as_bytes()).into_string());
        raw
    }
}

// =============================================================================
// CHANNELS
// =============================================================================

/// One channel: its ledger and the chaincode deployed on it.
///
/// The channel id and the chaincode name are both the lowercase symbol.
pub struct Channel {
    pub name: String,
    pub ledger: MockLedger,
    pub chaincode: Chaincode,
}

impl Channel {
    /// Deploy [`TokenContract`] on a fresh channel.
    pub fn open(name: &str) -> Self {
        let chaincode = Chaincode::new(TokenContract).unwrap();
        Self::with_chaincode(name, chaincode)
    }

    /// Deploy `chaincode` on a fresh channel.
    pub fn with_chaincode(name: &str, chaincode: Chaincode) -> Self {
        let mut ledger = MockLedger::new(name, name);
        install_acl(&mut ledger);
        ledger.set_creator(b"robot".to_vec(), ROBOT_SKI.to_vec());
        let config = format!(
            r#"{{"contract":{{"symbol":"{}","robotSKI":"{}"}}}}"#,
            name.to_uppercase(),
            hex::encode(ROBOT_SKI)
        );
        let resp = ledger.execute("00", &config, Vec::new(), |l| chaincode.init(l));
        assert!(resp.is_ok(), "init: {}", resp.message);
        Self {
            name: name.to_string(),
            ledger,
            chaincode,
        }
    }

    pub fn symbol(&self) -> String {
        self.name.to_uppercase()
    }

    pub fn as_robot(&mut self) {
        self.ledger.set_creator(b"robot".to_vec(), ROBOT_SKI.to_vec());
    }

    pub fn as_user(&mut self) {
        self.ledger.set_creator(b"user".to_vec(), vec![0x55]);
    }

    /// Invoke under the current creator.
    pub fn invoke(&mut self, tx: &str, method: &str, args: &[String]) -> Response {
        let chaincode = &self.chaincode;
        self.ledger
            .execute(tx, method, args.to_vec(), |l| chaincode.invoke(l))
    }

    /// Signed user call.
    pub fn submit(
        &mut self,
        tx: &str,
        signer: &Signer,
        method: &str,
        user_args: &[&str],
        nonce: u64,
    ) -> Response {
        self.as_user();
        let args = signer.sign(method, &self.name, user_args, nonce);
        self.invoke(tx, method, &args)
    }

    /// Driver call with a hex-encoded protobuf argument.
    pub fn robot_call<M: Message>(&mut self, tx: &str, method: &str, message: &M) -> Response {
        self.as_robot();
        let arg = hex::encode(message.encode_to_vec());
        self.invoke(tx, method, &[arg])
    }

    /// Run `batch` and decode its response.
    pub fn batch(&mut self, tx: &str, batch: &Batch) -> BatchResponse {
        let resp = self.robot_call(tx, "batchExecute", batch);
        assert!(resp.is_ok(), "batchExecute: {}", resp.message);
        BatchResponse::decode(resp.payload.as_slice()).unwrap()
    }

    /// Batch of pending transaction ids, given as hex.
    pub fn batch_txs(&mut self, tx: &str, pending: &[&str]) -> BatchResponse {
        let batch = Batch {
            tx_ids: pending.iter().map(|id| hex::decode(id).unwrap()).collect(),
            ..Default::default()
        };
        self.batch(tx, &batch)
    }

    /// Credit channel tokens outside any invocation.
    pub fn mint(&mut self, to: &Address, amount: u64) {
        self.mint_exact(to, U256::from(amount));
    }

    pub fn mint_exact(&mut self, to: &Address, amount: U256) {
        let symbol = self.symbol();
        self.ledger.execute_ok("ff", |l| {
            balance::add(l, BalanceType::Token, &to.to_base58(), &symbol, &amount, "mint").unwrap();
        });
    }

    pub fn balance(&mut self, ty: BalanceType, holder: &str, token: &str) -> U256 {
        balance::get_balance(&mut self.ledger, ty, holder, token).unwrap()
    }

    /// Channel-token balance of `address`.
    pub fn tokens(&mut self, address: &Address) -> U256 {
        let symbol = self.symbol();
        self.balance(BalanceType::Token, &address.to_base58(), &symbol)
    }
}

/// ACL double: the address is derived from the presented keys, every key is
/// Ed25519 and all of them must sign.
pub fn install_acl(ledger: &mut MockLedger) {
    ledger.register_chaincode(ACL_CHAINCODE, |args, _| {
        let joined = String::from_utf8_lossy(&args[1]).into_owned();
        let keys: Vec<Vec<u8>> = joined
            .split('/')
            .map(|k| bs58::decode(k).into_vec().unwrap_or_default())
            .collect();
        let resp = AclResponse {
            account: Some(AccountInfo::default()),
            address: Some(SignedAddress {
                address: Some(AddressProto {
                    address: Address::from_public_keys(&keys).as_bytes().to_vec(),
                    ..Default::default()
                }),
                signature_policy: Some(SignaturePolicy { n: 0 }),
            }),
            key_types: Vec::new(),
        };
        Response::success(resp.encode_to_vec())
    });
}
