//! Swap entry points on the origin channel and swap queries.

use prost::Message;
use serde::Deserialize;

use cc_04_atomic_swap::{MultiSwapAssets, MultiSwapRequest, SwapRequest, SwapService};
use cc_05_method_registry::{
    Args, BigIntArg, Check, Context, HexBytesArg, JsonArg, Method, StringArg,
};
use shared_types::proto::{MultiSwap, Swap};
use shared_types::ContractError;

/// `multiSwapBegin` asset list, validated at decode time.
#[derive(Clone, Debug, Deserialize)]
#[serde(transparent)]
pub struct SwapAssets(pub MultiSwapAssets);

impl Check for SwapAssets {
    fn check(&self) -> Result<(), String> {
        self.0.to_groups().map(|_| ()).map_err(|e| e.to_string())
    }
}

pub fn methods() -> Vec<Method> {
    vec![
        Method::batched("swapBegin", swap_begin)
            .with_auth()
            .param(StringArg)
            .param(StringArg)
            .param(BigIntArg)
            .param(HexBytesArg),
        Method::batched("swapCancel", swap_cancel::<Swap>)
            .with_auth()
            .param(StringArg),
        Method::query("swapGet", swap_get::<Swap>).param(StringArg),
        Method::batched("multiSwapBegin", multi_swap_begin)
            .with_auth()
            .param(StringArg)
            .param(JsonArg::<SwapAssets>::new())
            .param(StringArg)
            .param(HexBytesArg),
        Method::batched("multiSwapCancel", swap_cancel::<MultiSwap>)
            .with_auth()
            .param(StringArg),
        Method::query("multiSwapGet", swap_get::<MultiSwap>).param(StringArg),
    ]
}

fn service(ctx: &Context<'_>) -> SwapService {
    SwapService::from_options(&ctx.config.contract.options)
}

/// Returns the hex swap id.
fn swap_begin(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let sender = *ctx.sender()?.address();
    let request = SwapRequest {
        token: args.str(0)?.to_string(),
        contract_to: args.str(1)?.to_string(),
        amount: args.big_int(2)?,
        hash: args.bytes(3)?,
    };
    let swap = service(ctx).begin(ctx.stub, &sender, &request)?;
    Ok(hex::encode(&swap.id).into_bytes())
}

fn multi_swap_begin(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let sender = *ctx.sender()?.address();
    let SwapAssets(assets) = args.json(1)?;
    let request = MultiSwapRequest {
        token: args.str(0)?.to_string(),
        assets,
        contract_to: args.str(2)?.to_string(),
        hash: args.bytes(3)?,
    };
    let swap = service(ctx).multi_begin(ctx.stub, &sender, &request)?;
    Ok(hex::encode(&swap.id).into_bytes())
}

fn swap_cancel<R>(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError>
where
    R: cc_04_atomic_swap::SwapRecord,
{
    let sender = *ctx.sender()?.address();
    service(ctx).cancel::<R>(ctx.stub, &sender, args.str(0)?)?;
    Ok(Vec::new())
}

/// Protobuf record.
fn swap_get<R>(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError>
where
    R: cc_04_atomic_swap::SwapRecord,
{
    let record = service(ctx).get::<R>(ctx.stub, args.str(0)?)?;
    Ok(record.encode_to_vec())
}
