//! Balance queries. Amounts are returned as decimal text.

use cc_01_state_cache::balance::{get_balance, BalanceType};
use cc_05_method_registry::{AddressArg, Args, Context, Method, StringArg};
use shared_types::{ContractError, U256};

pub fn methods() -> Vec<Method> {
    vec![
        Method::query("balanceOf", |ctx, args| {
            token_balance(ctx, args, BalanceType::Token)
        })
        .param(AddressArg),
        Method::query("lockedBalanceOf", |ctx, args| {
            token_balance(ctx, args, BalanceType::TokenLocked)
        })
        .param(AddressArg),
        Method::query("allowedBalanceOf", allowed_balance_of)
            .param(AddressArg)
            .param(StringArg),
        Method::query("givenBalance", given_balance).param(StringArg),
    ]
}

fn decimal(amount: U256) -> Vec<u8> {
    amount.to_string().into_bytes()
}

/// Balance of the channel token.
fn token_balance(
    ctx: &mut Context<'_>,
    args: &Args,
    ty: BalanceType,
) -> Result<Vec<u8>, ContractError> {
    let address = args.address(0)?.to_base58();
    let symbol = ctx.config.symbol().to_string();
    Ok(decimal(get_balance(ctx.stub, ty, &address, &symbol)?))
}

fn allowed_balance_of(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let address = args.address(0)?.to_base58();
    Ok(decimal(get_balance(
        ctx.stub,
        BalanceType::Allowed,
        &address,
        args.str(1)?,
    )?))
}

/// Value this channel owes to, or is owed by, another channel.
fn given_balance(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let channel = args.str(0)?;
    if channel.eq_ignore_ascii_case(&ctx.stub.channel_id()) {
        return Err(ContractError::InvalidArgument(format!(
            "given balance of own channel {channel}"
        )));
    }
    Ok(decimal(get_balance(ctx.stub, BalanceType::Given, channel, "")?))
}
