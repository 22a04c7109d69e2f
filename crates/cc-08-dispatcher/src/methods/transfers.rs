//! Cross-channel transfers opened by users or the admin, and transfer
//! queries. Queries answer in JSON.

use serde::{Deserialize, Serialize};

use cc_03_cross_channel::{invariant_admin, CrossChannelService, NewTransfer, TransferItem};
use cc_05_method_registry::{
    AddressArg, Args, BigIntArg, Check, Context, JsonArg, Method, StringArg, U64Arg,
};
use shared_types::{Address, ContractError};

/// One item of a multi-asset transfer request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferItemSpec {
    pub token: String,
    /// Decimal amount.
    pub amount: String,
}

impl TransferItemSpec {
    fn parse(&self) -> Result<TransferItem, ContractError> {
        Ok(TransferItem::parse(&self.token, &self.amount)?)
    }
}

impl Check for TransferItemSpec {
    fn check(&self) -> Result<(), String> {
        TransferItem::parse(&self.token, &self.amount)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

pub fn methods() -> Vec<Method> {
    vec![
        Method::batched("channelTransferByCustomer", by_customer)
            .with_auth()
            .param(StringArg)
            .param(StringArg)
            .param(StringArg)
            .param(BigIntArg),
        Method::batched("channelTransferByAdmin", by_admin)
            .with_auth()
            .param(StringArg)
            .param(StringArg)
            .param(AddressArg)
            .param(StringArg)
            .param(BigIntArg),
        Method::batched("channelMultiTransferByCustomer", multi_by_customer)
            .with_auth()
            .param(StringArg)
            .param(StringArg)
            .param(JsonArg::<Vec<TransferItemSpec>>::new()),
        Method::batched("channelMultiTransferByAdmin", multi_by_admin)
            .with_auth()
            .param(StringArg)
            .param(StringArg)
            .param(AddressArg)
            .param(JsonArg::<Vec<TransferItemSpec>>::new()),
        Method::query("channelTransferFrom", transfer_from).param(StringArg),
        Method::query("channelTransferTo", transfer_to).param(StringArg),
        Method::query("channelTransfersFrom", transfers_from)
            .param(U64Arg)
            .param(StringArg),
    ]
}

fn service(ctx: &Context<'_>) -> CrossChannelService {
    CrossChannelService::new(ctx.config.contract.max_channel_transfer_items as usize)
}

fn admin_sender(ctx: &Context<'_>) -> Result<(), ContractError> {
    let sender = ctx.sender()?;
    Ok(invariant_admin(sender.address(), ctx.config.contract.admin.as_ref())?)
}

fn open(
    ctx: &mut Context<'_>,
    args: &Args,
    user: Address,
    items: Vec<TransferItem>,
    multi: bool,
) -> Result<Vec<u8>, ContractError> {
    let transfer = NewTransfer {
        id: args.str(0)?.to_string(),
        to: args.str(1)?.to_string(),
        user,
        items,
        multi,
    };
    service(ctx).create_from(ctx.stub, &transfer)?;
    Ok(Vec::new())
}

fn single_item(args: &Args, at: usize) -> Result<Vec<TransferItem>, ContractError> {
    let amount = args.big_int(at + 1)?.to_string();
    Ok(vec![TransferItem::parse(args.str(at)?, &amount)?])
}

fn item_list(args: &Args, at: usize) -> Result<Vec<TransferItem>, ContractError> {
    args.json::<Vec<TransferItemSpec>>(at)?
        .iter()
        .map(TransferItemSpec::parse)
        .collect()
}

fn by_customer(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let user = *ctx.sender()?.address();
    open(ctx, args, user, single_item(args, 2)?, false)
}

fn by_admin(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    admin_sender(ctx)?;
    open(ctx, args, args.address(2)?, single_item(args, 3)?, false)
}

fn multi_by_customer(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let user = *ctx.sender()?.address();
    open(ctx, args, user, item_list(args, 2)?, true)
}

fn multi_by_admin(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    admin_sender(ctx)?;
    open(ctx, args, args.address(2)?, item_list(args, 3)?, true)
}

fn json<T: Serialize>(value: &T) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(value).map_err(|e| ContractError::business(e.to_string()))
}

fn transfer_from(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    json(&service(ctx).get_from(ctx.stub, args.str(0)?)?)
}

fn transfer_to(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    json(&service(ctx).get_to(ctx.stub, args.str(0)?)?)
}

fn transfers_from(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let page_size = usize::try_from(args.u64(0)?)
        .map_err(|e| ContractError::InvalidArgument(e.to_string()))?;
    json(&service(ctx).list_from(ctx.stub, page_size, args.str(1)?)?)
}
