//! Instruction dispatch

use crate::events::EventSink;
use crate::external::{NativeBank, PoolFactory, TokenLedger};
use crate::graduation::GraduationOutcome;
use crate::instructions::{BuyReceipt, CreateTokenParams, SellReceipt};
use crate::launchpad::{Launchpad, TxContext};
use launchpad_common::units::serde_units;
use launchpad_common::{Address, LaunchpadResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaunchpadInstruction {
    CreateToken(CreateTokenParams),
    Buy {
        token: Address,
        #[serde(default, with = "serde_units")]
        min_tokens_out: u128,
    },
    Sell {
        token: Address,
        #[serde(with = "serde_units")]
        amount: u128,
        #[serde(default, with = "serde_units")]
        min_okb_out: u128,
    },
    Approve {
        token: Address,
        #[serde(with = "serde_units")]
        amount: u128,
    },
    Graduate {
        token: Address,
    },
    ClaimRewards,
    WithdrawPlatformFees,
    SetFeeRecipient {
        recipient: Address,
    },
}

impl LaunchpadInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            LaunchpadInstruction::CreateToken(_) => "CreateToken",
            LaunchpadInstruction::Buy { .. } => "Buy",
            LaunchpadInstruction::Sell { .. } => "Sell",
            LaunchpadInstruction::Approve { .. } => "Approve",
            LaunchpadInstruction::Graduate { .. } => "Graduate",
            LaunchpadInstruction::ClaimRewards => "ClaimRewards",
            LaunchpadInstruction::WithdrawPlatformFees => "WithdrawPlatformFees",
            LaunchpadInstruction::SetFeeRecipient { .. } => "SetFeeRecipient",
        }
    }
}

/// Result of a processed instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstructionOutput {
    TokenCreated { token: Address },
    Bought(BuyReceipt),
    Sold(SellReceipt),
    Graduated(GraduationOutcome),
    Paid { amount: u128 },
    Done,
}

pub fn process_instruction<L, P, B, E>(
    launchpad: &mut Launchpad<L, P, B, E>,
    ctx: &TxContext,
    instruction: LaunchpadInstruction,
) -> LaunchpadResult<InstructionOutput>
where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    log::debug!("Instruction: {} from {}", instruction.name(), ctx.sender);

    match instruction {
        LaunchpadInstruction::CreateToken(params) => launchpad
            .create_token(ctx, params)
            .map(|token| InstructionOutput::TokenCreated { token }),
        LaunchpadInstruction::Buy {
            token,
            min_tokens_out,
        } => launchpad
            .buy(ctx, &token, min_tokens_out)
            .map(InstructionOutput::Bought),
        LaunchpadInstruction::Sell {
            token,
            amount,
            min_okb_out,
        } => launchpad
            .sell(ctx, &token, amount, min_okb_out)
            .map(InstructionOutput::Sold),
        LaunchpadInstruction::Approve { token, amount } => launchpad
            .approve(ctx, &token, amount)
            .map(|_| InstructionOutput::Done),
        LaunchpadInstruction::Graduate { token } => launchpad
            .graduate(&token, ctx.timestamp)
            .map(InstructionOutput::Graduated),
        LaunchpadInstruction::ClaimRewards => launchpad
            .claim_rewards(ctx)
            .map(|amount| InstructionOutput::Paid { amount }),
        LaunchpadInstruction::WithdrawPlatformFees => launchpad
            .withdraw_platform_fees(ctx)
            .map(|amount| InstructionOutput::Paid { amount }),
        LaunchpadInstruction::SetFeeRecipient { recipient } => launchpad
            .set_fee_recipient(ctx, recipient)
            .map(|_| InstructionOutput::Done),
    }
}
