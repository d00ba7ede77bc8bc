//! The operation table. Ids follow the graphene protocol numbering.

use super::schema::{
    DefaultValue, FeeRule, FieldDef, FieldType, OperationSchema, VariantArm, VariantSchema,
};
use crate::{
    constants::{
        DEFAULT_PROPOSAL_LIFETIME_SECONDS, GRAPHENE_100_PERCENT, GRAPHENE_MAX_ASSET_PRECISION,
    },
    models::{AssetCreateVariant, OperationId},
};

const PERCENT: FieldType = FieldType::Uint {
    max: GRAPHENE_100_PERCENT,
};
const ORDER_ID: FieldType = FieldType::ObjectId {
    space: 1,
    type_id: 7,
};
const PROPOSAL_ID: FieldType = FieldType::ObjectId {
    space: 1,
    type_id: 10,
};
const VESTING_BALANCE_ID: FieldType = FieldType::ObjectId {
    space: 1,
    type_id: 13,
};
const ACCOUNT_SET: FieldType = FieldType::Set(&FieldType::ACCOUNT);
const ASSET_SET: FieldType = FieldType::Set(&FieldType::ASSET_ID);
const KEY_SET: FieldType = FieldType::Set(&FieldType::PublicKey);

const MEMO_FIELDS: &[FieldDef] = &[
    FieldDef::required("from", FieldType::PublicKey),
    FieldDef::required("to", FieldType::PublicKey),
    FieldDef::required("nonce", FieldType::UINT64),
    FieldDef::required("message", FieldType::HexBytes),
];
const MEMO: FieldType = FieldType::Object(MEMO_FIELDS);

const ASSET_OPTIONS_FIELDS: &[FieldDef] = &[
    FieldDef::required("max_supply", FieldType::SHARE),
    FieldDef::defaulted("market_fee_percent", PERCENT, DefaultValue::Uint(0)),
    FieldDef::defaulted("max_market_fee", FieldType::SHARE, DefaultValue::Uint(0)),
    FieldDef::required("issuer_permissions", FieldType::UINT16),
    FieldDef::required("flags", FieldType::UINT16),
    FieldDef::required("core_exchange_rate", FieldType::Price),
    FieldDef::defaulted("whitelist_authorities", ACCOUNT_SET, DefaultValue::EmptyArray),
    FieldDef::defaulted("blacklist_authorities", ACCOUNT_SET, DefaultValue::EmptyArray),
    FieldDef::defaulted("whitelist_markets", ASSET_SET, DefaultValue::EmptyArray),
    FieldDef::defaulted("blacklist_markets", ASSET_SET, DefaultValue::EmptyArray),
    FieldDef::required("description", FieldType::String),
    FieldDef::extensions(),
];

const BITASSET_OPTIONS_FIELDS: &[FieldDef] = &[
    FieldDef::required("feed_lifetime_sec", FieldType::UINT32),
    FieldDef::required("minimum_feeds", FieldType::UINT8),
    FieldDef::required("force_settlement_delay_sec", FieldType::UINT32),
    FieldDef::required("force_settlement_offset_percent", PERCENT),
    FieldDef::required("maximum_force_settlement_volume", PERCENT),
    FieldDef::required("short_backing_asset", FieldType::ASSET_ID),
    FieldDef::extensions(),
];

const OP_WRAPPER_FIELDS: &[FieldDef] = &[FieldDef::required("op", FieldType::Operation)];
const OP_WRAPPER: FieldType = FieldType::Object(OP_WRAPPER_FIELDS);

const TRANSFER: &[FieldDef] = &[
    FieldDef::required("from", FieldType::ACCOUNT),
    FieldDef::required("to", FieldType::ACCOUNT),
    FieldDef::required("amount", FieldType::Asset),
    FieldDef::optional("memo", MEMO),
    FieldDef::extensions(),
];

const LIMIT_ORDER_CREATE: &[FieldDef] = &[
    FieldDef::required("seller", FieldType::ACCOUNT),
    FieldDef::required("amount_to_sell", FieldType::Asset),
    FieldDef::required("min_to_receive", FieldType::Asset),
    FieldDef::required("expiration", FieldType::TimePointSec),
    FieldDef::defaulted("fill_or_kill", FieldType::Bool, DefaultValue::Bool(false)),
    FieldDef::extensions(),
];

const LIMIT_ORDER_CANCEL: &[FieldDef] = &[
    FieldDef::required("fee_paying_account", FieldType::ACCOUNT),
    FieldDef::required("order", ORDER_ID),
    FieldDef::extensions(),
];

const ACCOUNT_WHITELIST: &[FieldDef] = &[
    FieldDef::required("authorizing_account", FieldType::ACCOUNT),
    FieldDef::required("account_to_list", FieldType::ACCOUNT),
    FieldDef::required("new_listing", FieldType::Uint { max: 3 }),
    FieldDef::extensions(),
];

const ACCOUNT_UPGRADE: &[FieldDef] = &[
    FieldDef::required("account_to_upgrade", FieldType::ACCOUNT),
    FieldDef::defaulted(
        "upgrade_to_lifetime_member",
        FieldType::Bool,
        DefaultValue::Bool(false),
    ),
    FieldDef::extensions(),
];

const ACCOUNT_TRANSFER: &[FieldDef] = &[
    FieldDef::required("account_id", FieldType::ACCOUNT),
    FieldDef::required("new_owner", FieldType::ACCOUNT),
    FieldDef::extensions(),
];

const ASSET_CREATE: &[FieldDef] = &[
    FieldDef::required("issuer", FieldType::ACCOUNT),
    FieldDef::required("symbol", FieldType::Symbol),
    FieldDef::required(
        "precision",
        FieldType::Uint {
            max: GRAPHENE_MAX_ASSET_PRECISION,
        },
    ),
    FieldDef::required("common_options", FieldType::Object(ASSET_OPTIONS_FIELDS)),
    FieldDef::variant("bitasset_opts", FieldType::Object(BITASSET_OPTIONS_FIELDS)),
    FieldDef::defaulted(
        "is_prediction_market",
        FieldType::Bool,
        DefaultValue::Bool(false),
    ),
    FieldDef::extensions(),
];

const ASSET_ISSUE: &[FieldDef] = &[
    FieldDef::required("issuer", FieldType::ACCOUNT),
    FieldDef::required("asset_to_issue", FieldType::Asset),
    FieldDef::required("issue_to_account", FieldType::ACCOUNT),
    FieldDef::optional("memo", MEMO),
    FieldDef::extensions(),
];

const ASSET_RESERVE: &[FieldDef] = &[
    FieldDef::required("payer", FieldType::ACCOUNT),
    FieldDef::required("amount_to_reserve", FieldType::Asset),
    FieldDef::extensions(),
];

const ASSET_FUND_FEE_POOL: &[FieldDef] = &[
    FieldDef::required("from_account", FieldType::ACCOUNT),
    FieldDef::required("asset_id", FieldType::ASSET_ID),
    FieldDef::required("amount", FieldType::SHARE),
    FieldDef::extensions(),
];

const ASSET_SETTLE: &[FieldDef] = &[
    FieldDef::required("account", FieldType::ACCOUNT),
    FieldDef::required("amount", FieldType::Asset),
    FieldDef::extensions(),
];

const PROPOSAL_CREATE: &[FieldDef] = &[
    FieldDef::required("fee_paying_account", FieldType::ACCOUNT),
    FieldDef::defaulted(
        "expiration_time",
        FieldType::TimePointSec,
        DefaultValue::SecondsFromNow(DEFAULT_PROPOSAL_LIFETIME_SECONDS),
    ),
    FieldDef::required("proposed_ops", FieldType::Array(&OP_WRAPPER)),
    FieldDef::optional("review_period_seconds", FieldType::UINT32),
    FieldDef::extensions(),
];

const PROPOSAL_UPDATE: &[FieldDef] = &[
    FieldDef::required("fee_paying_account", FieldType::ACCOUNT),
    FieldDef::required("proposal", PROPOSAL_ID),
    FieldDef::defaulted("active_approvals_to_add", ACCOUNT_SET, DefaultValue::EmptyArray),
    FieldDef::defaulted("active_approvals_to_remove", ACCOUNT_SET, DefaultValue::EmptyArray),
    FieldDef::defaulted("owner_approvals_to_add", ACCOUNT_SET, DefaultValue::EmptyArray),
    FieldDef::defaulted("owner_approvals_to_remove", ACCOUNT_SET, DefaultValue::EmptyArray),
    FieldDef::defaulted("key_approvals_to_add", KEY_SET, DefaultValue::EmptyArray),
    FieldDef::defaulted("key_approvals_to_remove", KEY_SET, DefaultValue::EmptyArray),
    FieldDef::extensions(),
];

const PROPOSAL_DELETE: &[FieldDef] = &[
    FieldDef::required("fee_paying_account", FieldType::ACCOUNT),
    FieldDef::defaulted(
        "using_owner_authority",
        FieldType::Bool,
        DefaultValue::Bool(false),
    ),
    FieldDef::required("proposal", PROPOSAL_ID),
    FieldDef::extensions(),
];

const VESTING_BALANCE_WITHDRAW: &[FieldDef] = &[
    FieldDef::required("vesting_balance", VESTING_BALANCE_ID),
    FieldDef::required("owner", FieldType::ACCOUNT),
    FieldDef::required("amount", FieldType::Asset),
];

const OVERRIDE_TRANSFER: &[FieldDef] = &[
    FieldDef::required("issuer", FieldType::ACCOUNT),
    FieldDef::required("from", FieldType::ACCOUNT),
    FieldDef::required("to", FieldType::ACCOUNT),
    FieldDef::required("amount", FieldType::Asset),
    FieldDef::optional("memo", MEMO),
    FieldDef::extensions(),
];

const ASSET_CLAIM_FEES: &[FieldDef] = &[
    FieldDef::required("issuer", FieldType::ACCOUNT),
    FieldDef::required("amount_to_claim", FieldType::Asset),
    FieldDef::extensions(),
];

/// Asset creation is either a plain user-issued asset or a prediction market backed by
/// `bitasset_opts`.
const ASSET_CREATE_VARIANT: VariantSchema = VariantSchema {
    tag: AssetCreateVariant::TAG,
    arms: [
        VariantArm {
            name: "StandardAsset",
            tag_value: false,
            fields: &[],
        },
        VariantArm {
            name: "PredictionMarketAsset",
            tag_value: true,
            fields: &[AssetCreateVariant::BITASSET_OPTS],
        },
    ],
};

const fn op(
    id: u16,
    name: &'static str,
    fields: &'static [FieldDef],
    fee_rule: FeeRule,
) -> OperationSchema {
    OperationSchema {
        id: OperationId(id),
        name,
        fields,
        variant: None,
        fee_rule,
    }
}

/// All registered operations, ordered by id.
pub static OPERATIONS: &[OperationSchema] = &[
    op(0, "transfer", TRANSFER, FeeRule::FlatWithMemo),
    op(1, "limit_order_create", LIMIT_ORDER_CREATE, FeeRule::Flat),
    op(2, "limit_order_cancel", LIMIT_ORDER_CANCEL, FeeRule::Flat),
    op(7, "account_whitelist", ACCOUNT_WHITELIST, FeeRule::Flat),
    op(
        8,
        "account_upgrade",
        ACCOUNT_UPGRADE,
        FeeRule::Membership {
            flag: "upgrade_to_lifetime_member",
        },
    ),
    op(9, "account_transfer", ACCOUNT_TRANSFER, FeeRule::Flat),
    OperationSchema {
        id: OperationId(10),
        name: "asset_create",
        fields: ASSET_CREATE,
        variant: Some(ASSET_CREATE_VARIANT),
        fee_rule: FeeRule::SymbolLengthWithData,
    },
    op(14, "asset_issue", ASSET_ISSUE, FeeRule::FlatWithMemo),
    op(15, "asset_reserve", ASSET_RESERVE, FeeRule::Flat),
    op(16, "asset_fund_fee_pool", ASSET_FUND_FEE_POOL, FeeRule::Flat),
    op(17, "asset_settle", ASSET_SETTLE, FeeRule::Flat),
    op(22, "proposal_create", PROPOSAL_CREATE, FeeRule::FlatWithData),
    op(23, "proposal_update", PROPOSAL_UPDATE, FeeRule::FlatWithData),
    op(24, "proposal_delete", PROPOSAL_DELETE, FeeRule::Flat),
    op(33, "vesting_balance_withdraw", VESTING_BALANCE_WITHDRAW, FeeRule::Flat),
    op(38, "override_transfer", OVERRIDE_TRANSFER, FeeRule::FlatWithMemo),
    op(43, "asset_claim_fees", ASSET_CLAIM_FEES, FeeRule::Flat),
];
