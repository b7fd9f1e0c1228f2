//! Database-mapped enums, stored as short strings for portability.
//!
//! These mirror the domain enums in `monedero-shared`; `From` impls in
//! both directions keep the repositories free of match boilerplate.

use monedero_shared::{AccountKind as DomainAccountKind, OperationKind as DomainOperationKind, SubscriptionTier as DomainTier};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscription tier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// Free tier.
    #[sea_orm(string_value = "free")]
    Free,
    /// Paid tier.
    #[sea_orm(string_value = "premium")]
    Premium,
}

/// Category operation kind column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Money coming in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Account classification column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Checking / current account.
    #[sea_orm(string_value = "checking")]
    Checking,
    /// Savings account.
    #[sea_orm(string_value = "savings")]
    Savings,
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Credit or debit card.
    #[sea_orm(string_value = "card")]
    Card,
}

impl From<DomainTier> for SubscriptionTier {
    fn from(tier: DomainTier) -> Self {
        match tier {
            DomainTier::Free => Self::Free,
            DomainTier::Premium => Self::Premium,
        }
    }
}

impl From<SubscriptionTier> for DomainTier {
    fn from(tier: SubscriptionTier) -> Self {
        match tier {
            SubscriptionTier::Free => Self::Free,
            SubscriptionTier::Premium => Self::Premium,
        }
    }
}

impl From<DomainOperationKind> for OperationKind {
    fn from(kind: DomainOperationKind) -> Self {
        match kind {
            DomainOperationKind::Income => Self::Income,
            DomainOperationKind::Expense => Self::Expense,
        }
    }
}

impl From<OperationKind> for DomainOperationKind {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Income => Self::Income,
            OperationKind::Expense => Self::Expense,
        }
    }
}

impl From<DomainAccountKind> for AccountKind {
    fn from(kind: DomainAccountKind) -> Self {
        match kind {
            DomainAccountKind::Checking => Self::Checking,
            DomainAccountKind::Savings => Self::Savings,
            DomainAccountKind::Cash => Self::Cash,
            DomainAccountKind::Card => Self::Card,
        }
    }
}

impl From<AccountKind> for DomainAccountKind {
    fn from(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Checking => Self::Checking,
            AccountKind::Savings => Self::Savings,
            AccountKind::Cash => Self::Cash,
            AccountKind::Card => Self::Card,
        }
    }
}
