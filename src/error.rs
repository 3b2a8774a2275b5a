// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures talking to the bookkeeping backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{detail} (HTTP {status})")]
    Status { status: u16, detail: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("not logged in; run `vino login` first")]
    NotAuthenticated,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Input problems caught before anything is sent to the backend.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("amount must be greater than 0")]
    NonPositiveAmount,
    #[error("a budget already exists for this category or subcategory in {period}")]
    DuplicateBudget { period: String },
    #[error("a rule already exists for merchant '{merchant}'")]
    DuplicateRule { merchant: String },
    #[error("category '{0}' not found")]
    UnknownCategory(String),
    #[error("merchant '{0}' not found")]
    UnknownMerchant(String),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("subcategory '{subcategory}' does not belong to category '{category}'")]
    SubcategoryMismatch { category: String, subcategory: String },
    #[error("the movement's {0} is unknown; pass --{0} to set it")]
    UnresolvedReference(&'static str),
    #[error("merchant '{0}' is inferred from a rule and has no backend record")]
    PlaceholderMerchant(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid period '{0}', expected YYYY-MM")]
    InvalidPeriod(String),
}

/// Outcome of a data-store mutation: rejected locally, or failed remotely.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
