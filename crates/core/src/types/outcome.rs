//! Backend result codes decoded into named outcomes.
//!
//! The backend answers mutations with bare integers. Positive values and
//! a handful of negative sentinels carry meaning; everything else is a
//! generic failure. Sentinels only ever match a JSON integer: `true` or
//! `"1"` is not the success code `1`.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Shape of a result-code body, before it is given a meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultCode {
    /// A JSON integer.
    Integer(i64),
    /// An empty body, `null`, `false` or `""`.
    Falsy,
    /// Any other value, such as `true`, a non-empty string or a float.
    Other,
}

impl ResultCode {
    /// The integer code, if the body was one.
    #[must_use]
    pub const fn integer(self) -> Option<i64> {
        match self {
            Self::Integer(code) => Some(code),
            Self::Falsy | Self::Other => None,
        }
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoginOutcome {
    /// Credentials accepted; the backend returned the user's ID.
    Authenticated(UserId),
    /// `-1`: the backend hit an internal error.
    ServerError,
    /// `-2`: no user with that username.
    UnknownUsername,
    /// `-3`: more than one user shares that username.
    AmbiguousUsername,
    /// `-4`: the password did not match.
    WrongPassword,
    /// Any other non-positive code.
    Unrecognized(i64),
}

impl LoginOutcome {
    /// Decode the backend's login response.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            id if id > 0 => Self::Authenticated(UserId::new(id)),
            -1 => Self::ServerError,
            -2 => Self::UnknownUsername,
            -3 => Self::AmbiguousUsername,
            -4 => Self::WrongPassword,
            other => Self::Unrecognized(other),
        }
    }
}

/// Result of placing an order for a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceOrderOutcome {
    /// `1`: the order was placed.
    Placed,
    /// `-1`: the product is out of stock.
    OutOfStock,
    /// `0` or any falsy body: the backend declined without a reason.
    Declined,
    /// Any other answer.
    Unrecognized(ResultCode),
}

impl PlaceOrderOutcome {
    /// Decode the backend's place-order response.
    #[must_use]
    pub const fn from_result(result: ResultCode) -> Self {
        match result {
            ResultCode::Integer(1) => Self::Placed,
            ResultCode::Integer(-1) => Self::OutOfStock,
            ResultCode::Integer(0) | ResultCode::Falsy => Self::Declined,
            other => Self::Unrecognized(other),
        }
    }
}

/// Result of a cart mutation (add or remove).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationOutcome {
    /// The integer `1`: the mutation was applied.
    Applied,
    /// Any other answer.
    Rejected(ResultCode),
}

impl MutationOutcome {
    /// Decode the backend's cart mutation response.
    #[must_use]
    pub const fn from_result(result: ResultCode) -> Self {
        match result {
            ResultCode::Integer(1) => Self::Applied,
            other => Self::Rejected(other),
        }
    }

    /// Whether the mutation was applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}
