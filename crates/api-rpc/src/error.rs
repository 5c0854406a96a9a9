//! RPC Error Types
//!
//! Maps application errors to stable JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use serde::Serialize;
use waitline_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const MISSING_NAME: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const STORE_UNAVAILABLE: i32 = 5001;
}

/// Machine-readable error kind carried in the error `data` field
#[derive(Debug, Serialize)]
struct ErrorData {
    kind: &'static str,
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let (code, kind) = match &err {
        AppError::NotFound(_) => (code::NOT_FOUND, "not_found"),
        AppError::MissingName => (code::MISSING_NAME, "missing_name"),
        AppError::StoreUnavailable(_) => (code::STORE_UNAVAILABLE, "store_unavailable"),
    };
    ErrorObjectOwned::owned(code, err.to_string(), Some(ErrorData { kind }))
}
