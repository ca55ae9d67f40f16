//! Client side of the ERP's `execute_kw` RPC surface.
//!
//! Only the handful of ORM methods the attendance endpoints need are exposed,
//! behind the [`model::AttendanceModel`] trait so request handlers never see
//! the loosely-typed payloads the ERP speaks.

pub mod client;
pub mod domain;
pub mod error;
pub mod model;

#[cfg(test)]
pub mod fake;

use strum_macros::{AsRefStr, Display, IntoStaticStr};

/// ORM methods invoked through `execute_kw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RpcMethod {
    SearchRead,
    Search,
    Create,
    Write,
}
