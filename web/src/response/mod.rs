//! Response DTOs for the JSON views.

pub(crate) mod flow;
