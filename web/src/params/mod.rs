//! This module holds typed parameters for various endpoint inputs.
//!
//! Every flow route is reached by a browser redirect, so all inputs arrive as
//! query parameters and every field is optional at this layer. The flow steps
//! decide what a missing value means.

pub(crate) mod oauth;
