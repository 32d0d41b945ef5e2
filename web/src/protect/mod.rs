//! This module provides protection mechanisms for resources in the web application.
//!
//! Each submodule holds middleware meant for `axum::middleware::from_fn_with_state`
//! that decides whether a request may reach the handlers it wraps.

pub(crate) mod private;
