//! Test helpers for handler builders.
//!
//! This module centralizes repeated assertions used across builder tests.

use super::{HandlerBuildError, HandlerBuilderTrait};

/// Assert that building a handler fails and return the error.
pub fn assert_build_err<B>(builder: &B, msg: &str) -> HandlerBuildError
where
    B: HandlerBuilderTrait + ?Sized,
{
    match builder.build_inner() {
        Ok(_) => panic!("{msg}"),
        Err(err) => err,
    }
}
