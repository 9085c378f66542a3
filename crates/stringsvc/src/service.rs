// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use waypoint::Context;

use crate::ServiceError;

/// Operations offered by the string service.
///
/// Implemented by [`BasicService`], which holds the business logic, and by the decorators
/// ([`Logging`](crate::Logging), [`Instrumenting`](crate::Instrumenting)) that wrap another
/// implementation and add one concern around it. Implementations are shared between
/// concurrent requests and must not rely on per-call state.
pub trait StringService: Send + Sync {
    /// Converts `s` to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::EmptyInput`] when `s` is empty.
    fn uppercase(&self, ctx: &Context, s: &str) -> Result<String, ServiceError>;

    /// Returns the length of `s` in bytes of its UTF-8 encoding.
    fn count(&self, ctx: &Context, s: &str) -> usize;
}

impl<S: StringService + ?Sized> StringService for Box<S> {
    fn uppercase(&self, ctx: &Context, s: &str) -> Result<String, ServiceError> {
        (**self).uppercase(ctx, s)
    }

    fn count(&self, ctx: &Context, s: &str) -> usize {
        (**self).count(ctx, s)
    }
}

impl<S: StringService + ?Sized> StringService for Arc<S> {
    fn uppercase(&self, ctx: &Context, s: &str) -> Result<String, ServiceError> {
        (**self).uppercase(ctx, s)
    }

    fn count(&self, ctx: &Context, s: &str) -> usize {
        (**self).count(ctx, s)
    }
}

/// The plain business logic, without any cross-cutting behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicService;

impl StringService for BasicService {
    fn uppercase(&self, _ctx: &Context, s: &str) -> Result<String, ServiceError> {
        if s.is_empty() {
            return Err(ServiceError::EmptyInput);
        }

        Ok(s.to_uppercase())
    }

    fn count(&self, _ctx: &Context, s: &str) -> usize {
        s.len()
    }
}
