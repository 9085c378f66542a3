// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod stack;

#[doc(inline)]
pub use stack::Stack;

/// Wraps an inner service into a middleware that adds one cross-cutting concern.
///
/// Re-exported from [`tower_layer`](https://docs.rs/tower-layer) so that layers written for
/// the Tower ecosystem compose with the middleware in this workspace. A layer here decorates
/// any type, typically an implementation of a business trait, and returns a type that
/// implements the same trait.
pub use tower_layer::Layer;
