// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use tower_layer::Layer;

/// Builds a service from a tuple of layers followed by the innermost service.
///
/// The first tuple element becomes the outermost wrapper, so calls enter the chain through
/// the first layer and reach the service last. Implemented for up to four layers.
///
/// # Examples
///
/// ```
/// use waypoint::{Layer, Stack};
///
/// struct Double;
///
/// impl Layer<u32> for Double {
///     type Service = u32;
///
///     fn layer(&self, inner: u32) -> u32 {
///         inner * 2
///     }
/// }
///
/// assert_eq!((Double, Double, 3).build(), 12);
/// ```
pub trait Stack {
    /// The composed service.
    type Service;

    /// Applies every layer, innermost first, and returns the outermost service.
    fn build(self) -> Self::Service;
}

impl<L1, S> Stack for (L1, S)
where
    L1: Layer<S>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (outer, service) = self;

        outer.layer(service)
    }
}

impl<L1, L2, S> Stack for (L1, L2, S)
where
    L1: Layer<L2::Service>,
    L2: Layer<S>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (outer, l2, service) = self;

        outer.layer((l2, service).build())
    }
}

impl<L1, L2, L3, S> Stack for (L1, L2, L3, S)
where
    L1: Layer<L2::Service>,
    L2: Layer<L3::Service>,
    L3: Layer<S>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (outer, l2, l3, service) = self;

        outer.layer((l2, l3, service).build())
    }
}

impl<L1, L2, L3, L4, S> Stack for (L1, L2, L3, L4, S)
where
    L1: Layer<L2::Service>,
    L2: Layer<L3::Service>,
    L3: Layer<L4::Service>,
    L4: Layer<S>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (outer, l2, l3, l4, service) = self;

        outer.layer((l2, l3, l4, service).build())
    }
}
