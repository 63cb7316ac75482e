//! Ordered fallback chains.
//!
//! A [`FallbackChain`] holds strategies that are attempted in order until one
//! yields a usable value. A strategy reports one of three outcomes:
//!
//! - `Ok(Some(value))`: resolved, the chain stops here
//! - `Ok(None)`: ran fine but produced nothing usable, try the next tier
//! - `Err(_)`: failed, logged at `warn`, try the next tier
//!
//! Errors never escape the chain. When every tier declines the chain returns
//! [`Resolution::Exhausted`].

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::error::Result;

/// One tier of a fallback chain.
pub trait Strategy<Req: ?Sized, T>: Send + Sync {
    /// Stable tier name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Attempt to resolve `request`.
    fn attempt<'a>(&'a self, request: &'a Req) -> BoxFuture<'a, Result<Option<T>>>;
}

/// Outcome of running a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Resolved { tier: &'static str, value: T },
    Exhausted,
}

impl<T> Resolution<T> {
    pub fn tier(&self) -> Option<&'static str> {
        match self {
            Resolution::Resolved { tier, .. } => Some(tier),
            Resolution::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Resolution::Exhausted)
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Resolution::Resolved { value, .. } => Some(value),
            Resolution::Exhausted => None,
        }
    }
}

/// Strategies attempted in insertion order.
pub struct FallbackChain<Req: ?Sized, T> {
    strategies: Vec<Box<dyn Strategy<Req, T>>>,
}

impl<Req: ?Sized + Sync, T: Send> FallbackChain<Req, T> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a tier, builder style.
    pub fn with(mut self, strategy: impl Strategy<Req, T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Tier names in attempt order.
    pub fn tier_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the tiers in order and return the first usable value.
    pub async fn resolve(&self, request: &Req) -> Resolution<T> {
        for strategy in &self.strategies {
            let tier = strategy.name();
            debug!(tier, "attempting tier");
            match strategy.attempt(request).await {
                Ok(Some(value)) => return Resolution::Resolved { tier, value },
                Ok(None) => debug!(tier, "tier produced no usable result"),
                Err(error) => warn!(tier, error = %error, "tier failed"),
            }
        }
        Resolution::Exhausted
    }
}

impl<Req: ?Sized + Sync, T: Send> Default for FallbackChain<Req, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req: ?Sized, T> std::fmt::Debug for FallbackChain<Req, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field(
                "tiers",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures::FutureExt;

    use super::*;
    use crate::error::Error;

    enum Behaviour {
        Value(u32),
        Nothing,
        Fail,
    }

    struct Fixed {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    impl Fixed {
        fn new(name: &'static str, behaviour: Behaviour) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    behaviour,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl Strategy<u32, u32> for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn attempt<'a>(&'a self, request: &'a u32) -> BoxFuture<'a, Result<Option<u32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = match self.behaviour {
                Behaviour::Value(v) => Ok(Some(v + request)),
                Behaviour::Nothing => Ok(None),
                Behaviour::Fail => Err(Error::UpstreamStatus {
                    service: "test",
                    status: 500,
                }),
            };
            async move { outcome }.boxed()
        }
    }

    #[tokio::test]
    async fn first_success_wins_and_later_tiers_are_skipped() {
        let (a, a_calls) = Fixed::new("a", Behaviour::Value(10));
        let (b, b_calls) = Fixed::new("b", Behaviour::Value(20));
        let chain = FallbackChain::new().with(a).with(b);

        let resolution = chain.resolve(&1).await;
        assert_eq!(
            resolution,
            Resolution::Resolved {
                tier: "a",
                value: 11
            }
        );
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failures_and_empty_results_advance_to_next_tier() {
        let (a, _) = Fixed::new("a", Behaviour::Fail);
        let (b, _) = Fixed::new("b", Behaviour::Nothing);
        let (c, _) = Fixed::new("c", Behaviour::Value(5));
        let chain = FallbackChain::new().with(a).with(b).with(c);

        let resolution = chain.resolve(&0).await;
        assert_eq!(resolution.tier(), Some("c"));
        assert_eq!(resolution.into_value(), Some(5));
    }

    #[tokio::test]
    async fn exhausted_when_every_tier_declines() {
        let (a, _) = Fixed::new("a", Behaviour::Fail);
        let (b, _) = Fixed::new("b", Behaviour::Nothing);
        let chain = FallbackChain::new().with(a).with(b);

        let resolution = chain.resolve(&0).await;
        assert!(resolution.is_exhausted());
        assert_eq!(resolution.tier(), None);
    }

    #[tokio::test]
    async fn empty_chain_is_exhausted() {
        let chain: FallbackChain<u32, u32> = FallbackChain::new();
        assert!(chain.is_empty());
        assert!(chain.resolve(&0).await.is_exhausted());
    }

    #[test]
    fn tier_names_preserve_order() {
        let (a, _) = Fixed::new("first", Behaviour::Nothing);
        let (b, _) = Fixed::new("second", Behaviour::Nothing);
        let chain = FallbackChain::new().with(a).with(b);
        assert_eq!(chain.tier_names(), vec!["first", "second"]);
        assert!(format!("{chain:?}").contains("second"));
    }
}
