// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Sliding-window rate limiting shared by every outbound call.
//!
//! [`RateLimiter`] keeps the admission instants of the trailing window and
//! blocks callers until admitting one more would keep the window within
//! `max_calls`. [`RateLimitLayer`] exposes the same limiter as a Tower
//! `Layer` so it can gate Alloy RPC transports.

use std::{
    collections::VecDeque,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use tokio::{sync::Mutex, time::Instant};
use tower::Layer;
use tracing::debug;

use crate::errors::RateLimitError;

/// A sliding-window limiter admitting at most `max_calls` per `period`.
///
/// The limiter is shared by reference (`Arc<RateLimiter>`) between the
/// explorer client and any transport that should draw from the same budget.
/// Callers are admitted in the order they reach the internal lock, and the
/// lock is held across the wait so admissions never race.
///
/// # Example
///
/// ```rust
/// use chaingate::RateLimiter;
/// use std::time::Duration;
///
/// # tokio_test_block(async {
/// let limiter = RateLimiter::new(5, Duration::from_secs(1)).unwrap();
/// limiter.acquire().await;
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f);
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    /// Admission instants, oldest first
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting `max_calls` per `period`.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError`] when `max_calls` is zero or `period` is zero.
    pub fn new(max_calls: u32, period: Duration) -> Result<Self, RateLimitError> {
        if max_calls == 0 {
            return Err(RateLimitError::InvalidMaxCalls { max_calls });
        }
        if period.is_zero() {
            return Err(RateLimitError::ZeroPeriod);
        }
        Ok(Self {
            max_calls: max_calls as usize,
            period,
            window: Mutex::new(VecDeque::with_capacity(max_calls as usize)),
        })
    }

    /// Creates a limiter from requests per second.
    pub fn per_second(max_calls: u32) -> Result<Self, RateLimitError> {
        Self::new(max_calls, Duration::from_secs(1))
    }

    /// Maximum admissions per window.
    pub fn max_calls(&self) -> u32 {
        self.max_calls as u32
    }

    /// Window length.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Waits until one more call fits in the trailing window, then records it.
    ///
    /// Never fails. Timestamps older than `period` are purged first; if the
    /// window is still full the caller sleeps until the oldest admission ages
    /// out.
    pub async fn acquire(&self) {
        let mut window = self.window.lock().await;

        let now = Instant::now();
        self.purge(&mut window, now);

        if window.len() >= self.max_calls {
            if let Some(&oldest) = window.front() {
                let wait = (oldest + self.period).saturating_duration_since(now);
                if !wait.is_zero() {
                    debug!(
                        wait_ms = wait.as_millis() as u64,
                        in_window = window.len(),
                        "Rate limit reached, waiting"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
            window.pop_front();
        }

        // Record the actual admission instant, which is later than `now`
        // whenever the caller slept.
        let admitted = Instant::now();
        self.purge(&mut window, admitted);
        window.push_back(admitted);
    }

    /// Number of admissions currently inside the trailing window.
    pub async fn in_window(&self) -> usize {
        let mut window = self.window.lock().await;
        self.purge(&mut window, Instant::now());
        window.len()
    }

    fn purge(&self, window: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = window.front() {
            if now.saturating_duration_since(oldest) >= self.period {
                window.pop_front();
            } else {
                break;
            }
        }
    }
}

/// A Tower layer that gates requests through a shared [`RateLimiter`].
///
/// # Example
///
/// ```rust,ignore
/// use chaingate::transport::RateLimitLayer;
/// use alloy_rpc_client::ClientBuilder;
///
/// // 10 requests per second
/// let layer = RateLimitLayer::per_second(10)?;
///
/// let client = ClientBuilder::default()
///     .layer(layer)
///     .http(rpc_url);
/// ```
#[derive(Clone, Debug)]
pub struct RateLimitLayer {
    limiter: Arc<RateLimiter>,
}

impl RateLimitLayer {
    /// Wraps an existing limiter so several services share one budget.
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }

    /// Creates a layer with its own limiter of `requests` per second.
    pub fn per_second(requests: u32) -> Result<Self, RateLimitError> {
        Ok(Self::new(Arc::new(RateLimiter::per_second(requests)?)))
    }

    /// The limiter behind this layer.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RateLimitService {
            service,
            limiter: self.limiter.clone(),
        }
    }
}

/// A Tower service that acquires a rate limit slot before every request.
#[derive(Clone, Debug)]
pub struct RateLimitService<S> {
    service: S,
    limiter: Arc<RateLimiter>,
}

impl<S, Request> tower::Service<Request> for RateLimitService<S>
where
    S: tower::Service<Request> + Clone + Send + 'static,
    S::Future: Send,
    Request: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let limiter = self.limiter.clone();
        let mut service = self.service.clone();

        Box::pin(async move {
            limiter.acquire().await;
            service.call(request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_calls() {
        assert_eq!(
            RateLimiter::new(0, Duration::from_secs(1)).unwrap_err(),
            RateLimitError::InvalidMaxCalls { max_calls: 0 }
        );
    }

    #[test]
    fn test_rejects_zero_period() {
        assert_eq!(
            RateLimiter::new(3, Duration::ZERO).unwrap_err(),
            RateLimitError::ZeroPeriod
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_calls_are_immediate() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1)).unwrap();
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.in_window().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_third_call_waits_for_oldest_to_expire() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1)).unwrap();
        let start = Instant::now();

        limiter.acquire().await;
        tokio::time::advance(Duration::from_millis(300)).await;
        limiter.acquire().await;
        limiter.acquire().await;

        // Oldest admission was at t=0, so the third waits until t=1s
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_millis(1010));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_empties_after_period() {
        let limiter = RateLimiter::new(3, Duration::from_millis(100)).unwrap();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(limiter.in_window().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_layer_enforces_rate() {
        #[derive(Clone)]
        struct InstantService;

        impl tower::Service<()> for InstantService {
            type Response = ();
            type Error = std::convert::Infallible;
            type Future = std::future::Ready<Result<(), std::convert::Infallible>>;

            fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
                Poll::Ready(Ok(()))
            }

            fn call(&mut self, _req: ()) -> Self::Future {
                std::future::ready(Ok(()))
            }
        }

        let layer = RateLimitLayer::per_second(5).unwrap();
        let mut service = layer.layer(InstantService);
        let start = Instant::now();

        // The first 5 are immediate, the 6th waits a full window
        for _ in 0..6 {
            tower::Service::call(&mut service, ()).await.unwrap();
        }

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_millis(1010));
    }

    #[test]
    fn test_layer_shares_limiter() {
        let limiter = Arc::new(RateLimiter::per_second(4).unwrap());
        let layer = RateLimitLayer::new(limiter.clone());
        assert!(Arc::ptr_eq(layer.limiter(), &limiter));
        assert_eq!(layer.limiter().max_calls(), 4);
    }
}
