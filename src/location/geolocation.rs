use std::time::Duration;

use crate::config::GeolocationConfig;
use crate::error::GeolocationError;
use crate::location::map::LatLng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Cached fixes up to this age are acceptable.
    pub maximum_age: Duration,
}

impl From<&GeolocationConfig> for PositionOptions {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: Duration::from_millis(config.timeout_ms),
            maximum_age: Duration::from_millis(config.maximum_age_ms),
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::from(&GeolocationConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coords: LatLng,
    pub accuracy_m: Option<f64>,
}

#[async_trait::async_trait(?Send)]
pub trait Geolocator {
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(&self, options: &PositionOptions) -> Result<Position, GeolocationError>;
}

/// A pending position request, tagged with the picker generation that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixRequest {
    pub(crate) epoch: u64,
    pub options: PositionOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixResolution {
    pub(crate) epoch: u64,
    pub outcome: Result<Position, GeolocationError>,
}

/// Ask `geolocator` for a fix, giving up after `request.options.timeout`.
pub async fn request_fix<G>(geolocator: &G, request: FixRequest) -> FixResolution
where
    G: Geolocator + ?Sized,
{
    let outcome = if !geolocator.is_supported() {
        Err(GeolocationError::Unsupported)
    } else {
        match tokio::time::timeout(
            request.options.timeout,
            geolocator.current_position(&request.options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(GeolocationError::Timeout),
        }
    };
    FixResolution {
        epoch: request.epoch,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Never;

    #[async_trait::async_trait(?Send)]
    impl Geolocator for Never {
        async fn current_position(&self, _: &PositionOptions) -> Result<Position, GeolocationError> {
            std::future::pending().await
        }
    }

    struct Unsupported;

    #[async_trait::async_trait(?Send)]
    impl Geolocator for Unsupported {
        fn is_supported(&self) -> bool {
            false
        }

        async fn current_position(&self, _: &PositionOptions) -> Result<Position, GeolocationError> {
            unreachable!("not supported")
        }
    }

    #[test]
    fn defaults_match_ten_second_timeout() {
        let options = PositionOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(300));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_request_times_out() {
        let request = FixRequest {
            epoch: 3,
            options: PositionOptions::default(),
        };
        let resolution = request_fix(&Never, request).await;
        assert_eq!(resolution.outcome, Err(GeolocationError::Timeout));
        assert_eq!(resolution.epoch, 3);
    }

    #[tokio::test]
    async fn unsupported_short_circuits() {
        let request = FixRequest {
            epoch: 0,
            options: PositionOptions::default(),
        };
        let resolution = request_fix(&Unsupported, request).await;
        assert_eq!(resolution.outcome, Err(GeolocationError::Unsupported));
    }
}
