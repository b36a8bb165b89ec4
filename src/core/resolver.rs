use crate::core::{Candidate, Coordinate, Geocoder, PlaceName};
use crate::utils::error::{AppError, FailureReason, ResolutionFailure};

/// Turns place names into coordinates through a [`Geocoder`].
///
/// Every failure mode (transport, empty result, unusable fields) is
/// reported as a [`ResolutionFailure`] value. Nothing is retried or cached.
pub struct GeocodeResolver<G: Geocoder> {
    geocoder: G,
}

impl<G: Geocoder> GeocodeResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, name: &PlaceName) -> Result<Coordinate, ResolutionFailure> {
        tracing::debug!("Resolving coordinates for {}", name);

        let candidates = self
            .geocoder
            .lookup(name.as_str())
            .await
            .map_err(|e| ResolutionFailure::new(name.as_str(), transport_reason(&e)))?;

        let first = candidates
            .first()
            .ok_or_else(|| ResolutionFailure::new(name.as_str(), FailureReason::EmptyResult))?;

        let coordinate = parse_candidate(first)
            .map_err(|reason| ResolutionFailure::new(name.as_str(), reason))?;

        tracing::debug!(
            "Resolved {} to ({}, {})",
            name,
            coordinate.latitude(),
            coordinate.longitude()
        );
        Ok(coordinate)
    }
}

fn transport_reason(error: &AppError) -> FailureReason {
    FailureReason::Transport(error.to_string())
}

fn parse_candidate(candidate: &Candidate) -> Result<Coordinate, FailureReason> {
    let latitude = candidate
        .latitude
        .parse()
        .ok_or_else(|| FailureReason::NonNumeric {
            field: "latitude",
            value: candidate.latitude.raw(),
        })?;
    let longitude = candidate
        .longitude
        .parse()
        .ok_or_else(|| FailureReason::NonNumeric {
            field: "longitude",
            value: candidate.longitude.raw(),
        })?;

    Coordinate::new(latitude, longitude).ok_or_else(|| FailureReason::NonNumeric {
        field: "latitude/longitude",
        value: format!("{}, {}", latitude, longitude),
    })
}
