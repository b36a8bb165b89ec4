use crate::core::distance::distance;
use crate::core::export::{ExportedDocument, ReportExporter};
use crate::core::ledger::HistoryLedger;
use crate::core::resolver::GeocodeResolver;
use crate::core::{CalculationRecord, DistanceOutcome, Geocoder, PlaceName, Storage, Unit};
use crate::utils::error::Result;
use tokio::sync::RwLock;

/// Runs calculations and owns the only piece of shared state: the ledger.
pub struct CalculatorSession<G: Geocoder, S: Storage> {
    resolver: GeocodeResolver<G>,
    exporter: ReportExporter<S>,
    ledger: RwLock<HistoryLedger>,
}

impl<G: Geocoder, S: Storage> CalculatorSession<G, S> {
    pub fn new(resolver: GeocodeResolver<G>, exporter: ReportExporter<S>) -> Self {
        Self::with_ledger(resolver, exporter, HistoryLedger::new())
    }

    pub fn with_ledger(
        resolver: GeocodeResolver<G>,
        exporter: ReportExporter<S>,
        ledger: HistoryLedger,
    ) -> Self {
        Self {
            resolver,
            exporter,
            ledger: RwLock::new(ledger),
        }
    }

    /// Resolves both places, measures the distance and records the attempt.
    ///
    /// Identical places short-circuit to zero without any lookup. A failed
    /// lookup on either side yields [`DistanceOutcome::Failed`]; the attempt
    /// is recorded either way.
    pub async fn calculate(&self, from: &PlaceName, to: &PlaceName, unit: Unit) -> CalculationRecord {
        let outcome = if from == to {
            DistanceOutcome::Measured(0.0)
        } else {
            // First failure drops the other lookup.
            match tokio::try_join!(self.resolver.resolve(from), self.resolver.resolve(to)) {
                Ok((a, b)) => DistanceOutcome::Measured(distance(a, b, unit)),
                Err(failure) => {
                    tracing::warn!("{}", failure);
                    DistanceOutcome::Failed
                }
            }
        };

        let record = CalculationRecord::new(from.clone(), to.clone(), unit, outcome);
        tracing::info!(
            "{} -> {}: {}",
            record.from,
            record.to,
            record.distance_text()
        );

        let mut ledger = self.ledger.write().await;
        *ledger = ledger.append(record.clone());
        record
    }

    pub async fn history(&self) -> Vec<CalculationRecord> {
        self.ledger.read().await.current()
    }

    /// Renders the current history. `Ok(None)` when there is none.
    pub async fn export(&self) -> Result<Option<ExportedDocument>> {
        let snapshot = self.history().await;
        self.exporter.export(&snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Candidate, RawNumber};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CountingGeocoder {
        known: HashMap<String, (f64, f64)>,
        calls: Arc<AtomicUsize>,
    }

    impl CountingGeocoder {
        fn with(places: &[(&str, f64, f64)]) -> Self {
            Self {
                known: places
                    .iter()
                    .map(|(name, lat, lon)| (name.to_string(), (*lat, *lon)))
                    .collect(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Geocoder for CountingGeocoder {
        async fn lookup(&self, query: &str) -> Result<Vec<Candidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .known
                .get(query)
                .map(|(lat, lon)| Candidate {
                    latitude: RawNumber::Number(*lat),
                    longitude: RawNumber::Number(*lon),
                })
                .into_iter()
                .collect())
        }
    }

    struct NullStorage;

    impl Storage for NullStorage {
        async fn write_file(&self, _path: &str, _data: &[u8]) -> Result<()> {
            Ok(())
        }

        fn locate(&self, path: &str) -> String {
            path.to_string()
        }
    }

    fn session(geocoder: CountingGeocoder) -> CalculatorSession<CountingGeocoder, NullStorage> {
        CalculatorSession::new(GeocodeResolver::new(geocoder), ReportExporter::new(NullStorage))
    }

    fn europe() -> CountingGeocoder {
        CountingGeocoder::with(&[("Berlin", 52.52, 13.405), ("Paris", 48.8566, 2.3522)])
    }

    #[tokio::test]
    async fn test_berlin_to_paris() {
        let geocoder = europe();
        let s = session(geocoder.clone());

        let record = s
            .calculate(&PlaceName::new("Berlin"), &PlaceName::new("Paris"), Unit::Kilometers)
            .await;

        let km = record.distance.value().unwrap();
        assert!((km - 878.4).abs() < 1.0, "got {}", km);
        assert_eq!(geocoder.calls(), 2);
        assert_eq!(s.history().await, vec![record]);
    }

    #[tokio::test]
    async fn test_same_place_skips_resolver() {
        let geocoder = europe();
        let s = session(geocoder.clone());
        let berlin = PlaceName::new("Berlin");

        let record = s.calculate(&berlin, &berlin, Unit::Miles).await;

        assert_eq!(record.distance, DistanceOutcome::Measured(0.0));
        assert_eq!(geocoder.calls(), 0);
        assert_eq!(s.history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_resolution_is_still_recorded() {
        let s = session(europe());

        let record = s
            .calculate(&PlaceName::new("Berlin"), &PlaceName::new("Tokyo"), Unit::Kilometers)
            .await;

        assert!(record.distance.is_failed());
        assert_eq!(s.history().await, vec![record]);
    }

    #[tokio::test]
    async fn test_history_keeps_last_five_including_failures() {
        let s = session(europe());
        let berlin = PlaceName::new("Berlin");
        let paris = PlaceName::new("Paris");
        let tokyo = PlaceName::new("Tokyo");

        for _ in 0..4 {
            s.calculate(&berlin, &paris, Unit::Kilometers).await;
        }
        s.calculate(&tokyo, &paris, Unit::Kilometers).await;
        s.calculate(&paris, &berlin, Unit::Miles).await;

        let history = s.history().await;
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].unit, Unit::Miles);
        assert!(history[1].distance.is_failed());
    }

    #[tokio::test]
    async fn test_export_without_history_is_noop() {
        let s = session(europe());
        assert!(s.export().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_export_reports_every_row() {
        let s = session(europe());
        s.calculate(&PlaceName::new("Berlin"), &PlaceName::new("Paris"), Unit::Kilometers)
            .await;
        s.calculate(&PlaceName::new("Paris"), &PlaceName::new("Paris"), Unit::Miles)
            .await;

        let document = s.export().await.unwrap().unwrap();
        assert_eq!(document.rows, 2);
    }
}
