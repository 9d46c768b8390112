//! # Metrics
//!
//! Counters for the generation endpoint, kept in a `prometheus-client`
//! registry and rendered as OpenMetrics text at `/api/metrics`.
//!
//! Naming: `inkwell_` prefix; counters get their `_total` suffix from the
//! encoder. Labels stay low-cardinality (`reason` is a fixed set).

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct FailureLabels {
    pub reason: String,
}

pub struct Metrics {
    registry: Registry,
    posts_generated: Counter,
    generation_failures: Family<FailureLabels, Counter>,
    image_fetch_failures: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let posts_generated = Counter::default();
        registry.register(
            "inkwell_posts_generated",
            "Posts created by the generation endpoint",
            posts_generated.clone(),
        );

        let generation_failures = Family::<FailureLabels, Counter>::default();
        registry.register(
            "inkwell_generation_failures",
            "Generation requests that ended in an error, by reason",
            generation_failures.clone(),
        );

        let image_fetch_failures = Counter::default();
        registry.register(
            "inkwell_image_fetch_failures",
            "Generated posts saved without their planned images",
            image_fetch_failures.clone(),
        );

        Self {
            registry,
            posts_generated,
            generation_failures,
            image_fetch_failures,
        }
    }

    pub fn post_generated(&self) {
        self.posts_generated.inc();
    }

    pub fn generation_failed(&self, reason: &str) {
        self.generation_failures
            .get_or_create(&FailureLabels {
                reason: reason.to_string(),
            })
            .inc();
    }

    pub fn images_dropped(&self) {
        self.image_fetch_failures.inc();
    }

    /// OpenMetrics text exposition of every registered metric.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
