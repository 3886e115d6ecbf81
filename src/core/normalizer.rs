use crate::domain::model::{
    DataSource, ForecastPoint, Metric, RawForecastResponse, RawHourPoint, SourceValues,
};

/// How an authoritative value of exactly zero is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidityPolicy {
    /// Zero counts as missing, so an hour with any metric at 0 is dropped.
    /// This is the provider integration's historical behaviour and the default.
    #[default]
    TreatZeroAsMissing,
    /// Only an absent value counts as missing; genuine zeros are kept.
    RequirePresence,
}

/// Flattens multi-source hourly readings into [`ForecastPoint`]s for one source.
///
/// Hours without a time, or without the source's value for any of the seven metrics,
/// are left out. Nothing here fails: bad hours are dropped, the rest keep their order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastNormalizer {
    source: DataSource,
    policy: ValidityPolicy,
}

impl ForecastNormalizer {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            policy: ValidityPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ValidityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn policy(&self) -> ValidityPolicy {
        self.policy
    }

    pub fn normalize(&self, raw: RawForecastResponse) -> Vec<ForecastPoint> {
        let total = raw.hours.len();
        let points: Vec<ForecastPoint> = self.normalize_iter(raw).collect();

        if points.len() < total {
            tracing::debug!(
                "Discarded {} of {} hours without complete {} data",
                total - points.len(),
                total,
                self.source
            );
        }

        points
    }

    /// Lazy variant of [`normalize`](Self::normalize).
    pub fn normalize_iter(&self, raw: RawForecastResponse) -> impl Iterator<Item = ForecastPoint> {
        let normalizer = *self;
        raw.hours
            .into_iter()
            .filter_map(move |point| normalizer.to_forecast_point(point))
    }

    pub fn is_valid_point(&self, point: &RawHourPoint) -> bool {
        Self::has_time(point)
            && Metric::ALL
                .iter()
                .all(|metric| self.resolve(point.metric(*metric)).is_some())
    }

    fn to_forecast_point(&self, point: RawHourPoint) -> Option<ForecastPoint> {
        if !self.is_valid_point(&point) {
            return None;
        }

        Some(ForecastPoint {
            swell_direction: self.resolve(point.swell_direction.as_ref())?,
            swell_height: self.resolve(point.swell_height.as_ref())?,
            swell_period: self.resolve(point.swell_period.as_ref())?,
            wave_direction: self.resolve(point.wave_direction.as_ref())?,
            wave_height: self.resolve(point.wave_height.as_ref())?,
            wind_direction: self.resolve(point.wind_direction.as_ref())?,
            wind_speed: self.resolve(point.wind_speed.as_ref())?,
            time: point.time?,
        })
    }

    fn has_time(point: &RawHourPoint) -> bool {
        point.time.as_deref().is_some_and(|time| !time.is_empty())
    }

    fn resolve(&self, values: Option<&SourceValues>) -> Option<f64> {
        let value = values?.get(self.source)?;
        match self.policy {
            ValidityPolicy::TreatZeroAsMissing if value == 0.0 || value.is_nan() => None,
            _ => Some(value),
        }
    }
}
