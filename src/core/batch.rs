use crate::domain::model::{ForecastPoint, Spot};
use crate::domain::ports::ForecastProvider;
use crate::utils::error::ClientError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome for one spot. A failing spot never affects the others.
#[derive(Debug, Clone)]
pub struct SpotForecast {
    pub spot: Spot,
    pub result: Result<Vec<ForecastPoint>, ClientError>,
}

impl SpotForecast {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// 同時抓取多個地點，最多 `concurrent_requests` 個請求同時進行，結果依輸入順序回傳
pub async fn fetch_spots<P>(
    provider: Arc<P>,
    spots: Vec<Spot>,
    concurrent_requests: usize,
) -> Vec<SpotForecast>
where
    P: ForecastProvider + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrent_requests.max(1)));
    let mut tasks = JoinSet::new();

    tracing::info!(
        "📡 Fetching {} spots from {} with up to {} concurrent requests",
        spots.len(),
        provider.name(),
        concurrent_requests.max(1)
    );

    for (index, spot) in spots.iter().cloned().enumerate() {
        let provider = Arc::clone(&provider);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => provider.fetch_points(spot.lat, spot.lng).await,
                Err(e) => Err(ClientError::client_request(e.to_string())),
            };
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<Vec<ForecastPoint>, ClientError>>> =
        (0..spots.len()).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => {
                if let Err(e) = &result {
                    tracing::warn!("❌ {}: {}", spots[index].name, e);
                }
                results[index] = Some(result);
            }
            Err(e) => tracing::error!("Forecast task failed: {}", e),
        }
    }

    spots
        .into_iter()
        .zip(results)
        .map(|(spot, result)| SpotForecast {
            spot,
            result: result.unwrap_or_else(|| {
                Err(ClientError::client_request("forecast task did not complete"))
            }),
        })
        .collect()
}
