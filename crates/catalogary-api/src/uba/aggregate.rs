// Measurement matrix builds
//
// Both builds issue their `measures` calls one at a time, each awaited
// before the next, and abort on the first failure. The full build paces its
// calls with a fixed delay.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::Error;
use crate::uba::client::UbaClient;
use crate::uba::descriptor::ComponentCatalog;
use crate::uba::endpoints::{MetaUse, require_json};
use crate::uba::matrix::{ComponentMatrix, MeasurementMatrix, MeasurementRecord};
use crate::uba::query::{MeasureQuery, TimeWindow};
use crate::uba::scope::Scope;

/// Default pause between consecutive calls of a full matrix build.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Settings for [`UbaClient::measurement_matrix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixOptions {
    /// Scopes fetched per component, in order.
    pub scopes: Vec<Scope>,
    /// Pause between calls; `None` disables pacing.
    pub delay: Option<Duration>,
    /// Data set whose stations annotate the records.
    pub meta_use: MetaUse,
    pub lang: Option<String>,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            scopes: Scope::all(),
            delay: Some(DEFAULT_DELAY),
            meta_use: MetaUse::Measure,
            lang: None,
        }
    }
}

impl MatrixOptions {
    pub fn scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    pub fn delay(mut self, delay: Option<Duration>) -> Self {
        self.delay = delay;
        self
    }

    pub fn no_delay(self) -> Self {
        self.delay(None)
    }
}

/// Sleeps between calls, never before the first.
struct Pacer {
    delay: Option<Duration>,
    first: bool,
}

impl Pacer {
    fn new(delay: Option<Duration>) -> Self {
        Self { delay, first: true }
    }

    async fn wait(&mut self) {
        if std::mem::take(&mut self.first) {
            return;
        }
        if let Some(delay) = self.delay.filter(|d| !d.is_zero()) {
            tokio::time::sleep(delay).await;
        }
    }
}

impl UbaClient {
    /// For every component, fetch all stations' measures at `scope` and
    /// union them into station → timestamp → component id → reading.
    ///
    /// One call per component, no pacing.
    pub async fn measures_components(
        &self,
        catalog: &ComponentCatalog,
        window: &TimeWindow,
        scope: Scope,
    ) -> Result<ComponentMatrix, Error> {
        info!(components = catalog.len(), %scope, "building component matrix");
        let mut matrix = ComponentMatrix::new();

        for component in catalog {
            let query = MeasureQuery::new(*window)
                .component(component.id.as_str())
                .scope(scope);
            let data = self.measures_data(&query).await?;
            let stored = matrix.merge(component, &data)?;
            debug!(component = %component.code, stored, "merged measures");
        }

        info!(
            cells = matrix.len(),
            duplicates = matrix.duplicates(),
            "component matrix complete"
        );
        Ok(matrix)
    }

    /// Fetch the active stations once, then one `measures` call per
    /// (component, scope) pair, folded into a [`MeasurementMatrix`].
    pub async fn measurement_matrix(
        &self,
        catalog: &ComponentCatalog,
        window: &TimeWindow,
        options: &MatrixOptions,
    ) -> Result<MeasurementMatrix, Error> {
        info!(
            components = catalog.len(),
            scopes = options.scopes.len(),
            "building measurement matrix"
        );
        let mut pacer = Pacer::new(options.delay);

        pacer.wait().await;
        let stations = self
            .station_index(window, options.meta_use, options.lang.as_deref())
            .await?;
        let mut matrix = MeasurementMatrix::with_stations(stations);

        for component in catalog {
            for &scope in &options.scopes {
                pacer.wait().await;
                let query = MeasureQuery::new(*window)
                    .component(component.id.as_str())
                    .scope(scope);
                let data = self.measures_data(&query).await?;
                let stored = matrix.merge(component, scope, &data)?;
                debug!(component = %component.code, %scope, stored, "merged measures");
            }
        }

        info!(
            cells = matrix.len(),
            duplicates = matrix.duplicates(),
            "measurement matrix complete"
        );
        Ok(matrix)
    }

    /// [`measurement_matrix`](Self::measurement_matrix), flattened to
    /// annotated records.
    pub async fn measures_stations_hour(
        &self,
        catalog: &ComponentCatalog,
        window: &TimeWindow,
        options: &MatrixOptions,
    ) -> Result<Vec<MeasurementRecord>, Error> {
        Ok(self
            .measurement_matrix(catalog, window, options)
            .await?
            .records())
    }

    async fn measures_data(&self, query: &MeasureQuery) -> Result<serde_json::Value, Error> {
        let payload = self
            .rest()
            .request(&self.measures_request(query).strict())
            .await?
            .into_payload();
        let mut body = require_json("measures", payload)?;
        body.get_mut("data")
            .map(serde_json::Value::take)
            .ok_or(Error::MissingField {
                resource: "measures",
                field: "data",
            })
    }
}
