use std::sync::Arc;

use log::{error, info, warn};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::image::{HttpImageLoader, ImageLoader};
use crate::models::{today, LookupResult, Query};
use crate::request::build_client;
use crate::view::{Ticket, View, ViewState};

use super::{ApodClient, ApodSource, KeyRelay, LookupError, RelayClient};

/// Drives one date from the picker all the way to the screen:
/// relay → APOD → image preload → view
#[derive(Clone)]
pub struct LookupFlow {
    relay: Arc<dyn KeyRelay>,
    apod: Arc<dyn ApodSource>,
    images: Arc<dyn ImageLoader>,
    view: Arc<View>,
    in_flight: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl LookupFlow {
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = build_client(&config.user_agent)?;
        Ok(Self::new(
            Arc::new(RelayClient::new(client.clone(), &config.relay_url)?),
            Arc::new(ApodClient::new(client.clone(), config.apod_api_url.clone())),
            Arc::new(HttpImageLoader::new(client)),
            Arc::new(View::new()),
        ))
    }

    pub fn new(
        relay: Arc<dyn KeyRelay>,
        apod: Arc<dyn ApodSource>,
        images: Arc<dyn ImageLoader>,
        view: Arc<View>,
    ) -> Self {
        Self {
            relay,
            apod,
            images,
            view,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// Runs a lookup for raw user input.
    ///
    /// Input errors are returned without any network traffic and only flag the
    /// input. Every other failure settles the view in [`crate::view::Phase::Failed`].
    /// Returns the settled state, or `None` if a newer submission took over
    /// before this one finished
    pub async fn submit(&self, input: &str) -> Result<Option<ViewState>, LookupError> {
        self.submit_on(input, today()).await
    }

    pub(crate) async fn submit_on(
        &self,
        input: &str,
        today: chrono::NaiveDate,
    ) -> Result<Option<ViewState>, LookupError> {
        let query = self.check_input(input, today)?;
        Ok(self.run(query).await)
    }

    /// Spawns the submission as its own task, aborting the one started by the
    /// previous call. Input errors are reported straight away and leave the
    /// running lookup alone. `on_settled` runs only if this submission is
    /// still the latest when it settles
    pub fn spawn<F>(&self, input: String, on_settled: F)
    where
        F: FnOnce(Result<ViewState, LookupError>) + Send + 'static,
    {
        self.spawn_on(input, today(), on_settled)
    }

    pub(crate) fn spawn_on<F>(&self, input: String, today: chrono::NaiveDate, on_settled: F)
    where
        F: FnOnce(Result<ViewState, LookupError>) + Send + 'static,
    {
        let query = match self.check_input(&input, today) {
            Ok(query) => query,
            Err(err) => return on_settled(Err(err)),
        };
        let mut in_flight = self.in_flight.lock();
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }
        let flow = self.clone();
        let handle = tokio::spawn(async move {
            if let Some(state) = flow.run(query).await {
                on_settled(Ok(state));
            }
        });
        *in_flight = Some(handle);
    }

    /// Waits for the latest spawned submission, if any
    pub async fn settle(&self) {
        let handle = self.in_flight.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    error!("Lookup task crashed: {}", err);
                }
            }
        }
    }

    fn check_input(&self, input: &str, today: chrono::NaiveDate) -> Result<Query, LookupError> {
        Query::parse(input, today).map_err(|err| {
            warn!("Rejected date input {:?}: {}", input, err);
            self.view.reject_input();
            err
        })
    }

    async fn run(&self, query: Query) -> Option<ViewState> {
        let ticket = self.view.begin(query.date());
        info!("Looking up APOD for {}", query);
        let result = match self.lookup(&query).await {
            Ok(result) => result,
            Err(err) => {
                error!("NASA API Error: {}", err);
                LookupResult::from(&err)
            }
        };
        self.present(ticket, result).await
    }

    async fn lookup(&self, query: &Query) -> Result<LookupResult, LookupError> {
        let api_key = self.relay.api_key().await?;
        let payload = self.apod.fetch(&api_key, query).await?;
        Ok(payload.classify())
    }

    async fn present(&self, ticket: Ticket, result: LookupResult) -> Option<ViewState> {
        match result {
            LookupResult::Image {
                url,
                title,
                explanation,
            } => {
                let alt = title.clone();
                self.view
                    .commit(ticket, |state| state.show_text(title, explanation))?;
                match self.images.preload(&url, &alt).await {
                    Ok(image) => self.view.commit(ticket, |state| state.display(image)),
                    Err(err) => {
                        error!("{}", err);
                        let message = err.user_message();
                        self.view.commit(ticket, |state| state.fail(message))
                    }
                }
            }
            LookupResult::NoImage { title, explanation } => self.view.commit(ticket, |state| {
                state.show_text(title, explanation);
                state.no_image();
            }),
            LookupResult::Error { message } => {
                self.view.commit(ticket, |state| state.fail(&message))
            }
        }
    }
}
