//! Admin console controller: tab selection, per-kind collections, the create
//! form and deletes, plus the dashboard stats and revenue chart.
//!
//! State sits behind a mutex that is never held across a request. Every
//! reload is tagged with a per-target sequence number; a reply whose tag is
//! no longer the newest for its target is dropped instead of applied, so a
//! slow earlier response cannot overwrite a newer one.

use std::{collections::HashMap, sync::Arc};

use futures::future::{try_join, try_join3};
use shared::{
    domain::{Booking, Coach, Court, Member, ResourceKind},
    protocol::{ChartPeriod, CreatedResponse, DashboardStats, NewEntity, RevenuePoint},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    draft::Draft,
    error::{ClientError, Result},
    AdminApi, Collection, ConfirmPrompt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTab {
    #[default]
    Dashboard,
    Resource(ResourceKind),
}

impl ConsoleTab {
    pub fn resource(self) -> Option<ResourceKind> {
        match self {
            ConsoleTab::Dashboard => None,
            ConsoleTab::Resource(kind) => Some(kind),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleState {
    pub tab: ConsoleTab,
    pub members: Vec<Member>,
    pub coaches: Vec<Coach>,
    pub courts: Vec<Court>,
    pub bookings: Vec<Booking>,
    pub draft: Option<Draft>,
    pub form_visible: bool,
    pub form_error: Option<String>,
    pub stats: Option<DashboardStats>,
    pub revenue: Vec<RevenuePoint>,
    pub chart_period: ChartPeriod,
}

impl ConsoleState {
    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Member => self.members.len(),
            ResourceKind::Coach => self.coaches.len(),
            ResourceKind::Court => self.courts.len(),
            ResourceKind::Booking => self.bookings.len(),
        }
    }

    pub fn contains(&self, kind: ResourceKind, id: i64) -> bool {
        match kind {
            ResourceKind::Member => self.members.iter().any(|m| m.member_id.0 == id),
            ResourceKind::Coach => self.coaches.iter().any(|c| c.coach_id.0 == id),
            ResourceKind::Court => self.courts.iter().any(|c| c.court_id.0 == id),
            ResourceKind::Booking => self.bookings.iter().any(|b| b.booking_id.0 == id),
        }
    }

    /// Clone of the rows currently held for `kind`.
    pub fn collection(&self, kind: ResourceKind) -> Collection {
        match kind {
            ResourceKind::Member => Collection::Members(self.members.clone()),
            ResourceKind::Coach => Collection::Coaches(self.coaches.clone()),
            ResourceKind::Court => Collection::Courts(self.courts.clone()),
            ResourceKind::Booking => Collection::Bookings(self.bookings.clone()),
        }
    }

    fn replace(&mut self, collection: Collection) {
        match collection {
            Collection::Members(items) => self.members = items,
            Collection::Coaches(items) => self.coaches = items,
            Collection::Courts(items) => self.courts = items,
            Collection::Bookings(items) => self.bookings = items,
        }
    }

    fn close_form(&mut self) {
        self.draft = None;
        self.form_visible = false;
        self.form_error = None;
    }

    /// Booking references must point at rows the form could have offered.
    fn check_references(&self, entity: &NewEntity) -> Result<()> {
        let NewEntity::Booking(booking) = entity else {
            return Ok(());
        };
        if !self.contains(ResourceKind::Member, booking.member_id.0) {
            return Err(ClientError::UnknownReference {
                field: "member_id",
                id: booking.member_id.0,
            });
        }
        if !self.contains(ResourceKind::Court, booking.court_id.0) {
            return Err(ClientError::UnknownReference {
                field: "court_id",
                id: booking.court_id.0,
            });
        }
        if let Some(coach_id) = booking.coach_id {
            if !self.contains(ResourceKind::Coach, coach_id.0) {
                return Err(ClientError::UnknownReference {
                    field: "coach_id",
                    id: coach_id.0,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    TabChanged(ConsoleTab),
    CollectionReloaded { kind: ResourceKind, len: usize },
    StatsReloaded,
    RevenueChartReloaded { period: ChartPeriod, points: usize },
    FormOpened(ResourceKind),
    FormClosed,
    FormError(String),
    EntityCreated { kind: ResourceKind, id: i64 },
    EntityDeleted { kind: ResourceKind, id: i64 },
    /// The refresh after a successful create or delete failed; the held rows are stale.
    ReloadFailed { kind: ResourceKind, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied { len: usize },
    /// A newer reload for the same target was issued while this one was in flight.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ReloadTarget {
    Collection(ResourceKind),
    Stats,
    RevenueChart,
}

#[derive(Default)]
struct ConsoleInner {
    state: ConsoleState,
    issued: HashMap<ReloadTarget, u64>,
}

impl ConsoleInner {
    fn issue(&mut self, target: ReloadTarget) -> u64 {
        let seq = self.issued.entry(target).or_default();
        *seq += 1;
        *seq
    }

    fn is_latest(&self, target: ReloadTarget, seq: u64) -> bool {
        self.issued.get(&target).copied() == Some(seq)
    }
}

pub struct ConsoleController {
    api: Arc<dyn AdminApi>,
    confirm: Arc<dyn ConfirmPrompt>,
    inner: Mutex<ConsoleInner>,
    events: broadcast::Sender<ConsoleEvent>,
}

impl ConsoleController {
    pub fn new(api: Arc<dyn AdminApi>, confirm: Arc<dyn ConfirmPrompt>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            confirm,
            inner: Mutex::new(ConsoleInner::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ConsoleState {
        self.inner.lock().await.state.clone()
    }

    fn emit(&self, event: ConsoleEvent) {
        let _ = self.events.send(event);
    }

    /// Switches tabs, closes any open form and reloads the tab's data even if already loaded.
    pub async fn select_tab(&self, tab: ConsoleTab) -> Result<()> {
        let had_form = {
            let mut inner = self.inner.lock().await;
            let had_form = inner.state.form_visible;
            inner.state.tab = tab;
            inner.state.close_form();
            had_form
        };
        debug!(?tab, "console: tab selected");
        if had_form {
            self.emit(ConsoleEvent::FormClosed);
        }
        self.emit(ConsoleEvent::TabChanged(tab));

        match tab {
            ConsoleTab::Dashboard => self.reload_dashboard().await,
            ConsoleTab::Resource(kind) => self.reload(kind).await.map(|_| ()),
        }
    }

    /// Replaces the collection for `kind` with a fresh fetch.
    pub async fn reload(&self, kind: ResourceKind) -> Result<ReloadOutcome> {
        let target = ReloadTarget::Collection(kind);
        let seq = self.inner.lock().await.issue(target);

        let collection = match self.api.list(kind).await {
            Ok(collection) => collection,
            Err(err) => {
                warn!(%kind, seq, "console: reload failed: {err}");
                return Err(err);
            }
        };

        if collection.kind() != kind {
            warn!(%kind, got = %collection.kind(), "console: reload returned another kind");
            return Err(ClientError::UnexpectedCollection {
                expected: kind,
                got: collection.kind(),
            });
        }

        let mut inner = self.inner.lock().await;
        if !inner.is_latest(target, seq) {
            debug!(%kind, seq, "console: dropping stale reload response");
            return Ok(ReloadOutcome::Stale);
        }
        let len = collection.len();
        inner.state.replace(collection);
        drop(inner);

        debug!(%kind, len, "console: collection replaced");
        self.emit(ConsoleEvent::CollectionReloaded { kind, len });
        Ok(ReloadOutcome::Applied { len })
    }

    pub async fn reload_dashboard(&self) -> Result<()> {
        try_join(self.reload_stats(), self.reload_revenue_chart()).await?;
        Ok(())
    }

    async fn reload_stats(&self) -> Result<ReloadOutcome> {
        let seq = self.inner.lock().await.issue(ReloadTarget::Stats);
        let stats = match self.api.fetch_stats().await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(seq, "console: stats reload failed: {err}");
                return Err(err);
            }
        };

        let mut inner = self.inner.lock().await;
        if !inner.is_latest(ReloadTarget::Stats, seq) {
            return Ok(ReloadOutcome::Stale);
        }
        inner.state.stats = Some(stats);
        drop(inner);

        self.emit(ConsoleEvent::StatsReloaded);
        Ok(ReloadOutcome::Applied { len: 1 })
    }

    async fn reload_revenue_chart(&self) -> Result<ReloadOutcome> {
        let (seq, period) = {
            let mut inner = self.inner.lock().await;
            (
                inner.issue(ReloadTarget::RevenueChart),
                inner.state.chart_period,
            )
        };
        let points = match self.api.fetch_revenue_chart(period).await {
            Ok(points) => points,
            Err(err) => {
                warn!(
                    seq,
                    days = period.days(),
                    "console: revenue chart reload failed: {err}"
                );
                return Err(err);
            }
        };

        let mut inner = self.inner.lock().await;
        if !inner.is_latest(ReloadTarget::RevenueChart, seq) {
            debug!(seq, days = period.days(), "console: dropping stale revenue chart");
            return Ok(ReloadOutcome::Stale);
        }
        let len = points.len();
        inner.state.revenue = points;
        drop(inner);

        self.emit(ConsoleEvent::RevenueChartReloaded {
            period,
            points: len,
        });
        Ok(ReloadOutcome::Applied { len })
    }

    /// Changes the revenue chart window and reloads the chart for it.
    pub async fn select_chart_period(&self, period: ChartPeriod) -> Result<ReloadOutcome> {
        self.inner.lock().await.state.chart_period = period;
        debug!(days = period.days(), "console: chart period selected");
        self.reload_revenue_chart().await
    }

    /// Opens an empty create form for the active resource tab.
    ///
    /// The booking form offers member, coach and court choices, so those three
    /// collections are refreshed before it is used.
    pub async fn open_create_form(&self) -> Result<()> {
        let kind = {
            let mut inner = self.inner.lock().await;
            let kind = inner
                .state
                .tab
                .resource()
                .ok_or(ClientError::NoResourceTab)?;
            inner.state.draft = Some(Draft::empty(kind));
            inner.state.form_visible = true;
            inner.state.form_error = None;
            kind
        };
        debug!(%kind, "console: create form opened");
        self.emit(ConsoleEvent::FormOpened(kind));

        if kind == ResourceKind::Booking {
            try_join3(
                self.reload(ResourceKind::Member),
                self.reload(ResourceKind::Coach),
                self.reload(ResourceKind::Court),
            )
            .await?;
        }
        Ok(())
    }

    pub async fn cancel_create_form(&self) {
        let had_form = {
            let mut inner = self.inner.lock().await;
            let had_form = inner.state.form_visible;
            inner.state.close_form();
            had_form
        };
        if had_form {
            self.emit(ConsoleEvent::FormClosed);
        }
    }

    pub async fn update_draft_field(&self, field: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.state.form_visible {
            return Err(ClientError::FormNotOpen);
        }
        inner
            .state
            .draft
            .as_mut()
            .ok_or(ClientError::FormNotOpen)?
            .set_field(field, value)
    }

    /// Validates and submits the open draft.
    ///
    /// A draft with missing or unparseable fields never reaches the network.
    /// On failure the form stays open with the draft intact and the message
    /// kept in `form_error`. Once the server accepts the record this returns
    /// `Ok` even if the follow-up reload fails.
    pub async fn submit_create(&self) -> Result<CreatedResponse> {
        let entity = {
            let mut inner = self.inner.lock().await;
            let state = &mut inner.state;
            if !state.form_visible {
                return Err(ClientError::FormNotOpen);
            }
            let draft = state.draft.as_ref().ok_or(ClientError::FormNotOpen)?;
            let checked = draft
                .validate()
                .and_then(|entity| state.check_references(&entity).map(|()| entity));
            match checked {
                Ok(entity) => {
                    state.form_error = None;
                    entity
                }
                Err(err) => {
                    state.form_error = Some(err.to_string());
                    drop(inner);
                    debug!("console: draft rejected before submit: {err}");
                    self.emit(ConsoleEvent::FormError(err.to_string()));
                    return Err(err);
                }
            }
        };
        let kind = entity.kind();

        let created = match self.api.create(&entity).await {
            Ok(created) => created,
            Err(err) => {
                warn!(%kind, "console: create failed: {err}");
                {
                    let mut inner = self.inner.lock().await;
                    if inner.state.draft.as_ref().map(Draft::kind) == Some(kind) {
                        inner.state.form_error = Some(err.to_string());
                    }
                }
                self.emit(ConsoleEvent::FormError(err.to_string()));
                return Err(err);
            }
        };

        let closed = {
            let mut inner = self.inner.lock().await;
            let same_form = inner.state.draft.as_ref().map(Draft::kind) == Some(kind);
            if same_form {
                inner.state.close_form();
            }
            same_form
        };
        info!(%kind, id = created.id, "console: entity created");
        self.emit(ConsoleEvent::EntityCreated {
            kind,
            id: created.id,
        });
        if closed {
            self.emit(ConsoleEvent::FormClosed);
        }

        self.refresh_after_mutation(kind).await;
        Ok(created)
    }

    /// Deletes after an explicit confirmation; a declined prompt changes nothing.
    pub async fn delete_entity(&self, kind: ResourceKind, id: i64) -> Result<DeleteOutcome> {
        let prompt = format!("Delete {} #{id}? This cannot be undone.", kind.label());
        if !self.confirm.confirm(&prompt).await {
            debug!(%kind, id, "console: delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.api.delete(kind, id).await {
            warn!(%kind, id, "console: delete failed: {err}");
            return Err(err);
        }
        info!(%kind, id, "console: entity deleted");
        self.emit(ConsoleEvent::EntityDeleted { kind, id });

        self.refresh_after_mutation(kind).await;
        Ok(DeleteOutcome::Deleted)
    }

    // The mutation already happened server-side, so a failed refresh is
    // reported as an event and never as a failed create or delete.
    async fn refresh_after_mutation(&self, kind: ResourceKind) {
        if let Err(err) = self.reload(kind).await {
            self.emit(ConsoleEvent::ReloadFailed {
                kind,
                message: err.to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
