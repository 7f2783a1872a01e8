use async_trait::async_trait;
use shared::{
    domain::{Booking, Coach, Court, Member, ResourceKind},
    protocol::{
        ChartPeriod, CreatedResponse, DashboardStats, NewEntity, QueryRequest, QueryResponse,
        RevenuePoint,
    },
};

pub mod config;
pub mod console;
pub mod conversation;
pub mod draft;
pub mod error;
pub mod transport;

pub use console::{
    ConsoleController, ConsoleEvent, ConsoleState, ConsoleTab, DeleteOutcome, ReloadOutcome,
};
pub use conversation::{
    ConversationController, ConversationEvent, ConversationState, IgnoreReason, SubmitOutcome,
    Turn, TurnRole, EXAMPLE_QUESTIONS, FALLBACK_ANSWER,
};
pub use draft::Draft;
pub use error::{ClientError, Result};
pub use transport::{HttpAdminClient, HttpQueryClient};

/// A full collection fetched for one resource kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Members(Vec<Member>),
    Coaches(Vec<Coach>),
    Courts(Vec<Court>),
    Bookings(Vec<Booking>),
}

impl Collection {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Collection::Members(_) => ResourceKind::Member,
            Collection::Coaches(_) => ResourceKind::Coach,
            Collection::Courts(_) => ResourceKind::Court,
            Collection::Bookings(_) => ResourceKind::Booking,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Members(items) => items.len(),
            Collection::Coaches(items) => items.len(),
            Collection::Courts(items) => items.len(),
            Collection::Bookings(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// CRUD and dashboard endpoints of the club admin backend.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn fetch_stats(&self) -> Result<DashboardStats>;
    async fn fetch_revenue_chart(&self, period: ChartPeriod) -> Result<Vec<RevenuePoint>>;
    async fn list(&self, kind: ResourceKind) -> Result<Collection>;
    async fn create(&self, entity: &NewEntity) -> Result<CreatedResponse>;
    async fn delete(&self, kind: ResourceKind, id: i64) -> Result<()>;
}

/// Natural-language analytics endpoint.
#[async_trait]
pub trait QueryApi: Send + Sync {
    async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse>;
}

/// Interactive yes/no gate in front of destructive actions.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmPrompt for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
