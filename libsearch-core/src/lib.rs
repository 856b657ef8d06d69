//! libsearch core - library search page types
//!
//! Pure data structures and pure functions shared by every front end of the
//! library search page. No I/O happens in this crate.

pub mod card;
pub mod error;
pub mod pager;
pub mod query;
pub mod request;
pub mod telemetry;
pub mod view;

pub use card::{Card, CardMapping};
pub use error::{CoreError, CoreResult};
pub use pager::Pager;
pub use query::{FilterSet, PageNumber, QueryParams, QueryValue, ReservedKey, SearchQuery, SortSpec};
pub use request::{ContentItem, SearchEnvelope, SearchRequest, SearchResult, ServerResponse};
pub use telemetry::{
    ImpressionEvent, InteractDescriptors, InteractEdata, InviewEntry, InviewLog,
    TelemetryRouteData,
};
pub use view::{reduce, Generation, NoResultMessage, Reduced, ResultMessages, SearchViewState, ViewEvent};
