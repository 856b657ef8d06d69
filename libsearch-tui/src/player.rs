//! Content player hand-off.

use crate::nav::{Location, NavError, Navigator};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Mime type of collections, which open in the collection player.
pub const COLLECTION_MIME_TYPE: &str = "application/vnd.ekstep.content-collection";

pub trait PlayerService: Send + Sync {
    fn play_content(&self, meta_data: &Map<String, Value>) -> Result<(), NavError>;
}

/// Player that opens content by navigating to its play route.
#[derive(Clone)]
pub struct RoutePlayer {
    navigator: Arc<dyn Navigator>,
}

impl RoutePlayer {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }
}

impl PlayerService for RoutePlayer {
    fn play_content(&self, meta_data: &Map<String, Value>) -> Result<(), NavError> {
        match play_path(meta_data) {
            Some(path) => self.navigator.navigate(Location::Other(path)),
            None => {
                tracing::warn!("content without identifier cannot be played");
                Ok(())
            }
        }
    }
}

/// Play route for a content item, if it has an identifier.
pub fn play_path(meta_data: &Map<String, Value>) -> Option<String> {
    let identifier = meta_data.get("identifier").and_then(Value::as_str)?;
    let kind = match meta_data.get("mimeType").and_then(Value::as_str) {
        Some(COLLECTION_MIME_TYPE) => "collection",
        _ => "content",
    };
    Some(format!("/resources/play/{}/{}", kind, identifier))
}
