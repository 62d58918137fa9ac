use thiserror::Error;

use crate::error::ApiError;

/// One section of a page backed by a remote fetch.
///
/// Starts `Loading` and settles exactly once into `Ready`, `Empty` or
/// `Failed`. A failed section is distinct from an empty one.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Empty,
    Ready(Vec<T>),
    Failed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("section already settled")]
pub struct AlreadySettled;

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::Loading
    }
}

impl<T> Loadable<T> {
    /// Settle a section from a fetch result. `what` names the section in
    /// logs and in the error text shown to the user.
    pub fn from_result(result: Result<Vec<T>, ApiError>, what: &str) -> Self {
        let mut section = Loadable::Loading;
        // a fresh section is always Loading, so this cannot fail
        let _ = section.settle(result, what);
        section
    }

    pub fn settle(&mut self, result: Result<Vec<T>, ApiError>, what: &str) -> Result<(), AlreadySettled> {
        if !matches!(self, Loadable::Loading) {
            return Err(AlreadySettled);
        }

        *self = match result {
            Ok(items) if items.is_empty() => Loadable::Empty,
            Ok(items) => Loadable::Ready(items),
            Err(e) => {
                log::warn!("failed to load {}: {}", what, e);
                Loadable::Failed(e.user_message(&format!("Error fetching {}.", what)))
            }
        };
        Ok(())
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Loadable<U> {
        match self {
            Loadable::Loading => Loadable::Loading,
            Loadable::Empty => Loadable::Empty,
            Loadable::Ready(items) => {
                let items: Vec<U> = items.into_iter().map(f).collect();
                if items.is_empty() {
                    Loadable::Empty
                } else {
                    Loadable::Ready(items)
                }
            }
            Loadable::Failed(message) => Loadable::Failed(message),
        }
    }

    /// Keep only the items matching `keep`; a section filtered down to
    /// nothing becomes `Empty`.
    pub fn filter(self, mut keep: impl FnMut(&T) -> bool) -> Self {
        match self {
            Loadable::Ready(items) => {
                let items: Vec<T> = items.into_iter().filter(|item| keep(item)).collect();
                if items.is_empty() {
                    Loadable::Empty
                } else {
                    Loadable::Ready(items)
                }
            }
            other => other,
        }
    }

    /// Items to render. Empty for every state except `Ready`.
    pub fn items(&self) -> &[T] {
        match self {
            Loadable::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Loadable::Empty)
    }
}
