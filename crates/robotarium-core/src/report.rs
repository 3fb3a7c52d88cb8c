//! Progress reporting toward the presentation layer
//!
//! The toolchain layer never calls into a UI. It hands display-ready
//! [`Fragment`]s to a caller-supplied [`ReportSink`], in order, as each phase
//! completes.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Semantic tag of a fragment; presentation decides the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTag {
    Success,
    Failure,
    Info,
}

/// A display-ready piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub tag: ReportTag,
    pub text: String,
}

impl Fragment {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tag: ReportTag::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            tag: ReportTag::Failure,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            tag: ReportTag::Info,
            text: text.into(),
        }
    }
}

/// Receiver of progress fragments.
pub trait ReportSink: Send {
    fn report(&mut self, fragment: Fragment);
}

impl ReportSink for Vec<Fragment> {
    fn report(&mut self, fragment: Fragment) {
        self.push(fragment);
    }
}

impl ReportSink for mpsc::UnboundedSender<Fragment> {
    fn report(&mut self, fragment: Fragment) {
        // A dropped receiver means nobody is watching; the run still completes
        if self.send(fragment).is_err() {
            tracing::trace!("Report receiver dropped, discarding fragment");
        }
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn report(&mut self, fragment: Fragment) {
        (**self).report(fragment);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn report(&mut self, _fragment: Fragment) {}
}
