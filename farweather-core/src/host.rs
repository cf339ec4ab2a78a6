//! Seam to the embedding social platform.
//!
//! The mini-app runs inside a host that knows who is looking at it. That
//! host is an external collaborator; everything we need from it is the
//! signed-in viewer, so the seam is a single trait the front-end implements
//! against whatever context it actually has.

use async_trait::async_trait;

/// The signed-in user as reported by the embedding host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Platform-wide numeric identity.
    pub fid: u64,
    pub username: String,
}

/// Access to the embedding host's context.
#[async_trait]
pub trait HostContext: Send + Sync {
    /// The current viewer, or `None` when the app runs outside the host or
    /// the host has no signed-in user.
    async fn viewer(&self) -> Option<Viewer>;
}

/// A fixed viewer, for tests and for front-ends that resolve identity once
/// at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    viewer: Option<Viewer>,
}

impl StaticHost {
    pub fn signed_in(fid: u64, username: impl Into<String>) -> Self {
        Self {
            viewer: Some(Viewer {
                fid,
                username: username.into(),
            }),
        }
    }

    pub fn signed_out() -> Self {
        Self { viewer: None }
    }
}

#[async_trait]
impl HostContext for StaticHost {
    async fn viewer(&self) -> Option<Viewer> {
        self.viewer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_host_reports_viewer() {
        let host = StaticHost::signed_in(194, "alice");
        let viewer = host.viewer().await.expect("viewer should be present");
        assert_eq!(viewer.fid, 194);
        assert_eq!(viewer.username, "alice");

        assert!(StaticHost::signed_out().viewer().await.is_none());
    }
}
