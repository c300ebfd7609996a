//! Typed wrappers over [`ApiClient::request`], one proxy per resource group.
//!
//! Responses are returned as backend JSON except where a small typed view is
//! useful to callers ([`UnreadCount`], [`Membership`]).

pub mod attachments;
pub mod directory;
pub mod groups;
pub mod hymns;
pub mod live;
pub mod marketplace;
pub mod notifications;
pub mod profiles;
pub mod social;
pub mod tracks;

use crate::client::ApiClient;

pub use attachments::{Attachment, AttachmentKind};
pub use directory::{Directory, DirectoryKind};
pub use groups::{Groups, Membership};
pub use hymns::Hymns;
pub use live::LiveEvents;
pub use marketplace::Marketplace;
pub use notifications::{Notifications, UnreadCount};
pub use profiles::Profiles;
pub use social::SocialPosts;
pub use tracks::Tracks;

/// Numeric primary key used by the backend.
pub type Id = u64;

impl ApiClient {
    pub fn profiles(&self) -> Profiles<'_> {
        Profiles::new(self)
    }

    pub fn tracks(&self) -> Tracks<'_> {
        Tracks::new(self)
    }

    pub fn social(&self) -> SocialPosts<'_> {
        SocialPosts::new(self)
    }

    pub fn notifications(&self) -> Notifications<'_> {
        Notifications::new(self)
    }

    pub fn hymns(&self) -> Hymns<'_> {
        Hymns::new(self)
    }

    pub fn directory(&self, kind: DirectoryKind) -> Directory<'_> {
        Directory::new(self, kind)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(self)
    }

    pub fn marketplace(&self) -> Marketplace<'_> {
        Marketplace::new(self)
    }

    pub fn live_events(&self) -> LiveEvents<'_> {
        LiveEvents::new(self)
    }
}
