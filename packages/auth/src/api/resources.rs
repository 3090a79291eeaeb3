// ABOUTME: Backend resources the client reads once signed in
// ABOUTME: Paths, pagination flags and the paginated list envelope

use serde::{Deserialize, Serialize};

/// Paginated list envelope returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CurrentUser,
    Organizations,
    Events,
    Prizes,
    Posts,
    Post(u64),
    Schedules,
    CurrentSchedule,
}

impl Resource {
    pub fn path(&self) -> String {
        match self {
            Self::CurrentUser => "/auth/users/me/".to_string(),
            Self::Organizations => "/orgs/".to_string(),
            Self::Events => "/events/".to_string(),
            Self::Prizes => "/prizes/".to_string(),
            Self::Posts => "/posts/".to_string(),
            Self::Post(id) => format!("/posts/{}/", id),
            Self::Schedules => "/schedules/".to_string(),
            Self::CurrentSchedule => "/schedules/current/".to_string(),
        }
    }

    /// List endpoints answer with `PaginatedResponse`
    pub fn is_paginated(&self) -> bool {
        matches!(
            self,
            Self::Organizations | Self::Events | Self::Prizes | Self::Posts | Self::Schedules
        )
    }
}
