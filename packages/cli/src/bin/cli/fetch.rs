// ABOUTME: CLI command printing backend resources as JSON
// ABOUTME: A 401 on any fetch signs the session out through the detector

use anyhow::{bail, Result};
use clap::ValueEnum;
use colored::*;
use serde_json::Value;

use eventhub_auth::Resource;
use eventhub_cli::AppContext;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceArg {
    Me,
    Orgs,
    Events,
    Prizes,
    Posts,
    Post,
    Schedules,
    CurrentSchedule,
}

impl ResourceArg {
    pub fn resource(self, id: Option<u64>) -> Result<Resource> {
        if self != Self::Post && id.is_some() {
            bail!("--id only applies to `post`");
        }
        let resource = match self {
            Self::Me => Resource::CurrentUser,
            Self::Orgs => Resource::Organizations,
            Self::Events => Resource::Events,
            Self::Prizes => Resource::Prizes,
            Self::Posts => Resource::Posts,
            Self::Post => match id {
                Some(id) => Resource::Post(id),
                None => bail!("`post` requires --id"),
            },
            Self::Schedules => Resource::Schedules,
            Self::CurrentSchedule => Resource::CurrentSchedule,
        };
        Ok(resource)
    }
}

pub async fn fetch_command(
    ctx: &AppContext,
    arg: ResourceArg,
    id: Option<u64>,
    all: bool,
) -> Result<()> {
    let resource = arg.resource(id)?;

    if !ctx.session.is_authenticated() {
        eprintln!("{} Not signed in; request will be anonymous", "⚠".yellow());
    }

    let result = if all && resource.is_paginated() {
        ctx.fetcher
            .get_all_pages::<Value>(&resource.path())
            .await
            .map(Value::Array)
    } else {
        ctx.fetcher.fetch(resource).await
    };

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            if e.is_unauthorized() && !ctx.session.is_authenticated() {
                eprintln!(
                    "{} Session is no longer valid; sign in again",
                    "✗".red().bold()
                );
            }
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ResourceArg::Me, "/auth/users/me/")]
    #[case(ResourceArg::Orgs, "/orgs/")]
    #[case(ResourceArg::CurrentSchedule, "/schedules/current/")]
    fn test_resource_paths(#[case] arg: ResourceArg, #[case] expected: &str) {
        assert_eq!(arg.resource(None).unwrap().path(), expected);
    }

    #[test]
    fn test_post_requires_id() {
        assert!(ResourceArg::Post.resource(None).is_err());
        assert_eq!(
            ResourceArg::Post.resource(Some(12)).unwrap(),
            Resource::Post(12)
        );
    }

    #[rstest]
    #[case(ResourceArg::Events)]
    #[case(ResourceArg::Me)]
    #[case(ResourceArg::CurrentSchedule)]
    fn test_id_rejected_for_other_resources(#[case] arg: ResourceArg) {
        let err = arg.resource(Some(3)).unwrap_err();
        assert!(err.to_string().contains("--id"));
    }
}
