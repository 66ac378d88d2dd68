// ABOUTME: Listing commands for organizations, spaces, and apps.
// ABOUTME: Prints one row per resource, or one JSON object per line.

use std::fmt;

use cfkit::config::Config;
use cfkit::error::Result;
use cfkit::output::Output;
use serde::Serialize;

use super::session;

#[derive(Serialize)]
struct Row {
    name: String,
    guid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<30} {}", self.name, self.guid)?;
        if let Some(ref parent) = self.parent {
            write!(f, "  {parent}")?;
        }
        if let Some(ref state) = self.state {
            write!(f, "  {state}")?;
        }
        Ok(())
    }
}

pub async fn orgs(config: &Config, output: &Output) -> Result<()> {
    let session = session::connect(config).await?;
    for org in session.service.orgs_for_instance(&session.instance).await {
        output.row(&Row {
            name: org.name,
            guid: org.guid.to_string(),
            parent: None,
            state: None,
        });
    }
    Ok(())
}

pub async fn spaces(config: &Config, org: Option<&str>, output: &Output) -> Result<()> {
    let session = session::connect(config).await?;

    let orgs = match org {
        Some(name) => vec![session.find_org(name).await?],
        None => session
            .service
            .orgs_for_instance(&session.instance)
            .await
            .into_iter()
            .map(std::sync::Arc::new)
            .collect(),
    };

    for org in &orgs {
        for space in session.service.spaces_for_org(org).await {
            output.row(&Row {
                name: space.name,
                guid: space.guid.to_string(),
                parent: Some(org.name.clone()),
                state: None,
            });
        }
    }
    Ok(())
}

pub async fn apps(config: &Config, org: &str, space: &str, output: &Output) -> Result<()> {
    let session = session::connect(config).await?;
    let org = session.find_org(org).await?;
    let space = session.find_space(&org, space).await?;

    for app in session.service.apps_for_space(&space).await {
        output.row(&Row {
            name: app.name,
            guid: app.guid.to_string(),
            parent: Some(space.name.clone()),
            state: Some(app.state.to_string()),
        });
    }
    Ok(())
}
