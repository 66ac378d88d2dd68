// ABOUTME: Start, stop, and delete commands for a single app.
// ABOUTME: Reports failure unless the platform confirms the change.

use cfkit::config::Config;
use cfkit::error::{Error, Result};
use cfkit::output::Output;

use super::session;
use crate::cli::AppArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Start,
    Stop,
    Delete,
}

impl Lifecycle {
    fn verb(self) -> &'static str {
        match self {
            Lifecycle::Start => "start",
            Lifecycle::Stop => "stop",
            Lifecycle::Delete => "delete",
        }
    }
}

pub async fn lifecycle(
    config: &Config,
    action: Lifecycle,
    args: &AppArgs,
    output: &Output,
) -> Result<()> {
    let session = session::connect(config).await?;
    let org = session.find_org(&args.org).await?;
    let space = session.find_space(&org, &args.space).await?;
    let mut app = session.find_app(&space, &args.app).await?;

    output.progress(&format!("Requesting {} of {}", action.verb(), app.name));
    let confirmed = match action {
        Lifecycle::Start => session.service.start_app(&mut app).await,
        Lifecycle::Stop => session.service.stop_app(&mut app).await,
        Lifecycle::Delete => session.service.delete_app(&mut app).await,
    };

    if !confirmed {
        return Err(Error::OperationFailed(format!(
            "Unable to {} app {}.",
            action.verb(),
            app.name
        )));
    }

    match action {
        Lifecycle::Delete => output.success(&format!("Deleted {}", app.name)),
        _ => output.success(&format!("{} is {}", app.name, app.state)),
    }
    Ok(())
}
