use tracing::debug;

use crate::cli::ReportArgs;
use crate::config::{ChosenPath, ConfigPicker, PromptPicker};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::mail::{MessageHandle, MessageSource};
use crate::notify::Notifier;
use crate::output::{OutputMode, json};
use crate::report::{EventPoster, MailForwarder, ReportController, ReportSummary};

pub async fn run(ctx: &AppContext, args: ReportArgs) -> AppResult<()> {
    let selection = build_selection(&args.messages)?;

    // stdin carries a message, so it cannot also answer the config prompt.
    let no_prompt = ChosenPath(None);
    let picker: &dyn ConfigPicker = if selection.contains(&MessageHandle::Stdin) {
        &no_prompt
    } else {
        &PromptPicker
    };

    let summary = submit_selection(&selection, picker, || ctx.controller()).await?;

    if ctx.output.mode() == OutputMode::Json {
        json::print_line(&summary)?;
    }

    check_summary(&summary)
}

/// Builds the controller and loads the configuration only when there is
/// something to report.
async fn submit_selection<N, S, F, P>(
    selection: &[MessageHandle],
    picker: &dyn ConfigPicker,
    controller: impl FnOnce() -> AppResult<ReportController<N, S, F, P>>,
) -> AppResult<ReportSummary>
where
    N: Notifier,
    S: MessageSource,
    F: MailForwarder,
    P: EventPoster,
{
    if selection.is_empty() {
        debug!("no messages selected");
        return Ok(ReportSummary::NothingSelected);
    }

    let mut controller = controller()?;
    controller.startup(picker);
    Ok(controller.report(selection).await)
}

fn build_selection(args: &[String]) -> AppResult<Vec<MessageHandle>> {
    let selection = args
        .iter()
        .map(|arg| MessageHandle::from_arg(arg))
        .collect::<Vec<_>>();

    let stdin_count = selection
        .iter()
        .filter(|handle| **handle == MessageHandle::Stdin)
        .count();
    if stdin_count > 1 {
        return Err(AppError::InvalidInput(
            "`-` (stdin) can only be selected once".to_string(),
        ));
    }

    Ok(selection)
}

fn check_summary(summary: &ReportSummary) -> AppResult<()> {
    match summary {
        ReportSummary::NothingSelected => Ok(()),
        ReportSummary::Completed { failed: 0, .. } => Ok(()),
        ReportSummary::Completed {
            submitted, failed, ..
        } => Err(AppError::Report(format!(
            "{failed} of {} messages were not submitted",
            submitted + failed
        ))),
        ReportSummary::Misconfigured => Err(AppError::Report(
            "nothing submitted; configuration is unusable".to_string(),
        )),
        ReportSummary::Aborted { transport } => Err(AppError::Report(format!(
            "nothing submitted; {transport} transport is not set up"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crate::context::AppController;

    use super::*;

    fn refused(built: &Cell<bool>) -> impl FnOnce() -> AppResult<AppController> + '_ {
        move || {
            built.set(true);
            Err(AppError::Config("controller unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn empty_selection_skips_configuration() {
        let built = Cell::new(false);
        let summary = submit_selection(&[], &ChosenPath(None), refused(&built))
            .await
            .expect("nothing to submit");

        assert_eq!(summary, ReportSummary::NothingSelected);
        assert!(!built.get());
        assert!(check_summary(&summary).is_ok());
    }

    #[tokio::test]
    async fn selected_messages_build_the_controller() {
        let built = Cell::new(false);
        let selection = [MessageHandle::File("a.eml".into())];
        let result = submit_selection(&selection, &ChosenPath(None), refused(&built)).await;

        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(built.get());
    }

    #[test]
    fn empty_selection_is_allowed() {
        assert!(build_selection(&[]).expect("selection").is_empty());
    }

    #[test]
    fn stdin_selected_twice_is_rejected() {
        let args = vec!["-".to_string(), "a.eml".to_string(), "-".to_string()];
        assert!(matches!(
            build_selection(&args),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn partial_failure_is_an_error() {
        let summary = ReportSummary::Completed {
            transport: "https",
            submitted: 1,
            failed: 1,
        };
        let err = check_summary(&summary).expect_err("partial failure");
        assert!(err.to_string().contains("1 of 2 messages"));
    }
}
