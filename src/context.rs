use tracing::debug;

use crate::api::MispClient;
use crate::cli::NotifyMode;
use crate::config::{self, AppPaths, ConfigStore, Settings};
use crate::error::AppResult;
use crate::mail::{FileMessageStore, SmtpForwarder};
use crate::notify::{ConsoleNotifier, DesktopNotifier, Notifier};
use crate::output::Output;
use crate::report::ReportController;

pub type AppController =
    ReportController<Box<dyn Notifier>, FileMessageStore, SmtpForwarder, MispClient>;

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub paths: AppPaths,
    pub settings: Settings,
    pub output: Output,
    pub notify: NotifyMode,
}

impl AppContext {
    pub fn bootstrap(
        profile: String,
        profile_dir: Option<std::path::PathBuf>,
        json: bool,
        notify: NotifyMode,
    ) -> AppResult<Self> {
        let profile = config::resolve_profile(&profile)?;
        let paths = match profile_dir {
            Some(dir) => AppPaths::at(dir)?,
            None => AppPaths::discover(&profile)?,
        };
        debug!(profile = %profile, dir = %paths.profile_dir().display(), "profile resolved");
        let settings = config::load_settings(&paths)?;
        let output = Output::new(json);

        Ok(Self {
            profile,
            paths,
            settings,
            output,
            notify,
        })
    }

    pub fn controller(&self) -> AppResult<AppController> {
        let notifier: Box<dyn Notifier> = match self.notify {
            NotifyMode::Console => Box::new(ConsoleNotifier::new(self.output)),
            NotifyMode::Desktop => Box::new(DesktopNotifier),
        };

        Ok(ReportController::new(
            ConfigStore::new(self.paths.clone()),
            notifier,
            FileMessageStore,
            SmtpForwarder::new(self.settings.clone()),
            MispClient::new(self.settings.timeout())?,
        ))
    }
}
