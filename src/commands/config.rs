use std::io::{self, IsTerminal, Write};

use serde::Serialize;

use crate::cli::{ChooseArgs, ConfigCommand, SmtpArgs};
use crate::config::{self, ChosenPath, Configuration, PromptPicker, Settings};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::report::{InterfaceState, transport};

#[derive(Debug, Serialize)]
struct ConfigView {
    profile: String,
    state: InterfaceState,
    path: String,
    configuration: Option<Configuration>,
    transport: Option<&'static str>,
}

pub async fn run(ctx: &AppContext, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => {
            let mut controller = ctx.controller()?;
            let state = controller.startup(&ChosenPath(None));
            let view = config_view(ctx, state, controller.configuration().cloned());
            ctx.output.emit(&describe(&view), &view)
        }
        ConfigCommand::Choose(args) => choose(ctx, args),
        ConfigCommand::Smtp(args) => {
            let settings = apply_smtp_args(ctx.settings.clone(), args)?;
            config::save_settings(&ctx.paths, &settings)?;

            let path = ctx.paths.settings_file();
            let text = format!("saved smtp settings to {}", path.display());
            ctx.output.emit(
                &text,
                &serde_json::json!({ "saved": path.display().to_string() }),
            )
        }
    }
}

fn choose(ctx: &AppContext, args: ChooseArgs) -> AppResult<()> {
    let mut controller = ctx.controller()?;
    let state = match args.path {
        Some(path) => controller.choose_new(&ChosenPath(Some(path))),
        None => controller.choose_new(&PromptPicker),
    };

    let view = config_view(ctx, state, controller.configuration().cloned());
    ctx.output.emit(&describe(&view), &view)?;

    if state == InterfaceState::Enabled {
        Ok(())
    } else {
        Err(AppError::Config(
            "no usable configuration was chosen".to_string(),
        ))
    }
}

fn config_view(
    ctx: &AppContext,
    state: InterfaceState,
    configuration: Option<Configuration>,
) -> ConfigView {
    let transport = configuration
        .as_ref()
        .and_then(|config| transport::select(config).ok())
        .map(|transport| transport.kind());

    ConfigView {
        profile: ctx.profile.clone(),
        state,
        path: ctx.paths.config_file().display().to_string(),
        configuration,
        transport,
    }
}

fn describe(view: &ConfigView) -> String {
    let state = match view.state {
        InterfaceState::Uninitialized => "not configured",
        InterfaceState::Disabled => "disabled",
        InterfaceState::Enabled => "enabled",
    };

    let mut lines = vec![
        format!("{}: {state}", view.profile),
        format!("   file: {}", view.path),
    ];

    if let Some(config) = &view.configuration {
        lines.push(format!("   server: {}", config.server_url));
        lines.push(format!("   name: {}", config.name));
        lines.push(format!("   logo: {}", config.logo));
        lines.push(format!(
            "   transport: {}",
            view.transport.unwrap_or("(unsupported destination)")
        ));
    }

    lines.join("\n")
}

fn apply_smtp_args(mut settings: Settings, args: SmtpArgs) -> AppResult<Settings> {
    if let Some(host) = args.host {
        settings.smtp_host = Some(host);
    }
    if let Some(port) = args.port {
        settings.smtp_port = Some(port);
    }
    if let Some(security) = args.security {
        settings.smtp_security = security;
    }
    if let Some(username) = args.username {
        settings.smtp_username = Some(username);
    }
    if let Some(sender) = args.sender {
        settings.sender = Some(sender);
    }
    if let Some(timeout_secs) = args.timeout_secs {
        if timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "--timeout-secs must be greater than 0".to_string(),
            ));
        }
        settings.timeout_secs = Some(timeout_secs);
    }

    if args.ask_password {
        if !io::stdin().is_terminal() {
            return Err(AppError::InvalidInput(
                "--ask-password needs an interactive terminal".to_string(),
            ));
        }
        settings.smtp_password = Some(prompt_line("SMTP password: ")?);
    }

    Ok(settings)
}

fn prompt_line(prompt: &str) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use crate::config::SmtpSecurity;

    use super::*;

    fn smtp_args() -> SmtpArgs {
        SmtpArgs {
            host: None,
            port: None,
            security: None,
            username: None,
            ask_password: false,
            sender: None,
            timeout_secs: None,
        }
    }

    #[test]
    fn smtp_args_only_touch_given_fields() {
        let existing = Settings {
            smtp_host: Some("old.example.com".to_string()),
            sender: Some("analyst@example.com".to_string()),
            ..Settings::default()
        };
        let args = SmtpArgs {
            host: Some("smtp.example.com".to_string()),
            security: Some(SmtpSecurity::Tls),
            ..smtp_args()
        };

        let updated = apply_smtp_args(existing, args).expect("apply");
        assert_eq!(updated.smtp_host.as_deref(), Some("smtp.example.com"));
        assert_eq!(updated.smtp_security, SmtpSecurity::Tls);
        assert_eq!(updated.sender.as_deref(), Some("analyst@example.com"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let args = SmtpArgs {
            timeout_secs: Some(0),
            ..smtp_args()
        };
        assert!(apply_smtp_args(Settings::default(), args).is_err());
    }

    #[test]
    fn describes_unsupported_destination() {
        let view = ConfigView {
            profile: "default".to_string(),
            state: InterfaceState::Enabled,
            path: "/tmp/ses-tb.json".to_string(),
            configuration: Some(Configuration {
                server_url: "ftp://x".to_string(),
                auth_token: "t".to_string(),
                name: "SOC".to_string(),
                logo: "logo.png".to_string(),
            }),
            transport: None,
        };

        let text = describe(&view);
        assert!(text.starts_with("default: enabled"));
        assert!(text.contains("transport: (unsupported destination)"));
    }
}
