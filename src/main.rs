//! Command-line front end for the HR settings workflows.

use std::env;
use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use dotenvy::dotenv;
use thiserror::Error;
use validator::Validate;

use hr_settings::domain::password::PasswordField;
use hr_settings::domain::profile::FileUpload;
use hr_settings::domain::types::AccessToken;
use hr_settings::dto::files::FileKind;
use hr_settings::dto::labels::format_label;
use hr_settings::dto::profile::ProfilePageData;
use hr_settings::forms::password::PasswordChangeForm;
use hr_settings::forms::profile::{ChangeOutcome, FieldInput};
use hr_settings::models::config::ClientConfig;
use hr_settings::repository::errors::RepositoryError;
use hr_settings::repository::{HttpRepository, SessionStore};
use hr_settings::services::ServiceError;
use hr_settings::services::password::change_password;
use hr_settings::services::settings::{
    AdminSettings, AdminTab, EmployeeSettings, EmployeeTab, LoadState, ProfileSettings,
};

/// Manage an employee profile and password against the HR backend.
#[derive(Parser)]
#[command(name = "hr-settings")]
#[command(about = "HR settings: profile and password management", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Panel {
    Admin,
    Employee,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a profile
    Show {
        /// Profile identifier
        #[arg(long, env = "HR_PROFILE_ID")]
        id: Option<String>,

        /// Which settings panel to view the profile through
        #[arg(long, value_enum, default_value = "admin")]
        panel: Panel,

        /// Print the profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit and save a profile
    Edit {
        /// Profile identifier
        #[arg(long, env = "HR_PROFILE_ID")]
        id: Option<String>,

        /// Field change as `path=value`, e.g. `currentAddress.city=Pune`
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,

        /// Document to upload as `field=file`, e.g. `panCardPdf=./pan.pdf`
        #[arg(long = "attach", value_name = "FIELD=FILE")]
        attach: Vec<String>,
    },

    /// Remove the profile image
    RemoveImage {
        /// Profile identifier
        #[arg(long, env = "HR_PROFILE_ID")]
        id: Option<String>,

        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },

    /// Change the signed-in user's password
    ChangePassword {
        /// Bearer token; read from the session file when omitted
        #[arg(long, env = "HR_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[arg(long)]
        current: String,

        #[arg(long)]
        new: String,

        #[arg(long)]
        confirm: String,
    },

    /// Print display labels for profile keys
    Labels {
        /// Profile keys, e.g. `maritalStatus`
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to read {path}: {source}")]
    Attachment {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid argument `{0}`: expected KEY=VALUE")]
    Usage(String),

    #[error("value for `{0}` was rejected by its input mask")]
    Rejected(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn split_pair(raw: &str) -> Result<(&str, &str), CliError> {
    raw.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .ok_or_else(|| CliError::Usage(raw.to_string()))
}

fn kind_name(kind: Option<FileKind>) -> &'static str {
    match kind {
        Some(FileKind::Pdf) => "pdf",
        Some(FileKind::Image) => "image",
        Some(FileKind::Other) => "file",
        None => "-",
    }
}

fn print_profile(page: &ProfilePageData) {
    println!("{}", page.name.as_deref().unwrap_or("-"));
    match (&page.image_url, &page.pending_image) {
        (Some(url), _) => println!("Image: {url}"),
        (None, Some(name)) => println!("Image: {name} (not saved)"),
        (None, None) => println!("Image: -"),
    }

    for section in &page.sections {
        println!();
        println!("{}", section.title);
        for field in &section.fields {
            println!(
                "  {:<22} {}",
                field.label,
                field.value.as_deref().unwrap_or("-")
            );
        }
    }

    println!();
    println!("Documents");
    for document in &page.documents {
        println!(
            "  {:<22} {:<6} {}",
            document.label,
            kind_name(document.kind),
            document.href.as_deref().unwrap_or("-")
        );
    }
}

/// Loads the profile, echoing the panel's inline error when it fails.
async fn load_profile(profile: &mut ProfileSettings, repo: &HttpRepository) -> Result<(), CliError> {
    if let Err(err) = profile.load(repo).await {
        if let LoadState::Failed(message) = profile.load_state() {
            eprintln!("{message}");
        }
        return Err(err.into());
    }
    Ok(())
}

fn show_profile(profile: &ProfileSettings, config: &ClientConfig, json: bool) -> Result<(), CliError> {
    let Some(record) = profile.snapshot() else {
        return Ok(());
    };
    let page = ProfilePageData::from_record(record, &config.assets);
    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_profile(&page);
    }
    Ok(())
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), CliError> {
    let repo = HttpRepository::from_config(&config)?;

    match cli.command {
        Commands::Show { id, panel, json } => match panel {
            Panel::Admin => {
                let mut admin = AdminSettings::new(id.as_deref(), config.permanent_address_editable);
                admin.select_tab(AdminTab::UpdateProfile);
                load_profile(&mut admin.profile, &repo).await?;
                show_profile(&admin.profile, &config, json)?;
            }
            Panel::Employee => {
                let mut employee = EmployeeSettings::new(id.as_deref());
                employee.select_tab(EmployeeTab::Profile);
                load_profile(&mut employee.profile, &repo).await?;
                show_profile(&employee.profile, &config, json)?;
            }
        },
        Commands::Edit { id, set, attach } => {
            let mut admin = AdminSettings::new(id.as_deref(), config.permanent_address_editable);
            admin.select_tab(AdminTab::UpdateProfile);
            load_profile(&mut admin.profile, &repo).await?;
            admin.profile.begin_edit()?;

            for raw in &set {
                let (path, value) = split_pair(raw)?;
                if admin.profile.change_field(path, FieldInput::text(value))?
                    == ChangeOutcome::Rejected
                {
                    return Err(CliError::Rejected(path.to_string()));
                }
            }
            for raw in &attach {
                let (field, file) = split_pair(raw)?;
                let upload =
                    FileUpload::from_path(Path::new(file)).map_err(|source| CliError::Attachment {
                        path: file.to_string(),
                        source,
                    })?;
                admin.profile.change_field(field, FieldInput::File(upload))?;
            }

            admin.profile.save(&repo).await?;
            if let Some(notice) = admin.profile.notice() {
                println!("{notice}");
            }
        }
        Commands::RemoveImage { id, yes } => {
            let mut admin = AdminSettings::new(id.as_deref(), config.permanent_address_editable);
            admin.select_tab(AdminTab::UpdateProfile);
            load_profile(&mut admin.profile, &repo).await?;
            admin.profile.begin_edit()?;
            if !admin.profile.remove_image(&repo, yes).await? {
                println!("Image not removed: pass --yes to confirm.");
                return Ok(());
            }
            if let Some(notice) = admin.profile.notice() {
                println!("{notice}");
            }
        }
        Commands::ChangePassword {
            token,
            current,
            new,
            confirm,
        } => {
            let token = match token {
                Some(raw) => Some(AccessToken::new(raw).map_err(ServiceError::from)?),
                None => SessionStore::new(&config.session_file).access_token()?,
            };
            let mut form = PasswordChangeForm::default();
            form.set_input(PasswordField::Current, current);
            form.set_input(PasswordField::New, new);
            form.set_input(PasswordField::Confirm, confirm);

            let message = change_password(&mut form, token.as_ref(), &repo).await?;
            println!("{message}");
        }
        Commands::Labels { fields } => {
            for field in &fields {
                println!("{field}: {}", format_label(field));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        // Nested keys use a double underscore, e.g. APP_ASSETS__IMAGE_BASE.
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let client_config = match settings.try_deserialize::<ClientConfig>() {
        Ok(client_config) => client_config,
        Err(err) => {
            log::error!("Error loading client config: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = client_config.validate() {
        log::error!("Invalid client config: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run(cli, client_config).await {
        log::error!("{err}");
        std::process::exit(1);
    }
}
