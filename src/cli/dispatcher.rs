use crate::api::client::GatewayClient;
use crate::api::models::Field;
use crate::cli::main_types::{Commands, ConfigCommands, SearchArgs};
use crate::core::presenter::Presenter;
use crate::core::query::{Filter, SortMode};
use crate::core::services::PersonaService;
use crate::display::escape::EscapePolicy;
use crate::display::sink::{ContentSink, Notifier, StderrNotifier, StdoutSink};
use crate::display::template::Template;
use crate::error::{AppError, CliError, StorageError};
use crate::storage::config::{Config, Profile};
use crate::utils::validation::{validate_resource_path, validate_url};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    profile_name: String,
    gateway_url: Option<String>,
    escape_html: bool,
    sink: Arc<dyn ContentSink>,
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(config: Config, config_path: Option<PathBuf>, profile: Option<String>) -> Self {
        let profile_name = config.profile_name(profile.as_deref());
        log::debug!("Using profile: {}", profile_name);

        Self {
            config,
            config_path,
            profile_name,
            gateway_url: None,
            escape_html: false,
            sink: Arc::new(StdoutSink),
            notifier: Arc::new(StderrNotifier),
        }
    }

    pub fn with_gateway_url(mut self, gateway_url: Option<String>) -> Self {
        self.gateway_url = gateway_url;
        self
    }

    pub fn with_escape_html(mut self, escape_html: bool) -> Self {
        self.escape_html = escape_html;
        self
    }

    pub fn with_output(mut self, sink: Arc<dyn ContentSink>, notifier: Arc<dyn Notifier>) -> Self {
        self.sink = sink;
        self.notifier = notifier;
        self
    }

    fn profile(&self) -> Profile {
        self.config
            .get_profile(&self.profile_name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn build_presenter(&self) -> Result<Presenter, AppError> {
        let profile = self.profile();
        let gateway_url = self
            .gateway_url
            .clone()
            .unwrap_or_else(|| profile.gateway_url.clone());
        validate_url(&gateway_url)?;
        log::debug!("Gateway: {}", gateway_url);

        let paths = profile.resource_paths();
        for path in [&paths.home, &paths.about, &paths.all, &paths.one] {
            validate_resource_path(path)?;
        }

        let client = GatewayClient::with_timeout(gateway_url, profile.timeout())?;
        let service = PersonaService::new(Arc::new(client), self.notifier.clone()).with_paths(paths);

        Ok(Presenter::new(service, self.sink.clone()).with_escape(self.escape_policy(&profile)))
    }

    fn escape_policy(&self, profile: &Profile) -> EscapePolicy {
        if self.escape_html {
            EscapePolicy::Html
        } else {
            profile.escape_policy()
        }
    }

    pub async fn dispatch(&mut self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Config { command } => self.handle_config_command(command),
            other => self.handle_view_command(other).await,
        }
    }

    async fn handle_view_command(&self, command: Commands) -> Result<(), AppError> {
        let presenter = self.build_presenter()?;
        let label = command.name();

        let rendered = match command {
            Commands::Home => presenter.home().await,
            Commands::About => presenter.about().await,
            Commands::List => presenter.list().await,
            Commands::Names { sorted: false } => presenter.list_names().await,
            Commands::Names { sorted: true } => presenter.list_names_sorted().await,
            Commands::Sort { field, numeric } => {
                let field = parse_field(&field)?;
                let mode = if numeric {
                    SortMode::Numeric
                } else {
                    SortMode::Lexicographic
                };
                presenter.list_sorted(field, mode).await
            }
            Commands::Search(args) => presenter.search(build_filter(&args)?).await,
            Commands::Show { id, template, card } => match (template, card) {
                (Some(path), _) => {
                    let template = self.load_template(&path)?;
                    presenter.show_with(&id, &template).await
                }
                (None, true) => {
                    let template = Template::default().with_escape(self.escape_policy(&self.profile()));
                    presenter.show_with(&id, &template).await
                }
                (None, false) => presenter.show(&id).await,
            },
            Commands::Config { .. } => {
                return Err(CliError::InvalidArguments("config is not a view".to_string()).into());
            }
        };

        match rendered {
            Some(_) => Ok(()),
            None => Err(CliError::NothingRendered { command: label }.into()),
        }
    }

    fn load_template(&self, path: &Path) -> Result<Template, AppError> {
        let source = std::fs::read_to_string(path).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })?;
        let template = Template::new(source).with_escape(self.escape_policy(&self.profile()));

        let tokens = template.tokens();
        if tokens.is_empty() {
            log::warn!(
                "Template {} has no known ### TOKEN ### placeholders",
                path.display()
            );
        } else {
            log::debug!(
                "Template {} ({} bytes) uses {}",
                path.display(),
                template.source().len(),
                tokens.join(", ")
            );
        }

        Ok(template)
    }

    fn handle_config_command(&mut self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                println!("Current Configuration:");
                println!("=====================");

                match &self.config.default_profile {
                    Some(default_profile) => println!("Default Profile: {}", default_profile),
                    None => println!("Default Profile: (not set)"),
                }

                println!("\nProfiles:");
                if self.config.profiles.is_empty() {
                    println!("  No profiles configured");
                } else {
                    let mut names: Vec<&String> = self.config.profiles.keys().collect();
                    names.sort();
                    for name in names {
                        let profile = &self.config.profiles[name];
                        println!("  [{}]", name);
                        println!("    Gateway URL: {}", profile.gateway_url);
                        println!("    Timeout: {} seconds", profile.timeout());
                        println!("    Escape HTML: {}", profile.escape_policy() == EscapePolicy::Html);
                        let paths = profile.resource_paths();
                        println!(
                            "    Paths: home={} about={} all={} one={}",
                            paths.home, paths.about, paths.all, paths.one
                        );
                    }
                }

                println!("\nKeys: {}", Profile::KEYS.join(", "));
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                log::debug!("config set {} = {} on '{}'", key, value, self.profile_name);
                if key == "gateway_url" {
                    validate_url(&value)?;
                }
                self.config.set_value(&self.profile_name, &key, &value)?;
                self.config.save(self.config_path.clone())?;
                println!("Set {} on profile '{}'", key, self.profile_name);
                Ok(())
            }
        }
    }
}

fn parse_field(path: &str) -> Result<Field, AppError> {
    path.parse::<Field>()
        .map_err(|e| CliError::InvalidArguments(e.to_string()).into())
}

/// Exact-match criteria joined with OR, or AND under `--all`.
pub fn build_filter(args: &SearchArgs) -> Result<Filter, AppError> {
    let mut filters = Vec::new();
    let equals = [
        (Field::Name, &args.name),
        (Field::Category, &args.category),
        (Field::Appearances, &args.appearances),
        (Field::Street, &args.street),
        (Field::City, &args.city),
    ];
    for (field, value) in equals {
        if let Some(value) = value {
            filters.push(Filter::equals(field, value.as_str()));
        }
    }
    if let Some(year) = &args.year {
        filters.push(Filter::includes(Field::Years, year.as_str()));
    }

    match filters.len() {
        0 => Err(CliError::InvalidArguments(
            "search needs at least one of --name, --category, --appearances, --street, --city, --year"
                .to_string(),
        )
        .into()),
        1 => Ok(filters.remove(0)),
        _ if args.all => Ok(Filter::All(filters)),
        _ => Ok(Filter::Any(filters)),
    }
}
