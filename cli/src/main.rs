use std::io::{self, BufRead, Write};
use std::sync::Arc;

use admin_console::config::ConfigError;
use admin_console::dashboard::DashboardStats;
use admin_console::models::{
    BatchCreateItem, CategoryQuery, DEFAULT_PAGE_SIZE, ItemType, MarketAppType, Position, Role, UserQuery,
    WidgetKind, WidgetSize, supported_page_size,
};
use admin_console::screens::{
    AssumeYes, CategoriesScreen, Confirm, DeleteOutcome, DictionaryScreen, FileSystemScreen, MarketScreen, ScreenError,
    UsersScreen,
};
use admin_console::state::TypeFilter;
use admin_console::validation::{
    BatchDictForm, CategoryForm, DictDataForm, DictTypeForm, FileSystemItemForm, LoginForm, MarketAppForm, UserForm,
    ValidationErrors,
};
use admin_console::{AppContext, ConsoleConfig, ContextError, GatewayError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Screen(#[from] ScreenError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("dictionary item must look like label=value, got {0:?}")]
    InvalidItem(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn is_session_expired(&self) -> bool {
        match self {
            Self::Gateway(e) => e.is_session_expired(),
            Self::Screen(e) => e.is_session_expired(),
            _ => false,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "admin-console", about = "Admin console backend CLI")]
struct Cli {
    /// Overrides ADMIN_API_BASE_URL from the environment or `.env`.
    #[arg(long, env = "ADMIN_API_BASE_URL")]
    base_url: Option<String>,

    /// Answer yes to every delete confirmation.
    #[arg(long, short = 'y', default_value_t = false)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long, env = "ADMIN_EMAIL")]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    /// Desktop item counts by type.
    Dashboard,
    Users(UsersCommand),
    Categories(CategoriesCommand),
    Dict(DictCommand),
    Market(MarketCommand),
    Fs(FsCommand),
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },
    Update {
        id: String,
        #[arg(long)]
        role: Role,
        /// Leave out to keep the current password.
        #[arg(long, default_value = "")]
        password: String,
    },
    Delete {
        id: String,
    },
    BatchDelete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Args, Debug)]
struct CategoryFields {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    icon: String,
    #[arg(long, default_value = "")]
    color: String,
}

impl From<CategoryFields> for CategoryForm {
    fn from(fields: CategoryFields) -> Self {
        Self { name: fields.name, description: fields.description, icon: fields.icon, color: fields.color }
    }
}

#[derive(Subcommand, Debug)]
enum CategoriesSubcommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        name: Option<String>,
    },
    Create {
        #[command(flatten)]
        fields: CategoryFields,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: CategoryFields,
    },
    Delete {
        id: String,
    },
    BatchDelete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct DictCommand {
    #[command(subcommand)]
    command: DictSubcommand,
}

#[derive(Args, Debug)]
struct DictTypeFields {
    #[arg(long)]
    code: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
}

impl From<DictTypeFields> for DictTypeForm {
    fn from(fields: DictTypeFields) -> Self {
        Self { code: fields.code, name: fields.name, description: fields.description }
    }
}

#[derive(Args, Debug)]
struct DictDataFields {
    #[arg(long)]
    label: String,
    #[arg(long)]
    value: String,
    #[arg(long)]
    order: Option<i64>,
}

impl From<DictDataFields> for DictDataForm {
    fn from(fields: DictDataFields) -> Self {
        Self { label: fields.label, value: fields.value, order: fields.order }
    }
}

#[derive(Subcommand, Debug)]
enum DictSubcommand {
    /// List dictionary types, optionally filtered by code or name.
    Types {
        #[arg(long, default_value = "")]
        keyword: String,
    },
    /// Rows of one type.
    Data {
        code: String,
    },
    /// Label/value pairs of one type, sorted by order.
    Options {
        code: String,
    },
    CreateType {
        #[command(flatten)]
        fields: DictTypeFields,
    },
    UpdateType {
        id: String,
        #[command(flatten)]
        fields: DictTypeFields,
    },
    DeleteType {
        id: String,
    },
    AddData {
        code: String,
        #[command(flatten)]
        fields: DictDataFields,
    },
    UpdateData {
        code: String,
        id: String,
        #[command(flatten)]
        fields: DictDataFields,
    },
    DeleteData {
        code: String,
        id: String,
    },
    /// Create a type and its rows in one call.
    Batch {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        /// Repeatable `label=value` pairs.
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct MarketCommand {
    #[command(subcommand)]
    command: MarketSubcommand,
}

#[derive(Args, Debug)]
struct MarketAppFields {
    #[arg(long)]
    title: String,
    #[arg(long = "type", default_value = "app")]
    app_type: MarketAppType,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    icon: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value = "")]
    widget_type: String,
    #[arg(long, default_value = "")]
    default_size: String,
    #[arg(long, default_value = "")]
    url: String,
    #[arg(long)]
    price: Option<f64>,
}

impl From<MarketAppFields> for MarketAppForm {
    fn from(fields: MarketAppFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            icon: fields.icon,
            app_type: fields.app_type,
            category: fields.category,
            widget_type: fields.widget_type,
            default_size: fields.default_size,
            url: fields.url,
            price: fields.price,
        }
    }
}

#[derive(Subcommand, Debug)]
enum MarketSubcommand {
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Install an app onto the desktop.
    Install {
        id: String,
    },
    Create {
        #[command(flatten)]
        fields: MarketAppFields,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: MarketAppFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct FsCommand {
    #[command(subcommand)]
    command: FsSubcommand,
}

#[derive(Args, Debug)]
struct FsItemFields {
    #[arg(long)]
    name: String,
    #[arg(long = "type", default_value = "folder")]
    item_type: ItemType,
    #[arg(long, default_value = "root")]
    parent: String,
    #[arg(long, default_value = "")]
    icon: String,
    #[arg(long, default_value = "")]
    content: String,
    #[arg(long, default_value = "")]
    url: String,
    #[arg(long)]
    widget: Option<WidgetKind>,
    #[arg(long)]
    size: Option<WidgetSize>,
    #[arg(long, default_value_t = 0.0)]
    x: f64,
    #[arg(long, default_value_t = 0.0)]
    y: f64,
}

impl From<FsItemFields> for FileSystemItemForm {
    fn from(fields: FsItemFields) -> Self {
        Self {
            parent_id: fields.parent,
            name: fields.name,
            item_type: fields.item_type,
            icon: fields.icon,
            content: fields.content,
            url: fields.url,
            widget_type: fields.widget,
            size: fields.size,
            position: Position { x: fields.x, y: fields.y },
        }
    }
}

#[derive(Subcommand, Debug)]
enum FsSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// `all`, `app`, `folder`, `web` or `widget`.
        #[arg(long = "type", default_value = "all")]
        filter: TypeFilter,
    },
    Create {
        #[command(flatten)]
        fields: FsItemFields,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: FsItemFields,
    },
    Move {
        id: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    Delete {
        id: String,
    },
    Layout {
        #[command(subcommand)]
        command: LayoutSubcommand,
    },
}

#[derive(Subcommand, Debug)]
enum LayoutSubcommand {
    /// Print the saved desktop layout.
    Show,
    /// Save the current positions of the desktop items.
    Save,
}

/// Reads `y`/`yes` from stdin; anything else declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = run(cli).await;
    if let Err(err) = &result {
        if err.is_session_expired() {
            eprintln!("session expired, run `admin-console login`");
        }
    }
    result
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ConsoleConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    tracing::debug!(base_url = %config.base_url, "console configured");
    let context = Arc::new(AppContext::open(config)?);
    let confirm: &dyn Confirm = if cli.yes { &AssumeYes } else { &StdinConfirm };

    match cli.command {
        Command::Login { email, password } => {
            let params = LoginForm { email, password }.validate()?;
            let session = context.auth().login(&params).await?;
            print_json(&session.user)
        }
        Command::Logout => {
            context.auth().logout().await?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => print_json(&context.auth().current_user().await?),
        Command::Dashboard => {
            let mut screen = FileSystemScreen::new(Arc::clone(&context));
            screen.load().await?;
            let stats: DashboardStats = screen.stats();
            print_json(&stats)
        }
        Command::Users(users) => run_users(&context, users.command, confirm).await,
        Command::Categories(categories) => run_categories(&context, categories.command, confirm).await,
        Command::Dict(dict) => run_dict(&context, dict.command, confirm).await,
        Command::Market(market) => run_market(context, market.command, confirm).await,
        Command::Fs(fs) => run_fs(context, fs.command, confirm).await,
    }
}

async fn run_users(context: &AppContext, command: UsersSubcommand, confirm: &dyn Confirm) -> Result<(), CliError> {
    let mut screen = UsersScreen::new(context);
    match command {
        UsersSubcommand::List { paging, email, role } => {
            let page_size = supported_page_size(paging.page_size);
            let query = UserQuery { page: paging.page, page_size, email, role, ..UserQuery::default() };
            print_json(&context.users().list(&query).await?)
        }
        UsersSubcommand::Create { email, password, role } => {
            let user = screen.submit(None, &UserForm { email, password, role }).await?;
            print_json(&user)
        }
        UsersSubcommand::Update { id, role, password } => {
            let form = UserForm { password, role, ..UserForm::default() };
            print_json(&screen.submit(Some(&id), &form).await?)
        }
        UsersSubcommand::Delete { id } => report(screen.delete(&id, confirm).await?),
        UsersSubcommand::BatchDelete { ids } => {
            screen.select(ids);
            report(screen.batch_delete(confirm).await?)
        }
    }
}

async fn run_categories(
    context: &AppContext,
    command: CategoriesSubcommand,
    confirm: &dyn Confirm,
) -> Result<(), CliError> {
    let mut screen = CategoriesScreen::new(context);
    match command {
        CategoriesSubcommand::List { paging, name } => {
            let page_size = supported_page_size(paging.page_size);
            let query = CategoryQuery { page: paging.page, page_size, name, ..CategoryQuery::default() };
            print_json(&context.menu().list(&query).await?)
        }
        CategoriesSubcommand::Create { fields } => print_json(&screen.submit(None, &fields.into()).await?),
        CategoriesSubcommand::Update { id, fields } => print_json(&screen.submit(Some(&id), &fields.into()).await?),
        CategoriesSubcommand::Delete { id } => report(screen.delete(&id, confirm).await?),
        CategoriesSubcommand::BatchDelete { ids } => {
            screen.select(ids);
            report(screen.batch_delete(confirm).await?)
        }
    }
}

async fn run_dict(context: &AppContext, command: DictSubcommand, confirm: &dyn Confirm) -> Result<(), CliError> {
    let mut screen = DictionaryScreen::new(context);
    match command {
        DictSubcommand::Types { keyword } => {
            screen.load().await?;
            screen.set_keyword(keyword);
            print_json(&screen.visible_types())
        }
        DictSubcommand::Data { code } => print_json(&context.dictionary().data_by_code(&code).await?),
        DictSubcommand::Options { code } => print_json(&context.dictionary().options(&code).await?),
        DictSubcommand::CreateType { fields } => print_json(&screen.submit_type(None, &fields.into()).await?),
        DictSubcommand::UpdateType { id, fields } => print_json(&screen.submit_type(Some(&id), &fields.into()).await?),
        DictSubcommand::DeleteType { id } => report(screen.delete_type(&id, confirm).await?),
        DictSubcommand::AddData { code, fields } => {
            open_type(context, &mut screen, &code).await?;
            print_json(&screen.submit_data(None, &fields.into()).await?)
        }
        DictSubcommand::UpdateData { code, id, fields } => {
            open_type(context, &mut screen, &code).await?;
            print_json(&screen.submit_data(Some(&id), &fields.into()).await?)
        }
        DictSubcommand::DeleteData { code, id } => {
            open_type(context, &mut screen, &code).await?;
            report(screen.delete_data(&id, confirm).await?)
        }
        DictSubcommand::Batch { code, name, items } => {
            let items = items.iter().map(|raw| parse_item(raw)).collect::<Result<Vec<_>, _>>()?;
            screen.batch_add(&BatchDictForm { code, name, items }).await?;
            println!("created");
            Ok(())
        }
    }
}

async fn open_type(context: &AppContext, screen: &mut DictionaryScreen, code: &str) -> Result<(), CliError> {
    let dict_type = context.dictionary().type_by_code(code).await?;
    screen.open(dict_type).await?;
    Ok(())
}

fn parse_item(raw: &str) -> Result<BatchCreateItem, CliError> {
    let (label, value) = raw.split_once('=').ok_or_else(|| CliError::InvalidItem(raw.to_owned()))?;
    Ok(BatchCreateItem { label: label.to_owned(), value: value.to_owned() })
}

async fn run_market(context: Arc<AppContext>, command: MarketSubcommand, confirm: &dyn Confirm) -> Result<(), CliError> {
    let mut screen = MarketScreen::new(context);
    match command {
        MarketSubcommand::List { category, search } => {
            if category.is_none() && search.is_none() {
                print_json(&screen.load().await?)
            } else {
                print_json(&screen.search(category, search).await?)
            }
        }
        MarketSubcommand::Install { id } => print_json(&screen.install(&id).await?),
        MarketSubcommand::Create { fields } => print_json(&screen.submit(None, &fields.into()).await?),
        MarketSubcommand::Update { id, fields } => print_json(&screen.submit(Some(&id), &fields.into()).await?),
        MarketSubcommand::Delete { id } => report(screen.delete(&id, confirm).await?),
    }
}

async fn run_fs(context: Arc<AppContext>, command: FsSubcommand, confirm: &dyn Confirm) -> Result<(), CliError> {
    let mut screen = FileSystemScreen::new(context);
    match command {
        FsSubcommand::List { search, filter } => {
            screen.load().await?;
            screen.filter(search, filter);
            print_json(&screen.visible())
        }
        FsSubcommand::Create { fields } => print_json(&screen.submit(None, &fields.into()).await?),
        FsSubcommand::Update { id, fields } => print_json(&screen.submit(Some(&id), &fields.into()).await?),
        FsSubcommand::Move { id, x, y } => print_json(&screen.move_item(&id, Position { x, y }).await?),
        FsSubcommand::Delete { id } => report(screen.delete(&id, confirm).await?),
        FsSubcommand::Layout { command: LayoutSubcommand::Show } => print_json(&screen.restore_layout().await?),
        FsSubcommand::Layout { command: LayoutSubcommand::Save } => {
            screen.load().await?;
            print_json(&screen.save_layout().await?)
        }
    }
}

fn report(outcome: DeleteOutcome) -> Result<(), CliError> {
    match outcome {
        DeleteOutcome::Deleted => println!("deleted"),
        DeleteOutcome::Cancelled => println!("cancelled"),
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
