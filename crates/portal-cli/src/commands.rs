use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use portal_api::PortalApi;
use portal_auth::{AuthContext, LoginForm, TracingNavigator, menu_for};
use portal_cli::render::{
    ConsoleNotifier, columns_table, issues_table, menu_table, records_table, session_table,
};
use portal_cli::settings::PortalConfig;
use portal_http::{HttpClient, Method, RequestOptions, TokenSource};
use portal_roster::{check_rows, import_csv_path};
use portal_store::{FileBackend, SessionStore, Store, SystemClock};
use portal_table::{SortDirection, TableOptions, TableState};
use serde_json::Value;
use tracing::info_span;

use crate::cli::{
    LoginArgs, LogoutArgs, RequestArgs, RosterCommand, RosterQueryArgs, TemplateArg, TunnelArgs,
};

/// Config, session store and API client for one invocation.
pub struct Runtime {
    pub config: PortalConfig,
    pub sessions: Arc<SessionStore>,
    pub api: PortalApi,
}

impl Runtime {
    pub fn open(config: PortalConfig) -> Result<Self> {
        let session_path = config.session_path();
        tracing::debug!(path = %session_path.display(), "opening session store");
        let store = Store::new(Arc::new(FileBackend::new(session_path)), Arc::new(SystemClock));
        let sessions = Arc::new(SessionStore::new(store));
        let tokens: Arc<dyn TokenSource> = sessions.clone();
        let http = HttpClient::new(config.http.clone(), tokens).context("create HTTP client")?;
        Ok(Self {
            config,
            sessions,
            api: PortalApi::new(http),
        })
    }

    fn auth(&self) -> AuthContext {
        AuthContext::restore(
            self.sessions.clone(),
            self.api.clone(),
            Arc::new(TracingNavigator),
            Arc::new(ConsoleNotifier),
        )
    }
}

pub async fn run_login(runtime: &Runtime, args: &LoginArgs) -> Result<bool> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => read_password()?,
    };
    let remember = args.remember || runtime.config.session.remember;
    let mut auth = runtime.auth();
    let ok = auth
        .login(&LoginForm::new(args.account.as_str(), password), remember)
        .await;
    if let Some(session) = auth.current_user() {
        println!("{} → {}", session.user_id, session.role.landing_route());
    }
    Ok(ok)
}

fn read_password() -> Result<String> {
    eprint!("密码: ");
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn run_logout(runtime: &Runtime, args: &LogoutArgs) {
    let mut auth = runtime.auth();
    if args.local {
        auth.logout();
    } else {
        auth.logout_remote().await;
    }
}

pub fn run_whoami(runtime: &Runtime) -> bool {
    let auth = runtime.auth();
    let Some(session) = auth.current_user() else {
        eprintln!("未登录");
        return false;
    };
    println!("{}", session_table(session, &runtime.sessions.token_state()));
    println!("{}", menu_table(menu_for(session.role)));
    true
}

pub async fn run_request(runtime: &Runtime, args: &RequestArgs) -> Result<bool> {
    let method = Method::from_bytes(args.method.trim().to_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method: {}", args.method))?;

    let mut options = RequestOptions::new();
    for pair in &args.query {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("query parameter must look like KEY=VALUE: {pair}");
        };
        options = options.query(key, value);
    }
    if let Some(data) = &args.data {
        let body: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
        options = options.body(body);
    }
    if args.no_auth {
        options = options.skip_auth();
    }
    if let Some(ms) = args.timeout_ms {
        options = options.timeout(Duration::from_millis(ms));
    }

    let envelope = runtime.api.http().request(method, &args.path, options).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&envelope).context("serialize response")?
    );
    Ok(envelope.is_success())
}

pub async fn run_tunnel(runtime: &Runtime, args: &TunnelArgs) -> bool {
    let status = runtime.api.http().check_tunnel(&args.path).await;
    println!(
        "{} {} ({})",
        if status.ok { "✔" } else { "✘" },
        runtime.config.http.base_url,
        status.message
    );
    status.ok
}

pub fn run_roster(command: &RosterCommand) -> Result<bool> {
    match command {
        RosterCommand::Columns { roster } => {
            println!("{} ({})", roster.title(), roster.name());
            println!("{}", columns_table(&roster.columns()));
            Ok(true)
        }
        RosterCommand::View(args) => {
            let span = info_span!("roster_view", roster = %args.query.roster);
            let _guard = span.enter();
            let columns = args.query.roster.columns();
            let mut table = load_table(&args.query)?;
            let issues = check_rows(table.rows(), &columns);
            table.set_page(args.page, Some(args.page_size));

            println!("{}", records_table(&columns, &table.paged(), &issues));
            println!(
                "第 {}/{} 页，共 {} 条（总计 {} 条）",
                table.page(),
                table.total_pages(),
                table.filtered_len(),
                table.total()
            );
            if !issues.is_empty() {
                println!("{}", issues_table(&columns, &issues));
            }
            Ok(issues.is_empty())
        }
        RosterCommand::Export(args) => {
            let table = load_table(&args.query)?;
            Ok(table.export_to(&args.output, &ConsoleNotifier))
        }
        RosterCommand::Template { kind, output } => write_template(*kind, output.as_deref()),
    }
}

fn load_table(args: &RosterQueryArgs) -> Result<TableState> {
    let columns = args.roster.columns();
    let rows = import_csv_path(&args.input, &columns)
        .map_err(|e| anyhow::anyhow!("{}: {e}", e.user_message()))?;
    tracing::info!(rows = rows.len(), input = %args.input.display(), "roster imported");

    let mut table = TableState::with_rows(TableOptions::default().columns(columns), rows);
    if let Some(keyword) = &args.search {
        table.search(keyword.as_str());
    }
    if let Some(key) = &args.sort {
        if !table.columns().iter().any(|c| &c.key == key) {
            bail!("{} has no column {key}", args.roster);
        }
        let direction = if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        table.sort(key.as_str(), direction);
    }
    Ok(table)
}

fn write_template(kind: TemplateArg, output: Option<&std::path::Path>) -> Result<bool> {
    let template = kind.template();
    let path = output.map_or_else(|| template.filename().into(), std::path::Path::to_path_buf);
    let contents = template
        .to_csv()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    std::fs::write(&path, contents)
        .with_context(|| format!("write template to {}", path.display()))?;
    println!("{}", path.display());
    Ok(true)
}
