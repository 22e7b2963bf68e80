mod commands;
mod config;
mod render;
mod session;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use client_core::{
    EmployeeApi, EmployeeFormValues, FetchOutcome, FormMode, HttpEmployeeApi, ListController,
    ListQuery, MutationForm, NoopMutationObserver, RowActionDispatcher, SortField, SubmitOutcome,
};
use shared::domain::{DepartmentTable, EmployeeId};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{load_settings, Settings},
    render::{render_table, render_validation},
    session::Session,
};

#[derive(Parser, Debug)]
#[command(about = "Browse and edit the employee directory")]
struct Cli {
    /// API origin, overrides console.toml and EMPLOYEE_API_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Line-oriented session with a live table (default).
    Interactive,
    /// Fetch and print one page.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long, requires = "sort")]
        desc: bool,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    Add(EmployeeFields),
    Update {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct EmployeeFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    /// Department label, e.g. Tech or HR.
    #[arg(long)]
    department: String,
    /// Date of birth as YYYY-MM-DD.
    #[arg(long)]
    dob: NaiveDate,
}

impl From<EmployeeFields> for EmployeeFormValues {
    fn from(fields: EmployeeFields) -> Self {
        Self {
            name: fields.name,
            email: fields.email,
            department: fields.department,
            date_of_birth: Some(fields.dob),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref(), cli.base_url)?;
    let http_api = HttpEmployeeApi::new(&settings.base_url)
        .with_context(|| format!("cannot use API base URL {}", settings.base_url))?;
    info!(base_url = %http_api.base_url(), page_size = settings.page_size, "employee console starting");
    let api: Arc<dyn EmployeeApi> = Arc::new(http_api);
    let departments = Arc::new(DepartmentTable::standard());

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let controller = ListController::new(api.clone(), departments, settings.list_config());
            Session::new(api, controller).run().await
        }
        Command::List {
            search,
            sort,
            desc,
            page,
            page_size,
        } => {
            let mut query = ListQuery::with_page_size(page_size.unwrap_or(settings.page_size));
            query.set_search_key(search.as_deref().unwrap_or_default());
            if let Some(field) = sort {
                query.toggle_sort(field);
                if desc {
                    query.toggle_sort(field);
                }
            }
            query.page_index = page.saturating_sub(1);
            list(api, departments, &settings, query).await
        }
        Command::Add(fields) => {
            let form = MutationForm::with_values(FormMode::Create, fields.into());
            submit(api.as_ref(), &departments, form).await
        }
        Command::Update { id, fields } => {
            let form =
                MutationForm::with_values(FormMode::Update(EmployeeId::from(id)), fields.into());
            submit(api.as_ref(), &departments, form).await
        }
        Command::Delete { id } => {
            let id = EmployeeId::from(id);
            RowActionDispatcher::new(api, Arc::new(NoopMutationObserver))
                .delete_by_id(&id)
                .await
                .with_context(|| format!("deleting employee {id}"))?;
            println!("deleted employee {id}");
            Ok(())
        }
    }
}

async fn list(
    api: Arc<dyn EmployeeApi>,
    departments: Arc<DepartmentTable>,
    settings: &Settings,
    query: ListQuery,
) -> Result<()> {
    let controller = ListController::new(api, departments, settings.list_config());
    match controller.set_query(query).await {
        FetchOutcome::Failed { message, .. } => bail!("could not load employees: {message}"),
        _ => {
            print!("{}", render_table(&controller.snapshot().await));
            Ok(())
        }
    }
}

async fn submit(
    api: &dyn EmployeeApi,
    departments: &DepartmentTable,
    mut form: MutationForm,
) -> Result<()> {
    let title = form.title();
    match form.submit(api, departments, &NoopMutationObserver).await {
        SubmitOutcome::Saved => {
            println!("{title}: saved");
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            bail!("{title}: not saved\n{}", render_validation(&errors).trim_end())
        }
        SubmitOutcome::Failed(message) => bail!("{title}: {message}"),
        SubmitOutcome::NotOpen => Ok(()),
    }
}
