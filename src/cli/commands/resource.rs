use std::sync::Arc;

use clap::{Args, Subcommand};
use serde_json::{json, Value};

use super::auth::report;
use crate::cli::context::CliContext;
use crate::cli::utils::{output_record, output_success, output_table, parse_assignment};
use crate::form::{DetailController, FormController, SubmitOutcome};
use crate::permissions::Action;
use crate::routing::Route;
use crate::services::ResourceService;
use crate::table::TableController;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1, help = "Page number")]
    pub page: u32,
    #[arg(long, help = "Search text")]
    pub search: Option<String>,
    #[arg(long, help = "Sort column (ascending)")]
    pub sort: Option<String>,
    #[arg(long, requires = "sort", help = "Sort descending instead")]
    pub desc: bool,
    #[arg(long = "filter", value_name = "KEY=VALUE", help = "Filter, e.g. type=Category")]
    pub filters: Vec<String>,
}

#[derive(Subcommand)]
pub enum ResourceCommands {
    #[command(about = "List one page of records")]
    List(ListArgs),

    #[command(about = "Show one record")]
    Show {
        #[arg(help = "Record ID")]
        id: u64,
    },

    #[command(about = "Create a record from field assignments")]
    Create {
        #[arg(long = "set", value_name = "FIELD=VALUE", help = "Field value, repeatable")]
        fields: Vec<String>,
    },

    #[command(about = "Update a record from field assignments")]
    Update {
        #[arg(help = "Record ID")]
        id: u64,
        #[arg(long = "set", value_name = "FIELD=VALUE", help = "Field value, repeatable")]
        fields: Vec<String>,
    },

    #[command(about = "Delete one record")]
    Delete {
        #[arg(help = "Record ID")]
        id: u64,
    },

    #[command(about = "Delete several records at once")]
    BulkDelete {
        #[arg(required = true, help = "Record IDs")]
        ids: Vec<u64>,
        #[arg(long, default_value_t = 1, help = "Page to show afterwards")]
        page: u32,
    },
}

pub async fn handle<S: ResourceService>(cmd: ResourceCommands, service: Arc<S>, ctx: &mut CliContext) -> anyhow::Result<()> {
    let kind = service.kind();

    match cmd {
        ResourceCommands::List(args) => {
            ctx.enter(Route::List(kind))?;
            ctx.require(kind, Action::Manage).await?;
            let mut table = TableController::new(service, ctx.alerts.clone());
            list(&mut table, &args, ctx).await
        }
        ResourceCommands::Show { id } => {
            ctx.enter(Route::Detail(kind, id))?;
            ctx.require(kind, Action::View).await?;
            let mut detail = DetailController::new(service, ctx.router.clone(), ctx.alerts.clone(), id);
            let entity = report(ctx, detail.load().await)?;
            let record = serde_json::to_value(entity)?;
            output_record(&ctx.output, kind, &record)
        }
        ResourceCommands::Create { fields } => {
            ctx.enter(Route::Create(kind))?;
            ctx.require(kind, Action::Add).await?;
            let mut form = FormController::open(service, ctx.router.clone(), ctx.alerts.clone(), None);
            submit(&mut form, &fields, ctx).await
        }
        ResourceCommands::Update { id, fields } => {
            ctx.enter(Route::Edit(kind, id))?;
            ctx.require(kind, Action::Edit).await?;
            let mut form = FormController::open(service, ctx.router.clone(), ctx.alerts.clone(), Some(id));
            report(ctx, form.load().await)?;
            submit(&mut form, &fields, ctx).await
        }
        ResourceCommands::Delete { id } => {
            ctx.enter(Route::Detail(kind, id))?;
            ctx.require(kind, Action::Delete).await?;
            let mut detail = DetailController::new(service, ctx.router.clone(), ctx.alerts.clone(), id);
            let landed = report(ctx, detail.delete().await)?;
            output_success(
                &ctx.output,
                &format!("{} {} deleted", kind.singular(), id),
                Some(json!({ "id": id, "route": landed.path() })),
            )
        }
        ResourceCommands::BulkDelete { ids, page } => {
            ctx.enter(Route::List(kind))?;
            ctx.require(kind, Action::Delete).await?;
            let mut table = TableController::new(service, ctx.alerts.clone());
            report(ctx, table.set_page(page).await)?;
            report(ctx, table.bulk_delete(&ids).await)?;
            show_table(&table, ctx)
        }
    }
}

pub(crate) async fn list<S: ResourceService>(
    table: &mut TableController<S>,
    args: &ListArgs,
    ctx: &mut CliContext,
) -> anyhow::Result<()> {
    // Filters and search each reset to page 1 and fetch, so apply them before paging
    for raw in &args.filters {
        let (key, value) = parse_assignment(raw)?;
        let value = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        report(ctx, table.set_filter(&key, &value).await)?;
    }
    if let Some(search) = &args.search {
        report(ctx, table.search_now(search.clone()).await)?;
    }
    if let Some(column) = &args.sort {
        if !table.preset().sortable {
            anyhow::bail!("{} cannot be sorted", table.kind().plural());
        }
        report(ctx, table.toggle_sort(column).await)?;
        if args.desc {
            report(ctx, table.toggle_sort(column).await)?;
        }
    }
    report(ctx, table.set_page(args.page).await)?;
    show_table(table, ctx)
}

pub(crate) fn show_table<S: ResourceService>(table: &TableController<S>, ctx: &CliContext) -> anyhow::Result<()> {
    let kind = table.kind();
    let rows: Vec<Value> = table
        .rows()
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;
    let toolbar = ctx.gate(kind).map(|gate| gate.toolbar()).unwrap_or_default();
    output_table(&ctx.output, kind, &rows, &table.footer(), &toolbar)
}

async fn submit<S: ResourceService>(
    form: &mut FormController<S>,
    fields: &[String],
    ctx: &CliContext,
) -> anyhow::Result<()> {
    for raw in fields {
        let (field, value) = parse_assignment(raw)?;
        if form.schema().field(&field).is_none() {
            anyhow::bail!("Unknown field '{}' for {}", field, form.schema().kind.plural());
        }
        form.set(&field, value);
    }

    let kind = form.schema().kind;
    match form.submit().await {
        SubmitOutcome::Saved(saved) => {
            let record = saved.map(|entity| serde_json::to_value(&entity)).transpose()?;
            output_success(
                &ctx.output,
                &format!("{} saved", kind.singular()),
                record.map(|record| json!({ "data": record })),
            )
        }
        SubmitOutcome::Invalid(e) | SubmitOutcome::Failed(e) | SubmitOutcome::Blocked(e) => report(ctx, Err(e)),
    }
}
