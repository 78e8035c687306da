//! Command-line shell
//!
//! One subcommand per tab. Mutations print the refreshed table.

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{debug, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::commands::{alerts, customers, inventory, sales, suppliers, Action, Notice};
use crate::config::Config;
use crate::db::Database;
use crate::error::{InventoryError, InventoryResult};
use crate::table::{self, TableRow};

#[derive(Debug, Parser)]
#[command(name = "inventory", version, about = "Inventory, supplier and sales manager")]
pub struct Cli {
    /// Database file (overrides INVENTORY_DB and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file [default: <config dir>/inventory/config.toml]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print rows as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub tab: Tab,
}

#[derive(Debug, Subcommand)]
pub enum Tab {
    /// Products and stock
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Supplier contacts
    Suppliers {
        #[command(subcommand)]
        action: SupplierAction,
    },
    /// Recorded sales
    Sales {
        #[command(subcommand)]
        action: SaleAction,
    },
    /// Products running low
    Alerts {
        #[arg(long)]
        search: Option<String>,
        /// Override the configured low-stock threshold
        #[arg(long)]
        threshold: Option<i64>,
    },
    /// Customer names
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
}

#[derive(Debug, Args)]
pub struct Confirm {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Debug, Subcommand)]
pub enum InventoryAction {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        product: String,
        #[arg(long, allow_hyphen_values = true)]
        stock: String,
        #[arg(long, allow_hyphen_values = true)]
        price: String,
        /// Supplier company name
        #[arg(long, default_value = "")]
        supplier: String,
    },
    /// Change a product; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(long)]
        product: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        stock: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,
        #[arg(long)]
        supplier: Option<String>,
        #[command(flatten)]
        confirm: Confirm,
    },
    Delete {
        id: i64,
        #[command(flatten)]
        confirm: Confirm,
    },
}

#[derive(Debug, Subcommand)]
pub enum SupplierAction {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        company: String,
        #[arg(long)]
        supplier: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        contact: String,
    },
    /// Change a supplier; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[command(flatten)]
        confirm: Confirm,
    },
    Delete {
        id: i64,
        #[command(flatten)]
        confirm: Confirm,
    },
}

#[derive(Debug, Subcommand)]
pub enum SaleAction {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Product names a sale can be recorded against
    Products,
    Add {
        #[arg(long)]
        product: String,
        #[arg(long, allow_hyphen_values = true)]
        sold: String,
    },
    Edit {
        id: i64,
        #[arg(long, allow_hyphen_values = true)]
        sold: String,
        #[command(flatten)]
        confirm: Confirm,
    },
    Delete {
        id: i64,
        #[command(flatten)]
        confirm: Confirm,
    },
}

#[derive(Debug, Subcommand)]
pub enum CustomerAction {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        name: String,
    },
    Edit {
        id: i64,
        name: String,
        #[command(flatten)]
        confirm: Confirm,
    },
    Delete {
        id: i64,
        #[command(flatten)]
        confirm: Confirm,
    },
}

/// Log filter for the given `-v` count
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Resolve config, open the database and run the requested tab action
pub fn execute(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::resolve(cli.config.as_deref(), cli.db.as_deref())
        .context("failed to load configuration")?;
    debug!("Using database {:?}", config.database_path);

    let db = Database::open(&config.database_path).with_context(|| {
        format!(
            "failed to open database {}",
            config.database_path.display()
        )
    })?;

    let out = Output { json: cli.json };
    match &cli.tab {
        Tab::Inventory { action } => run_inventory(&db, action, &out),
        Tab::Suppliers { action } => run_suppliers(&db, action, &out),
        Tab::Sales { action } => run_sales(&db, action, &out),
        Tab::Alerts { search, threshold } => {
            let threshold = threshold.unwrap_or(config.low_stock_threshold);
            out.rows(&alerts::list_alerts(&db, threshold, search.as_deref())?)
        }
        Tab::Customers { action } => run_customers(&db, action, &out),
    }
}

struct Output {
    json: bool,
}

impl Output {
    fn rows<R: TableRow>(&self, rows: &[R]) -> anyhow::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if self.json {
            serde_json::to_writer_pretty(&mut handle, rows)?;
            writeln!(handle)?;
        } else {
            write!(handle, "{}", table::render(rows))?;
        }
        Ok(())
    }
}

/// Ask `question` on stdin unless `confirm.yes` was given
fn confirm(question: &str, confirm: &Confirm) -> InventoryResult<()> {
    if confirm.yes {
        return Ok(());
    }
    let stdin = io::stdin();
    ask(question, &mut stdin.lock(), &mut io::stderr())
}

fn ask(question: &str, input: &mut impl BufRead, prompt: &mut impl Write) -> InventoryResult<()> {
    write!(prompt, "{} [y/N] ", question)?;
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(()),
        _ => {
            info!("Action cancelled at prompt");
            Err(InventoryError::Cancelled)
        }
    }
}

fn fail(entity: &str, action: Action) -> impl Fn(InventoryError) -> Notice + '_ {
    move |err| Notice::from_error(entity, action, &err)
}

/// Find the selected row by id, the way a table selection would
fn select<R, F>(rows: Vec<R>, id: i64, row_id: F, entity: &'static str) -> InventoryResult<R>
where
    F: Fn(&R) -> i64,
{
    rows.into_iter()
        .find(|row| row_id(row) == id)
        .ok_or(InventoryError::NotFound { entity, id })
}

fn run_inventory(db: &Database, action: &InventoryAction, out: &Output) -> anyhow::Result<()> {
    const ENTITY: &str = "Product";
    match action {
        InventoryAction::List { search } => {
            out.rows(&inventory::list_inventory(db, search.as_deref())?)
        }
        InventoryAction::Add {
            product,
            stock,
            price,
            supplier,
        } => {
            let form = inventory::ProductForm {
                product: product.clone(),
                stock: stock.clone(),
                price: price.clone(),
                supplier: supplier.clone(),
            };
            let rows = inventory::add_item(db, &form).map_err(fail(ENTITY, Action::Add))?;
            out.rows(&rows)
        }
        InventoryAction::Edit {
            id,
            product,
            stock,
            price,
            supplier,
            confirm: yes,
        } => {
            let rows = edit_inventory(db, *id, [product, stock, price, supplier], yes)
                .map_err(fail(ENTITY, Action::Edit))?;
            out.rows(&rows)
        }
        InventoryAction::Delete { id, confirm: yes } => {
            let rows = confirm("Are you sure you want to delete this item?", yes)
                .and_then(|()| inventory::delete_item(db, *id))
                .map_err(fail(ENTITY, Action::Delete))?;
            out.rows(&rows)
        }
    }
}

/// Prefill the product form from the stored product, apply the given fields, then save
fn edit_inventory(
    db: &Database,
    id: i64,
    [product, stock, price, supplier]: [&Option<String>; 4],
    yes: &Confirm,
) -> InventoryResult<Vec<inventory::InventoryRow>> {
    let mut form = inventory::product_form(db, id)?;
    merge(&mut form.product, product);
    merge(&mut form.stock, stock);
    merge(&mut form.price, price);
    merge(&mut form.supplier, supplier);
    confirm("Are you sure you want to edit this item?", yes)?;
    inventory::edit_item(db, id, &form)
}

fn run_suppliers(db: &Database, action: &SupplierAction, out: &Output) -> anyhow::Result<()> {
    const ENTITY: &str = "Supplier";
    match action {
        SupplierAction::List { search } => {
            out.rows(&suppliers::list_suppliers(db, search.as_deref())?)
        }
        SupplierAction::Add {
            company,
            supplier,
            email,
            contact,
        } => {
            let form = suppliers::SupplierForm {
                company: company.clone(),
                supplier: supplier.clone(),
                email: email.clone(),
                contact: contact.clone(),
            };
            let rows = suppliers::add_supplier(db, &form).map_err(fail(ENTITY, Action::Add))?;
            out.rows(&rows)
        }
        SupplierAction::Edit {
            id,
            company,
            supplier,
            email,
            contact,
            confirm: yes,
        } => {
            let rows = edit_supplier(db, *id, [company, supplier, email, contact], yes)
                .map_err(fail(ENTITY, Action::Edit))?;
            out.rows(&rows)
        }
        SupplierAction::Delete { id, confirm: yes } => {
            let rows = confirm("Are you sure you want to delete this item?", yes)
                .and_then(|()| suppliers::delete_supplier(db, *id))
                .map_err(fail(ENTITY, Action::Delete))?;
            out.rows(&rows)
        }
    }
}

fn edit_supplier(
    db: &Database,
    id: i64,
    [company, supplier, email, contact]: [&Option<String>; 4],
    yes: &Confirm,
) -> InventoryResult<Vec<suppliers::SupplierRow>> {
    let current = select(suppliers::list_suppliers(db, None)?, id, |r| r.id, "Supplier")?;
    let mut form = suppliers::SupplierForm::from(&current);
    merge(&mut form.company, company);
    merge(&mut form.supplier, supplier);
    merge(&mut form.email, email);
    merge(&mut form.contact, contact);
    confirm("Are you sure you want to edit this item?", yes)?;
    suppliers::edit_supplier(db, id, &form)
}

fn run_sales(db: &Database, action: &SaleAction, out: &Output) -> anyhow::Result<()> {
    const ENTITY: &str = "Sales";
    match action {
        SaleAction::List { search } => out.rows(&sales::list_sales(db, search.as_deref())?),
        SaleAction::Products => {
            let names = sales::product_options(db)?;
            if out.json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
            Ok(())
        }
        SaleAction::Add { product, sold } => {
            let form = sales::SaleForm {
                product: product.clone(),
                sold: sold.clone(),
            };
            let rows = sales::add_sale(db, &form).map_err(fail(ENTITY, Action::Add))?;
            out.rows(&rows)
        }
        SaleAction::Edit {
            id,
            sold,
            confirm: yes,
        } => {
            let form = sales::SaleForm {
                product: String::new(),
                sold: sold.clone(),
            };
            let rows = confirm("Are you sure you want to edit this item?", yes)
                .and_then(|()| sales::edit_sale(db, *id, &form))
                .map_err(fail(ENTITY, Action::Edit))?;
            out.rows(&rows)
        }
        SaleAction::Delete { id, confirm: yes } => {
            let rows = confirm("Are you sure you want to delete this item?", yes)
                .and_then(|()| sales::delete_sale(db, *id))
                .map_err(fail(ENTITY, Action::Delete))?;
            out.rows(&rows)
        }
    }
}

fn run_customers(db: &Database, action: &CustomerAction, out: &Output) -> anyhow::Result<()> {
    const ENTITY: &str = "Customer";
    match action {
        CustomerAction::List { search } => {
            out.rows(&customers::list_customers(db, search.as_deref())?)
        }
        CustomerAction::Add { name } => {
            let rows = customers::add_customer(db, name).map_err(fail(ENTITY, Action::Add))?;
            out.rows(&rows)
        }
        CustomerAction::Edit {
            id,
            name,
            confirm: yes,
        } => {
            let rows = confirm("Are you sure you want to edit this item?", yes)
                .and_then(|()| customers::edit_customer(db, *id, name))
                .map_err(fail(ENTITY, Action::Edit))?;
            out.rows(&rows)
        }
        CustomerAction::Delete { id, confirm: yes } => {
            let rows = confirm("Are you sure you want to delete this item?", yes)
                .and_then(|()| customers::delete_customer(db, *id))
                .map_err(fail(ENTITY, Action::Delete))?;
            out.rows(&rows)
        }
    }
}

fn merge(field: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inventory_add() {
        let cli = Cli::try_parse_from([
            "inventory", "--json", "inventory", "add", "--product", "Apple", "--stock", "100",
            "--price", "$1.99",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.tab {
            Tab::Inventory {
                action: InventoryAction::Add { product, supplier, .. },
            } => {
                assert_eq!(product, "Apple");
                assert_eq!(supplier, "");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "inventory", "sales", "delete", "3", "--yes", "--db", "/tmp/x.db", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(log_level(cli.verbose), "debug");
        assert!(matches!(
            cli.tab,
            Tab::Sales {
                action: SaleAction::Delete { id: 3, confirm: Confirm { yes: true } }
            }
        ));
    }

    #[test]
    fn test_ask_accepts_yes() {
        let mut prompt = Vec::new();
        ask("Delete?", &mut "y\n".as_bytes(), &mut prompt).unwrap();
        assert_eq!(String::from_utf8(prompt).unwrap(), "Delete? [y/N] ");
        ask("Delete?", &mut "YES\n".as_bytes(), &mut Vec::new()).unwrap();
    }

    #[test]
    fn test_ask_defaults_to_no() {
        for answer in ["\n", "n\n", "nope\n", ""] {
            let result = ask("Delete?", &mut answer.as_bytes(), &mut Vec::new());
            assert!(matches!(result, Err(InventoryError::Cancelled)));
        }
    }

    #[test]
    fn test_select_missing_row() {
        let rows = vec![(1_i64, "a"), (2, "b")];
        assert_eq!(select(rows.clone(), 2, |r| r.0, "Thing").unwrap().1, "b");
        assert!(matches!(
            select(rows, 5, |r| r.0, "Thing"),
            Err(InventoryError::NotFound { entity: "Thing", id: 5 })
        ));
    }

    fn parse(db: &std::path::Path, args: &[&str]) -> Cli {
        let config = db.with_file_name("config.toml");
        let mut argv = vec![
            "inventory".to_string(),
            "--db".to_string(),
            db.display().to_string(),
            "--config".to_string(),
            config.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_execute_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");

        execute(&parse(
            &path,
            &["suppliers", "add", "--company", "CitrusWorld", "--supplier", "Ana",
              "--email", "ana@citrus.world", "--contact", "09171234567"],
        ))
        .unwrap();
        execute(&parse(
            &path,
            &["inventory", "add", "--product", "Orange", "--stock", "12", "--price", "1.49",
              "--supplier", "citrusworld"],
        ))
        .unwrap();
        execute(&parse(&path, &["sales", "add", "--product", "Orange", "--sold", "5"])).unwrap();
        execute(&parse(&path, &["inventory", "edit", "1", "--price", "1.59", "--yes"])).unwrap();

        let db = Database::open(&path).unwrap();
        let rows = inventory::list_inventory(&db, None).unwrap();
        assert_eq!(rows[0].stock, 7);
        assert_eq!(rows[0].price, "$1.59");
        assert_eq!(rows[0].supplier, "CitrusWorld");
        assert_eq!(alerts::list_alerts(&db, 10, None).unwrap().len(), 1);
    }

    #[test]
    fn test_stock_only_edit_keeps_price() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");

        execute(&parse(
            &path,
            &["inventory", "add", "--product", "Saffron", "--stock", "4", "--price", "0.125"],
        ))
        .unwrap();
        execute(&parse(&path, &["inventory", "edit", "1", "--stock", "999", "--yes"])).unwrap();

        let form = inventory::product_form(&Database::open(&path).unwrap(), 1).unwrap();
        assert_eq!(form.price, "0.125");
        assert_eq!(form.stock, "999");
    }

    #[test]
    fn test_failed_action_is_notice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");
        let add = ["customers", "add", "Ada"];

        execute(&parse(&path, &add)).unwrap();
        let err = execute(&parse(&path, &add)).unwrap_err();
        let notice = err.downcast_ref::<Notice>().unwrap();
        assert_eq!(notice.title, "Cannot Add Customer");
        assert_eq!(notice.message, "Customer already exists");

        let err = execute(&parse(&path, &["sales", "delete", "9", "--yes"])).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Notice>().unwrap().to_string(),
            "Cannot Delete Sales: Sales not found"
        );
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut field = "old".to_string();
        merge(&mut field, &None);
        assert_eq!(field, "old");
        merge(&mut field, &Some("new".to_string()));
        assert_eq!(field, "new");
    }
}
