use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use recipebook_app::{
    logging, AppConfig, CategoryFilterViewModel, RecipeEditor, RefreshOutcome, RememberedLogin,
    SessionManager,
};
use recipebook_core::category::CategoryCatalog;
use recipebook_core::image::LocalImageLibrary;
use recipebook_core::recipe::{RecipeForm, RecipeRecord};
use recipebook_core::seed;
use recipebook_core::store::RecipeStore;
use recipebook_db::{PgAuthenticator, PgRecipeStore};

#[derive(Debug, Parser)]
#[command(name = "recipebook")]
#[command(about = "Personal recipe book")]
struct Cli {
    /// Account e-mail. Falls back to the remembered login.
    #[arg(long, global = true, env = "RECIPEBOOK_EMAIL")]
    email: Option<String>,
    #[arg(long, global = true, env = "RECIPEBOOK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account.
    Signup {
        /// Password confirmation; defaults to the password itself.
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Check credentials, optionally remembering the e-mail.
    Login {
        #[arg(long, default_value_t = false)]
        remember: bool,
    },
    /// Forget the remembered e-mail.
    Logout,
    /// Print the category filters, "All Recipes" first.
    Categories,
    List {
        /// Category label, or "all".
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = false)]
        grouped: bool,
    },
    Show {
        id: Uuid,
    },
    Add(AddArgs),
    Edit {
        id: Uuid,
        #[command(flatten)]
        changes: EditArgs,
    },
    Delete {
        id: Uuid,
    },
    /// Add the bundled sample recipes to the signed-in account.
    Seed,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    ingredient: String,
    /// One step per flag, or a multi-line block.
    #[arg(long = "direction", required = true)]
    directions: Vec<String>,
    #[arg(long)]
    category: Option<String>,
    /// Image file to copy into the local library.
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct EditArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    ingredient: Option<String>,
    #[arg(long = "direction")]
    directions: Vec<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // --- Configuration ---
    let config = AppConfig::from_env()?;
    logging::init(config.log_json);
    tracing::debug!(data_dir = %config.data_dir.display(), "Loaded configuration");

    let catalog = Arc::new(config.load_catalog().context("Failed to load category catalog")?);
    let remembered = RememberedLogin::in_dir(&config.data_dir);

    // --- Local-only commands ---
    match cli.command {
        Command::Categories => {
            for filter in catalog.filters() {
                println!("{filter}");
            }
            return Ok(());
        }
        Command::Logout => {
            remembered.clear().await?;
            println!("Forgot remembered login");
            return Ok(());
        }
        _ => {}
    }

    // --- Database ---
    let pool = recipebook_db::create_pool(config.database_url()?, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    recipebook_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    recipebook_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::debug!("Database ready");

    let store: Arc<dyn RecipeStore> = Arc::new(PgRecipeStore::new(pool.clone()));
    let sessions = Arc::new(SessionManager::new(
        Arc::new(PgAuthenticator::new(pool)),
        remembered,
        config.password_min_length,
    ));
    let editor = RecipeEditor::new(store.clone(), sessions.clone(), catalog.clone())
        .with_images(Arc::new(LocalImageLibrary::new(config.image_dir())));

    match cli.command {
        Command::Signup { confirm } => {
            let email = email(&cli.email, &sessions).await?;
            let password = password(&cli.password)?;
            let confirm = confirm.unwrap_or_else(|| password.clone());
            let session = sessions.sign_up(&email, &password, &confirm).await?;
            println!("Created account {} ({})", session.email, session.owner_id);
        }
        Command::Login { remember } => {
            let email = email(&cli.email, &sessions).await?;
            let session = sessions
                .sign_in(&email, &password(&cli.password)?, remember)
                .await?;
            println!("Signed in as {}", session.email);
        }
        Command::Logout | Command::Categories => {}
        command => {
            // Leaves the remembered e-mail in place for the next command.
            let email = email(&cli.email, &sessions).await?;
            sessions.resume(&email, &password(&cli.password)?).await?;
            run_signed_in(command, store, sessions, catalog, &editor).await?;
        }
    }

    Ok(())
}

async fn run_signed_in(
    command: Command,
    store: Arc<dyn RecipeStore>,
    sessions: Arc<SessionManager>,
    catalog: Arc<CategoryCatalog>,
    editor: &RecipeEditor,
) -> anyhow::Result<()> {
    match command {
        Command::List { category, grouped } => {
            let list = CategoryFilterViewModel::new(store, sessions, catalog);
            let outcome = match category {
                Some(label) => list.set_category_label(&label).await?,
                None => list.refresh().await,
            };
            if let RefreshOutcome::Failed(err) = outcome {
                bail!(err);
            }
            if grouped {
                for (label, records) in list.grouped() {
                    println!("{label}");
                    for record in &records {
                        println!("  {}", summary_line(record));
                    }
                }
            } else {
                for record in list.current_items() {
                    println!("{}", summary_line(&record));
                }
            }
        }
        Command::Show { id } => {
            let record = editor.detail(id).await?;
            let image_present = match &record.image {
                Some(path) => LocalImageLibrary::exists(path).await,
                None => false,
            };
            print!("{}", detail_text(&record, image_present));
        }
        Command::Add(args) => {
            let mut form = editor.new_form();
            form.title = args.title;
            form.ingredient = args.ingredient;
            form.direction = args.directions.join("\n");
            if args.category.is_some() {
                form.category = args.category;
            }
            if let Some(image) = args.image {
                editor.attach_image(&mut form, &image).await?;
            }
            let record = editor.add(form).await?;
            println!("Added {}", record.id);
        }
        Command::Edit { id, changes } => {
            let mut form = editor.edit_form(id).await?;
            apply_changes(
                &mut form,
                changes.title,
                changes.ingredient,
                changes.directions,
                changes.category,
            );
            if let Some(image) = changes.image {
                editor.attach_image(&mut form, &image).await?;
            }
            let record = editor.update(id, form).await?;
            println!("Updated {}", record.id);
        }
        Command::Delete { id } => {
            editor.delete(id).await?;
            println!("Deleted {id}");
        }
        Command::Seed => {
            for fields in seed::default_recipes() {
                let record = editor.create(fields).await?;
                println!("Added {} {}", record.id, record.title);
            }
        }
        Command::Signup { .. } | Command::Login { .. } | Command::Logout | Command::Categories => {}
    }
    Ok(())
}

async fn email(flag: &Option<String>, sessions: &SessionManager) -> anyhow::Result<String> {
    if let Some(email) = flag {
        return Ok(email.clone());
    }
    match sessions.remembered_email().await {
        Some(email) => Ok(email),
        None => bail!("an e-mail is required (--email or RECIPEBOOK_EMAIL)"),
    }
}

fn password(flag: &Option<String>) -> anyhow::Result<String> {
    flag.clone()
        .context("a password is required (--password or RECIPEBOOK_PASSWORD)")
}

fn apply_changes(
    form: &mut RecipeForm,
    title: Option<String>,
    ingredient: Option<String>,
    directions: Vec<String>,
    category: Option<String>,
) {
    if let Some(title) = title {
        form.title = title;
    }
    if let Some(ingredient) = ingredient {
        form.ingredient = ingredient;
    }
    if !directions.is_empty() {
        form.direction = directions.join("\n");
    }
    if category.is_some() {
        form.category = category;
    }
}

fn summary_line(record: &RecipeRecord) -> String {
    match &record.category {
        Some(category) => format!("{}  {} [{category}]", record.id, record.title),
        None => format!("{}  {}", record.id, record.title),
    }
}

/// `image_present` is false when the stored image path no longer resolves.
fn detail_text(record: &RecipeRecord, image_present: bool) -> String {
    let mut out = format!("{}\n", record.title);
    if let Some(category) = &record.category {
        out.push_str(&format!("Category: {category}\n"));
    }
    match &record.image {
        Some(image) if image_present => out.push_str(&format!("Image: {image}\n")),
        Some(image) => out.push_str(&format!("Image: default ({image} is missing)\n")),
        None => {}
    }
    out.push_str("\nIngredients:\n");
    for line in record.ingredient.lines() {
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str("\nDirections:\n");
    for (n, step) in record.directions.iter().enumerate() {
        out.push_str(&format!("  {}. {step}\n", n + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use recipebook_core::types::Timestamp;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_with_category() {
        let cli = Cli::try_parse_from([
            "recipebook",
            "--email",
            "chef@example.com",
            "list",
            "--category",
            "Dessert",
            "--grouped",
        ])
        .unwrap();
        assert_eq!(cli.email.as_deref(), Some("chef@example.com"));
        match cli.command {
            Command::List { category, grouped } => {
                assert_eq!(category.as_deref(), Some("Dessert"));
                assert!(grouped);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn add_collects_repeated_directions() {
        let cli = Cli::try_parse_from([
            "recipebook",
            "add",
            "--title",
            "Toast",
            "--ingredient",
            "bread",
            "--direction",
            "Slice",
            "--direction",
            "Toast",
        ])
        .unwrap();
        match cli.command {
            Command::Add(args) => assert_eq!(args.directions, ["Slice", "Toast"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn add_requires_a_direction() {
        assert!(Cli::try_parse_from([
            "recipebook",
            "add",
            "--title",
            "Toast",
            "--ingredient",
            "bread",
        ])
        .is_err());
    }

    #[test]
    fn show_rejects_malformed_id() {
        assert!(Cli::try_parse_from(["recipebook", "show", "not-a-uuid"]).is_err());
    }

    #[test]
    fn edit_overrides_only_given_fields() {
        let mut form = RecipeForm {
            title: "Toast".into(),
            ingredient: "bread".into(),
            direction: "Slice\nToast".into(),
            image: None,
            category: Some("Appetizer".into()),
        };
        apply_changes(&mut form, Some("French Toast".into()), None, vec![], None);
        assert_eq!(form.title, "French Toast");
        assert_eq!(form.ingredient, "bread");
        assert_eq!(form.direction, "Slice\nToast");
        assert_eq!(form.category.as_deref(), Some("Appetizer"));
    }

    #[test]
    fn detail_numbers_directions() {
        let now = Timestamp::default();
        let record = RecipeRecord {
            id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            title: "Toast".into(),
            ingredient: "bread\nbutter".into(),
            directions: vec!["Slice".into(), "Toast".into()],
            image: None,
            category: Some("Appetizer".into()),
            created_at: now,
            updated_at: now,
        };
        let text = detail_text(&record, false);
        assert!(text.starts_with("Toast\nCategory: Appetizer\n"));
        assert!(text.contains("  1. Slice\n  2. Toast\n"));
        assert!(text.contains("  butter\n"));
    }

    #[test]
    fn detail_flags_missing_image() {
        let now = Timestamp::default();
        let mut record = RecipeRecord {
            id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            title: "Toast".into(),
            ingredient: "bread".into(),
            directions: vec!["Slice".into()],
            image: Some("/data/images/toast.jpg".into()),
            category: None,
            created_at: now,
            updated_at: now,
        };
        assert!(detail_text(&record, true).contains("Image: /data/images/toast.jpg\n"));
        assert!(detail_text(&record, false).contains("Image: default (/data/images/toast.jpg is missing)\n"));

        record.image = None;
        assert!(!detail_text(&record, false).contains("Image:"));
    }
}
