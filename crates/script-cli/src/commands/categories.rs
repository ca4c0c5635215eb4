use script_core::catalog::Catalog;
use script_core::config::Config;

pub async fn list(config: &Config) -> anyhow::Result<()> {
    let catalog = Catalog::new(&config.scripts_dir);
    let categories = catalog.categories()?;
    if categories.is_empty() {
        println!("No categories in {}", config.scripts_dir.display());
        println!("Run `scriptdeck init` to create the default categories.");
        return Ok(());
    }
    for name in categories {
        let count = catalog.scripts(&name).map(|s| s.len()).unwrap_or(0);
        println!("{:<30} {:>3} script(s)", name, count);
    }
    Ok(())
}

/// Create the scripts directory and every configured category.
pub async fn init(config: &Config) -> anyhow::Result<()> {
    let report = Catalog::new(&config.scripts_dir).ensure_categories(&config.categories)?;
    println!("Scripts directory: {}", config.scripts_dir.display());
    if report.created.is_empty() {
        println!("All script directories already exist.");
    } else {
        println!(
            "Created {} missing directories: {}",
            report.created.len(),
            report.created.join(", ")
        );
    }
    Ok(())
}

pub async fn add(config: &Config, name: &str) -> anyhow::Result<()> {
    let dir = Catalog::new(&config.scripts_dir).add_category(name)?;
    println!("Created new category: {}", dir.display());
    Ok(())
}
