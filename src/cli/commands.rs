use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use wb_navigator::error::Result;
use wb_navigator::{Host, Navigator, NavigatorConfig, RefreshOutcome};

#[derive(Parser)]
#[command(name = "wb-navigator")]
#[command(about = "Go-to-definition, references, hover and completion for wb- web components")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Serve navigation requests over stdin/stdout
    wb-navigator serve --root ./site

    # Index a workspace once and list its components
    wb-navigator index ./site

    # Find every place a component is used
    wb-navigator usages wb-button --root ./site
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve newline-delimited JSON requests on stdin/stdout
    Serve {
        /// Workspace root to index
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Build the index once and print it
    Index {
        /// Workspace root to index
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print every usage of a component in the workspace markup
    Usages {
        /// Component identifier, e.g. wb-button
        identifier: String,

        /// Workspace root to scan
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

pub async fn serve(root: &Path) -> Result<()> {
    let navigator = Arc::new(Navigator::open(NavigatorConfig::new(root))?);
    let host = Host::new(navigator);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    host.serve(stdin, tokio::io::stdout()).await
}

pub fn index_workspace(path: &Path, format: &str) -> Result<()> {
    let navigator = Navigator::new(NavigatorConfig::new(path));

    let report = match navigator.refresh_index() {
        RefreshOutcome::Ran { last, .. } => last,
        RefreshOutcome::Coalesced => return Ok(()),
    };
    let records = navigator.index().list();

    if format == "json" {
        let output = serde_json::json!({
            "report": report,
            "components": records.iter().map(|r| r.as_ref()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Indexed {} components from {} definition files",
        report.components, report.files_scanned
    );
    for record in &records {
        println!(
            "  {} ({}) {}:{}",
            record.identifier,
            record.implementation_name,
            record.definition_file.display(),
            record.definition_line
        );
    }
    for diagnostic in &report.diagnostics {
        eprintln!("  error: {}: {}", diagnostic.file_path.display(), diagnostic.message);
    }

    Ok(())
}

pub fn find_usages(root: &Path, identifier: &str) -> Result<()> {
    let navigator = Navigator::new(NavigatorConfig::new(root));
    let usages = navigator.usages().find_usages(identifier);

    if usages.is_empty() {
        println!("No usages of <{}> found", identifier);
        return Ok(());
    }

    for usage in &usages {
        println!("{}:{}:{}", usage.file_path, usage.start_line, usage.start_column + 1);
    }
    println!("{} usages", usages.len());

    Ok(())
}
