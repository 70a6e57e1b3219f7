use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_list, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::content::{find_orphans, remove_images, scan_images};
use crate::reconcile::preview;

#[derive(Subcommand)]
pub enum ContentCommands {
    #[command(about = "List new and already hosted image references in a post")]
    Scan {
        #[arg(help = "HTML file")]
        file: PathBuf,
        #[arg(long, help = "Hosted URL prefix (defaults to MEDIA_HOST_PREFIX / CLOUDINARY_CLOUD_NAME)")]
        host_prefix: Option<String>,
    },

    #[command(about = "Hosted images an edit would orphan")]
    Diff {
        #[arg(help = "HTML before the edit")]
        old: PathBuf,
        #[arg(help = "HTML after the edit")]
        new: PathBuf,
        #[arg(long, help = "Hosted URL prefix (defaults to MEDIA_HOST_PREFIX / CLOUDINARY_CLOUD_NAME)")]
        host_prefix: Option<String>,
    },

    #[command(about = "Print the post with the given images removed")]
    Clean {
        #[arg(help = "HTML file")]
        file: PathBuf,
        #[arg(long = "remove", required = true, help = "Image src to remove (repeatable)")]
        remove: Vec<String>,
    },
}

pub async fn handle(cmd: ContentCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ContentCommands::Scan { file, host_prefix } => {
            let html = read_html(&file)?;
            let refs = scan_images(&html, &resolve_host_prefix(host_prefix));

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("Scanned {}", file.display()),
                    Some(json!({ "new": refs.new, "existing": refs.existing })),
                ),
                OutputFormat::Text => {
                    let new: Vec<String> = refs.new.iter().map(|src| preview(src)).collect();
                    output_list(&output_format, "new", "New images", &new)?;
                    output_list(&output_format, "existing", "Hosted images", &refs.existing)
                }
            }
        }
        ContentCommands::Diff { old, new, host_prefix } => {
            let host_prefix = resolve_host_prefix(host_prefix);
            let before = scan_images(&read_html(&old)?, &host_prefix);
            let after = scan_images(&read_html(&new)?, &host_prefix);

            let orphans = find_orphans(&before.existing, &after.existing);
            output_list(&output_format, "orphans", "Images to delete", &orphans)
        }
        ContentCommands::Clean { file, remove } => {
            let html = read_html(&file)?;
            let cleaned = remove_images(&html, &remove);

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("Removed {} image reference(s)", remove.len()),
                    Some(json!({ "content": cleaned })),
                ),
                OutputFormat::Text => {
                    println!("{}", cleaned);
                    Ok(())
                }
            }
        }
    }
}

fn read_html(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn resolve_host_prefix(explicit: Option<String>) -> String {
    explicit.unwrap_or_else(|| AppConfig::from_env().media.host_prefix)
}
