use anyhow::Result;
use clap::Parser;

use git_semtag::cli::{Operation, OperationRequest};
use git_semtag::config;
use git_semtag::git::{Git2Backend, RepositoryBackend};
use git_semtag::manager::{InitOutcome, TagVersionManager};
use git_semtag::ui;
use git_semtag::version::SemanticVersion;

#[derive(clap::Parser)]
#[command(
    name = "git-semtag",
    version,
    about = "Manage semantic-version tags and keep them in sync with the remote"
)]
struct Args {
    #[arg(short, long, help = "Tag to create, taken verbatim")]
    tag: Option<String>,

    #[arg(short = 'M', long, help = "Bump major version")]
    major: bool,

    #[arg(short = 'm', long, help = "Bump minor version")]
    minor: bool,

    #[arg(short = 'p', long, help = "Bump patch version")]
    patch: bool,

    #[arg(
        short = 'n',
        long,
        value_name = "LABEL",
        help = "Create a pre-release tag for the current version"
    )]
    pre_release: Option<String>,

    #[arg(short, long, help = "Delete the last tag locally and on the remote")]
    delete: bool,

    #[arg(short, long, help = "Initialize the repository with seed tag v0.0.0")]
    init: bool,

    #[arg(
        short = 'I',
        long,
        help = "Initialize with seed tag 0.0.0 (no 'v' prefix)"
    )]
    init_no_prefix: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = run(args) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: Args) -> git_semtag::Result<()> {
    let request = OperationRequest {
        tag: args.tag,
        major: args.major,
        minor: args.minor,
        patch: args.patch,
        pre_release: args.pre_release,
        delete: args.delete,
        init: args.init,
        init_no_prefix: args.init_no_prefix,
    };
    let operation = request.resolve()?;

    // Gate bad user input before any repository I/O
    if let Operation::Explicit(tag) = &operation {
        SemanticVersion::validate_format(tag)?;
    }

    let config = config::load_config(args.config.as_deref())?;
    let working_path = std::env::current_dir()?;
    let backend = Git2Backend::from_current_dir(&config.remote)?;
    let mut manager = TagVersionManager::new(backend, working_path);

    manager.preflight()?;

    match operation {
        Operation::ShowCurrent => {
            let tag = manager.resolve_current_tag()?;
            warn_if_degraded(&manager);
            if tag.is_empty() {
                ui::display_status(
                    "no tags yet, run 'git-semtag --init' to create a seed tag",
                );
            } else {
                ui::display_current_tag(&tag);
            }
        }
        Operation::Explicit(tag) => {
            manager.apply_explicit_tag(&tag)?;
            ui::display_new_tag(&tag);
            ui::display_success("tag pushed to remote");
        }
        Operation::Bump(kind) => {
            let current = manager.resolve_current_tag()?;
            warn_if_degraded(&manager);
            if !current.is_empty() {
                ui::display_current_tag(&current);
            }
            let new_tag = manager.compute_bump(kind)?;
            ui::display_new_tag(&new_tag);
            manager.commit(&new_tag)?;
            ui::display_success("tag pushed to remote");
        }
        Operation::PreRelease(label) => {
            let current = manager.resolve_current_tag()?;
            warn_if_degraded(&manager);
            if !current.is_empty() {
                ui::display_current_tag(&current);
            }
            let new_tag = manager.compute_pre_release(&label)?;
            ui::display_new_tag(&new_tag);
            manager.commit(&new_tag)?;
            ui::display_success("tag pushed to remote");
        }
        Operation::DeleteLast => {
            let current = manager.resolve_current_tag()?;
            warn_if_degraded(&manager);
            if !current.is_empty() {
                ui::display_status(&format!("deleting tag {}", current));
            }
            let deleted = manager.delete_last()?;
            ui::display_success(&format!(
                "tag {} deleted locally and on the remote",
                deleted
            ));
        }
        Operation::Initialize { no_prefix } => match manager.initialize(no_prefix)? {
            InitOutcome::Created(tag) => {
                ui::display_success(&format!("created and pushed seed tag {}", tag));
            }
            InitOutcome::AlreadyInitialized(tag) => {
                ui::display_status(&format!(
                    "repository already initialized, current tag is {}",
                    tag
                ));
            }
        },
    }

    Ok(())
}

fn warn_if_degraded<B: RepositoryBackend>(manager: &TagVersionManager<B>) {
    if manager.state().used_fallback_ordering {
        ui::display_status(
            "commit-time tag ordering unavailable, using the nearest-tag fallback \
             (can differ when one commit carries several tags)",
        );
    }
}
