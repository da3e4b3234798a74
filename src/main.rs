use anyhow::Result;
use clap::{Parser, Subcommand};

use gitlab_autotag::artifact::TagStatus;
use gitlab_autotag::cli::{self, ReleaseTagsArgs, TagFetch, TagWorkflowArgs};
use gitlab_autotag::config::Config;
use gitlab_autotag::git::Git2Repository;
use gitlab_autotag::gitlab::GitLabClient;
use gitlab_autotag::{ui, AutotagError};

#[derive(Parser)]
#[command(
    name = "gitlab-autotag",
    version,
    about = "Tag GitLab projects with semantic versions driven by merge request labels"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the next version tag for the latest commit
    Tag {
        #[arg(long, help = "Compute the tag without creating it")]
        dry_run: bool,

        #[arg(short, long, help = "Write the tag artifact to this JSON file")]
        output: Option<String>,
    },

    /// Save the checkbox list of the pipeline's merge request description
    MrTemplate {
        #[arg(short, long, help = "Output JSON file [default: mr_template.json]")]
        output: Option<String>,
    },

    /// Save impacted components and Jira ids of the pipeline commit's merge request
    MrInfo {
        #[arg(short, long, help = "Output JSON file [default: mr_info.json]")]
        output: Option<String>,
    },

    /// List the tags created between two release tags
    ReleaseTags {
        #[arg(long, help = "Previous release tag")]
        previous: String,

        #[arg(long, help = "Current release tag")]
        current: String,

        #[arg(long, help = "Only consider tags matching this glob")]
        pattern: Option<String>,

        #[arg(
            long,
            value_name = "REMOTE",
            num_args = 0..=1,
            default_missing_value = "",
            help = "Fetch tags first, from REMOTE or from every remote when omitted"
        )]
        fetch: Option<String>,

        #[arg(short, long, help = "Write the tags to this JSON file")]
        output: Option<String>,
    },

    /// Flatten a pipeline test report into one CSV row per test case
    TestReport {
        #[arg(short, long, help = "Test report JSON [default: test_report.json]")]
        input: Option<String>,

        #[arg(short, long, help = "Output CSV file [default: test_report.csv]")]
        output: Option<String>,
    },

    /// Add the version label to the pipeline's merge request
    LabelMr {
        #[arg(long, help = "Label to add [default: merge_request.version_label]")]
        label: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Tag { dry_run, output } => {
            let api = gitlab_client(&config)?;
            let repo = Git2Repository::open(".")?;
            let artifact =
                cli::run_tag_workflow(&TagWorkflowArgs { dry_run, output }, &config, &repo, &api)?;
            if artifact.status == TagStatus::Malformed {
                return Err(AutotagError::malformed_tag(artifact.base_tag).into());
            }
        }
        Command::MrTemplate { output } => {
            let api = gitlab_client(&config)?;
            cli::run_mr_template_workflow(output.as_deref(), &config, &api)?;
        }
        Command::MrInfo { output } => {
            let api = gitlab_client(&config)?;
            cli::run_mr_info_workflow(output.as_deref(), &config, &api)?;
        }
        Command::ReleaseTags {
            previous,
            current,
            pattern,
            fetch,
            output,
        } => {
            let repo = Git2Repository::open(".")?;
            // A bare `--fetch` arrives as an empty value
            let fetch = fetch.map(|remote| {
                if remote.is_empty() {
                    TagFetch::AllRemotes
                } else {
                    TagFetch::Remote(remote)
                }
            });
            let release_args = ReleaseTagsArgs {
                previous,
                current,
                pattern,
                fetch,
                output,
            };
            cli::run_release_tags_workflow(&release_args, &repo)?;
        }
        Command::TestReport { input, output } => {
            cli::run_test_report_workflow(input.as_deref(), output.as_deref())?;
        }
        Command::LabelMr { label } => {
            let api = gitlab_client(&config)?;
            cli::run_label_workflow(label.as_deref(), &config, &api)?;
        }
    }

    Ok(())
}

fn gitlab_client(config: &Config) -> Result<GitLabClient> {
    config.validate_gitlab()?;
    let client = GitLabClient::new(
        &config.gitlab.base_url,
        config.project_id()?,
        config.token()?,
        config.timeout(),
        config.gitlab.commits_per_page,
    )?;
    Ok(client)
}
