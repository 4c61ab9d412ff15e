use blogskin::{config, output, pipeline};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blogskin")]
#[command(about = "Build a Blogger theme from an HTML skeleton and an annotated style sheet")]
#[command(long_about = "\
Build a Blogger theme from an HTML skeleton and an annotated style sheet

The skeleton is plain HTML. Only the content of <body> is used, and marker
comments in it are replaced by Blogger widget sections. The style sheet is
embedded verbatim as the theme skin; @variable comments in it become
<b:variable> declarations editable from the theme designer.

Project structure:

  my-theme/
  ├── blogskin.toml                # Optional config
  ├── src/
  │   ├── html/main.html           # Skeleton
  │   └── css/style.css            # Skin
  └── dist/
      └── theme.xml                # Output

Markers (in main.html):
  <!-- HEADER_SECTION -->                            → Header widget
  <!-- POSTS_LOOP_START --> ... <!-- POSTS_LOOP_END --> → Blog widget
  <!-- SIDEBAR_SECTION -->                           → Sidebar widgets

Annotations (in style.css):
  /* @variable name=\"bgColor\" group=\"colors\" type=\"color\" default=\"#fff\" */

Run 'blogskin gen-config' to print a documented blogskin.toml.")]
#[command(version)]
struct Cli {
    /// Project root (holds blogskin.toml and the input paths)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble the theme and write it to the output path
    Build,
    /// Run the whole pipeline without writing anything
    Check,
    /// List the variables declared in the style sheet
    Variables {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock blogskin.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.root)?;
            println!("==> Building theme in {}", cli.root.display());
            let report = pipeline::build(&cli.root, &config)?;
            output::print_build_output(&report);
        }
        Command::Check => {
            let config = config::load_config(&cli.root)?;
            println!("==> Checking {}", cli.root.display());
            let report = pipeline::check(&cli.root, &config)?;
            output::print_build_output(&report);
        }
        Command::Variables { json } => {
            let config = config::load_config(&cli.root)?;
            let extraction = pipeline::scan_variables(&cli.root, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&extraction)?);
            } else {
                output::print_variables(&extraction);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
