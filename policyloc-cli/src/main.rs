use clap::{ArgAction, Parser, Subcommand};
use policyloc_cli::{
    GenerateOptions, logging::init_logging, run_extract_command, run_generate_command,
    run_inspect_command, validate_file_path, validate_languages, validate_output_path,
};

const DEFAULT_POLICY_FILE: &str = "TrustFrameworkLocalization.xml";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Extract and generate localization strings for Azure AD B2C",
    long_about = None
)]
struct Args {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Write one JSON store per language from a localization policy.
    Extract {
        /// Languages to extract
        #[arg(short, long, num_args = 1.., value_delimiter = ',', default_value = "en")]
        languages: Vec<String>,

        /// The policy file to read
        #[arg(short, long, default_value = DEFAULT_POLICY_FILE)]
        input: String,

        /// Folder the `{lang}.json` stores are written to
        #[arg(long, default_value = "i18n")]
        i18n: String,
    },

    /// Build a localization policy from one JSON store per language.
    Generate {
        /// Languages to include; the first one is the default language
        #[arg(short, long, num_args = 1.., value_delimiter = ',', default_value = "en")]
        languages: Vec<String>,

        /// The policy file to write
        #[arg(short, long, default_value = DEFAULT_POLICY_FILE)]
        output: String,

        /// Folder with the `{lang}.json` stores
        #[arg(long, default_value = "i18n")]
        i18n: String,

        /// TOML file with tenant and policy settings
        #[arg(short, long)]
        config: Option<String>,

        /// Warn instead of failing when languages have different resource ids
        #[arg(long)]
        allow_divergent_resources: bool,
    },

    /// Print the content definitions that reference a language.
    Inspect {
        /// The policy file to read
        #[arg(short, long, default_value = DEFAULT_POLICY_FILE)]
        input: String,

        /// Language to show references for
        #[arg(short, long, default_value = "en")]
        language: String,
    },
}

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.commands {
        Commands::Extract {
            languages,
            input,
            i18n,
        } => {
            let languages = validate_languages(&languages).unwrap_or_else(|e| exit_with(e));
            if let Err(e) = validate_file_path(&input) {
                exit_with(e);
            }
            if let Err(e) = run_extract_command(&languages, &input, &i18n) {
                exit_with(e);
            }
        }
        Commands::Generate {
            languages,
            output,
            i18n,
            config,
            allow_divergent_resources,
        } => {
            let languages = validate_languages(&languages).unwrap_or_else(|e| exit_with(e));
            if let Err(e) = validate_output_path(&output) {
                exit_with(e);
            }
            if let Some(path) = &config {
                if let Err(e) = validate_file_path(path) {
                    exit_with(e);
                }
            }
            let options = GenerateOptions {
                i18n,
                output,
                config,
                allow_divergent_resources,
            };
            if let Err(e) = run_generate_command(&languages, &options) {
                exit_with(e);
            }
        }
        Commands::Inspect { input, language } => {
            if let Err(e) = validate_file_path(&input) {
                exit_with(e);
            }
            match run_inspect_command(&input, &language) {
                Ok(json) => println!("{}", json),
                Err(e) => exit_with(e),
            }
        }
    }
}
