use clap::{Args, Parser, Subcommand};
use name_forge::{
    FileVocabulary, Gender, GrammarBuilder, GrammarConfig, NameBank, NameCase, NameConfig,
    NameFormatter, NameGenerator, NameOrder, Origin, TerminalResolver,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Grammar-based fantasy name generator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    name: NameArgs,

    /// Number of names to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Display casing of generated names
    #[arg(long, value_enum, default_value_t = NameCase::Title)]
    case: NameCase,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct NameArgs {
    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gender variant to draw from (repeatable)
    #[arg(short, long, value_enum)]
    gender: Vec<Gender>,

    /// Character origin
    #[arg(long, value_enum)]
    origin: Option<Origin>,

    /// Cultural name bank
    #[arg(long, value_enum)]
    bank: Option<NameBank>,

    /// Name order: western, eastern, forename-only or surname-only
    #[arg(long)]
    order: Option<String>,

    /// Prefix the name with a title
    #[arg(long, overrides_with = "no_title")]
    title: bool,

    /// Do not prefix the name with a title
    #[arg(long, overrides_with = "title")]
    no_title: bool,

    /// Do not append "of <place>"
    #[arg(long)]
    no_postfix: bool,

    /// Let title and postfix randomly be left out
    #[arg(long)]
    optional: bool,

    /// Root directory of the vocabulary files
    #[arg(long, default_value = "name-segments")]
    vocabulary_dir: PathBuf,

    /// Maximum expansion depth
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compiled grammar as JSON
    Grammar {
        /// Print the grammar after vocabulary resolution
        #[arg(long)]
        resolved: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli.name)?;
    let vocabulary = FileVocabulary::new(&cli.name.vocabulary_dir);
    let grammar_config = cli
        .name
        .max_depth
        .map(|max_recursion_depth| GrammarConfig { max_recursion_depth })
        .unwrap_or_default();

    if let Some(Commands::Grammar { resolved }) = cli.command {
        let rules = GrammarBuilder::new(&config).build();
        let json = if resolved {
            TerminalResolver::new(&vocabulary)
                .resolve(rules)
                .with_config(grammar_config)
                .to_json()?
        } else {
            rules.to_json()?
        };
        println!("{}", json);
        return Ok(());
    }

    let generator = NameGenerator::new(&config, &vocabulary)
        .with_grammar_config(grammar_config)
        .with_formatter(NameFormatter::new(cli.case));

    let mut rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    for _ in 0..cli.count {
        println!("{}", generator.generate(&mut rng)?);
    }

    Ok(())
}

/// Start from the config file (or the defaults) and apply flag overrides
fn load_config(args: &NameArgs) -> name_forge::Result<NameConfig> {
    let mut config = match &args.config {
        Some(path) => NameConfig::from_json_file(path)?,
        None => NameConfig::default(),
    };

    if !args.gender.is_empty() {
        config.genders = args.gender.iter().copied().collect();
    }
    if let Some(origin) = args.origin {
        config.origin = origin;
    }
    if let Some(bank) = args.bank {
        config.name_bank = bank;
    }
    if let Some(order) = &args.order {
        config.order = NameOrder::from(order.as_str());
    }
    if args.title {
        config.has_title_prefix = true;
    }
    if args.no_title {
        config.has_title_prefix = false;
    }
    if args.no_postfix {
        config.has_origin_postfix = false;
    }
    if args.optional {
        config.optional_segments = true;
    }

    Ok(config)
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
