use clap::{Arg, ArgAction, ArgMatches, Command};
use i18n_autotranslate::mt::translator::{AUTO_LOCALE, DEFAULT_SOURCE_LOCALE};
use i18n_autotranslate::mt::{Provider, build_translator, translate_text};
use i18n_autotranslate::{
    BatchTranslationPipeline, Config, Error, FileFormat, RunOutcome, TranslationFile,
    resolve_output_path,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn cli() -> Command {
    Command::new("i18n-autotranslate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate English text for $t() keys and machine-translate locale files")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .short('p')
                .global(true)
                .help("Translation provider: google, baidu, tencent, tencent-cloud, libre"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .global(true)
                .help("Use mock translator instead of a real provider")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Show every translation attempt")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate a piece of text into the target language")
                .arg(Arg::new("text").help("Text to translate").required(true))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source language code (default: from config)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target language code (default: from config)"),
                ),
        )
        .subcommand(
            Command::new("to-english")
                .about("Translate a piece of text in any language into English")
                .arg(Arg::new("text").help("Text to translate").required(true)),
        )
        .subcommand(
            Command::new("extract")
                .about("Extract $t() keys from a file and update both locale files")
                .arg(
                    Arg::new("file")
                        .help("Source file to scan")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("en")
                        .long("en")
                        .help("English locale file, relative to the source file"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .help("Target locale file, relative to the source file"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["module", "json"])
                        .help("Output shape of both locale files"),
                )
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Workspace root for packages/ paths"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<Config, Error> {
    let mut config = Config::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if let Some(provider) = matches.get_one::<String>("provider") {
        config.provider = provider.parse()?;
    }
    if matches.get_flag("mock") {
        config.provider = Provider::Mock;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("translate", sub)) => {
            let text = sub.get_one::<String>("text").map(String::as_str).unwrap_or_default();
            let from = sub
                .get_one::<String>("from")
                .unwrap_or(&config.source_locale);
            let to = sub.get_one::<String>("to").unwrap_or(&config.target_locale);

            let translator = build_translator(&config)?;
            let translated = translate_text(translator.as_ref(), text, from, to).await?;
            println!("{}", translated);
        }
        Some(("to-english", sub)) => {
            let text = sub.get_one::<String>("text").map(String::as_str).unwrap_or_default();

            let translator = build_translator(&config)?;
            let translated =
                translate_text(translator.as_ref(), text, AUTO_LOCALE, DEFAULT_SOURCE_LOCALE)
                    .await?;
            println!("{}", translated);
        }
        Some(("extract", sub)) => extract(&config, sub).await?,
        _ => return Err("no subcommand given".into()),
    }

    Ok(())
}

async fn extract(config: &Config, matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let file = matches
        .get_one::<PathBuf>("file")
        .ok_or("missing source file")?;
    let source = std::fs::read_to_string(file).map_err(|e| Error::io(file, e))?;

    let source_dir = file.parent().unwrap_or_else(|| Path::new("."));
    let workspace_root = matches.get_one::<PathBuf>("root").map(PathBuf::as_path);
    let format = match matches.get_one::<String>("format") {
        Some(format) => format.parse::<FileFormat>()?,
        None => config.output.format,
    };

    let english_path = matches
        .get_one::<String>("en")
        .cloned()
        .unwrap_or_else(|| config.output.english_path.to_string_lossy().into_owned());
    let target_path = matches
        .get_one::<String>("target")
        .cloned()
        .unwrap_or_else(|| config.output.target_path.to_string_lossy().into_owned());

    let english_file = TranslationFile::new(
        resolve_output_path(&english_path, source_dir, workspace_root),
        config.source_locale.clone(),
        format,
    );
    let target_file = TranslationFile::new(
        resolve_output_path(&target_path, source_dir, workspace_root),
        config.target_locale.clone(),
        format,
    );

    let translator = build_translator(config)?;
    let pipeline = BatchTranslationPipeline::new(translator, config.pipeline.clone())
        .with_locales(&config.source_locale, &config.target_locale);

    let cancel = pipeline.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cancel requested, stopping after the current batch");
            cancel.cancel();
        }
    });

    info!(file = %file.display(), "extracting translation keys");
    match pipeline.run(&source, &english_file, &target_file).await? {
        RunOutcome::Completed(summary) => {
            for fallback in &summary.fallbacks {
                eprintln!(
                    "⚠️  {}: kept English text \"{}\" ({})",
                    fallback.key, fallback.source_text, fallback.reason
                );
            }
            println!("✅ Translation finished");
            println!("   New keys:      {}", summary.new_keys);
            println!("   Existing keys: {}", summary.existing_keys);
            println!("   Total keys:    {}", summary.total_keys);
            println!("   English file:  {}", summary.english_path.display());
            println!("   Target file:   {}", summary.target_path.display());
        }
        RunOutcome::Cancelled {
            completed_batches, ..
        } => {
            println!(
                "🛑 Translation cancelled after {} batch(es); no files were written",
                completed_batches
            );
        }
    }

    Ok(())
}
