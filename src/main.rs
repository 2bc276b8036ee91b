use clap::{Parser, Subcommand};
use juicebox_gal::{
    Assembler, ConfigurationError, GalleryConfiguration, Settings, SourceInfo, XmlPath,
};
use juicebox_gal::{config, embed, output, registry::ClassRegistry};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Gallery(#[from] ConfigurationError),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid --set '{0}': expected KEY=VALUE")]
    Setting(String),
}

#[derive(Parser)]
#[command(name = "juicebox")]
#[command(about = "Assemble Juicebox gallery configurations and embed markup")]
#[command(long_about = "\
Assemble Juicebox gallery configurations and embed markup

A gallery is identified by its xml path, whose first component is the
source type:

  view/galleries/page_1            # gallery built from a view display
  field/node/7/field_images/full   # gallery built from an image field

Source data is JSON:

  {
    \"title\": \"Galleries\",
    \"options\": { \"textColor\": \"rgba(255,255,255,1)\" },
    \"images\": [ { \"imageurl\": \"a.jpg\", \"title\": \"Dawn\", \"caption\": \"...\" } ]
  }

Defaults come from juicebox.toml in the config directory.
Run 'juicebox gen-config' to print a documented one.

'assemble' writes only the JSON document to stdout; the inventory and all
log lines go to stderr. A failing extension is skipped with a warning. When
it panicked, the standard panic message also appears on stderr just before
that warning; assembly still completes.")]
#[command(version)]
struct Cli {
    /// Directory containing juicebox.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a gallery and print its configuration as JSON
    Assemble {
        /// Gallery xml path, e.g. view/galleries/page_1
        xml_path: String,
        /// JSON file with the gallery's source data
        #[arg(long)]
        data: Option<PathBuf>,
        /// Extra settings, e.g. --set jlib_textColor=red (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        settings: Vec<String>,
        /// Skip the human-readable inventory on stderr
        #[arg(long)]
        quiet: bool,
    },
    /// Print the embed markup for a gallery
    Embed {
        /// Gallery xml path, e.g. view/galleries/page_1
        xml_path: String,
        /// Gallery width (defaults to embed.width)
        #[arg(long)]
        width: Option<String>,
        /// Gallery height (defaults to embed.height)
        #[arg(long)]
        height: Option<String>,
    },
    /// Print a stock juicebox.toml with all options documented
    GenConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(err) = run(Cli::parse()) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Assemble {
            xml_path,
            data,
            settings,
            quiet,
        } => {
            let site_config = config::load_config(&cli.config)?;
            let xml_path = XmlPath::parse(&xml_path)?;
            let source_data = match data {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .map_err(|source| CliError::Io { path, source })?;
                    serde_json::from_str(&content)?
                }
                None => serde_json::Value::Null,
            };
            let mut merged = site_config.settings();
            merged.extend(parse_settings(&settings)?);

            let assembler = Assembler::new(ClassRegistry::default(), site_config.library);
            let source = SourceInfo::new(xml_path, source_data);
            let gallery = assembler.assemble(&source, &merged)?;

            report_assembly(
                &mut std::io::stdout().lock(),
                &mut std::io::stderr().lock(),
                &source.xml_path,
                &gallery,
                quiet,
            )?;
        }
        Command::Embed {
            xml_path,
            width,
            height,
        } => {
            let site_config = config::load_config(&cli.config)?;
            let xml_path = XmlPath::parse(&xml_path)?;
            let url = embed::config_url(&site_config.embed.xml_base_url, &xml_path);
            let width = width.unwrap_or(site_config.embed.width);
            let height = height.unwrap_or(site_config.embed.height);
            print!("{}", embed::render(&url, &width, &height).into_string());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// JSON document to `out`; the inventory, unless `quiet`, to `report`.
fn report_assembly(
    out: &mut impl Write,
    report: &mut impl Write,
    xml_path: &XmlPath,
    gallery: &GalleryConfiguration,
    quiet: bool,
) -> Result<(), CliError> {
    let io_err = |source| CliError::Io {
        path: PathBuf::from("-"),
        source,
    };
    serde_json::to_writer_pretty(&mut *out, gallery)?;
    writeln!(out).map_err(io_err)?;
    if !quiet {
        output::write_configuration(report, xml_path, gallery).map_err(io_err)?;
    }
    Ok(())
}

/// Parse repeated `KEY=VALUE` flags into a settings bag.
fn parse_settings(raw: &[String]) -> Result<Settings, CliError> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(CliError::Setting(entry.clone())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_settings_pairs() {
        let settings =
            parse_settings(&["jlib_textColor=red".to_string(), "width= 50%".to_string()]).unwrap();
        assert_eq!(settings["jlib_textColor"], "red");
        assert_eq!(settings["width"], " 50%");
    }

    #[test]
    fn parse_settings_value_may_contain_equals() {
        let settings = parse_settings(&["manual_config=a=\"b\"".to_string()]).unwrap();
        assert_eq!(settings["manual_config"], "a=\"b\"");
    }

    #[test]
    fn parse_settings_rejects_missing_key() {
        assert!(matches!(
            parse_settings(&["=x".to_string()]),
            Err(CliError::Setting(_))
        ));
        assert!(parse_settings(&["novalue".to_string()]).is_err());
    }

    #[test]
    fn cli_parses_assemble() {
        let cli = Cli::try_parse_from([
            "juicebox",
            "assemble",
            "view/a",
            "--set",
            "width=1",
            "--set",
            "height=2",
        ])
        .unwrap();
        match cli.command {
            Command::Assemble { xml_path, settings, .. } => {
                assert_eq!(xml_path, "view/a");
                assert_eq!(settings.len(), 2);
            }
            _ => panic!("expected assemble"),
        }
    }

    #[test]
    fn assembly_stdout_is_pure_json() {
        let gallery = Assembler::default()
            .assemble(
                &SourceInfo::new(
                    XmlPath::parse("view/a").unwrap(),
                    serde_json::json!({ "title": "T", "images": [{ "imageurl": "1.jpg" }] }),
                ),
                &Settings::new(),
            )
            .unwrap();
        let path = XmlPath::parse("view/a").unwrap();

        let (mut out, mut report) = (Vec::new(), Vec::new());
        report_assembly(&mut out, &mut report, &path, &gallery, false).unwrap();
        let parsed: GalleryConfiguration = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, gallery);
        let report = String::from_utf8(report).unwrap();
        assert!(report.starts_with("Gallery view/a (1 image"));

        let (mut out, mut report) = (Vec::new(), Vec::new());
        report_assembly(&mut out, &mut report, &path, &gallery, true).unwrap();
        assert!(serde_json::from_slice::<GalleryConfiguration>(&out).is_ok());
        assert!(report.is_empty());
    }

    #[test]
    fn long_about_documents_stream_split_and_panic_output() {
        use clap::CommandFactory;
        let about = Cli::command().get_long_about().unwrap().to_string();
        assert!(about.contains("only the JSON document to stdout"));
        assert!(about.contains("panic message also appears on stderr"));
    }
}
